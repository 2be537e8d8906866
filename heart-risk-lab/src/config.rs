//! Configuration for the Heart Risk Lab service
//!
//! All settings come from environment variables. Values that are missing or
//! fail to parse fall back to their defaults, so a bare `heart-risk-lab`
//! starts a development server on `127.0.0.1:5000` with `model.json` in the
//! working directory.
//!
//! Environment variables:
//! - HEART_RISK_HOST: bind address (default `127.0.0.1`)
//! - HEART_RISK_PORT: bind port (default `5000`)
//! - HEART_RISK_MODEL_PATH: saved model location (default `model.json`)
//! - HEART_RISK_TRAINING_SAMPLES: synthetic rows when bootstrapping (default `100`)
//! - HEART_RISK_TRAINING_SEED: synthetic data seed (default: random)
//! - HEART_RISK_LOG_LEVEL: default tracing level (default `info`)
//! - LOG_FORMAT: `json` for JSON logs, anything else for plain text
//! - PLATFORM_ENV: dev | staging | prod
//! - TELEMETRY_STDOUT: dump telemetry events as JSON at debug level (default `true`)

use anyhow::{anyhow, Result};
use heart_risk_agents::model::{TrainingConfig, DEFAULT_MODEL_PATH};
use serde::Deserialize;
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Smallest synthetic sample count accepted outside dev.
const MIN_PRODUCTION_SAMPLES: usize = 10;

/// Platform environment.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlatformEnv {
    #[default]
    Dev,
    Staging,
    Prod,
}

impl PlatformEnv {
    fn parse(value: &str) -> Self {
        match value {
            "prod" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Staging => "staging",
            Self::Prod => "prod",
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: IpAddr,

    /// HTTP server port
    pub port: u16,

    /// Platform environment
    pub platform_env: PlatformEnv,

    /// Saved model location
    pub model_path: PathBuf,

    /// Bootstrap training parameters
    pub training: TrainingConfig,

    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Default tracing level when `RUST_LOG` is unset
    pub log_level: String,

    /// Log output format
    pub log_format: LogFormat,

    /// Dump telemetry events as JSON
    pub telemetry_stdout: bool,
}

fn default_service_name() -> String {
    "heart-risk-lab".to_string()
}

fn default_service_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let training_defaults = TrainingConfig::default();

        let platform_env = lookup("PLATFORM_ENV")
            .map(|v| PlatformEnv::parse(&v))
            .unwrap_or_default();

        let config = Self {
            host: lookup("HEART_RISK_HOST")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.host),
            port: lookup("HEART_RISK_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            platform_env,
            model_path: lookup("HEART_RISK_MODEL_PATH")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            training: TrainingConfig {
                samples: lookup("HEART_RISK_TRAINING_SAMPLES")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(training_defaults.samples),
                seed: lookup("HEART_RISK_TRAINING_SEED").and_then(|v| v.parse().ok()),
                ..training_defaults
            },
            service_name: lookup("SERVICE_NAME").unwrap_or_else(default_service_name),
            service_version: lookup("SERVICE_VERSION").unwrap_or_else(default_service_version),
            log_level: lookup("HEART_RISK_LOG_LEVEL").unwrap_or_else(default_log_level),
            log_format: match lookup("LOG_FORMAT").as_deref() {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Plain,
            },
            telemetry_stdout: lookup("TELEMETRY_STDOUT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.telemetry_stdout),
        };

        config.validate_for_production()?;
        Ok(config)
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Platform environment as a lowercase string.
    pub fn platform_env_name(&self) -> &'static str {
        self.platform_env.as_str()
    }

    /// Default `EnvFilter` directives for this service.
    pub fn default_log_filter(&self) -> String {
        format!(
            "heart_risk_lab={level},heart_risk_agents={level},tower_http={level}",
            level = self.log_level
        )
    }

    /// Reject settings that only make sense on a developer machine.
    pub fn validate_for_production(&self) -> Result<()> {
        if self.platform_env == PlatformEnv::Dev {
            return Ok(());
        }

        if self.model_path.is_relative() {
            return Err(anyhow!(
                "HEART_RISK_MODEL_PATH must be absolute in {} mode. Got: {}",
                self.platform_env.as_str(),
                self.model_path.display()
            ));
        }

        if self.training.samples < MIN_PRODUCTION_SAMPLES {
            return Err(anyhow!(
                "HEART_RISK_TRAINING_SAMPLES must be at least {} in {} mode. Got: {}",
                MIN_PRODUCTION_SAMPLES,
                self.platform_env.as_str(),
                self.training.samples
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    /// Development defaults.
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 5000,
            platform_env: PlatformEnv::default(),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            training: TrainingConfig::default(),
            service_name: default_service_name(),
            service_version: default_service_version(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            telemetry_stdout: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:5000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.platform_env, PlatformEnv::Dev);
        assert_eq!(config.model_path, PathBuf::from("model.json"));
        assert_eq!(config.training, TrainingConfig::default());
        assert_eq!(config.log_format, LogFormat::Plain);
        assert!(config.telemetry_stdout);
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("HEART_RISK_HOST", "0.0.0.0"),
            ("HEART_RISK_PORT", "8080"),
            ("HEART_RISK_MODEL_PATH", "/var/lib/heart-risk/model.json"),
            ("HEART_RISK_TRAINING_SAMPLES", "250"),
            ("HEART_RISK_TRAINING_SEED", "7"),
            ("HEART_RISK_LOG_LEVEL", "debug"),
            ("LOG_FORMAT", "json"),
            ("TELEMETRY_STDOUT", "false"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr(), "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.model_path, PathBuf::from("/var/lib/heart-risk/model.json"));
        assert_eq!(config.training.samples, 250);
        assert_eq!(config.training.seed, Some(7));
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(!config.telemetry_stdout);
        assert_eq!(
            config.default_log_filter(),
            "heart_risk_lab=debug,heart_risk_agents=debug,tower_http=debug"
        );
    }

    #[test]
    fn test_unparsable_values_fall_back() {
        let config = from_pairs(&[
            ("HEART_RISK_PORT", "not-a-port"),
            ("HEART_RISK_TRAINING_SAMPLES", "-3"),
            ("HEART_RISK_TRAINING_SEED", "abc"),
            ("HEART_RISK_MODEL_PATH", "  "),
        ])
        .unwrap();

        assert_eq!(config.port, 5000);
        assert_eq!(config.training.samples, 100);
        assert_eq!(config.training.seed, None);
        assert_eq!(config.model_path, PathBuf::from("model.json"));
    }

    #[test]
    fn test_production_requires_absolute_model_path() {
        let err = from_pairs(&[("PLATFORM_ENV", "prod")]).unwrap_err();
        assert!(err.to_string().contains("HEART_RISK_MODEL_PATH"));

        let config = from_pairs(&[
            ("PLATFORM_ENV", "staging"),
            ("HEART_RISK_MODEL_PATH", "/srv/model.json"),
        ])
        .unwrap();
        assert_eq!(config.platform_env_name(), "staging");
    }

    #[test]
    fn test_production_requires_enough_samples() {
        let err = from_pairs(&[
            ("PLATFORM_ENV", "prod"),
            ("HEART_RISK_MODEL_PATH", "/srv/model.json"),
            ("HEART_RISK_TRAINING_SAMPLES", "5"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("HEART_RISK_TRAINING_SAMPLES"));
    }
}
