//! Predict command
//!
//! ```bash
//! heart-risk predict --age 54 --gender 1 --sbp 140 --chol 230 --hdl 45 --smoke 0 --diabetes 1
//! heart-risk predict --input patient.json
//! echo '{"age": 54, ...}' | heart-risk --output json predict --stdin
//! ```

use anyhow::{bail, Context as _, Result};
use clap::Args;
use comfy_table::Cell;
use std::io::{self, Read};
use std::path::PathBuf;

use heart_risk_agents::model::{load_or_train, TrainingConfig};
use heart_risk_agents::{PredictHandler, RiskAgent, RiskInput, FEATURE_NAMES};

use crate::context::Context;
use crate::output::{print_section, risk_cell};

/// Classify one set of health indicators.
#[derive(Debug, Args)]
pub struct PredictCommand {
    /// Input file path (JSON)
    #[arg(short, long, conflicts_with = "stdin")]
    pub input: Option<PathBuf>,

    /// Read input JSON from stdin
    #[arg(long)]
    pub stdin: bool,

    /// Age in years
    #[arg(long, allow_negative_numbers = true)]
    pub age: Option<f64>,

    /// Gender (0=F, 1=M)
    #[arg(long, allow_negative_numbers = true)]
    pub gender: Option<f64>,

    /// Systolic blood pressure
    #[arg(long, allow_negative_numbers = true)]
    pub sbp: Option<f64>,

    /// Total cholesterol
    #[arg(long, allow_negative_numbers = true)]
    pub chol: Option<f64>,

    /// HDL cholesterol
    #[arg(long, allow_negative_numbers = true)]
    pub hdl: Option<f64>,

    /// Smoking (0/1)
    #[arg(long, allow_negative_numbers = true)]
    pub smoke: Option<f64>,

    /// Diabetes (0/1)
    #[arg(long, allow_negative_numbers = true)]
    pub diabetes: Option<f64>,
}

impl PredictCommand {
    fn flag_values(&self) -> [Option<f64>; 7] {
        [
            self.age,
            self.gender,
            self.sbp,
            self.chol,
            self.hdl,
            self.smoke,
            self.diabetes,
        ]
    }

    /// Resolve the input from a file, stdin, or the seven flags.
    fn resolve_input(&self) -> Result<RiskInput> {
        let flags = self.flag_values();
        let any_flag = flags.iter().any(Option::is_some);

        if self.input.is_some() || self.stdin {
            if any_flag {
                bail!("Feature flags cannot be combined with --input or --stdin");
            }
            let json = read_input(self.input.as_ref(), self.stdin)?;
            return serde_json::from_str(&json).context("Failed to parse risk input JSON");
        }

        let missing: Vec<String> = FEATURE_NAMES
            .iter()
            .zip(flags)
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| format!("--{}", name))
            .collect();
        if !missing.is_empty() {
            bail!(
                "Missing required values: {} (or pass --input / --stdin)",
                missing.join(", ")
            );
        }

        Ok(RiskInput::from_features(flags.map(|value| value.unwrap_or_default())))
    }
}

/// Read input from file or stdin
fn read_input(file: Option<&PathBuf>, use_stdin: bool) -> Result<String> {
    if use_stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    } else if let Some(path) = file {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))
    } else {
        bail!("Either --input or --stdin must be provided")
    }
}

/// Execute the predict command
pub async fn execute(ctx: &Context, cmd: PredictCommand) -> Result<()> {
    let input = cmd.resolve_input()?;

    let saved = load_or_train(&ctx.model_path, &TrainingConfig::default())
        .with_context(|| format!("Failed to load model from {}", ctx.model_path.display()))?;
    let handler = PredictHandler::new(RiskAgent::from_saved(&saved)?);

    let output = handler
        .handle(input)
        .await
        .map_err(|e| anyhow::anyhow!("Prediction failed: {}", e))?;

    if ctx.output.is_json() {
        return ctx.output.json(&output);
    }

    print_section("Heart Risk Prediction");
    ctx.output.table(
        ("Field", "Value"),
        vec![
            ("Risk Level".to_string(), risk_cell(output.assessment.risk)),
            ("Tips".to_string(), Cell::new(&output.assessment.tips)),
            (
                "Probability (High)".to_string(),
                Cell::new(format!("{:.4}", output.probability)),
            ),
            ("Model".to_string(), Cell::new(output.model_id)),
        ],
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn empty() -> PredictCommand {
        PredictCommand {
            input: None,
            stdin: false,
            age: None,
            gender: None,
            sbp: None,
            chol: None,
            hdl: None,
            smoke: None,
            diabetes: None,
        }
    }

    fn all_flags() -> PredictCommand {
        PredictCommand {
            age: Some(54.0),
            gender: Some(1.0),
            sbp: Some(140.0),
            chol: Some(230.0),
            hdl: Some(45.0),
            smoke: Some(0.0),
            diabetes: Some(1.0),
            ..empty()
        }
    }

    #[test]
    fn test_resolve_from_flags() {
        let input = all_flags().resolve_input().unwrap();
        assert_eq!(input.to_features(), [54.0, 1.0, 140.0, 230.0, 45.0, 0.0, 1.0]);
    }

    #[test]
    fn test_resolve_reports_missing_flags() {
        let cmd = PredictCommand {
            hdl: None,
            diabetes: None,
            ..all_flags()
        };
        let err = cmd.resolve_input().unwrap_err().to_string();
        assert!(err.contains("--hdl"));
        assert!(err.contains("--diabetes"));
        assert!(!err.contains("--age"));
    }

    #[test]
    fn test_resolve_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("input.json");
        std::fs::write(
            &path,
            r#"{"age":54,"gender":1,"sbp":140,"chol":230,"hdl":45,"smoke":0,"diabetes":1}"#,
        )
        .unwrap();

        let cmd = PredictCommand {
            input: Some(path),
            ..empty()
        };
        assert_eq!(cmd.resolve_input().unwrap().sbp, 140.0);
    }

    #[test]
    fn test_flags_conflict_with_file() {
        let cmd = PredictCommand {
            input: Some(PathBuf::from("unused.json")),
            ..all_flags()
        };
        assert!(cmd.resolve_input().is_err());
    }
}
