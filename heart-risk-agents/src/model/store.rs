//! Saved model files and the load-or-train bootstrap.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{train, LogisticModel, ModelError, TrainingConfig, TrainingSummary};
use crate::contracts::{FEATURE_COUNT, FEATURE_NAMES};

/// Version of the on-disk model format.
pub const MODEL_FORMAT_VERSION: u32 = 1;

/// Default model location, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "model.json";

/// Serialized model file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedModel {
    pub format_version: u32,
    pub model_id: Uuid,
    pub feature_names: Vec<String>,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    pub training: TrainingSummary,
}

impl SavedModel {
    /// Check the file against the feature layout this build expects.
    pub fn check_compatible(&self) -> Result<(), ModelError> {
        if self.format_version != MODEL_FORMAT_VERSION {
            return Err(ModelError::Incompatible(format!(
                "format version {} is not supported (expected {})",
                self.format_version, MODEL_FORMAT_VERSION
            )));
        }
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(ModelError::Incompatible(format!(
                "expected {} coefficients, found {}",
                FEATURE_COUNT,
                self.coefficients.len()
            )));
        }
        if self.feature_names.iter().map(String::as_str).ne(FEATURE_NAMES) {
            return Err(ModelError::Incompatible(format!(
                "feature names {:?} do not match {:?}",
                self.feature_names, FEATURE_NAMES
            )));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|w| !w.is_finite()) {
            return Err(ModelError::Incompatible(
                "model weights must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Scoring view of this file.
    pub fn to_model(&self) -> Result<LogisticModel, ModelError> {
        self.check_compatible()?;
        LogisticModel::from_slice(self.intercept, &self.coefficients)
    }

    /// Write the model as pretty JSON, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| io_error(path, source))?;
        Ok(())
    }

    /// Read and check a model file.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let bytes = fs::read(path).map_err(|source| io_error(path, source))?;
        let saved: Self = serde_json::from_slice(&bytes).map_err(|source| ModelError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        saved.check_compatible()?;
        Ok(saved)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> ModelError {
    ModelError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Startup bootstrap.
///
/// Trains and saves a model when `path` does not exist, then always loads
/// the model back from `path`. An existing file is never overwritten, even
/// when it turns out to be unreadable.
#[instrument(skip(config), fields(path = %path.display()))]
pub fn load_or_train(path: &Path, config: &TrainingConfig) -> Result<SavedModel, ModelError> {
    let exists = path.try_exists().map_err(|source| io_error(path, source))?;

    if exists {
        info!("Loading saved model");
    } else {
        warn!("No saved model found, training on synthetic data");
        let trained = train(config)?;
        trained.save(path)?;
        info!(model_id = %trained.model_id, "Model saved");
    }

    let saved = SavedModel::load(path)?;
    info!(
        model_id = %saved.model_id,
        trained_at = %saved.training.trained_at,
        "Model loaded"
    );
    Ok(saved)
}

/// Train a new model and overwrite `path` unconditionally.
pub fn retrain(path: &Path, config: &TrainingConfig) -> Result<SavedModel, ModelError> {
    let trained = train(config)?;
    trained.save(path)?;
    info!(model_id = %trained.model_id, path = %path.display(), "Model retrained");
    Ok(trained)
}
