//! Logistic Model
//!
//! The binary classifier behind the risk agent, its on-disk format, and the
//! startup bootstrap that trains a model on synthetic data when none has
//! been saved yet.
//!
//! # Scoring
//!
//! ```text
//! z = intercept + Σ wᵢ·xᵢ
//! p = 1 / (1 + e^(-z))
//! class = 1 if z > 0 else 0
//! ```
//!
//! The model is trained on random noise. It exercises the prediction path and
//! carries no clinical meaning.

pub mod store;
pub mod training;

pub use store::*;
pub use training::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::contracts::{FeatureVector, FEATURE_COUNT};

/// Errors from model training, persistence and loading.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Training failed: {0}")]
    Training(String),

    #[error("Invalid training configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error on model file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Model file '{path}' is not valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Incompatible model file: {0}")]
    Incompatible(String),
}

/// Fitted logistic regression over the seven risk features.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub intercept: f64,
    pub coefficients: FeatureVector,
}

impl LogisticModel {
    /// Create a model from an intercept and one weight per feature.
    pub fn new(intercept: f64, coefficients: FeatureVector) -> Self {
        Self {
            intercept,
            coefficients,
        }
    }

    /// Build a model from a weight slice, checking its length.
    pub fn from_slice(intercept: f64, coefficients: &[f64]) -> Result<Self, ModelError> {
        let coefficients: FeatureVector = coefficients.try_into().map_err(|_| {
            ModelError::Incompatible(format!(
                "expected {} coefficients, found {}",
                FEATURE_COUNT,
                coefficients.len()
            ))
        })?;
        Ok(Self::new(intercept, coefficients))
    }

    /// Signed distance from the decision boundary.
    pub fn decision_function(&self, features: &FeatureVector) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }

    /// Probability of class 1.
    pub fn predict_proba(&self, features: &FeatureVector) -> f64 {
        sigmoid(self.decision_function(features))
    }

    /// Predicted class, 0 or 1.
    pub fn predict(&self, features: &FeatureVector) -> u8 {
        u8::from(self.decision_function(features) > 0.0)
    }
}

/// Logistic function, stable for large |z|.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
