//! Synthetic training.
//!
//! There is no real dataset. The bootstrap fits a logistic regression to
//! uniform noise so that the prediction path has a concrete model behind it.

use chrono::{DateTime, Utc};
use linfa::prelude::*;
use linfa_logistic::{FittedLogisticRegression, LogisticRegression};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{LogisticModel, ModelError, SavedModel, MODEL_FORMAT_VERSION};
use crate::contracts::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};

/// Smallest synthetic sample count accepted for training.
pub const MIN_TRAINING_SAMPLES: usize = 2;

/// Training parameters for the synthetic bootstrap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of synthetic rows
    pub samples: usize,

    /// Seed for the synthetic data; `None` draws from entropy
    pub seed: Option<u64>,

    /// Optimizer iteration cap
    pub max_iterations: u64,

    /// L2 regularization strength
    pub l2_penalty: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            samples: 100,
            seed: None,
            max_iterations: 100,
            l2_penalty: 1.0,
        }
    }
}

impl TrainingConfig {
    fn validate(&self) -> Result<(), ModelError> {
        if self.samples < MIN_TRAINING_SAMPLES {
            return Err(ModelError::InvalidConfig(format!(
                "at least {} samples are required, got {}",
                MIN_TRAINING_SAMPLES, self.samples
            )));
        }
        if !self.l2_penalty.is_finite() || self.l2_penalty < 0.0 {
            return Err(ModelError::InvalidConfig(format!(
                "l2_penalty must be a non-negative number, got {}",
                self.l2_penalty
            )));
        }
        if self.max_iterations == 0 {
            return Err(ModelError::InvalidConfig(
                "max_iterations must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// How a saved model was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub samples: usize,
    pub seed: Option<u64>,
    pub trained_at: DateTime<Utc>,
    pub training_accuracy: f64,
}

/// Uniform `[0, 1)` features and uniform `{0, 1}` labels.
///
/// Both classes are always present: if every label came out equal, the
/// first one is flipped.
pub fn synthetic_dataset(config: &TrainingConfig) -> (Array2<f64>, Array1<usize>) {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let features = Array2::from_shape_fn((config.samples, FEATURE_COUNT), |_| rng.gen::<f64>());
    let mut labels = Array1::from_shape_fn(config.samples, |_| rng.gen_range(0..2usize));

    if config.samples > 0 && labels.iter().all(|&label| label == labels[0]) {
        labels[0] = 1 - labels[0];
    }

    (features, labels)
}

/// Fit a logistic regression to freshly generated synthetic data.
#[instrument(skip(config), fields(samples = config.samples, seed = ?config.seed))]
pub fn train(config: &TrainingConfig) -> Result<SavedModel, ModelError> {
    config.validate()?;

    let (features, labels) = synthetic_dataset(config);
    debug!(rows = features.nrows(), "Generated synthetic dataset");

    let (model, _) = fit(config, &features, &labels)?;
    let training_accuracy = accuracy(&model, &features, &labels);

    info!(
        intercept = model.intercept,
        training_accuracy = training_accuracy,
        "Logistic regression trained on synthetic data"
    );

    Ok(SavedModel {
        format_version: MODEL_FORMAT_VERSION,
        model_id: Uuid::new_v4(),
        feature_names: FEATURE_NAMES.iter().map(|name| name.to_string()).collect(),
        intercept: model.intercept,
        coefficients: model.coefficients.to_vec(),
        training: TrainingSummary {
            samples: config.samples,
            seed: config.seed,
            trained_at: Utc::now(),
            training_accuracy,
        },
    })
}

/// Fit with linfa-logistic and export the weights as a class-1 scorer.
///
/// linfa picks the most frequent label as its positive class, so when
/// class 0 wins the draw the fitted parameters score P(class 0) and are
/// negated before export.
fn fit(
    config: &TrainingConfig,
    features: &Array2<f64>,
    labels: &Array1<usize>,
) -> Result<(LogisticModel, FittedLogisticRegression<f64, usize>), ModelError> {
    let dataset = Dataset::new(features.clone(), labels.clone());
    let fitted = LogisticRegression::default()
        .alpha(config.l2_penalty)
        .max_iterations(config.max_iterations)
        .fit(&dataset)
        .map_err(|e| ModelError::Training(e.to_string()))?;

    let sign = if fitted.labels().pos.class == 1 { 1.0 } else { -1.0 };
    debug!(positive_class = fitted.labels().pos.class, "Orienting weights towards class 1");

    let weights: Vec<f64> = fitted.params().iter().map(|w| sign * w).collect();
    let model = LogisticModel::from_slice(sign * fitted.intercept(), &weights)?;
    Ok((model, fitted))
}

/// Fraction of rows the model classifies correctly.
fn accuracy(model: &LogisticModel, features: &Array2<f64>, labels: &Array1<usize>) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }

    let correct = features
        .rows()
        .into_iter()
        .zip(labels.iter())
        .filter(|(row, &label)| {
            let mut vector: FeatureVector = [0.0; FEATURE_COUNT];
            for (slot, value) in vector.iter_mut().zip(row.iter()) {
                *slot = *value;
            }
            usize::from(model.predict(&vector)) == label
        })
        .count();

    correct as f64 / labels.len() as f64
}
