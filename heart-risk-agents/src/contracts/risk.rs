//! Risk Classification Contracts
//!
//! Input and output schemas for the heart risk classification agent.
//!
//! # Agent Contract Definition
//!
//! - **Agent ID**: `heart-risk-agent`
//! - **Version**: `1.0.0`
//! - **Purpose**: Classify seven health indicators as High or Low cardiovascular risk.
//! - **Classification**: RISK CLASSIFICATION
//! - **decision_type**: `risk_classification`
//!
//! ## Wire Format
//!
//! Request body for `POST /predict`:
//!
//! ```json
//! { "age": 54, "gender": 1, "sbp": 140, "chol": 230, "hdl": 45, "smoke": 0, "diabetes": 1 }
//! ```
//!
//! Response body:
//!
//! ```json
//! { "risk": "High", "tips": "Maintain a balanced diet, ..." }
//! ```
//!
//! ## Failure Modes
//!
//! | Error Code | Description |
//! |------------|-------------|
//! | RISK_INPUT_INVALID | Body is not valid JSON, a field is missing, or a value is not finite |
//! | RISK_PREDICTION_FAILED | The model could not produce a prediction |

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Number of features the classifier consumes.
pub const FEATURE_COUNT: usize = 7;

/// Feature names in the order the classifier expects them.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] =
    ["age", "gender", "sbp", "chol", "hdl", "smoke", "diabetes"];

/// Advice returned alongside a High risk label.
pub const HIGH_RISK_TIPS: &str =
    "Maintain a balanced diet, avoid smoking, and monitor blood pressure regularly.";

/// Advice returned alongside a Low risk label.
pub const LOW_RISK_TIPS: &str =
    "Keep up your healthy lifestyle! Regular checkups are still important.";

/// Fixed-order feature vector handed to the classifier.
pub type FeatureVector = [f64; FEATURE_COUNT];

/// Health indicators submitted by the form.
///
/// Every field is required. Values are taken as-is: no range checks are
/// applied, so `gender`, `smoke` and `diabetes` are whatever number the
/// client sent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskInput {
    /// Age in years
    pub age: f64,

    /// Gender (0 = female, 1 = male)
    pub gender: f64,

    /// Systolic blood pressure
    pub sbp: f64,

    /// Total cholesterol
    pub chol: f64,

    /// HDL cholesterol
    pub hdl: f64,

    /// Smoking flag (0/1)
    pub smoke: f64,

    /// Diabetes flag (0/1)
    pub diabetes: f64,
}

impl RiskInput {
    /// Assemble the feature vector in [`FEATURE_NAMES`] order.
    pub fn to_features(&self) -> FeatureVector {
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

    /// Rebuild an input from a feature vector.
    pub fn from_features(features: FeatureVector) -> Self {
        let [age, gender, sbp, chol, hdl, smoke, diabetes] = features;
        Self {
            age,
            gender,
            sbp,
            chol,
            hdl,
            smoke,
            diabetes,
        }
    }

    /// Names of features that are NaN or infinite.
    pub fn non_finite_fields(&self) -> Vec<&'static str> {
        FEATURE_NAMES
            .iter()
            .zip(self.to_features())
            .filter(|(_, value)| !value.is_finite())
            .map(|(name, _)| *name)
            .collect()
    }
}

/// Binary risk label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    High,
    Low,
}

impl RiskLevel {
    /// Map a predicted class to a label. Only class `1` is High.
    pub fn from_class(class: u8) -> Self {
        if class == 1 {
            Self::High
        } else {
            Self::Low
        }
    }

    /// Static advice for this label.
    pub fn tips(&self) -> &'static str {
        match self {
            Self::High => HIGH_RISK_TIPS,
            Self::Low => LOW_RISK_TIPS,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::Low => write!(f, "Low"),
        }
    }
}

/// Body of a successful `POST /predict` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk: RiskLevel,
    pub tips: String,
}

impl From<RiskLevel> for RiskAssessment {
    fn from(risk: RiskLevel) -> Self {
        Self {
            risk,
            tips: risk.tips().to_string(),
        }
    }
}

/// Full agent output. The HTTP route only exposes the [`RiskAssessment`] part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskOutput {
    /// Label and advice
    #[serde(flatten)]
    pub assessment: RiskAssessment,

    /// Predicted probability of the High class
    pub probability: f64,

    /// Raw predicted class (0 or 1)
    pub predicted_class: u8,

    /// Identifier of the model that produced the prediction
    pub model_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> RiskInput {
        RiskInput {
            age: 54.0,
            gender: 1.0,
            sbp: 140.0,
            chol: 230.0,
            hdl: 45.0,
            smoke: 0.0,
            diabetes: 1.0,
        }
    }

    #[test]
    fn test_feature_order() {
        let features = sample_input().to_features();
        assert_eq!(features, [54.0, 1.0, 140.0, 230.0, 45.0, 0.0, 1.0]);
        assert_eq!(RiskInput::from_features(features), sample_input());
    }

    #[test]
    fn test_input_deserializes_integers_and_ignores_extra_fields() {
        let json = r#"{"age":54,"gender":1,"sbp":140,"chol":230,"hdl":45,"smoke":0,"diabetes":1,"note":"x"}"#;
        let input: RiskInput = serde_json::from_str(json).expect("valid input");
        assert_eq!(input, sample_input());
    }

    #[test]
    fn test_input_missing_field_is_rejected() {
        let json = r#"{"age":54,"gender":1,"sbp":140,"chol":230,"hdl":45,"smoke":0}"#;
        let err = serde_json::from_str::<RiskInput>(json).unwrap_err();
        assert!(err.to_string().contains("diabetes"));
    }

    #[test]
    fn test_non_finite_fields() {
        let mut input = sample_input();
        assert!(input.non_finite_fields().is_empty());

        input.sbp = f64::NAN;
        input.hdl = f64::INFINITY;
        assert_eq!(input.non_finite_fields(), vec!["sbp", "hdl"]);
    }

    #[test]
    fn test_risk_level_mapping() {
        assert_eq!(RiskLevel::from_class(1), RiskLevel::High);
        assert_eq!(RiskLevel::from_class(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_class(7), RiskLevel::Low);
        assert_eq!(RiskLevel::High.tips(), HIGH_RISK_TIPS);
        assert_eq!(RiskLevel::Low.tips(), LOW_RISK_TIPS);
    }

    #[test]
    fn test_assessment_wire_shape() {
        let json = serde_json::to_value(RiskAssessment::from(RiskLevel::High)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "risk": "High",
                "tips": HIGH_RISK_TIPS,
            })
        );
    }
}
