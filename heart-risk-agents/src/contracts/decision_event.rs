//! DecisionEvent Schema
//!
//! Every agent invocation produces exactly one DecisionEvent. Events are
//! emitted through telemetry and are not stored.
//!
//! A DecisionEvent includes:
//! - agent_id / agent_version
//! - decision_type
//! - inputs_hash: SHA256 hash of the feature vector
//! - outputs: structured output data
//! - confidence: distance of the predicted probability from the decision boundary
//! - model_id: the saved model that produced the decision
//! - timestamp: UTC timestamp

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;
use validator::Validate;

/// Decision type for agents in this workspace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DecisionType {
    /// Binary risk classification
    RiskClassification,
}

impl std::fmt::Display for DecisionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RiskClassification => write!(f, "risk_classification"),
        }
    }
}

/// Confidence in a decision.
///
/// Range: 0.0 (on the decision boundary) to 1.0 (probability of 0 or 1)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Confidence {
    /// The confidence value (0.0 - 1.0)
    pub value: Decimal,

    /// Method used to calculate confidence
    pub method: ConfidenceMethod,
}

/// Method used to calculate confidence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceMethod {
    /// Derived from the model's predicted probability
    ModelProbability,
}

impl Confidence {
    /// Confidence from a predicted probability: `|p - 0.5| * 2`, rounded to 4 places.
    pub fn from_probability(probability: f64) -> Self {
        let raw = ((probability - 0.5).abs() * 2.0).clamp(0.0, 1.0);
        let value = Decimal::try_from(raw)
            .unwrap_or(Decimal::ZERO)
            .round_dp(4);

        Self {
            value,
            method: ConfidenceMethod::ModelProbability,
        }
    }
}

/// The DecisionEvent: one record per agent invocation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DecisionEvent {
    /// Unique identifier for this decision event
    pub id: Uuid,

    /// Agent identifier
    #[validate(length(min = 1, max = 128))]
    pub agent_id: String,

    /// Agent version (semantic versioning)
    #[validate(length(min = 1, max = 32))]
    pub agent_version: String,

    /// Type of decision made
    pub decision_type: DecisionType,

    /// SHA256 hash of inputs for determinism verification
    #[validate(length(equal = 64))]
    pub inputs_hash: String,

    /// Structured output data
    pub outputs: serde_json::Value,

    /// Confidence in the decision
    pub confidence: Confidence,

    /// Model that produced the decision
    pub model_id: Uuid,

    /// Execution that produced the decision
    pub execution_id: Uuid,

    /// UTC timestamp of event creation
    pub timestamp: DateTime<Utc>,

    /// Optional metadata for extensibility
    pub metadata: Option<serde_json::Value>,
}

impl DecisionEvent {
    /// Create a new DecisionEvent builder.
    pub fn builder() -> DecisionEventBuilder {
        DecisionEventBuilder::default()
    }

    /// Compute SHA256 hash of input data for determinism verification.
    pub fn compute_inputs_hash<T: Serialize>(inputs: &T) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(inputs)?;
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        Ok(hex::encode(hasher.finalize()))
    }
}

/// Builder for DecisionEvent.
#[derive(Debug, Default)]
pub struct DecisionEventBuilder {
    agent_id: Option<String>,
    agent_version: Option<String>,
    decision_type: Option<DecisionType>,
    inputs_hash: Option<String>,
    outputs: Option<serde_json::Value>,
    confidence: Option<Confidence>,
    model_id: Option<Uuid>,
    execution_id: Option<Uuid>,
    metadata: Option<serde_json::Value>,
}

impl DecisionEventBuilder {
    pub fn agent_id(mut self, id: impl Into<String>) -> Self {
        self.agent_id = Some(id.into());
        self
    }

    pub fn agent_version(mut self, version: impl Into<String>) -> Self {
        self.agent_version = Some(version.into());
        self
    }

    pub fn decision_type(mut self, dt: DecisionType) -> Self {
        self.decision_type = Some(dt);
        self
    }

    pub fn inputs_hash(mut self, hash: impl Into<String>) -> Self {
        self.inputs_hash = Some(hash.into());
        self
    }

    pub fn outputs(mut self, outputs: serde_json::Value) -> Self {
        self.outputs = Some(outputs);
        self
    }

    pub fn confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn model_id(mut self, model_id: Uuid) -> Self {
        self.model_id = Some(model_id);
        self
    }

    pub fn execution_id(mut self, execution_id: Uuid) -> Self {
        self.execution_id = Some(execution_id);
        self
    }

    pub fn metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Build and validate the DecisionEvent.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing or fail validation.
    pub fn build(self) -> Result<DecisionEvent, DecisionEventBuildError> {
        let agent_id = self.agent_id.ok_or(DecisionEventBuildError::MissingField("agent_id"))?;
        let agent_version = self.agent_version.ok_or(DecisionEventBuildError::MissingField("agent_version"))?;
        let decision_type = self.decision_type.ok_or(DecisionEventBuildError::MissingField("decision_type"))?;
        let inputs_hash = self.inputs_hash.ok_or(DecisionEventBuildError::MissingField("inputs_hash"))?;
        let outputs = self.outputs.ok_or(DecisionEventBuildError::MissingField("outputs"))?;
        let confidence = self.confidence.ok_or(DecisionEventBuildError::MissingField("confidence"))?;
        let model_id = self.model_id.ok_or(DecisionEventBuildError::MissingField("model_id"))?;

        let event = DecisionEvent {
            id: Uuid::new_v4(),
            agent_id,
            agent_version,
            decision_type,
            inputs_hash,
            outputs,
            confidence,
            model_id,
            execution_id: self.execution_id.unwrap_or_else(Uuid::new_v4),
            timestamp: Utc::now(),
            metadata: self.metadata,
        };

        event.validate()?;
        Ok(event)
    }
}

/// Error type for DecisionEvent building.
#[derive(Debug, thiserror::Error)]
pub enum DecisionEventBuildError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid decision event: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn builder() -> DecisionEventBuilder {
        DecisionEvent::builder()
            .agent_id("heart-risk-agent")
            .agent_version("1.0.0")
            .decision_type(DecisionType::RiskClassification)
            .inputs_hash("a".repeat(64))
            .outputs(serde_json::json!({"risk": "Low"}))
            .confidence(Confidence::from_probability(0.2))
            .model_id(Uuid::new_v4())
    }

    #[test]
    fn test_decision_event_builder() {
        let event = builder().build().expect("Failed to build DecisionEvent");

        assert_eq!(event.agent_id, "heart-risk-agent");
        assert_eq!(event.decision_type, DecisionType::RiskClassification);
        assert_eq!(event.confidence.value, dec!(0.6));
    }

    #[test]
    fn test_builder_rejects_missing_and_invalid_fields() {
        let missing = DecisionEvent::builder().agent_id("a").build();
        assert!(matches!(
            missing,
            Err(DecisionEventBuildError::MissingField("agent_version"))
        ));

        let short_hash = builder().inputs_hash("abc").build();
        assert!(matches!(short_hash, Err(DecisionEventBuildError::Invalid(_))));
    }

    #[test]
    fn test_compute_inputs_hash() {
        let features = [54.0, 1.0, 140.0, 230.0, 45.0, 0.0, 1.0];
        let hash = DecisionEvent::compute_inputs_hash(&features).expect("Failed to compute hash");

        assert_eq!(hash.len(), 64);

        let hash2 = DecisionEvent::compute_inputs_hash(&features).expect("Failed to compute hash");
        assert_eq!(hash, hash2);
    }

    #[test]
    fn test_confidence_from_probability() {
        assert_eq!(Confidence::from_probability(0.5).value, dec!(0));
        assert_eq!(Confidence::from_probability(1.0).value, dec!(1));
        assert_eq!(Confidence::from_probability(0.0).value, dec!(1));
        assert_eq!(Confidence::from_probability(0.75).value, dec!(0.5));
    }

    #[test]
    fn test_decision_type_serialization() {
        let json = serde_json::to_string(&DecisionType::RiskClassification).expect("Failed to serialize");
        assert_eq!(json, "\"risk_classification\"");
    }
}
