//! Heart Risk Agent Implementation
//!
//! # Agent Contract
//!
//! - **Agent ID**: `heart-risk-agent`
//! - **Version**: `1.0.0`
//! - **Purpose**: Classify seven health indicators as High or Low risk with a logistic model.
//! - **Classification**: RISK CLASSIFICATION
//! - **decision_type**: `risk_classification`
//!
//! ## Failure Modes
//!
//! - Non-finite feature: `RISK_INPUT_INVALID`
//! - Event construction or serialization failure: `RISK_PREDICTION_FAILED`

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::traits::Agent;
use crate::contracts::{
    AgentClassification, AgentIdentity, Confidence, DecisionEvent, DecisionEventBuildError,
    DecisionType, RiskAssessment, RiskInput, RiskLevel, RiskOutput,
};
use crate::model::{LogisticModel, ModelError, SavedModel};

// =============================================================================
// Agent Constants
// =============================================================================

/// Agent identifier.
pub const RISK_AGENT_ID: &str = "heart-risk-agent";

/// Agent version (semantic versioning).
pub const RISK_AGENT_VERSION: &str = "1.0.0";

// =============================================================================
// Error Types
// =============================================================================

/// Errors from risk agent operations.
#[derive(Debug, Error)]
pub enum RiskAgentError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RiskAgentError {
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "RISK_INPUT_INVALID",
            Self::Serialization(_) | Self::Internal(_) => "RISK_PREDICTION_FAILED",
        }
    }
}

impl From<serde_json::Error> for RiskAgentError {
    fn from(err: serde_json::Error) -> Self {
        RiskAgentError::Serialization(err.to_string())
    }
}

impl From<DecisionEventBuildError> for RiskAgentError {
    fn from(err: DecisionEventBuildError) -> Self {
        RiskAgentError::Internal(err.to_string())
    }
}

// =============================================================================
// Agent Implementation
// =============================================================================

/// Classifies a [`RiskInput`] with a shared, read-only [`LogisticModel`].
///
/// The model is loaded once at startup and never mutated, so the agent can be
/// shared across request tasks without locking.
#[derive(Debug, Clone)]
pub struct RiskAgent {
    identity: AgentIdentity,
    model: Arc<LogisticModel>,
    model_id: Uuid,
}

impl RiskAgent {
    /// Create an agent around an already-checked model.
    pub fn new(model: LogisticModel, model_id: Uuid) -> Self {
        Self {
            identity: AgentIdentity {
                id: RISK_AGENT_ID.to_string(),
                version: RISK_AGENT_VERSION.to_string(),
                classification: AgentClassification::RiskClassification,
                description: "Classifies heart risk from seven health indicators".to_string(),
            },
            model: Arc::new(model),
            model_id,
        }
    }

    /// Create an agent from a saved model file.
    pub fn from_saved(saved: &SavedModel) -> Result<Self, ModelError> {
        Ok(Self::new(saved.to_model()?, saved.model_id))
    }

    /// Score one input without the validation and event cycle.
    pub fn classify(&self, input: &RiskInput) -> RiskOutput {
        let features = input.to_features();
        let probability = self.model.predict_proba(&features);
        let predicted_class = self.model.predict(&features);
        let risk = RiskLevel::from_class(predicted_class);

        RiskOutput {
            assessment: RiskAssessment::from(risk),
            probability,
            predicted_class,
            model_id: self.model_id,
        }
    }
}

#[async_trait]
impl Agent for RiskAgent {
    type Input = RiskInput;
    type Output = RiskOutput;
    type Error = RiskAgentError;

    fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    fn validate_input(&self, input: &RiskInput) -> Result<(), RiskAgentError> {
        let bad = input.non_finite_fields();
        if !bad.is_empty() {
            return Err(RiskAgentError::InvalidInput(format!(
                "fields must be finite numbers: {}",
                bad.join(", ")
            )));
        }
        Ok(())
    }

    #[instrument(skip(self, input), fields(model_id = %self.model_id))]
    async fn execute(&self, input: RiskInput) -> Result<RiskOutput, RiskAgentError> {
        let output = self.classify(&input);
        debug!(
            probability = output.probability,
            risk = %output.assessment.risk,
            "Risk classified"
        );
        Ok(output)
    }

    fn build_decision_event(
        &self,
        input: &RiskInput,
        output: &RiskOutput,
        execution_id: Uuid,
    ) -> Result<DecisionEvent, RiskAgentError> {
        let inputs_hash = DecisionEvent::compute_inputs_hash(&input.to_features())?;

        let event = DecisionEvent::builder()
            .agent_id(RISK_AGENT_ID)
            .agent_version(RISK_AGENT_VERSION)
            .decision_type(DecisionType::RiskClassification)
            .inputs_hash(inputs_hash)
            .outputs(serde_json::to_value(output)?)
            .confidence(Confidence::from_probability(output.probability))
            .model_id(self.model_id)
            .execution_id(execution_id)
            .metadata(json!({
                "predicted_class": output.predicted_class,
            }))
            .build()?;

        Ok(event)
    }
}
