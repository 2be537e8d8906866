//! Predict Handler
//!
//! Framework-agnostic handler behind `POST /predict`. The HTTP service and
//! the CLI both go through it, so they share validation, logging and
//! telemetry.
//!
//! # Request Format
//!
//! ```json
//! { "age": 54, "gender": 1, "sbp": 140, "chol": 230, "hdl": 45, "smoke": 0, "diabetes": 1 }
//! ```
//!
//! # Response Format
//!
//! ```json
//! { "risk": "Low", "tips": "Keep up your healthy lifestyle! Regular checkups are still important." }
//! ```

use std::time::Instant;
use thiserror::Error;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::agents::{Agent, RiskAgent, RISK_AGENT_ID, RISK_AGENT_VERSION};
use crate::contracts::{ErrorBody, RiskInput, RiskOutput};
use crate::telemetry::TelemetryEmitter;

/// Error code for unusable request bodies.
pub const RISK_INPUT_INVALID: &str = "RISK_INPUT_INVALID";

/// Error code for failures after the input was accepted.
pub const RISK_PREDICTION_FAILED: &str = "RISK_PREDICTION_FAILED";

/// A failed prediction, ready to be rendered as an [`ErrorBody`].
#[derive(Debug, Clone, Error)]
#[error("{code}: {message}")]
pub struct PredictError {
    /// Machine-readable code
    pub code: &'static str,

    /// Human-readable message
    pub message: String,
}

impl PredictError {
    /// Error for a body that could not be turned into a [`RiskInput`].
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            code: RISK_INPUT_INVALID,
            message: message.into(),
        }
    }

    /// Whether the caller is at fault.
    pub fn is_client_error(&self) -> bool {
        self.code == RISK_INPUT_INVALID
    }

    /// Wire representation.
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.message.clone(),
            error_code: self.code.to_string(),
        }
    }
}

/// Handler for prediction requests.
#[derive(Debug, Clone)]
pub struct PredictHandler {
    agent: RiskAgent,
    telemetry: TelemetryEmitter,
}

impl PredictHandler {
    /// Create a handler with telemetry configured from the environment.
    pub fn new(agent: RiskAgent) -> Self {
        Self::with_telemetry(
            agent,
            TelemetryEmitter::new(RISK_AGENT_ID, RISK_AGENT_VERSION),
        )
    }

    /// Create a handler with a custom telemetry emitter.
    pub fn with_telemetry(agent: RiskAgent, telemetry: TelemetryEmitter) -> Self {
        Self { agent, telemetry }
    }

    /// The agent behind this handler.
    pub fn agent(&self) -> &RiskAgent {
        &self.agent
    }

    /// Handle a prediction request.
    #[instrument(skip(self, input), fields(request_id = tracing::field::Empty))]
    pub async fn handle(&self, input: RiskInput) -> Result<RiskOutput, PredictError> {
        let start_time = Instant::now();
        let request_id = Uuid::new_v4();
        tracing::Span::current().record("request_id", tracing::field::display(request_id));

        info!("Handling prediction request");
        self.telemetry.emit_started(request_id);

        match self.agent.invoke(input).await {
            Ok((output, event)) => {
                let processing_time_ms = start_time.elapsed().as_millis() as u64;
                self.telemetry.emit_success(request_id, &event, processing_time_ms);

                info!(
                    risk = %output.assessment.risk,
                    processing_time_ms = processing_time_ms,
                    "Prediction completed"
                );
                Ok(output)
            }
            Err(e) => {
                let processing_time_ms = start_time.elapsed().as_millis() as u64;
                let err = PredictError {
                    code: e.code(),
                    message: e.to_string(),
                };

                error!(error = %e, error_code = err.code, "Prediction failed");
                self.telemetry
                    .emit_failure(request_id, err.code, &err.message, processing_time_ms);
                Err(err)
            }
        }
    }
}
