//! Heart Risk Lab Agent Infrastructure
//!
//! This crate holds everything behind the Heart Risk Calculator except the
//! HTTP server itself: the request/response contracts, the logistic model
//! and its load-or-train bootstrap, the risk classification agent, the
//! framework-agnostic predict handler, the HTML form, and telemetry.
//!
//! # Usage
//!
//! ```rust,ignore
//! use heart_risk_agents::model::{load_or_train, TrainingConfig};
//! use heart_risk_agents::{PredictHandler, RiskAgent, RiskInput};
//!
//! let saved = load_or_train(Path::new("model.json"), &TrainingConfig::default())?;
//! let handler = PredictHandler::new(RiskAgent::from_saved(&saved)?);
//!
//! let output = handler.handle(input).await?;
//! println!("{}: {}", output.assessment.risk, output.assessment.tips);
//! ```
//!
//! # Modules
//!
//! - [`agents`]: Agent trait and `RiskAgent`
//! - [`contracts`]: Input/output schemas and DecisionEvent
//! - [`model`]: Logistic model, synthetic training, saved model files
//! - [`handlers`]: Framework-agnostic request handlers
//! - [`form`]: The inline HTML page
//! - [`telemetry`]: Structured invocation telemetry

#![warn(rustdoc::missing_crate_level_docs)]

pub mod agents;
pub mod contracts;
pub mod form;
pub mod handlers;
pub mod model;
pub mod telemetry;

// Re-export commonly used types
pub use agents::{Agent, RiskAgent, RiskAgentError, RISK_AGENT_ID, RISK_AGENT_VERSION};
pub use contracts::{
    DecisionEvent, DecisionType, ErrorBody, FeatureVector, RiskAssessment, RiskInput, RiskLevel,
    RiskOutput, FEATURE_COUNT, FEATURE_NAMES,
};
pub use form::INDEX_HTML;
pub use handlers::{PredictError, PredictHandler, RISK_INPUT_INVALID, RISK_PREDICTION_FAILED};
pub use model::{LogisticModel, ModelError, SavedModel, TrainingConfig};
pub use telemetry::TelemetryEmitter;
