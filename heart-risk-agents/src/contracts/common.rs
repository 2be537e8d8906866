//! Common Contract Types
//!
//! Shared types used across agent contracts.

use serde::{Deserialize, Serialize};

/// Agent identification for registration and versioning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentIdentity {
    /// Unique agent identifier
    pub id: String,

    /// Semantic version
    pub version: String,

    /// Agent classification
    pub classification: AgentClassification,

    /// Human-readable description
    pub description: String,
}

/// Agent classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentClassification {
    RiskClassification,
}

/// Standard error body returned by the HTTP service and the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    /// Error message
    pub error: String,

    /// Machine-readable error code
    pub error_code: String,
}
