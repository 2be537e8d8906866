//! Telemetry Module
//!
//! Structured telemetry for agent invocations, written through `tracing`.
//! There is no remote sink: events end up wherever the subscriber sends them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::contracts::DecisionEvent;

/// Telemetry event types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TelemetryEventType {
    /// Agent invocation started
    InvocationStarted,
    /// Agent invocation completed successfully
    InvocationCompleted,
    /// Agent invocation failed
    InvocationFailed,
    /// Decision event emitted
    DecisionEmitted,
}

/// Telemetry event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryEvent {
    /// Event ID
    pub event_id: Uuid,

    /// Event type
    pub event_type: TelemetryEventType,

    /// Timestamp
    pub timestamp: DateTime<Utc>,

    /// Agent ID
    pub agent_id: String,

    /// Agent version
    pub agent_version: String,

    /// Request ID (for correlation)
    pub request_id: Uuid,

    /// Event payload
    pub payload: serde_json::Value,

    /// Duration in milliseconds (for completed/failed events)
    pub duration_ms: Option<u64>,
}

/// Telemetry emitter.
#[derive(Debug, Clone)]
pub struct TelemetryEmitter {
    agent_id: String,
    agent_version: String,

    /// Whether to dump each event as JSON at debug level
    emit_to_stdout: bool,
}

impl TelemetryEmitter {
    /// Create an emitter, reading `TELEMETRY_STDOUT` (default `true`).
    pub fn new(agent_id: impl Into<String>, agent_version: impl Into<String>) -> Self {
        let emit_to_stdout = std::env::var("TELEMETRY_STDOUT")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(true);

        Self::with_config(agent_id, agent_version, emit_to_stdout)
    }

    /// Create emitter with custom configuration.
    pub fn with_config(
        agent_id: impl Into<String>,
        agent_version: impl Into<String>,
        emit_to_stdout: bool,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            agent_version: agent_version.into(),
            emit_to_stdout,
        }
    }

    /// Build an event stamped with this emitter's agent identity.
    pub fn event(
        &self,
        event_type: TelemetryEventType,
        request_id: Uuid,
        payload: serde_json::Value,
        duration_ms: Option<u64>,
    ) -> TelemetryEvent {
        TelemetryEvent {
            event_id: Uuid::new_v4(),
            event_type,
            timestamp: Utc::now(),
            agent_id: self.agent_id.clone(),
            agent_version: self.agent_version.clone(),
            request_id,
            payload,
            duration_ms,
        }
    }

    /// Emit an invocation-started event.
    pub fn emit_started(&self, request_id: Uuid) {
        let event = self.event(
            TelemetryEventType::InvocationStarted,
            request_id,
            serde_json::Value::Null,
            None,
        );
        self.emit(&event);
    }

    /// Emit completion and decision events for a successful invocation.
    pub fn emit_success(&self, request_id: Uuid, decision_event: &DecisionEvent, duration_ms: u64) {
        let completed = self.event(
            TelemetryEventType::InvocationCompleted,
            request_id,
            serde_json::json!({
                "decision_type": decision_event.decision_type.to_string(),
                "confidence": decision_event.confidence.value,
                "event_id": decision_event.id,
            }),
            Some(duration_ms),
        );
        self.emit(&completed);

        let decision = self.event(
            TelemetryEventType::DecisionEmitted,
            request_id,
            serde_json::json!({
                "decision_event_id": decision_event.id,
                "inputs_hash": decision_event.inputs_hash,
                "model_id": decision_event.model_id,
                "outputs": decision_event.outputs,
            }),
            None,
        );
        self.emit(&decision);
    }

    /// Emit a failure event.
    pub fn emit_failure(&self, request_id: Uuid, error_code: &str, error_message: &str, duration_ms: u64) {
        let event = self.event(
            TelemetryEventType::InvocationFailed,
            request_id,
            serde_json::json!({
                "error_code": error_code,
                "error": error_message,
            }),
            Some(duration_ms),
        );
        self.emit(&event);
    }

    fn emit(&self, event: &TelemetryEvent) {
        match event.event_type {
            TelemetryEventType::InvocationFailed => {
                warn!(
                    event_type = ?event.event_type,
                    agent_id = %event.agent_id,
                    request_id = %event.request_id,
                    "Telemetry: invocation failed"
                );
            }
            _ => {
                info!(
                    event_type = ?event.event_type,
                    agent_id = %event.agent_id,
                    request_id = %event.request_id,
                    "Telemetry event"
                );
            }
        }

        if self.emit_to_stdout {
            if let Ok(json) = serde_json::to_string(event) {
                debug!(telemetry = %json);
            }
        }
    }
}
