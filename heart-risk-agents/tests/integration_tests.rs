//! Integration Tests for Heart Risk Lab Agents
//!
//! # Test Categories
//!
//! 1. **Bootstrap**: load-or-train against a real file on disk
//! 2. **DecisionEvent Emission**: exactly ONE event per invocation
//! 3. **Determinism**: same model and input give the same answer
//! 4. **Handler Integration**: the framework-agnostic handler end to end

use rust_decimal_macros::dec;
use std::path::Path;
use tempfile::TempDir;

use heart_risk_agents::{
    agents::Agent,
    contracts::{HIGH_RISK_TIPS, LOW_RISK_TIPS},
    model::{load_or_train, SavedModel},
    DecisionType, LogisticModel, PredictHandler, RiskAgent, RiskInput, RiskLevel,
    TelemetryEmitter, TrainingConfig, RISK_AGENT_ID, RISK_AGENT_VERSION, RISK_INPUT_INVALID,
};

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn seeded_config() -> TrainingConfig {
    TrainingConfig {
        samples: 100,
        seed: Some(2024),
        ..TrainingConfig::default()
    }
}

fn bootstrap(dir: &Path) -> SavedModel {
    load_or_train(&dir.join("model.json"), &seeded_config()).expect("bootstrap should succeed")
}

fn sample_input() -> RiskInput {
    RiskInput {
        age: 0.4,
        gender: 1.0,
        sbp: 0.7,
        chol: 0.2,
        hdl: 0.9,
        smoke: 0.0,
        diabetes: 1.0,
    }
}

fn quiet_handler(agent: RiskAgent) -> PredictHandler {
    PredictHandler::with_telemetry(
        agent,
        TelemetryEmitter::with_config(RISK_AGENT_ID, RISK_AGENT_VERSION, false),
    )
}

// ============================================================================
// BOOTSTRAP TESTS
// ============================================================================

mod model_bootstrap {
    use super::*;

    #[test]
    fn test_trains_when_missing_and_reuses_afterwards() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");

        let first = bootstrap(dir.path());
        let on_disk = std::fs::read_to_string(&path).unwrap();
        let second = bootstrap(dir.path());

        assert_eq!(first, second);
        assert_eq!(on_disk, std::fs::read_to_string(&path).unwrap());
    }

    #[test]
    fn test_saved_file_is_readable_json() {
        let dir = TempDir::new().unwrap();
        let saved = bootstrap(dir.path());

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("model.json")).unwrap())
                .unwrap();

        assert_eq!(raw["format_version"], 1);
        assert_eq!(raw["model_id"], saved.model_id.to_string());
        assert_eq!(raw["coefficients"].as_array().unwrap().len(), 7);
        assert_eq!(raw["training"]["samples"], 100);
    }

    #[test]
    fn test_hand_written_model_is_used_as_is() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(
            &path,
            r#"{
                "format_version": 1,
                "model_id": "5f0c3a4e-2a51-4c8e-9d8e-3b1f2f0a9c11",
                "feature_names": ["age", "gender", "sbp", "chol", "hdl", "smoke", "diabetes"],
                "intercept": -1.0,
                "coefficients": [0.0, 0.0, 0.0, 0.0, 0.0, 2.0, 0.0],
                "training": {
                    "samples": 0,
                    "seed": null,
                    "trained_at": "2024-01-01T00:00:00Z",
                    "training_accuracy": 0.0
                }
            }"#,
        )
        .unwrap();

        let saved = load_or_train(&path, &seeded_config()).unwrap();
        let model = saved.to_model().unwrap();
        assert_eq!(model, LogisticModel::new(-1.0, [0.0, 0.0, 0.0, 0.0, 0.0, 2.0, 0.0]));
    }
}

// ============================================================================
// RISK AGENT TESTS
// ============================================================================

mod risk_agent {
    use super::*;

    #[tokio::test]
    async fn test_agent_identity() {
        let dir = TempDir::new().unwrap();
        let agent = RiskAgent::from_saved(&bootstrap(dir.path())).unwrap();

        assert_eq!(agent.agent_id(), RISK_AGENT_ID);
        assert_eq!(agent.version(), RISK_AGENT_VERSION);
    }

    #[tokio::test]
    async fn test_invoke_produces_one_decision_event() {
        let dir = TempDir::new().unwrap();
        let saved = bootstrap(dir.path());
        let agent = RiskAgent::from_saved(&saved).unwrap();

        let (output, event) = agent.invoke(sample_input()).await.unwrap();

        assert_eq!(event.decision_type, DecisionType::RiskClassification);
        assert_eq!(event.model_id, saved.model_id);
        assert_eq!(event.inputs_hash.len(), 64);
        assert!(event.confidence.value >= dec!(0) && event.confidence.value <= dec!(1));
        assert_eq!(event.outputs["risk"], output.assessment.risk.to_string());
    }

    #[tokio::test]
    async fn test_label_follows_model_probability() {
        let dir = TempDir::new().unwrap();
        let saved = bootstrap(dir.path());
        let agent = RiskAgent::from_saved(&saved).unwrap();
        let model = saved.to_model().unwrap();

        let output = agent.execute(sample_input()).await.unwrap();
        let features = sample_input().to_features();

        assert_eq!(output.probability, model.predict_proba(&features));
        let expected = if model.decision_function(&features) > 0.0 {
            (RiskLevel::High, HIGH_RISK_TIPS)
        } else {
            (RiskLevel::Low, LOW_RISK_TIPS)
        };
        assert_eq!(output.assessment.risk, expected.0);
        assert_eq!(output.assessment.tips, expected.1);
    }

    #[tokio::test]
    async fn test_determinism_across_reloads() {
        let dir = TempDir::new().unwrap();
        let first = RiskAgent::from_saved(&bootstrap(dir.path())).unwrap();
        let second = RiskAgent::from_saved(&bootstrap(dir.path())).unwrap();

        let a = first.execute(sample_input()).await.unwrap();
        let b = second.execute(sample_input()).await.unwrap();

        assert_eq!(a.assessment, b.assessment);
        assert_eq!(a.probability, b.probability);
    }
}

// ============================================================================
// HANDLER INTEGRATION TESTS
// ============================================================================

mod handler_integration {
    use super::*;

    #[tokio::test]
    async fn test_handler_round_trip_from_json() {
        let dir = TempDir::new().unwrap();
        let handler = quiet_handler(RiskAgent::from_saved(&bootstrap(dir.path())).unwrap());

        let body = r#"{"age": 61, "gender": 0, "sbp": 135, "chol": 210, "hdl": 52, "smoke": 1, "diabetes": 0}"#;
        let input: RiskInput = serde_json::from_str(body).unwrap();
        let output = handler.handle(input).await.unwrap();

        let wire = serde_json::to_value(&output.assessment).unwrap();
        let risk = wire["risk"].as_str().unwrap();
        assert!(risk == "High" || risk == "Low");
        assert_eq!(wire.as_object().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_handler_rejects_non_finite_values() {
        let dir = TempDir::new().unwrap();
        let handler = quiet_handler(RiskAgent::from_saved(&bootstrap(dir.path())).unwrap());

        let mut input = sample_input();
        input.gender = f64::NEG_INFINITY;

        let err = handler.handle(input).await.unwrap_err();
        assert_eq!(err.code, RISK_INPUT_INVALID);
        assert_eq!(err.to_body().error_code, RISK_INPUT_INVALID);
    }
}
