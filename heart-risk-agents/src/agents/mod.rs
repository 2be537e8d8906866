//! Agents
//!
//! - `RiskAgent`: heart risk classification backed by the saved logistic model

pub mod risk_agent;
pub mod traits;

pub use risk_agent::*;
pub use traits::*;
