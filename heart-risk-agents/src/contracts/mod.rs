//! Contracts Module
//!
//! Input/output schemas for the risk agent, the DecisionEvent record and
//! shared types. The HTTP service and the CLI import their wire types from
//! here.

pub mod common;
pub mod decision_event;
pub mod risk;

pub use common::*;
pub use decision_event::*;
pub use risk::*;
