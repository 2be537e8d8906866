//! Handlers
//!
//! Framework-agnostic entry points used by the HTTP service and the CLI.
//!
//! - `PredictHandler`: handles risk prediction requests

pub mod predict;

pub use predict::*;
