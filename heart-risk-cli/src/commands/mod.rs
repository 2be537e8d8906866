//! CLI command implementations

pub mod model;
pub mod predict;
