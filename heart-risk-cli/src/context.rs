//! Shared command context

use std::path::PathBuf;

use crate::cli::Cli;
use crate::output::Output;

/// State every command needs.
pub struct Context {
    /// Saved model location
    pub model_path: PathBuf,

    /// Output writer
    pub output: Output,
}

impl Context {
    pub fn new(cli: &Cli) -> Self {
        if cli.no_color {
            colored::control::set_override(false);
        }

        Self {
            model_path: cli.model.clone(),
            output: Output::new(cli.output),
        }
    }
}
