//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{model::ModelCommands, predict::PredictCommand};
use crate::output::OutputFormat;

/// Heart Risk Lab CLI
///
/// Run risk predictions and manage the saved model without starting the
/// HTTP service.
#[derive(Parser, Debug)]
#[command(name = "heart-risk")]
#[command(version)]
#[command(about = "CLI for Heart Risk Lab", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Saved model location
    #[arg(short, long, global = true, default_value = "model.json", env = "HEART_RISK_MODEL_PATH")]
    pub model: PathBuf,

    /// Output format (table, json)
    #[arg(short, long, global = true, default_value = "table", env = "HEART_RISK_OUTPUT")]
    pub output: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify one set of health indicators
    #[command(alias = "pred")]
    Predict(PredictCommand),

    /// Train or inspect the saved model
    Model(ModelCommands),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_predict_flags() {
        let cli = Cli::try_parse_from([
            "heart-risk", "--output", "json", "predict", "--age", "54", "--gender", "1", "--sbp",
            "140", "--chol", "230", "--hdl", "45", "--smoke", "0", "--diabetes", "1",
        ])
        .unwrap();

        assert_eq!(cli.output, OutputFormat::Json);
        match cli.command {
            Commands::Predict(cmd) => assert_eq!(cmd.sbp, Some(140.0)),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
