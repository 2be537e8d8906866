//! Heart Risk Lab CLI
//!
//! Command-line access to the same model file and predict handler the HTTP
//! service uses: one-off predictions and model management.

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod context;
mod output;

use cli::{Cli, Commands};
use context::Context;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output on stdout stays machine-readable
    let default_directive = if cli.verbose {
        "heart_risk_agents=info"
    } else {
        "heart_risk_agents=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_directive.parse()?)
                .add_directive("warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let ctx = Context::new(&cli);

    match cli.command {
        Commands::Predict(cmd) => commands::predict::execute(&ctx, cmd).await,
        Commands::Model(cmd) => commands::model::execute(&ctx, cmd).await,
    }
}
