//! Model commands
//!
//! ```bash
//! heart-risk model train --samples 200 --seed 42
//! heart-risk model train --force
//! heart-risk model show
//! ```

use anyhow::{bail, Context as _, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use comfy_table::Cell;

use heart_risk_agents::model::{retrain, SavedModel, TrainingConfig};

use crate::context::Context;
use crate::output::print_section;

/// Model management commands
#[derive(Debug, Args)]
pub struct ModelCommands {
    #[command(subcommand)]
    pub command: ModelSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ModelSubcommand {
    /// Train a model on synthetic data and save it
    Train {
        /// Number of synthetic samples
        #[arg(long, default_value_t = 100)]
        samples: usize,

        /// Seed for the synthetic data
        #[arg(long)]
        seed: Option<u64>,

        /// Overwrite an existing model file
        #[arg(long)]
        force: bool,
    },

    /// Show the saved model
    Show,
}

/// Execute model commands
pub async fn execute(ctx: &Context, cmd: ModelCommands) -> Result<()> {
    match cmd.command {
        ModelSubcommand::Train {
            samples,
            seed,
            force,
        } => train(ctx, samples, seed, force),
        ModelSubcommand::Show => show(ctx),
    }
}

fn train(ctx: &Context, samples: usize, seed: Option<u64>, force: bool) -> Result<()> {
    if ctx.model_path.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite it",
            ctx.model_path.display()
        );
    }

    let config = TrainingConfig {
        samples,
        seed,
        ..TrainingConfig::default()
    };
    let saved = retrain(&ctx.model_path, &config)
        .with_context(|| format!("Failed to train model at {}", ctx.model_path.display()))?;

    if ctx.output.is_json() {
        return ctx.output.json(&saved);
    }

    ctx.output.success(&format!(
        "Model {} saved to {}",
        saved.model_id,
        ctx.model_path.display()
    ));
    print_model(ctx, &saved);
    Ok(())
}

fn show(ctx: &Context) -> Result<()> {
    if !ctx.model_path.exists() {
        bail!(
            "No model at {}; run `heart-risk model train` or `heart-risk predict` to create one",
            ctx.model_path.display()
        );
    }

    let saved = SavedModel::load(&ctx.model_path)
        .with_context(|| format!("Failed to load model from {}", ctx.model_path.display()))?;

    if ctx.output.is_json() {
        return ctx.output.json(&saved);
    }

    print_model(ctx, &saved);
    Ok(())
}

fn print_model(ctx: &Context, saved: &SavedModel) {
    print_section("Model");
    ctx.output.table(
        ("Field", "Value"),
        vec![
            ("Model ID".to_string(), Cell::new(saved.model_id)),
            ("Format Version".to_string(), Cell::new(saved.format_version)),
            ("Trained At".to_string(), Cell::new(saved.training.trained_at.to_rfc3339())),
            ("Samples".to_string(), Cell::new(saved.training.samples)),
            (
                "Seed".to_string(),
                Cell::new(
                    saved
                        .training
                        .seed
                        .map_or_else(|| "random".to_string(), |s| s.to_string()),
                ),
            ),
            (
                "Training Accuracy".to_string(),
                Cell::new(format!("{:.3}", saved.training.training_accuracy)),
            ),
        ],
    );

    print_section("Weights");
    let mut rows = vec![("intercept".to_string(), Cell::new(format!("{:+.6}", saved.intercept)))];
    rows.extend(
        saved
            .feature_names
            .iter()
            .zip(&saved.coefficients)
            .map(|(name, weight)| (name.clone(), Cell::new(format!("{:+.6}", weight)))),
    );
    ctx.output.table(("Feature", "Weight"), rows);

    println!(
        "\n{}",
        "Trained on random synthetic data; weights carry no clinical meaning.".dimmed()
    );
}
