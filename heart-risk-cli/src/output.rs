//! Output formatting

use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use serde::Serialize;

use heart_risk_agents::RiskLevel;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Writes command results in the selected format.
pub struct Output {
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Print a value as pretty JSON.
    pub fn json<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Print a two-column table.
    pub fn table(&self, header: (&str, &str), rows: Vec<(String, Cell)>) {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![Cell::new(header.0), Cell::new(header.1)]);
        for (key, value) in rows {
            table.add_row(vec![Cell::new(key), value]);
        }
        println!("{table}");
    }

    /// Success message on stderr.
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }
}

/// Table cell for a risk label: red for High, green for Low.
pub fn risk_cell(risk: RiskLevel) -> Cell {
    let color = match risk {
        RiskLevel::High => Color::Red,
        RiskLevel::Low => Color::Green,
    };
    Cell::new(risk.to_string()).fg(color)
}

/// Print a section heading.
pub fn print_section(title: &str) {
    println!("\n{}", title.bold().cyan());
    println!("{}", "=".repeat(title.len()));
}
