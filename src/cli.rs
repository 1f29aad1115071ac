//! CLI interface for gitsheet.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod generate;
pub mod serve;

/// gitsheet: timesheets from git history.
#[derive(Parser)]
#[command(name = "gitsheet")]
#[command(about = "Builds CSV timesheets from git commit history", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Collects commits and exports a timesheet CSV.
    Generate(generate::GenerateCommand),
    /// Runs the HTTP server that receives and forwards timesheets.
    Serve(serve::ServeCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Generate(cmd) => cmd.execute().await,
            Commands::Serve(cmd) => cmd.execute().await,
        }
    }
}
