//! Generate command: collect, assemble and export a timesheet.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::{debug, info};
use url::Url;

use crate::config::{parse_base_url, DEFAULT_OUTPUT_DIR};
use crate::export::{export, Destination};
use crate::git::Cutoff;
use crate::timesheet::{build_timesheet, OutputMode};
use crate::utils::check_git_repository;

/// Generate command options.
#[derive(Parser, Debug)]
pub struct GenerateCommand {
    /// Only collect commits reachable from this branch (default: all local branches).
    #[arg(short = 'b', long, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Only include commits from the last DAYS days (0 keeps the whole history).
    #[arg(short = 't', long = "days", value_name = "DAYS", default_value_t = 0)]
    pub days: u32,

    /// Repository directory.
    #[arg(short = 'd', long = "dir", value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Derived column written after the description.
    #[arg(long, value_enum, env = "GITSHEET_OUTPUT_MODE", default_value_t = OutputMode::ElapsedTime)]
    pub mode: OutputMode,

    /// Directory local exports are written to.
    #[arg(long, value_name = "DIR", env = "GITSHEET_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub out_dir: PathBuf,

    /// Upload to this backend instead of writing locally.
    #[arg(long, value_name = "URL", env = "BACKEND_URL", value_parser = parse_backend_url)]
    pub backend_url: Option<Url>,
}

fn parse_backend_url(value: &str) -> std::result::Result<Url, String> {
    parse_base_url(value).map_err(|e| format!("{e:#}"))
}

impl GenerateCommand {
    /// Executes the generate command.
    pub async fn execute(self) -> Result<()> {
        let repo = check_git_repository(&self.dir)?;
        let repo_name = repo.name();
        let cutoff = Cutoff::days_before(Local::now(), self.days);
        debug!(
            repo = ?repo_name,
            branch = ?self.branch,
            cutoff = ?cutoff.map(|c| c.instant()),
            mode = %self.mode,
            "Generating timesheet"
        );

        let table = build_timesheet(&repo, self.branch.as_deref(), cutoff, self.mode)
            .context("Failed to collect commit history")?;
        info!(rows = table.len(), "Timesheet assembled");

        let destination = Destination::resolve(self.backend_url, self.out_dir);
        let reference = export(&table, &destination, repo_name.as_deref())
            .await
            .context("Failed to export timesheet")?;

        println!("{reference}");
        Ok(())
    }
}
