//! # gitsheet
//!
//! Turns git commit history into CSV timesheets.
//!
//! ## Features
//!
//! - Collects commits across local branches, each commit once
//! - Classifies messages by the `type(scope): description` convention
//! - Exports to local disk or uploads to a backend
//! - Serves uploads over HTTP and emails them to reviewers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gitsheet::git::GitRepository;
//! use gitsheet::timesheet::{build_timesheet, OutputMode};
//!
//! let repo = GitRepository::open(".")?;
//! let table = build_timesheet(&repo, None, None, OutputMode::ElapsedTime)?;
//! println!("{} rows", table.len());
//! # Ok::<(), gitsheet::SheetError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod api;
pub mod cli;
pub mod config;
pub mod delivery;
pub mod error;
pub mod export;
pub mod git;
pub mod identity;
pub mod server;
pub mod timesheet;
pub mod utils;

pub use crate::cli::Cli;
pub use crate::error::SheetError;

/// The current version of gitsheet.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
