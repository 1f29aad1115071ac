//! Error taxonomy for the timesheet pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while collecting, assembling, exporting or delivering a timesheet.
#[derive(Error, Debug)]
pub enum SheetError {
    /// The path does not resolve to a git repository.
    #[error("Repository not found: {path}")]
    RepositoryNotFound {
        /// The path that was opened.
        path: String,
    },

    /// A branch filter named a branch that does not exist.
    #[error("Branch '{branch}' not found")]
    BranchNotFound {
        /// The requested branch name.
        branch: String,
    },

    /// Local filesystem failure.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// File or directory being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Remote upload failed, including non-success HTTP status.
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Email or webhook delivery failed.
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// Error reported by libgit2 while reading history.
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),
}

impl SheetError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, SheetError>;
