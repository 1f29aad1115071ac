//! Commit records pulled from history.

use chrono::{DateTime, FixedOffset};
use git2::Commit;

use crate::error::{Result, SheetError};

/// Author name used when a commit carries none (or a non UTF-8 one).
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// One historical change, as recorded at commit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// Full hex object id of the commit.
    pub hash: String,
    /// Author name as recorded at commit time.
    pub author_name: String,
    /// Author timestamp with the offset it was recorded in.
    pub authored_at: DateTime<FixedOffset>,
    /// Raw commit message.
    pub message: String,
    /// Branch the commit was first observed on, when branch tagging is enabled.
    pub branch: Option<String>,
}

impl CommitRecord {
    /// Creates an untagged record.
    pub fn new(
        hash: impl Into<String>,
        author_name: impl Into<String>,
        authored_at: DateTime<FixedOffset>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            hash: hash.into(),
            author_name: author_name.into(),
            authored_at,
            message: message.into(),
            branch: None,
        }
    }

    /// Returns the record tagged with the given branch.
    #[must_use]
    pub fn on_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Builds a record from a `git2::Commit`, using author (not committer) time.
    pub fn from_git_commit(commit: &Commit) -> Result<Self> {
        let hash = commit.id().to_string();
        let author = commit.author();
        let author_name = author.name().unwrap_or(UNKNOWN_AUTHOR).to_string();

        let when = author.when();
        let offset = FixedOffset::east_opt(when.offset_minutes() * 60)
            .or_else(|| FixedOffset::east_opt(0))
            .ok_or_else(|| SheetError::Git(git2::Error::from_str("invalid author offset")))?;
        let authored_at = DateTime::from_timestamp(when.seconds(), 0)
            .ok_or_else(|| {
                SheetError::Git(git2::Error::from_str(&format!(
                    "invalid author timestamp on commit {hash}"
                )))
            })?
            .with_timezone(&offset);

        let message = String::from_utf8_lossy(commit.message_bytes()).into_owned();

        Ok(Self {
            hash,
            author_name,
            authored_at,
            message,
            branch: None,
        })
    }
}
