//! Output shaping policy.

use std::fmt;

use clap::ValueEnum;

/// Which derived column a timesheet carries.
///
/// Chosen once at startup and applied to every run of the process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Chronological rows with the elapsed time until the next commit.
    #[default]
    ElapsedTime,
    /// Chronological rows with the branch name and full commit hash.
    HashAndBranch,
}

const ELAPSED_TIME_HEADER: &[&str] = &[
    "Date",
    "Author Name",
    "Commit Type",
    "Scope",
    "Description",
    "TimeStamp",
];

const HASH_AND_BRANCH_HEADER: &[&str] = &[
    "Date",
    "Author Name",
    "Branch",
    "Commit Type",
    "Scope",
    "Description",
    "Hash",
];

impl OutputMode {
    /// The fixed header row for this mode.
    pub fn header(self) -> &'static [&'static str] {
        match self {
            Self::ElapsedTime => ELAPSED_TIME_HEADER,
            Self::HashAndBranch => HASH_AND_BRANCH_HEADER,
        }
    }

    /// Whether collected commits need their branch recorded.
    pub fn tags_branches(self) -> bool {
        matches!(self, Self::HashAndBranch)
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ElapsedTime => write!(f, "elapsed-time"),
            Self::HashAndBranch => write!(f, "hash-and-branch"),
        }
    }
}
