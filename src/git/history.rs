//! Repository access as a capability trait.
//!
//! The collector only needs to list branches, resolve one by name and walk
//! history from a tip. [`GitRepository`](super::GitRepository) provides this
//! over libgit2 and [`InMemoryHistory`](super::InMemoryHistory) over a fixed
//! commit graph.

use crate::error::Result;
use crate::git::CommitRecord;

/// A named reference and the commit it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
    /// Short branch name (e.g. `main`).
    pub name: String,
    /// Hex id of the branch tip.
    pub tip: String,
}

impl BranchRef {
    /// Creates a branch reference.
    pub fn new(name: impl Into<String>, tip: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tip: tip.into(),
        }
    }
}

/// Single-pass iterator over commits, newest first.
pub type HistoryWalk<'a> = Box<dyn Iterator<Item = Result<CommitRecord>> + 'a>;

/// Read access to a commit history.
pub trait HistorySource {
    /// Lists all local branches in name order.
    fn list_branches(&self) -> Result<Vec<BranchRef>>;

    /// Resolves a branch by name, failing with `BranchNotFound`.
    fn resolve_branch(&self, name: &str) -> Result<BranchRef>;

    /// Walks history from `tip` following parent links, newest first.
    fn walk_history<'a>(&'a self, tip: &str) -> Result<HistoryWalk<'a>>;
}
