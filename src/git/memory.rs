//! In-memory commit graph implementing [`HistorySource`].
//!
//! Used to exercise the collector without an on-disk repository.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::{Result, SheetError};
use crate::git::{BranchRef, CommitRecord, HistorySource, HistoryWalk};

/// Tip prefix of broken branches; never a commit hash.
const DANGLING_PREFIX: &str = "dangling:";

#[derive(Debug, Clone)]
struct Node {
    record: CommitRecord,
    parents: Vec<String>,
}

/// A fixed commit graph with named branches.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistory {
    commits: HashMap<String, Node>,
    branches: BTreeMap<String, String>,
    broken: HashSet<String>,
}

impl InMemoryHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a commit with the given parent hashes.
    pub fn add_commit(&mut self, record: CommitRecord, parents: &[&str]) -> &mut Self {
        let parents = parents.iter().map(|p| (*p).to_string()).collect();
        self.commits
            .insert(record.hash.clone(), Node { record, parents });
        self
    }

    /// Points `name` at `tip`.
    pub fn set_branch(&mut self, name: &str, tip: &str) -> &mut Self {
        self.branches.insert(name.to_string(), tip.to_string());
        self
    }

    /// Makes walks starting at this branch fail, simulating a corrupt ref.
    ///
    /// Other branches sharing the same tip stay readable.
    pub fn break_branch(&mut self, name: &str) -> &mut Self {
        self.broken.insert(name.to_string());
        self
    }

    /// Reference reported for `name`; a broken branch points at a missing object.
    fn branch_ref(&self, name: &str, tip: &str) -> BranchRef {
        if self.broken.contains(name) {
            BranchRef::new(name, format!("{DANGLING_PREFIX}{name}"))
        } else {
            BranchRef::new(name, tip)
        }
    }
}

impl HistorySource for InMemoryHistory {
    fn list_branches(&self) -> Result<Vec<BranchRef>> {
        Ok(self
            .branches
            .iter()
            .map(|(name, tip)| self.branch_ref(name, tip))
            .collect())
    }

    fn resolve_branch(&self, name: &str) -> Result<BranchRef> {
        self.branches
            .get(name)
            .map(|tip| self.branch_ref(name, tip))
            .ok_or_else(|| SheetError::BranchNotFound {
                branch: name.to_string(),
            })
    }

    fn walk_history<'a>(&'a self, tip: &str) -> Result<HistoryWalk<'a>> {
        if !self.commits.contains_key(tip) {
            return Err(SheetError::Git(git2::Error::from_str(&format!(
                "object not found - no match for id ({tip})"
            ))));
        }

        // Reachable set, newest first; equal timestamps keep discovery order.
        let mut visited = HashSet::new();
        let mut stack = vec![tip.to_string()];
        let mut reachable = Vec::new();
        while let Some(hash) = stack.pop() {
            if !visited.insert(hash.clone()) {
                continue;
            }
            if let Some(node) = self.commits.get(&hash) {
                reachable.push(node.record.clone());
                stack.extend(node.parents.iter().rev().cloned());
            }
        }
        reachable.sort_by(|a, b| b.authored_at.cmp(&a.authored_at));

        Ok(Box::new(reachable.into_iter().map(Ok)))
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;

    fn record(hash: &str, ts: &str) -> CommitRecord {
        let at = DateTime::parse_from_rfc3339(ts).unwrap();
        CommitRecord::new(hash, "Dev", at, format!("chore: {hash}"))
    }

    #[test]
    fn walk_is_newest_first() {
        let mut history = InMemoryHistory::new();
        history
            .add_commit(record("a", "2024-01-01T00:00:00Z"), &[])
            .add_commit(record("b", "2024-01-02T00:00:00Z"), &["a"])
            .add_commit(record("c", "2024-01-03T00:00:00Z"), &["b"])
            .set_branch("main", "c");

        let hashes: Vec<String> = history
            .walk_history("c")
            .unwrap()
            .map(|r| r.unwrap().hash)
            .collect();
        assert_eq!(hashes, vec!["c", "b", "a"]);
    }

    #[test]
    fn broken_branch_fails_to_walk() {
        let mut history = InMemoryHistory::new();
        history
            .add_commit(record("a", "2024-01-01T00:00:00Z"), &[])
            .set_branch("bad", "a")
            .break_branch("bad");

        let bad = history.resolve_branch("bad").unwrap();
        assert_eq!(bad.name, "bad");
        assert!(history.walk_history(&bad.tip).is_err());
    }

    #[test]
    fn broken_branch_leaves_shared_tip_readable() {
        let mut history = InMemoryHistory::new();
        history
            .add_commit(record("a", "2024-01-01T00:00:00Z"), &[])
            .add_commit(record("b", "2024-01-02T00:00:00Z"), &["a"])
            .set_branch("bad", "b")
            .set_branch("good", "b")
            .break_branch("bad");

        let branches = history.list_branches().unwrap();
        let good = branches.iter().find(|b| b.name == "good").unwrap();
        let bad = branches.iter().find(|b| b.name == "bad").unwrap();
        assert_eq!(good.tip, "b");

        let hashes: Vec<String> = history
            .walk_history(&good.tip)
            .unwrap()
            .map(|r| r.unwrap().hash)
            .collect();
        assert_eq!(hashes, vec!["b", "a"]);
        assert!(history.walk_history(&bad.tip).is_err());
    }

    #[test]
    fn resolve_missing_branch() {
        let history = InMemoryHistory::new();
        assert!(matches!(
            history.resolve_branch("nope"),
            Err(SheetError::BranchNotFound { .. })
        ));
    }
}
