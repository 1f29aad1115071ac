//! Commit collection across branches.
//!
//! Branch histories are walked one after another and merged into a single
//! list in which every hash appears at most once. The first branch to reach
//! a commit claims it.

use std::collections::HashSet;

use chrono::{DateTime, Days, TimeDelta, TimeZone, Utc};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::git::{BranchRef, CommitRecord, HistorySource};

/// Earliest author time (inclusive) a commit must have to be collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cutoff(DateTime<Utc>);

impl Cutoff {
    /// Cutoff at an exact instant.
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    /// `days` calendar days before `now`, or `None` when `days` is zero
    /// (no time filtering).
    ///
    /// A non-zero day count always yields a cutoff. When the shifted wall
    /// clock time is ambiguous the earlier instant wins; when it falls in a
    /// gap the cutoff is exactly `days * 24h` before `now`.
    pub fn days_before<Tz: TimeZone>(now: DateTime<Tz>, days: u32) -> Option<Self> {
        if days == 0 {
            return None;
        }
        let local = now
            .naive_local()
            .checked_sub_days(Days::new(u64::from(days)))
            .and_then(|shifted| shifted.and_local_timezone(now.timezone()).earliest())
            .map(|t| t.with_timezone(&Utc));

        let instant = local.unwrap_or_else(|| {
            now.with_timezone(&Utc)
                .checked_sub_signed(TimeDelta::days(i64::from(days)))
                .unwrap_or(DateTime::<Utc>::MIN_UTC)
        });
        Some(Self(instant))
    }

    /// The cutoff instant.
    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }

    /// Whether a commit authored at `at` is old enough to be excluded.
    pub fn excludes<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> bool {
        at.with_timezone(&Utc) < self.0
    }
}

/// Hashes already claimed during one collection run.
#[derive(Debug, Default, Clone)]
pub struct SeenHashes(HashSet<String>);

impl SeenHashes {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `hash` as seen; returns `false` if it already was.
    pub fn insert(&mut self, hash: &str) -> bool {
        if self.0.contains(hash) {
            return false;
        }
        self.0.insert(hash.to_string())
    }

    /// Whether `hash` has been seen.
    pub fn contains(&self, hash: &str) -> bool {
        self.0.contains(hash)
    }

    /// Number of distinct hashes seen.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing has been seen yet.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Collects a deduplicated commit set from a [`HistorySource`].
pub struct CommitCollector<'a, S: HistorySource + ?Sized> {
    source: &'a S,
    tag_branches: bool,
}

impl<'a, S: HistorySource + ?Sized> CommitCollector<'a, S> {
    /// Creates a collector over `source`.
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            tag_branches: false,
        }
    }

    /// Records the branch each commit was first seen on.
    #[must_use]
    pub fn with_branch_tags(mut self, enabled: bool) -> Self {
        self.tag_branches = enabled;
        self
    }

    /// Collects commits from one branch (`branch_filter`) or from all of them.
    ///
    /// A named branch that does not exist fails the run with
    /// `BranchNotFound`. When scanning all branches, a branch whose history
    /// cannot be read is logged and skipped.
    pub fn collect(
        &self,
        branch_filter: Option<&str>,
        cutoff: Option<Cutoff>,
    ) -> Result<Vec<CommitRecord>> {
        let mut seen = SeenHashes::new();
        let mut records = Vec::new();

        match branch_filter.filter(|b| !b.is_empty()) {
            Some(name) => {
                let branch = self.source.resolve_branch(name)?;
                self.collect_branch(&branch, cutoff, &mut seen, &mut records)?;
            }
            None => {
                for branch in self.source.list_branches()? {
                    if let Err(e) = self.collect_branch(&branch, cutoff, &mut seen, &mut records)
                    {
                        warn!(branch = %branch.name, error = %e, "Skipping unreadable branch");
                    }
                }
            }
        }

        info!(
            commits = records.len(),
            cutoff = ?cutoff.map(|c| c.instant()),
            "Collected commits"
        );
        Ok(records)
    }

    /// Walks one branch, appending unseen commits inside the cutoff to `out`.
    ///
    /// Records appended before a mid-walk failure stay in `out`.
    pub fn collect_branch(
        &self,
        branch: &BranchRef,
        cutoff: Option<Cutoff>,
        seen: &mut SeenHashes,
        out: &mut Vec<CommitRecord>,
    ) -> Result<()> {
        debug!(branch = %branch.name, tip = %branch.tip, "Walking branch");

        for record in self.source.walk_history(&branch.tip)? {
            let record = record?;
            if seen.contains(&record.hash) {
                continue;
            }
            if cutoff.is_some_and(|c| c.excludes(&record.authored_at)) {
                continue;
            }

            seen.insert(&record.hash);
            out.push(if self.tag_branches {
                record.on_branch(branch.name.clone())
            } else {
                record
            });
        }

        Ok(())
    }
}
