//! Timesheet assembly: classification, ordering and row derivation.

pub mod assemble;
pub mod classify;
pub mod mode;

pub use assemble::{assemble, format_elapsed, LogRow, LogTable, RowTail, DATE_FORMAT};
pub use classify::{classify, ClassifiedCommit, UNKNOWN_TYPE};
pub use mode::OutputMode;

use crate::error::Result;
use crate::git::{CommitCollector, Cutoff, HistorySource};

/// Collects commits from `source` and assembles them into a table.
///
/// Fails before anything is written when the branch filter does not resolve.
pub fn build_timesheet<S: HistorySource + ?Sized>(
    source: &S,
    branch_filter: Option<&str>,
    cutoff: Option<Cutoff>,
    mode: OutputMode,
) -> Result<LogTable> {
    let records = CommitCollector::new(source)
        .with_branch_tags(mode.tags_branches())
        .collect(branch_filter, cutoff)?;

    Ok(assemble(records, mode))
}
