//! Turns collected commits into ordered timesheet rows.

use chrono::TimeDelta;
use tracing::debug;

use crate::git::CommitRecord;
use crate::timesheet::classify::{classify, ClassifiedCommit};
use crate::timesheet::OutputMode;

/// Format of the date column.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The mode-dependent trailing columns of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowTail {
    /// Time until the next commit; empty on the last row.
    Elapsed(String),
    /// Branch the commit was first seen on and its hash.
    Hash {
        /// Branch name, empty when untagged.
        branch: String,
        /// Full commit hash.
        hash: String,
    },
}

/// One timesheet row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRow {
    /// Author date formatted with [`DATE_FORMAT`] in the commit's own offset.
    pub date: String,
    /// Author name.
    pub author_name: String,
    /// Classified commit message.
    pub classified: ClassifiedCommit,
    /// Elapsed time or hash/branch columns.
    pub tail: RowTail,
}

impl LogRow {
    /// Fields in header order.
    pub fn fields(&self) -> Vec<String> {
        let ClassifiedCommit {
            commit_type,
            scope,
            description,
        } = &self.classified;

        match &self.tail {
            RowTail::Elapsed(elapsed) => vec![
                self.date.clone(),
                self.author_name.clone(),
                commit_type.clone(),
                scope.clone(),
                description.clone(),
                elapsed.clone(),
            ],
            RowTail::Hash { branch, hash } => vec![
                self.date.clone(),
                self.author_name.clone(),
                branch.clone(),
                commit_type.clone(),
                scope.clone(),
                description.clone(),
                hash.clone(),
            ],
        }
    }
}

/// Header plus ordered rows, ready for export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogTable {
    mode: OutputMode,
    rows: Vec<LogRow>,
}

impl LogTable {
    /// Mode the table was assembled with.
    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// The fixed header row.
    pub fn header(&self) -> &'static [&'static str] {
        self.mode.header()
    }

    /// Data rows, without the header.
    pub fn rows(&self) -> &[LogRow] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header followed by every row, as string records.
    pub fn records(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        std::iter::once(self.header().iter().map(|h| (*h).to_string()).collect())
            .chain(self.rows.iter().map(LogRow::fields))
    }
}

/// Formats an elapsed duration as `"<H>h <M>m"`, or `"<M>m"` under an hour.
pub fn format_elapsed(elapsed: TimeDelta) -> String {
    let minutes = elapsed.num_minutes().max(0);
    let (hours, minutes) = (minutes / 60, minutes % 60);
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Orders `records` and maps them to rows according to `mode`.
///
/// Both modes sort ascending with a stable sort, so commits with equal keys
/// keep their collection order.
pub fn assemble(records: Vec<CommitRecord>, mode: OutputMode) -> LogTable {
    let rows = match mode {
        OutputMode::ElapsedTime => elapsed_rows(records),
        OutputMode::HashAndBranch => hash_rows(records),
    };
    debug!(rows = rows.len(), %mode, "Assembled timesheet");

    LogTable { mode, rows }
}

fn elapsed_rows(mut records: Vec<CommitRecord>) -> Vec<LogRow> {
    records.sort_by(|a, b| a.authored_at.cmp(&b.authored_at));

    let next_times: Vec<_> = records
        .iter()
        .skip(1)
        .map(|r| Some(r.authored_at))
        .chain(std::iter::once(None))
        .collect();

    records
        .into_iter()
        .zip(next_times)
        .map(|(record, next)| {
            let elapsed = next
                .map(|next| format_elapsed(next - record.authored_at))
                .unwrap_or_default();
            LogRow {
                date: record.authored_at.format(DATE_FORMAT).to_string(),
                author_name: record.author_name,
                classified: classify(record.message.trim()),
                tail: RowTail::Elapsed(elapsed),
            }
        })
        .collect()
}

fn hash_rows(records: Vec<CommitRecord>) -> Vec<LogRow> {
    let mut dated: Vec<(String, CommitRecord)> = records
        .into_iter()
        .map(|r| (r.authored_at.format(DATE_FORMAT).to_string(), r))
        .collect();
    dated.sort_by(|a, b| a.0.cmp(&b.0));

    dated
        .into_iter()
        .map(|(date, record)| LogRow {
            date,
            author_name: record.author_name,
            classified: classify(record.message.trim()),
            tail: RowTail::Hash {
                branch: record.branch.unwrap_or_default(),
                hash: record.hash,
            },
        })
        .collect()
}
