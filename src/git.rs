//! Git history access and commit collection.

pub mod collector;
pub mod commit;
pub mod history;
pub mod memory;
pub mod repository;

pub use collector::{CommitCollector, Cutoff, SeenHashes};
pub use commit::CommitRecord;
pub use history::{BranchRef, HistorySource, HistoryWalk};
pub use memory::InMemoryHistory;
pub use repository::GitRepository;
