//! Output file naming.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Extension of every exported file.
pub const CSV_EXTENSION: &str = "csv";

/// Suffix the server appends to the stem of stored uploads.
pub const STORED_SUFFIX: &str = "_final";

/// `{timestamp}_{repo}_{code}` name of one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputName {
    timestamp: i64,
    repo_name: Option<String>,
    code: String,
}

impl OutputName {
    /// Builds a name from explicit parts.
    pub fn new(timestamp: i64, repo_name: Option<&str>, code: impl Into<String>) -> Self {
        Self {
            timestamp,
            repo_name: repo_name.filter(|n| !n.is_empty()).map(str::to_string),
            code: code.into(),
        }
    }

    /// Name for a run happening now, with a fresh disambiguator.
    pub fn generate(repo_name: Option<&str>) -> Self {
        Self::new(Utc::now().timestamp(), repo_name, disambiguator())
    }

    /// Name without extension.
    pub fn stem(&self) -> String {
        match &self.repo_name {
            Some(repo) => format!("{}_{}_{}", self.timestamp, repo, self.code),
            None => format!("{}_{}", self.timestamp, self.code),
        }
    }

    /// Name with the `.csv` extension.
    pub fn file_name(&self) -> String {
        format!("{}.{CSV_EXTENSION}", self.stem())
    }
}

/// A 4-digit code drawn from a generator seeded with the current time.
///
/// Reduces the chance of two runs in the same second colliding; it is not a
/// uniqueness guarantee.
pub fn disambiguator() -> String {
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    disambiguator_from_seed(seed)
}

/// Deterministic variant of [`disambiguator`].
pub fn disambiguator_from_seed(seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let code: u16 = rng.gen_range(1000..10000);
    format!("{code:04}")
}

/// Recovers the repository name from a file name produced by [`OutputName`].
///
/// Accepts the stored form (`..._final.csv`) too. Underscores inside the
/// repository name are preserved.
pub fn repo_name_from_file_name(file_name: &str) -> Option<String> {
    let stem = Path::new(file_name).file_stem()?.to_str()?;
    let stem = stem.strip_suffix(STORED_SUFFIX).unwrap_or(stem);

    let (timestamp, rest) = stem.split_once('_')?;
    if timestamp.is_empty() || !timestamp.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (repo, _code) = rest.rsplit_once('_')?;

    (!repo.is_empty()).then(|| repo.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_with_repo() {
        let name = OutputName::new(1_700_000_000, Some("sheet"), "4821");
        assert_eq!(name.file_name(), "1700000000_sheet_4821.csv");
    }

    #[test]
    fn name_without_repo() {
        let name = OutputName::new(1_700_000_000, None, "4821");
        assert_eq!(name.file_name(), "1700000000_4821.csv");
        assert_eq!(OutputName::new(1, Some(""), "1000").stem(), "1_1000");
    }

    #[test]
    fn code_is_four_digits() {
        for seed in 0..500 {
            let code = disambiguator_from_seed(seed);
            assert_eq!(code.len(), 4);
            let value: u16 = code.parse().unwrap();
            assert!((1000..=9999).contains(&value));
        }
    }

    #[test]
    fn same_seed_same_code() {
        assert_eq!(disambiguator_from_seed(42), disambiguator_from_seed(42));
    }

    #[test]
    fn repo_name_round_trips_through_file_name() {
        let name = OutputName::new(1_700_000_000, Some("my_repo"), "1234");
        assert_eq!(
            repo_name_from_file_name(&name.file_name()).as_deref(),
            Some("my_repo")
        );
    }

    #[test]
    fn repo_name_from_stored_upload() {
        assert_eq!(
            repo_name_from_file_name("1700000000_api_9876_final.csv").as_deref(),
            Some("api")
        );
    }

    #[test]
    fn repo_name_absent() {
        assert_eq!(repo_name_from_file_name("1700000000_9876.csv"), None);
        assert_eq!(repo_name_from_file_name("report.csv"), None);
        assert_eq!(repo_name_from_file_name("notes_api_1.csv"), None);
    }
}
