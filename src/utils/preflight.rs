//! Preflight validation checks for early failure detection
//!
//! Commands call these before doing any work so that a bad directory or a
//! non-repository fails fast with a clear message.

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::git::GitRepository;

/// Validate the directory exists
pub fn check_directory_exists(dir: &Path) -> Result<()> {
    if !dir.exists() {
        bail!("Provided directory does not exist: {}", dir.display());
    }
    if !dir.is_dir() {
        bail!("Provided path is not a directory: {}", dir.display());
    }
    Ok(())
}

/// Validate `dir` is a git repository and open it
///
/// This is a lightweight check that opens the repository without
/// loading any commit data.
pub fn check_git_repository(dir: &Path) -> Result<GitRepository> {
    check_directory_exists(dir)?;

    let absolute = dir
        .canonicalize()
        .with_context(|| format!("Failed to resolve directory: {}", dir.display()))?;
    GitRepository::open(&absolute).with_context(|| {
        format!(
            "Not a git repository: {}. Point --dir at the root of a repository.",
            absolute.display()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_fails() {
        let err = check_directory_exists(Path::new("/definitely/not/here")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn plain_directory_is_not_a_repository() {
        let temp = tempfile::tempdir().unwrap();
        let err = check_git_repository(temp.path()).unwrap_err();
        assert!(err.to_string().contains("Not a git repository"));
    }

    #[test]
    fn initialised_repository_opens() {
        let temp = tempfile::tempdir().unwrap();
        git2::Repository::init(temp.path()).unwrap();
        let repo = check_git_repository(temp.path()).unwrap();
        let debug = format!("{repo:?}");
        assert!(debug.starts_with("GitRepository { path: "));
        assert!(debug.contains(".git"));
    }
}
