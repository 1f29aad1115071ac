//! Git repository operations

use std::fmt;
use std::path::Path;

use git2::{BranchType, Oid, Repository, Sort};
use tracing::{debug, warn};

use crate::error::{Result, SheetError};
use crate::git::{BranchRef, CommitRecord, HistorySource, HistoryWalk};

/// Git repository wrapper
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Open repository at specified path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Repository::open(path).map_err(|e| {
            debug!(path = %path.display(), error = %e, "Failed to open repository");
            SheetError::RepositoryNotFound {
                path: path.display().to_string(),
            }
        })?;

        Ok(Self { repo })
    }

    /// Get repository path
    pub fn path(&self) -> &Path {
        self.repo.path()
    }

    /// Get workdir path
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    /// Name of the repository, taken from its working directory.
    ///
    /// Bare repositories fall back to the git directory name with any
    /// `.git` suffix removed.
    pub fn name(&self) -> Option<String> {
        let dir = self.workdir().unwrap_or_else(|| self.path());
        let name = dir.file_name()?.to_str()?;
        let name = name.strip_suffix(".git").unwrap_or(name);
        (!name.is_empty()).then(|| name.to_string())
    }
}

impl fmt::Debug for GitRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitRepository")
            .field("path", &self.path())
            .finish()
    }
}

impl HistorySource for GitRepository {
    fn list_branches(&self) -> Result<Vec<BranchRef>> {
        let mut branches = Vec::new();

        for entry in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = entry?;
            let Some(name) = branch.name()?.map(str::to_string) else {
                warn!("Skipping branch with a non UTF-8 name");
                continue;
            };
            match branch.get().target() {
                Some(oid) => branches.push(BranchRef::new(name, oid.to_string())),
                None => warn!(branch = %name, "Skipping branch without a direct target"),
            }
        }

        branches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(branches)
    }

    fn resolve_branch(&self, name: &str) -> Result<BranchRef> {
        let not_found = || SheetError::BranchNotFound {
            branch: name.to_string(),
        };
        let branch = self
            .repo
            .find_branch(name, BranchType::Local)
            .map_err(|_| not_found())?;
        let tip = branch.get().target().ok_or_else(not_found)?;

        Ok(BranchRef::new(name, tip.to_string()))
    }

    fn walk_history<'a>(&'a self, tip: &str) -> Result<HistoryWalk<'a>> {
        let oid = Oid::from_str(tip)?;
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        revwalk.push(oid)?;

        let walk = revwalk.map(move |oid| {
            let commit = self.repo.find_commit(oid?)?;
            CommitRecord::from_git_commit(&commit)
        });

        Ok(Box::new(walk))
    }
}
