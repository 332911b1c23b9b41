use crate::error::{PipekitError, Result};
use git2::Repository as Git2Repo;
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository containing `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Self::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }
}

impl super::Repository for Git2Repository {
    fn head_short_hash(&self) -> Result<String> {
        let commit = self.repo.head()?.peel_to_commit()?;
        let short = commit.as_object().short_id()?;

        short
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| PipekitError::parse("Short commit id is not valid UTF-8"))
    }
}
