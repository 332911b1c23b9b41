use crate::error::{PipekitError, Result};
use crate::git::Repository;

/// Mock repository for testing without actual git operations
pub struct MockRepository {
    head: Option<String>,
}

impl MockRepository {
    /// Create a mock whose HEAD resolves to `short_hash`
    pub fn new(short_hash: impl Into<String>) -> Self {
        MockRepository {
            head: Some(short_hash.into()),
        }
    }

    /// Create a mock with an unborn HEAD
    pub fn empty() -> Self {
        MockRepository { head: None }
    }
}

impl Repository for MockRepository {
    fn head_short_hash(&self) -> Result<String> {
        self.head
            .clone()
            .ok_or_else(|| PipekitError::missing_field("Repository has no commits"))
    }
}
