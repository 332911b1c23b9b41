//! Source control abstraction layer
//!
//! Build identifiers embed the short hash of the checked-out commit. The
//! [Repository] trait hides where that hash comes from:
//!
//! - [repository::Git2Repository]: reads a real repository with the `git2` crate
//! - [mock::MockRepository]: returns a fixed hash for tests
//!
//! ```rust
//! # use pipekit::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> pipekit::Result<()> {
//! let commit = repo.head_short_hash()?;
//! println!("built from {}", commit);
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Read-only view of the source control state of a source tree
pub trait Repository {
    /// Abbreviated hash of the commit HEAD points at (as `git rev-parse --short HEAD`)
    ///
    /// # Returns
    /// * `Ok(String)` - The short hash, e.g. `a1b2c3d`
    /// * `Err` - If HEAD is unborn or cannot be resolved to a commit
    fn head_short_hash(&self) -> Result<String>;
}
