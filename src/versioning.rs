//! Full version strings for a source tree: `<detected version>+<build id>`.

use crate::detect::VersionDetector;
use crate::domain::{compose_build_id, concat_version, validate};
use crate::error::{PipekitError, Result};
use crate::git::{Git2Repository, Repository};
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::debug;

/// Which parts to leave out of the build identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildOptions {
    pub no_timestamp: bool,
    pub no_commit: bool,
}

/// Build identifier for the source tree at `src`.
///
/// The repository is only opened when the commit hash is wanted, so a tree
/// that is not under git works with `no_commit`.
pub fn get_build(src: &Path, now: DateTime<Utc>, options: BuildOptions) -> Result<String> {
    if options.no_commit {
        let timestamp = (!options.no_timestamp).then_some(now);
        return Ok(compose_build_id(timestamp, None));
    }

    let repo = Git2Repository::open(src)?;
    build_from(&repo, now, options)
}

/// Build identifier using an already opened repository
pub fn build_from<R: Repository>(
    repo: &R,
    now: DateTime<Utc>,
    options: BuildOptions,
) -> Result<String> {
    let timestamp = (!options.no_timestamp).then_some(now);
    let commit = if options.no_commit {
        None
    } else {
        Some(repo.head_short_hash()?)
    };

    Ok(compose_build_id(timestamp, commit.as_deref()))
}

/// Version declared by the manifests in `src` (`pom.xml`, then `package.json`)
pub fn detect_version(src: &Path) -> Result<String> {
    VersionDetector::default().detect(src)
}

/// Compose and validate `<version>+<build>`.
///
/// Missing or empty parts are filled in from the tree: `version` by detection
/// and `build` by [`get_build`]. An empty build identifier leaves the version
/// as is.
///
/// # Returns
/// * `Ok(String)` - A valid SemVer string
/// * `Err(PipekitError::Parse)` - The composed string is not valid SemVer
pub fn full_version(
    src: &Path,
    version: Option<&str>,
    build: Option<&str>,
    now: DateTime<Utc>,
    options: BuildOptions,
) -> Result<String> {
    let version = version.filter(|v| !v.is_empty());
    let build = build.filter(|b| !b.is_empty());

    let build = match build {
        Some(build) => build.to_string(),
        None => get_build(src, now, options)?,
    };
    let version = match version {
        Some(version) => version.to_string(),
        None => detect_version(src)?,
    };

    let full = if build.is_empty() {
        version
    } else {
        concat_version(&version, &build)
    };
    debug!(version = %full, "composed version");

    if validate(&full) {
        Ok(full)
    } else {
        Err(PipekitError::parse(format!("Invalid SemVer: {}", full)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 7, 4, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_build_from_mock() {
        let repo = MockRepository::new("abc1234");
        let build = build_from(&repo, now(), BuildOptions::default()).unwrap();
        assert_eq!(build, "20230704T093000-abc1234");
    }

    #[test]
    fn test_build_from_no_timestamp() {
        let repo = MockRepository::new("abc1234");
        let options = BuildOptions {
            no_timestamp: true,
            no_commit: false,
        };
        assert_eq!(build_from(&repo, now(), options).unwrap(), "abc1234");
    }

    #[test]
    fn test_build_from_skips_repository() {
        let repo = MockRepository::empty();
        let options = BuildOptions {
            no_timestamp: false,
            no_commit: true,
        };
        assert_eq!(build_from(&repo, now(), options).unwrap(), "20230704T093000");
    }

    #[test]
    fn test_build_from_unborn_head() {
        let repo = MockRepository::empty();
        assert!(build_from(&repo, now(), BuildOptions::default()).is_err());
    }

    #[test]
    fn test_get_build_without_repository() {
        let dir = tempfile::tempdir().unwrap();
        let options = BuildOptions {
            no_timestamp: true,
            no_commit: true,
        };
        assert_eq!(get_build(dir.path(), now(), options).unwrap(), "");
    }

    #[test]
    fn test_full_version_explicit_parts() {
        let dir = tempfile::tempdir().unwrap();
        let full = full_version(
            dir.path(),
            Some("1.2.3"),
            Some("20230704T093000-abc1234"),
            now(),
            BuildOptions::default(),
        )
        .unwrap();
        assert_eq!(full, "1.2.3+20230704T093000-abc1234");
    }

    #[test]
    fn test_full_version_detects_manifest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("package.json"), r#"{"version": "0.4.0-beta.1"}"#)
            .unwrap();
        let full = full_version(dir.path(), None, Some("7"), now(), BuildOptions::default())
            .unwrap();
        assert_eq!(full, "0.4.0-beta.1+7");
    }

    #[test]
    fn test_full_version_empty_build() {
        let dir = tempfile::tempdir().unwrap();
        let options = BuildOptions {
            no_timestamp: true,
            no_commit: true,
        };
        let full = full_version(dir.path(), Some("1.0.0"), None, now(), options).unwrap();
        assert_eq!(full, "1.0.0");
    }

    #[test]
    fn test_full_version_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let err = full_version(dir.path(), Some("1.0"), Some("1"), now(), BuildOptions::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "Parse error: Invalid SemVer: 1.0+1");
    }

    #[test]
    fn test_full_version_rejects_double_build() {
        let dir = tempfile::tempdir().unwrap();
        let err = full_version(dir.path(), Some("1.0.0+a"), Some("b"), now(), BuildOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("1.0.0+a+b"));
    }

    #[test]
    fn test_full_version_empty_version_is_detected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("package.json"), r#"{"version": "2.3.4"}"#).unwrap();
        let full = full_version(dir.path(), Some(""), Some("7"), now(), BuildOptions::default())
            .unwrap();
        assert_eq!(full, "2.3.4+7");
    }

    #[test]
    fn test_full_version_empty_build_is_computed() {
        let dir = tempfile::tempdir().unwrap();
        let options = BuildOptions {
            no_timestamp: false,
            no_commit: true,
        };
        let full = full_version(dir.path(), Some("1.0.0"), Some(""), now(), options).unwrap();
        assert_eq!(full, "1.0.0+20230704T093000");
    }

    #[test]
    fn test_full_version_nothing_to_detect() {
        let dir = tempfile::tempdir().unwrap();
        let err = full_version(dir.path(), None, Some("1"), now(), BuildOptions::default())
            .unwrap_err();
        assert!(matches!(err, PipekitError::MissingField(_)));
    }
}
