//! Version detection from project manifests
//!
//! A [`VersionDetector`] walks an ordered list of [`VersionSource`]s and
//! returns the first version one of them finds. The default order is
//! `pom.xml` and then `package.json`.
//!
//! ```rust
//! # use pipekit::detect::VersionDetector;
//! # fn example(src: &std::path::Path) -> pipekit::Result<()> {
//! let version = VersionDetector::default().detect(src)?;
//! println!("{}", version);
//! # Ok(())
//! # }
//! ```

pub mod package_json;
pub mod pom;

pub use package_json::PackageJson;
pub use pom::PomXml;

use crate::error::{PipekitError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// A place a version string can be read from, relative to a source tree root.
pub trait VersionSource {
    /// Short name used in log output (usually the manifest file name)
    fn name(&self) -> &str;

    /// Read the raw version string.
    ///
    /// # Returns
    /// * `Ok(String)` - The declared version, as written in the manifest
    /// * `Err(PipekitError::SourceUnavailable)` - The manifest does not exist
    /// * `Err` - The manifest is unreadable, malformed or has no version
    fn read(&self, root: &Path) -> Result<String>;

    /// Soft variant of [`VersionSource::read`]: any failure or a blank
    /// version becomes `None` so the next source can be tried. Hits are trimmed.
    fn probe(&self, root: &Path) -> Option<String> {
        match self.read(root) {
            Ok(version) if !version.trim().is_empty() => Some(version.trim().to_string()),
            Ok(_) => {
                debug!(source = self.name(), "empty version");
                None
            }
            Err(e) => {
                debug!(source = self.name(), "no version: {}", e);
                None
            }
        }
    }
}

/// Ordered fallback chain over version sources; the first hit wins.
pub struct VersionDetector {
    sources: Vec<Box<dyn VersionSource>>,
}

impl VersionDetector {
    /// Create a detector that tries `sources` in the given order
    pub fn new(sources: Vec<Box<dyn VersionSource>>) -> Self {
        VersionDetector { sources }
    }

    /// Find a version in the source tree at `root`.
    ///
    /// # Returns
    /// * `Ok(String)` - The version from the first source that yielded one
    /// * `Err(PipekitError::MissingField)` - No source yielded a version
    pub fn detect(&self, root: &Path) -> Result<String> {
        self.sources
            .iter()
            .find_map(|source| source.probe(root))
            .ok_or_else(|| {
                PipekitError::missing_field(format!(
                    "Cannot detect version in '{}'",
                    root.display()
                ))
            })
    }
}

impl Default for VersionDetector {
    fn default() -> Self {
        VersionDetector::new(vec![Box::new(PomXml), Box::new(PackageJson)])
    }
}

/// Read a manifest, reporting a missing file as `SourceUnavailable`.
pub(crate) fn read_manifest(root: &Path, file_name: &str) -> Result<String> {
    let path = root.join(file_name);
    fs::read_to_string(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => {
            PipekitError::source_unavailable(format!("Cannot find a {}", file_name))
        }
        _ => PipekitError::Io(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<&'static str>);

    impl VersionSource for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn read(&self, _root: &Path) -> Result<String> {
            self.0
                .map(str::to_string)
                .ok_or_else(|| PipekitError::source_unavailable("nothing here"))
        }
    }

    #[test]
    fn test_first_hit_wins() {
        let detector = VersionDetector::new(vec![
            Box::new(Fixed(None)),
            Box::new(Fixed(Some("1.0.0"))),
            Box::new(Fixed(Some("2.0.0"))),
        ]);
        assert_eq!(detector.detect(Path::new(".")).unwrap(), "1.0.0");
    }

    #[test]
    fn test_empty_version_is_a_miss() {
        let detector =
            VersionDetector::new(vec![Box::new(Fixed(Some(""))), Box::new(Fixed(Some("3.1.4")))]);
        assert_eq!(detector.detect(Path::new(".")).unwrap(), "3.1.4");
    }

    #[test]
    fn test_all_sources_miss() {
        let detector = VersionDetector::new(vec![Box::new(Fixed(None))]);
        let err = detector.detect(Path::new(".")).unwrap_err();
        assert!(matches!(err, PipekitError::MissingField(_)));
        assert!(err.to_string().contains("Cannot detect version"));
    }

    #[test]
    fn test_no_sources() {
        let detector = VersionDetector::new(Vec::new());
        assert!(detector.detect(Path::new(".")).is_err());
    }

    #[test]
    fn test_read_manifest_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_manifest(dir.path(), "pom.xml").unwrap_err();
        assert!(matches!(err, PipekitError::SourceUnavailable(_)));
    }
}
