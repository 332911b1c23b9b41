//! Semantic version parsing and formatting
//!
//! Follows the SemVer 2.0 grammar: https://semver.org/#backusnaur-form-grammar-for-valid-semver-versions

use crate::error::{PipekitError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use tracing::debug;

/// The semver.org reference pattern, with `\d` narrowed to ASCII digits.
///
/// Named groups: `major`, `minor`, `patch`, `prerelease`, `buildmetadata`.
static SEMVER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?P<major>0|[1-9][0-9]*)\.(?P<minor>0|[1-9][0-9]*)\.(?P<patch>0|[1-9][0-9]*)",
        r"(?:-(?P<prerelease>(?:0|[1-9][0-9]*|[0-9]*[a-zA-Z-][0-9a-zA-Z-]*)",
        r"(?:\.(?:0|[1-9][0-9]*|[0-9]*[a-zA-Z-][0-9a-zA-Z-]*))*))?",
        r"(?:\+(?P<buildmetadata>[0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?$"
    ))
    .expect("semver pattern is a valid regex")
});

/// Semantic version representation
///
/// A `Version` only exists if its text satisfied the grammar, so the fields are
/// read-only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Version {
    major: u64,
    minor: u64,
    patch: u64,
    prerelease: String,
    build: String,
}

impl Version {
    /// Create a release version with no prerelease or build metadata
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            prerelease: String::new(),
            build: String::new(),
        }
    }

    /// Parse a version string such as `1.2.3-alpha.1+build.5`
    ///
    /// # Returns
    /// * `Ok(Version)` - The text matched `MAJOR.MINOR.PATCH[-PRERELEASE][+BUILD]`
    /// * `Err(PipekitError::Parse)` - Grammar mismatch, or a numeric component
    ///   too large for `u64`
    pub fn parse(text: &str) -> Result<Self> {
        let captures = SEMVER_PATTERN
            .captures(text)
            .ok_or_else(|| PipekitError::parse(format!("Cannot parse SemVer in '{}'", text)))?;

        let group = |name: &str| captures.name(name).map_or("", |m| m.as_str());
        let number = |name: &str| {
            group(name).parse::<u64>().map_err(|e| {
                PipekitError::parse(format!(
                    "Cannot extract {} version from '{}': {}",
                    name, text, e
                ))
            })
        };

        let version = Version {
            major: number("major")?,
            minor: number("minor")?,
            patch: number("patch")?,
            prerelease: group("prerelease").to_string(),
            build: group("buildmetadata").to_string(),
        };

        debug!(
            major = version.major,
            minor = version.minor,
            patch = version.patch,
            prerelease = %version.prerelease,
            build = %version.build,
            "parsed version"
        );
        Ok(version)
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    /// Dot-separated prerelease identifiers, empty when absent
    pub fn prerelease(&self) -> &str {
        &self.prerelease
    }

    /// Dot-separated build metadata identifiers, empty when absent
    pub fn build(&self) -> &str {
        &self.build
    }

    /// Serialize the version as a JSON object
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| PipekitError::parse(format!("Cannot serialize version: {}", e)))
    }

    /// Compare by SemVer precedence. Build metadata does not participate.
    pub fn cmp_precedence(&self, other: &Version) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| self.semver_prerelease().cmp(&other.semver_prerelease()))
    }

    fn semver_prerelease(&self) -> semver::Prerelease {
        // identifiers already passed the grammar, which semver accepts verbatim
        semver::Prerelease::new(&self.prerelease).unwrap_or(semver::Prerelease::EMPTY)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&build_version(
            self.major,
            self.minor,
            self.patch,
            Some(&self.prerelease),
            Some(&self.build),
        ))
    }
}

impl std::str::FromStr for Version {
    type Err = PipekitError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

/// Returns true iff `text` parses as a SemVer version.
pub fn validate(text: &str) -> bool {
    match Version::parse(text) {
        Ok(_) => true,
        Err(e) => {
            debug!("Version not valid: {}: {}", text, e);
            false
        }
    }
}

/// Formats components as `MAJOR.MINOR.PATCH[-PRERELEASE][+BUILD]`.
///
/// The optional parts are not validated; empty strings count as absent.
pub fn build_version(
    major: u64,
    minor: u64,
    patch: u64,
    prerelease: Option<&str>,
    build: Option<&str>,
) -> String {
    let mut out = format!("{}.{}.{}", major, minor, patch);
    if let Some(pre) = prerelease.filter(|p| !p.is_empty()) {
        out.push('-');
        out.push_str(pre);
    }
    if let Some(meta) = build.filter(|b| !b.is_empty()) {
        out.push('+');
        out.push_str(meta);
    }
    out
}

/// Appends `+build_id` to `version`.
///
/// A version that already carries build metadata ends up with two `+`
/// segments, which `validate` then rejects.
pub fn concat_version(version: &str, build_id: &str) -> String {
    format!("{}+{}", version, build_id)
}
