use super::{read_manifest, VersionSource};
use crate::error::{PipekitError, Result};
use serde_json::Value;
use std::path::Path;

pub const PACKAGE_JSON_FILE: &str = "package.json";

/// npm descriptor: string at `$.version`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PackageJson;

impl PackageJson {
    /// Extract the top-level `version` string from JSON text
    pub fn version_from_str(contents: &str) -> Result<String> {
        let root: Value = serde_json::from_str(contents).map_err(|e| {
            PipekitError::parse(format!("Cannot parse {}: {}", PACKAGE_JSON_FILE, e))
        })?;

        match root.get("version") {
            Some(Value::String(version)) => Ok(version.trim().to_string()),
            Some(other) => Err(PipekitError::parse(format!(
                "{} version is not a string: {}",
                PACKAGE_JSON_FILE, other
            ))),
            None => Err(PipekitError::missing_field(format!(
                "{} has no $.version",
                PACKAGE_JSON_FILE
            ))),
        }
    }
}

impl VersionSource for PackageJson {
    fn name(&self) -> &str {
        PACKAGE_JSON_FILE
    }

    fn read(&self, root: &Path) -> Result<String> {
        let contents = read_manifest(root, PACKAGE_JSON_FILE)?;
        Self::version_from_str(&contents)
    }
}
