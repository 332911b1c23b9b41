use super::{read_manifest, VersionSource};
use crate::error::{PipekitError, Result};
use std::path::Path;

pub const POM_FILE: &str = "pom.xml";

/// Maven descriptor: text of `/project/version`.
///
/// Only a direct `version` child of the root `project` element counts, so a
/// `<parent><version>` is never picked up. Namespaces are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct PomXml;

impl PomXml {
    /// Extract the project version from XML text
    pub fn version_from_str(contents: &str) -> Result<String> {
        let document = roxmltree::Document::parse(contents)
            .map_err(|e| PipekitError::parse(format!("Cannot parse {}: {}", POM_FILE, e)))?;

        let project = document.root_element();
        if project.tag_name().name() != "project" {
            return Err(PipekitError::missing_field(format!(
                "{} root element is '{}', expected 'project'",
                POM_FILE,
                project.tag_name().name()
            )));
        }

        let version = project
            .children()
            .find(|node| node.is_element() && node.tag_name().name() == "version")
            .ok_or_else(|| PipekitError::missing_field(format!("{} has no /project/version", POM_FILE)))?;

        let text: String = version
            .descendants()
            .filter(|node| node.is_text())
            .filter_map(|node| node.text())
            .collect();

        Ok(text.trim().to_string())
    }
}

impl VersionSource for PomXml {
    fn name(&self) -> &str {
        POM_FILE
    }

    fn read(&self, root: &Path) -> Result<String> {
        let contents = read_manifest(root, POM_FILE)?;
        Self::version_from_str(&contents)
    }
}
