//! Terminal output for the command-line tool.
//!
//! Status lines go to stderr so that stdout carries only the command result
//! and can be captured by a pipeline (`VERSION=$(pipekit version)`).

use console::style;

use crate::domain::Version;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Human readable breakdown of a parsed version
pub fn format_version_details(version: &Version) -> String {
    let or_none = |s: &str| {
        if s.is_empty() {
            "(none)".to_string()
        } else {
            s.to_string()
        }
    };

    format!(
        "major: {}\nminor: {}\npatch: {}\nprerelease: {}\nbuild: {}",
        version.major(),
        version.minor(),
        version.patch(),
        or_none(version.prerelease()),
        or_none(version.build())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_version_details() {
        let v = Version::parse("1.2.3-rc.1").unwrap();
        let text = format_version_details(&v);
        assert!(text.contains("major: 1"));
        assert!(text.contains("prerelease: rc.1"));
        assert!(text.contains("build: (none)"));
    }
}
