//! Shell-style credentials files
//!
//! The AWS login script emits lines such as `export AWS_REGION="us-east-1"`.
//! [`parse_assignments`] turns that text into a key/value map on a best-effort
//! basis and [`AwsSecrets::from_values`] checks the keys the caller relies on.

use crate::error::{PipekitError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::trace;

/// Named groups: `prefix` (e.g. `export `), `key`, `value`.
static ASSIGNMENT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?P<prefix>.*\s+)?(?P<key>[a-zA-Z0-9_]+)\s*=\s*"?(?P<value>[^"]*)"?$"#)
        .expect("assignment pattern is a valid regex")
});

pub const SESSION_DURATION: &str = "AWS_SESSION_DURATION";
pub const SESSION_ISSUED_UTC: &str = "AWS_SESSION_ISS_UTC";
pub const SESSION_EXPIRES_UTC: &str = "AWS_SESSION_EXP_UTC";
pub const DEFAULT_REGION: &str = "AWS_DEFAULT_REGION";
pub const OIDC_TOKEN: &str = "OIDC_TOKEN";
pub const ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";
pub const ECR_SECRET: &str = "AWS_ECR_SECRET";

/// Parses `KEY=VALUE` lines into a map.
///
/// Each line is trimmed and blank lines are skipped. A leading word such as
/// `export` is dropped and surrounding double quotes on the value are stripped.
/// Lines that do not look like an assignment are ignored, so this never fails;
/// a repeated key keeps its last value.
///
/// # Example
/// ```ignore
/// let values = parse_assignments("export AWS_REGION=\"us-east-1\"\nFOO=a=b");
/// assert_eq!(values["AWS_REGION"], "us-east-1");
/// assert_eq!(values["FOO"], "a=b");
/// ```
pub fn parse_assignments(text: &str) -> HashMap<String, String> {
    let mut values = HashMap::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match ASSIGNMENT_PATTERN.captures(line) {
            Some(captures) => {
                let key = captures.name("key").map_or("", |m| m.as_str());
                let value = captures.name("value").map_or("", |m| m.as_str());
                values.insert(key.to_string(), value.to_string());
            }
            None => trace!("ignoring line that is not an assignment"),
        }
    }

    values
}

/// Temporary AWS credentials obtained through an OIDC role assumption
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct AwsSecrets {
    pub duration_sec: i64,
    pub from_ts_utc: i64,
    pub until_ts_utc: i64,
    pub default_region: String,
    pub oidc_token: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub ecr_secret: String,
}

impl AwsSecrets {
    /// Build secrets from a parsed credentials file.
    ///
    /// The session timing keys are required and must be integers. String
    /// fields default to empty when their key is absent.
    pub fn from_values(values: &HashMap<String, String>) -> Result<Self> {
        let text = |key: &str| values.get(key).cloned().unwrap_or_default();

        Ok(AwsSecrets {
            duration_sec: required_integer(values, SESSION_DURATION)?,
            from_ts_utc: required_integer(values, SESSION_ISSUED_UTC)?,
            until_ts_utc: required_integer(values, SESSION_EXPIRES_UTC)?,
            default_region: text(DEFAULT_REGION),
            oidc_token: text(OIDC_TOKEN),
            access_key_id: text(ACCESS_KEY_ID),
            secret_access_key: text(SECRET_ACCESS_KEY),
            session_token: text(SESSION_TOKEN),
            ecr_secret: text(ECR_SECRET),
        })
    }

    /// Shorthand for `from_values(&parse_assignments(text))`
    pub fn from_credentials_file(text: &str) -> Result<Self> {
        Self::from_values(&parse_assignments(text))
    }

    /// Render as a sourceable credentials file.
    ///
    /// Values are written inside double quotes without escaping, so a value
    /// holding `"` or a line break is rejected with `PipekitError::Parse`.
    pub fn to_env(&self) -> Result<String> {
        let entries: [(&str, String); 9] = [
            (OIDC_TOKEN, self.oidc_token.clone()),
            (DEFAULT_REGION, self.default_region.clone()),
            (SESSION_DURATION, self.duration_sec.to_string()),
            (SESSION_ISSUED_UTC, self.from_ts_utc.to_string()),
            (SESSION_EXPIRES_UTC, self.until_ts_utc.to_string()),
            (ACCESS_KEY_ID, self.access_key_id.clone()),
            (SECRET_ACCESS_KEY, self.secret_access_key.clone()),
            (SESSION_TOKEN, self.session_token.clone()),
            (ECR_SECRET, self.ecr_secret.clone()),
        ];

        entries
            .iter()
            .map(|(key, value)| {
                if value.contains(['"', '\n', '\r']) {
                    return Err(PipekitError::parse(format!(
                        "Cannot write '{}': value contains a quote or line break",
                        key
                    )));
                }
                Ok(format!("export {}=\"{}\"\n", key, value))
            })
            .collect()
    }
}

fn required_integer(values: &HashMap<String, String>, key: &str) -> Result<i64> {
    let raw = values
        .get(key)
        .ok_or_else(|| PipekitError::missing_field(format!("Cannot find '{}'", key)))?;

    raw.trim()
        .parse::<i64>()
        .map_err(|e| PipekitError::parse(format!("Invalid integer for '{}': {}", key, e)))
}

impl fmt::Debug for AwsSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsSecrets")
            .field("duration_sec", &self.duration_sec)
            .field("from_ts_utc", &self.from_ts_utc)
            .field("until_ts_utc", &self.until_ts_utc)
            .field("default_region", &self.default_region)
            .field("access_key_id", &self.access_key_id)
            .field("oidc_token", &"<redacted>")
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &"<redacted>")
            .field("ecr_secret", &"<redacted>")
            .finish()
    }
}
