use chrono::{DateTime, Utc};

/// Timestamp layout used in build identifiers, e.g. `20240131T235959`
pub const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Compose a build qualifier from an optional UTC timestamp and an optional
/// short commit hash, in that order, joined with `-`.
///
/// Missing or empty parts are skipped, so two absent parts give an empty string.
pub fn compose_build_id(timestamp: Option<DateTime<Utc>>, commit: Option<&str>) -> String {
    let timestamp = timestamp.map(|ts| ts.format(TIMESTAMP_FORMAT).to_string());

    [timestamp.as_deref(), commit.map(str::trim)]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 5).unwrap()
    }

    #[test]
    fn test_timestamp_and_commit() {
        assert_eq!(
            compose_build_id(Some(fixed_time()), Some("abc1234")),
            "20240131T235905-abc1234"
        );
    }

    #[test]
    fn test_timestamp_only() {
        assert_eq!(compose_build_id(Some(fixed_time()), None), "20240131T235905");
    }

    #[test]
    fn test_commit_only() {
        assert_eq!(compose_build_id(None, Some("abc1234")), "abc1234");
    }

    #[test]
    fn test_nothing() {
        assert_eq!(compose_build_id(None, None), "");
    }

    #[test]
    fn test_blank_commit_is_skipped() {
        assert_eq!(compose_build_id(Some(fixed_time()), Some("  ")), "20240131T235905");
    }
}
