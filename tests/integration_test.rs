// tests/integration_test.rs
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn pipekit(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pipekit"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute pipekit")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_help() {
    let output = pipekit(&["--help"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("pipekit"));
    assert!(text.contains("login-oidc"));
}

#[test]
fn test_parse_prints_json() {
    let output = pipekit(&["parse", "1.2.3-alpha.1+build.5"]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["major"], 1);
    assert_eq!(json["prerelease"], "alpha.1");
    assert_eq!(json["build"], "build.5");
}

#[test]
fn test_parse_invalid_fails() {
    let output = pipekit(&["parse", "1.02.3"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Cannot parse SemVer"));
}

#[test]
fn test_validate_exit_codes() {
    let valid = pipekit(&["validate", "1.0.0-rc.1"]);
    assert!(valid.status.success());
    assert_eq!(stdout(&valid).trim(), "true");

    let invalid = pipekit(&["validate", "1.0"]);
    assert_eq!(invalid.status.code(), Some(1));
    assert_eq!(stdout(&invalid).trim(), "false");
}

#[test]
fn test_build_and_concat() {
    let built = pipekit(&["build", "1", "2", "3", "--prerelease", "beta", "--build", "42"]);
    assert_eq!(stdout(&built).trim(), "1.2.3-beta+42");

    let joined = pipekit(&["concat", "1.2.3", "abc"]);
    assert_eq!(stdout(&joined).trim(), "1.2.3+abc");
}

#[test]
fn test_detect_and_version() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("package.json"), r#"{"version": "2.3.4"}"#).unwrap();
    let src = dir.path().to_str().unwrap();

    let detected = pipekit(&["detect", "--src", src]);
    assert!(detected.status.success());
    assert_eq!(stdout(&detected).trim(), "2.3.4");

    let full = pipekit(&["version", "--src", src, "--build", "ci.7"]);
    assert!(full.status.success());
    assert_eq!(stdout(&full).trim(), "2.3.4+ci.7");
}

#[test]
fn test_detect_nothing() {
    let dir = TempDir::new().unwrap();
    let output = pipekit(&["detect", "--src", dir.path().to_str().unwrap()]);
    assert!(!output.status.success());
}

#[test]
fn test_build_id_without_commit() {
    let dir = TempDir::new().unwrap();
    let output = pipekit(&[
        "build-id",
        "--src",
        dir.path().to_str().unwrap(),
        "--no-commit",
    ]);
    assert!(output.status.success());

    let build = stdout(&output);
    let build = build.trim();
    assert_eq!(build.len(), "20240101T000000".len());
    assert_eq!(&build[8..9], "T");
}

#[test]
fn test_login_oidc_rejects_short_session() {
    let output = pipekit(&[
        "login-oidc",
        "--token",
        "tok",
        "--role-arn",
        "arn:aws:iam::123456789012:role/ci",
        "--duration-sec",
        "60",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("at least 900 seconds"));
}

#[cfg(test)]
mod git_operations_tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use git2::Repository;
    use pipekit::versioning::{full_version, get_build, BuildOptions};

    // Helper function to setup a temporary git repo for testing
    fn setup_test_repo() -> TempDir {
        let temp_dir = TempDir::new().expect("Could not create temp dir");
        let repo = Repository::init(temp_dir.path()).expect("Could not init git repo");

        {
            let mut config = repo.config().expect("Could not get config");
            config
                .set_str("user.name", "Test User")
                .expect("Could not set user.name");
            config
                .set_str("user.email", "test@example.com")
                .expect("Could not set user.email");
        }

        fs::write(
            temp_dir.path().join("package.json"),
            r#"{"name": "app", "version": "1.4.0"}"#,
        )
        .expect("Could not write package.json");

        let mut index = repo.index().expect("Could not get index");
        index
            .add_path(Path::new("package.json"))
            .expect("Could not add file to index");
        index.write().expect("Could not write index");

        let tree_id = index.write_tree().expect("Could not write tree");
        let tree = repo.find_tree(tree_id).expect("Could not find tree");
        let sig = repo.signature().expect("Could not get sig");

        repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
            .expect("Could not create commit");

        temp_dir
    }

    fn head_short_hash(dir: &Path) -> String {
        let repo = Repository::open(dir).unwrap();
        let head = repo.head().unwrap().peel_to_commit().unwrap();
        let short = head.as_object().short_id().unwrap();
        short.as_str().unwrap().to_string()
    }

    #[test]
    fn test_get_build_from_repository() {
        let dir = setup_test_repo();
        let now = Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap();

        let build = get_build(dir.path(), now, BuildOptions::default()).unwrap();
        assert_eq!(
            build,
            format!("20240229T120000-{}", head_short_hash(dir.path()))
        );
    }

    #[test]
    fn test_full_version_from_repository() {
        let dir = setup_test_repo();
        let now = Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap();

        let full = full_version(dir.path(), None, None, now, BuildOptions::default()).unwrap();
        assert_eq!(
            full,
            format!("1.4.0+20240229T120000-{}", head_short_hash(dir.path()))
        );
    }

    #[test]
    fn test_get_build_outside_repository() {
        let dir = TempDir::new().unwrap();
        if Repository::discover(dir.path()).is_ok() {
            return;
        }
        let now = Utc::now();
        assert!(get_build(dir.path(), now, BuildOptions::default()).is_err());
    }

    #[test]
    fn test_cli_version_in_repository() {
        let dir = setup_test_repo();
        let output = pipekit(&["version", "--src", dir.path().to_str().unwrap(), "--no-ts"]);
        assert!(output.status.success());
        assert_eq!(
            stdout(&output).trim(),
            format!("1.4.0+{}", head_short_hash(dir.path()))
        );
    }
}
