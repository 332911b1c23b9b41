use crate::error::{PipekitError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name looked up in the current directory
pub const LOCAL_CONFIG_FILE: &str = "pipekit.toml";
/// File name looked up in the user config directory
pub const USER_CONFIG_FILE: &str = ".pipekit.toml";

/// Represents the complete configuration for pipekit.
///
/// Every value is a default that the matching command-line flag overrides.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub aws: AwsConfig,

    #[serde(default)]
    pub docker: DockerConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub shell: ShellConfig,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_duration_sec() -> u32 {
    900
}

/// Defaults for OIDC role assumption.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AwsConfig {
    #[serde(default = "default_region")]
    pub region: String,

    /// Session duration in seconds (min 900s/15min)
    #[serde(default = "default_duration_sec")]
    pub duration_sec: u32,

    /// Session name shown in AWS logs; `OIDC_LOGIN-<region>` when unset
    #[serde(default)]
    pub session_name: Option<String>,

    /// Path or name of the AWS CLI
    #[serde(default = "default_aws_program")]
    pub program: String,
}

fn default_aws_program() -> String {
    "aws".to_string()
}

impl Default for AwsConfig {
    fn default() -> Self {
        AwsConfig {
            region: default_region(),
            duration_sec: default_duration_sec(),
            session_name: None,
            program: default_aws_program(),
        }
    }
}

fn default_docker_program() -> String {
    "docker".to_string()
}

fn default_dockerfile() -> String {
    "Dockerfile".to_string()
}

/// Container tooling.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DockerConfig {
    #[serde(default = "default_docker_program")]
    pub program: String,

    #[serde(default = "default_dockerfile")]
    pub dockerfile: String,
}

impl Default for DockerConfig {
    fn default() -> Self {
        DockerConfig {
            program: default_docker_program(),
            dockerfile: default_dockerfile(),
        }
    }
}

/// Which parts go into the build identifier.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct BuildConfig {
    #[serde(default)]
    pub no_timestamp: bool,

    #[serde(default)]
    pub no_commit: bool,
}

fn default_shell_program() -> String {
    "bash".to_string()
}

/// Shell used to run the credentials script.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ShellConfig {
    #[serde(default = "default_shell_program")]
    pub program: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        ShellConfig {
            program: default_shell_program(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `pipekit.toml` in current directory
/// 3. `.pipekit.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(LOCAL_CONFIG_FILE).exists() {
        fs::read_to_string(LOCAL_CONFIG_FILE)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(USER_CONFIG_FILE);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    toml::from_str(&config_str).map_err(|e| PipekitError::config(e.to_string()))
}
