use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};

use pipekit::aws::{EcrPublisher, OidcAuth, OidcLogin};
use pipekit::config::{self, Config};
use pipekit::domain::{build_version, concat_version, validate, Version};
use pipekit::exec::SystemRunner;
use pipekit::versioning::{self, BuildOptions};
use pipekit::{logging, ui};

#[derive(Parser)]
#[command(
    name = "pipekit",
    version,
    about = "Version, credentials and image publishing helpers for container pipelines"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(
        long,
        global = true,
        default_value = "warn",
        help = "Log level, overridden by RUST_LOG"
    )]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a SemVer string and print its components as JSON
    Parse {
        version: String,
        #[arg(long, help = "Print one component per line instead of JSON")]
        details: bool,
    },
    /// Check a SemVer string; exits with status 1 when invalid
    Validate { version: String },
    /// Format version components as MAJOR.MINOR.PATCH[-PRERELEASE][+BUILD]
    Build {
        major: u64,
        minor: u64,
        patch: u64,
        #[arg(long)]
        prerelease: Option<String>,
        #[arg(long)]
        build: Option<String>,
    },
    /// Append build metadata to a version with '+'
    Concat { version: String, build: String },
    /// Print the version declared in pom.xml or package.json
    Detect {
        #[arg(long, default_value = ".", help = "Path to the source directory")]
        src: PathBuf,
    },
    /// Print the build identifier (UTC timestamp and short commit hash)
    BuildId {
        #[arg(long, default_value = ".", help = "Path to the source directory")]
        src: PathBuf,
        #[command(flatten)]
        parts: BuildParts,
    },
    /// Print the full version <version>+<build> after validating it
    Version {
        #[arg(long, default_value = ".", help = "Path to the source directory")]
        src: PathBuf,
        #[arg(long, help = "MAJOR.MINOR.PATCH version, detected when omitted")]
        version: Option<String>,
        #[arg(long, help = "Build metadata, computed when omitted")]
        build: Option<String>,
        #[command(flatten)]
        parts: BuildParts,
    },
    /// Assume an AWS role with an OIDC token and print the credentials
    LoginOidc {
        #[command(flatten)]
        login: LoginArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Env)]
        format: OutputFormat,
    },
    /// Push an existing local image to ECR using OIDC credentials
    Publish {
        #[arg(long, help = "Local image id or name to publish")]
        image: String,
        #[arg(long, help = "Target image name, starting with the ECR address")]
        tag: String,
        #[command(flatten)]
        login: LoginArgs,
    },
    /// Build a Dockerfile and push the image to ECR using OIDC credentials
    BuildAndPush {
        #[arg(long, default_value = ".", help = "Root context directory for the build")]
        root: PathBuf,
        #[arg(long, help = "Dockerfile path relative to the root")]
        dockerfile: Option<String>,
        #[arg(long, help = "Target image name, starting with the ECR address")]
        tag: String,
        #[command(flatten)]
        login: LoginArgs,
    },
}

#[derive(clap::Args)]
struct BuildParts {
    #[arg(long, help = "Leave the timestamp out of the build identifier")]
    no_ts: bool,
    #[arg(long, help = "Leave the commit hash out of the build identifier")]
    no_commit: bool,
}

impl BuildParts {
    fn options(&self, config: &Config) -> BuildOptions {
        BuildOptions {
            no_timestamp: self.no_ts || config.build.no_timestamp,
            no_commit: self.no_commit || config.build.no_commit,
        }
    }
}

#[derive(clap::Args)]
struct LoginArgs {
    #[arg(long, env = "OIDC_TOKEN", hide_env_values = true, help = "OIDC token")]
    token: String,
    #[arg(long, help = "AWS IAM Role to assume")]
    role_arn: String,
    #[arg(long, help = "Session duration in seconds (min 900)")]
    duration_sec: Option<u32>,
    #[arg(long, help = "Default region")]
    region: Option<String>,
    #[arg(long, help = "Session name (will appear in logs and billing)")]
    session_name: Option<String>,
}

impl LoginArgs {
    fn into_login(self, config: &Config) -> OidcLogin {
        let mut login = OidcLogin::new(self.token, self.role_arn);
        login.duration_sec = self.duration_sec.unwrap_or(config.aws.duration_sec);
        login.region = self.region.unwrap_or_else(|| config.aws.region.clone());
        login.session_name = self.session_name.or_else(|| config.aws.session_name.clone());
        login
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Env,
    Json,
}

fn main() {
    let args = Args::parse();
    logging::init_logging(&args.log_level);

    match run(args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}

fn run(args: Args) -> Result<i32> {
    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;

    match args.command {
        Command::Parse { version, details } => {
            let parsed = Version::parse(&version)?;
            if details {
                println!("{}", ui::format_version_details(&parsed));
            } else {
                println!("{}", parsed.to_json()?);
            }
        }
        Command::Validate { version } => {
            let valid = validate(&version);
            println!("{}", valid);
            if !valid {
                return Ok(1);
            }
        }
        Command::Build {
            major,
            minor,
            patch,
            prerelease,
            build,
        } => {
            println!(
                "{}",
                build_version(major, minor, patch, prerelease.as_deref(), build.as_deref())
            );
        }
        Command::Concat { version, build } => {
            println!("{}", concat_version(&version, &build));
        }
        Command::Detect { src } => {
            println!("{}", versioning::detect_version(&src)?);
        }
        Command::BuildId { src, parts } => {
            let build = versioning::get_build(&src, Utc::now(), parts.options(&config))
                .with_context(|| format!("Cannot compute build id for '{}'", src.display()))?;
            println!("{}", build);
        }
        Command::Version {
            src,
            version,
            build,
            parts,
        } => {
            let full = versioning::full_version(
                &src,
                version.as_deref(),
                build.as_deref(),
                Utc::now(),
                parts.options(&config),
            )?;
            println!("{}", full);
        }
        Command::LoginOidc { login, format } => {
            let runner = SystemRunner;
            let login = login.into_login(&config);
            ui::display_status(&format!("Assuming role {}", login.role_arn));
            let secrets = oidc_auth(&runner, &config).login(&login)?;
            ui::display_success(&format!("Session valid until {}", secrets.until_ts_utc));
            match format {
                OutputFormat::Env => print!("{}", secrets.to_env()?),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&secrets)?),
            }
        }
        Command::Publish { image, tag, login } => {
            let runner = SystemRunner;
            let login = login.into_login(&config);
            ui::display_status(&format!("Publishing {} as {}", image, tag));
            let published = EcrPublisher::new(&runner)
                .with_docker(config.docker.program.as_str())
                .publish_oidc(&oidc_auth(&runner, &config), &image, &login, &tag)?;
            ui::display_success(&format!("Pushed {}", published));
            println!("{}", published);
        }
        Command::BuildAndPush {
            root,
            dockerfile,
            tag,
            login,
        } => {
            let runner = SystemRunner;
            let login = login.into_login(&config);
            let dockerfile = dockerfile.unwrap_or_else(|| config.docker.dockerfile.clone());
            ui::display_status(&format!("Building {} in {}", dockerfile, root.display()));
            let published = EcrPublisher::new(&runner)
                .with_docker(config.docker.program.as_str())
                .build_and_push_oidc(&oidc_auth(&runner, &config), &root, &dockerfile, &login, &tag)?;
            ui::display_success(&format!("Pushed {}", published));
            println!("{}", published);
        }
    }

    Ok(0)
}

fn oidc_auth<'a>(runner: &'a SystemRunner, config: &Config) -> OidcAuth<'a, SystemRunner> {
    OidcAuth::new(runner)
        .with_shell(config.shell.program.as_str())
        .with_aws_cli(config.aws.program.as_str())
}
