//! AWS credentials through OIDC web identity federation
//!
//! A shell script drives the AWS CLI and prints a credentials file
//! (`export KEY="VALUE"` lines) on stdout, which is then parsed into
//! [`AwsSecrets`]. Inputs reach the script only through its environment.

use crate::domain::AwsSecrets;
use crate::error::{PipekitError, Result};
use crate::exec::{CommandRunner, CommandSpec};
use tracing::info;

/// Shortest session STS accepts
pub const MIN_DURATION_SEC: u32 = 900;
pub const DEFAULT_REGION: &str = "us-east-1";

const LOGIN_SCRIPT: &str = r#"
emit() { printf 'export %s="%s"\n' "$1" "$2"; }

emit OIDC_TOKEN "${OIDC_TOKEN:?OIDC Token missing}"
emit AWS_DEFAULT_REGION "${AWS_DEFAULT_REGION}"
emit AWS_ROLE_ARN "${AWS_ROLE_ARN:?Assumed role ARN missing}"
emit AWS_SESSION_NAME "${AWS_SESSION_NAME}"
emit AWS_SESSION_DURATION "${AWS_SESSION_DURATION}"

ts=$(TZ=UTC date +%s)
emit AWS_SESSION_ISS_UTC "${ts}"
emit AWS_SESSION_EXP_UTC "$((ts + AWS_SESSION_DURATION))"

creds=$("${AWS_CLI}" sts assume-role-with-web-identity \
    --role-arn "${AWS_ROLE_ARN}" \
    --role-session-name "${AWS_SESSION_NAME}" \
    --web-identity-token "${OIDC_TOKEN}" \
    --duration-seconds "${AWS_SESSION_DURATION}" \
    --query 'Credentials.[AccessKeyId,SecretAccessKey,SessionToken]' \
    --output text)
set -- ${creds:?AWS credentials missing}
export AWS_ACCESS_KEY_ID="$1" AWS_SECRET_ACCESS_KEY="$2" AWS_SESSION_TOKEN="$3"
emit AWS_ACCESS_KEY_ID "$1"
emit AWS_SECRET_ACCESS_KEY "$2"
emit AWS_SESSION_TOKEN "$3"

emit AWS_ECR_SECRET "$("${AWS_CLI}" ecr get-login-password --region "${AWS_DEFAULT_REGION}")"
"#;

/// Parameters of a role assumption
#[derive(Clone, PartialEq, Eq)]
pub struct OidcLogin {
    /// OIDC token
    pub token: String,
    /// AWS IAM Role to assume
    pub role_arn: String,
    /// Session duration in seconds (min 900s/15min)
    pub duration_sec: u32,
    /// Default region
    pub region: String,
    /// Session name (will appear in logs and billing)
    pub session_name: Option<String>,
}

impl OidcLogin {
    pub fn new(token: impl Into<String>, role_arn: impl Into<String>) -> Self {
        OidcLogin {
            token: token.into(),
            role_arn: role_arn.into(),
            duration_sec: MIN_DURATION_SEC,
            region: DEFAULT_REGION.to_string(),
            session_name: None,
        }
    }

    /// Explicit session name, or `OIDC_LOGIN-<region>`
    pub fn session_name(&self) -> String {
        match self.session_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("OIDC_LOGIN-{}", self.region),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.token.is_empty() {
            return Err(PipekitError::config("OIDC token is empty"));
        }
        if self.role_arn.is_empty() {
            return Err(PipekitError::config("Role ARN is empty"));
        }
        if self.duration_sec < MIN_DURATION_SEC {
            return Err(PipekitError::config(format!(
                "Session duration must be at least {} seconds, got {}",
                MIN_DURATION_SEC, self.duration_sec
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for OidcLogin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OidcLogin")
            .field("token", &"<redacted>")
            .field("role_arn", &self.role_arn)
            .field("duration_sec", &self.duration_sec)
            .field("region", &self.region)
            .field("session_name", &self.session_name)
            .finish()
    }
}

/// Runs the login script through a [`CommandRunner`]
pub struct OidcAuth<'a, R: CommandRunner> {
    runner: &'a R,
    shell: String,
    aws_cli: String,
}

impl<'a, R: CommandRunner> OidcAuth<'a, R> {
    pub fn new(runner: &'a R) -> Self {
        OidcAuth {
            runner,
            shell: "bash".to_string(),
            aws_cli: "aws".to_string(),
        }
    }

    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    pub fn with_aws_cli(mut self, aws_cli: impl Into<String>) -> Self {
        self.aws_cli = aws_cli.into();
        self
    }

    /// Assume `login.role_arn` with the OIDC token and fetch an ECR password.
    ///
    /// # Returns
    /// * `Ok(AwsSecrets)` - Session credentials and the ECR login secret
    /// * `Err(PipekitError::Config)` - Invalid login parameters
    /// * `Err(PipekitError::Command)` - The AWS CLI calls failed
    /// * `Err(PipekitError::MissingField)` - The script output lacked a session key
    pub fn login(&self, login: &OidcLogin) -> Result<AwsSecrets> {
        login.validate()?;
        let session_name = login.session_name();
        info!(
            role = %login.role_arn,
            region = %login.region,
            session = %session_name,
            "assuming role with web identity"
        );

        let spec = CommandSpec::new(self.shell.as_str())
            .args(["-ec", LOGIN_SCRIPT])
            .env("AWS_CLI", self.aws_cli.as_str())
            .env("OIDC_TOKEN", login.token.as_str())
            .env("AWS_DEFAULT_REGION", login.region.as_str())
            .env("AWS_ROLE_ARN", login.role_arn.as_str())
            .env("AWS_SESSION_NAME", session_name)
            .env("AWS_SESSION_DURATION", login.duration_sec.to_string());

        let exported = self.runner.run(&spec)?;
        AwsSecrets::from_credentials_file(&exported)
    }
}
