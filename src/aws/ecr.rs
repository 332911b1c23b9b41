//! Build images and push them to ECR with the docker CLI

use super::oidc::{OidcAuth, OidcLogin};
use crate::error::{PipekitError, Result};
use crate::exec::{CommandRunner, CommandSpec};
use std::path::Path;
use tracing::{info, warn};

/// Username ECR expects alongside the `get-login-password` secret
pub const ECR_USERNAME: &str = "AWS";

/// Registry host of an image reference such as
/// `123456789012.dkr.ecr.us-east-1.amazonaws.com/app:1.0.0`.
pub fn registry_host(tag: &str) -> Result<&str> {
    match tag.split_once('/') {
        Some((host, rest)) if !host.is_empty() && !rest.is_empty() => Ok(host),
        _ => Err(PipekitError::config(format!(
            "Image name '{}' must start with a registry address",
            tag
        ))),
    }
}

pub struct EcrPublisher<'a, R: CommandRunner> {
    runner: &'a R,
    docker: String,
}

impl<'a, R: CommandRunner> EcrPublisher<'a, R> {
    pub fn new(runner: &'a R) -> Self {
        EcrPublisher {
            runner,
            docker: "docker".to_string(),
        }
    }

    pub fn with_docker(mut self, docker: impl Into<String>) -> Self {
        self.docker = docker.into();
        self
    }

    fn docker(&self) -> CommandSpec {
        CommandSpec::new(self.docker.as_str())
    }

    /// Build `root` with the Dockerfile at `root/dockerfile`, returning the image id
    pub fn build_dockerfile(&self, root: &Path, dockerfile: &str) -> Result<String> {
        let dockerfile_path = root.join(dockerfile);
        let spec = self
            .docker()
            .args(["build", "--quiet", "--file"])
            .arg(dockerfile_path.to_string_lossy())
            .arg(root.to_string_lossy())
            .current_dir(root);

        let image = self.runner.run(&spec)?.trim().to_string();
        if image.is_empty() {
            return Err(PipekitError::command(format!(
                "Build of '{}' produced no image id",
                dockerfile_path.display()
            )));
        }
        info!(%image, "built image");
        Ok(image)
    }

    /// Tag `image` as `tag` and push it, authenticating with `ecr_secret`.
    ///
    /// # Returns
    /// * `Ok(String)` - The pushed reference with its digest when docker reports one,
    ///   otherwise `tag`
    pub fn publish_container(&self, image: &str, tag: &str, ecr_secret: &str) -> Result<String> {
        let registry = registry_host(tag)?;
        if ecr_secret.is_empty() {
            return Err(PipekitError::missing_field("AWS_ECR_SECRET"));
        }

        self.runner.run(
            &self
                .docker()
                .args(["login", "--username", ECR_USERNAME, "--password-stdin", registry])
                .stdin(ecr_secret),
        )?;
        self.runner
            .run(&self.docker().args(["tag", image, tag]))?;
        self.runner.run(&self.docker().args(["push", tag]))?;

        let inspect = self
            .docker()
            .args(["inspect", "--format", "{{index .RepoDigests 0}}", tag]);
        let digest = match self.runner.run(&inspect) {
            Ok(out) => out.trim().to_string(),
            Err(e) => {
                warn!("Cannot read digest of '{}': {}", tag, e);
                String::new()
            }
        };

        let published = if digest.is_empty() {
            tag.to_string()
        } else {
            digest
        };
        info!(reference = %published, "published image");
        Ok(published)
    }

    /// Log in through OIDC, then publish `image` as `tag`
    pub fn publish_oidc(
        &self,
        auth: &OidcAuth<'_, R>,
        image: &str,
        login: &OidcLogin,
        tag: &str,
    ) -> Result<String> {
        registry_host(tag)?;
        let secrets = auth.login(login)?;
        if secrets.ecr_secret.is_empty() {
            return Err(PipekitError::missing_field(
                "AWS_ECR_SECRET: Failed to get ECR secret",
            ));
        }
        self.publish_container(image, tag, &secrets.ecr_secret)
    }

    /// Build `root` and publish the result as `tag` through OIDC
    pub fn build_and_push_oidc(
        &self,
        auth: &OidcAuth<'_, R>,
        root: &Path,
        dockerfile: &str,
        login: &OidcLogin,
        tag: &str,
    ) -> Result<String> {
        let image = self.build_dockerfile(root, dockerfile)?;
        self.publish_oidc(auth, &image, login, tag)
    }
}
