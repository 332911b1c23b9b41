use super::{CommandRunner, CommandSpec};
use crate::error::{PipekitError, Result};
use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Runs commands on the host with `std::process::Command`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<String> {
        info!(command = %spec.display_line(), "running");

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdin(if spec.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        for (key, value) in &spec.env {
            cmd.env(key, value);
        }
        if let Some(dir) = &spec.current_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|e| {
            PipekitError::command(format!("Failed to start '{}': {}", spec.program, e))
        })?;

        // The child may exit without draining stdin; its status decides the outcome.
        let mut write_error = None;
        if let Some(input) = &spec.stdin {
            if let Some(mut pipe) = child.stdin.take() {
                if let Err(e) = pipe.write_all(input.as_bytes()) {
                    debug!(command = %spec.display_line(), "stdin not consumed: {}", e);
                    write_error = Some(e);
                }
            }
        }

        let output = child.wait_with_output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PipekitError::command(format!(
                "'{}' failed with exit code {}\nStderr: {}",
                spec.display_line(),
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        match write_error {
            Some(e) if e.kind() != ErrorKind::BrokenPipe => Err(e.into()),
            _ => Ok(String::from_utf8_lossy(&output.stdout).into_owned()),
        }
    }
}
