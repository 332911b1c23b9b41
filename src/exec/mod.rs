//! External process execution
//!
//! Every call into `aws`, `docker` or a shell goes through [CommandRunner], so
//! the flows built on top can be exercised with [mock::RecordingRunner].

pub mod mock;
pub mod system;

pub use mock::RecordingRunner;
pub use system::SystemRunner;

use crate::error::Result;
use std::path::PathBuf;

/// A single process invocation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Extra environment variables on top of the inherited environment
    pub env: Vec<(String, String)>,
    /// Text written to the child's stdin, which is closed afterwards
    pub stdin: Option<String>,
    pub current_dir: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        CommandSpec {
            program: program.into(),
            ..Default::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Program and arguments joined for log output. Never includes env or stdin.
    pub fn display_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Runs external commands to completion
pub trait CommandRunner {
    /// Run `spec` and return its standard output.
    ///
    /// # Returns
    /// * `Ok(String)` - Stdout of a process that exited with status 0
    /// * `Err(PipekitError::Command)` - The process could not start or exited non-zero
    fn run(&self, spec: &CommandSpec) -> Result<String>;
}
