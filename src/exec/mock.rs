use super::{CommandRunner, CommandSpec};
use crate::error::{PipekitError, Result};
use std::cell::RefCell;
use std::collections::VecDeque;

/// Mock runner that records every command and replays queued outputs
#[derive(Debug, Default)]
pub struct RecordingRunner {
    outputs: RefCell<VecDeque<Result<String>>>,
    calls: RefCell<Vec<CommandSpec>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the stdout of the next command
    pub fn push_output(&self, stdout: impl Into<String>) -> &Self {
        self.outputs.borrow_mut().push_back(Ok(stdout.into()));
        self
    }

    /// Queue a failure for the next command
    pub fn push_failure(&self, message: impl Into<String>) -> &Self {
        self.outputs
            .borrow_mut()
            .push_back(Err(PipekitError::command(message)));
        self
    }

    /// Commands run so far, in order
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, spec: &CommandSpec) -> Result<String> {
        self.calls.borrow_mut().push(spec.clone());
        // commands with nothing queued succeed silently
        self.outputs
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }
}
