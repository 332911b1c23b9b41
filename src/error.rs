use thiserror::Error;

/// Unified error type for pipekit operations
#[derive(Error, Debug)]
pub enum PipekitError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Command failed: {0}")]
    Command(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in pipekit
pub type Result<T> = std::result::Result<T, PipekitError>;

impl PipekitError {
    /// Create a parse error with context
    pub fn parse(msg: impl Into<String>) -> Self {
        PipekitError::Parse(msg.into())
    }

    /// Create a missing field error naming the absent key
    pub fn missing_field(msg: impl Into<String>) -> Self {
        PipekitError::MissingField(msg.into())
    }

    /// Create a source unavailable error (soft miss in the detector chain)
    pub fn source_unavailable(msg: impl Into<String>) -> Self {
        PipekitError::SourceUnavailable(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        PipekitError::Config(msg.into())
    }

    /// Create an external command error with context
    pub fn command(msg: impl Into<String>) -> Self {
        PipekitError::Command(msg.into())
    }
}
