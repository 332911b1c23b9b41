pub mod aws;
pub mod config;
pub mod detect;
pub mod domain;
pub mod error;
pub mod exec;
pub mod git;
pub mod logging;
pub mod ui;
pub mod versioning;

pub use error::{PipekitError, Result};
