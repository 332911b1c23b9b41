//! Domain logic - pure text processing independent of processes and files

pub mod build_id;
pub mod credentials;
pub mod version;

pub use build_id::compose_build_id;
pub use credentials::{parse_assignments, AwsSecrets};
pub use version::{build_version, concat_version, validate, Version};
