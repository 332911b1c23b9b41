//! AWS integrations built on the `aws` and `docker` CLIs

pub mod ecr;
pub mod oidc;

pub use ecr::EcrPublisher;
pub use oidc::{OidcAuth, OidcLogin};
