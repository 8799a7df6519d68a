//! imgprov Runtime - Docker Engine and host collaborators.
//!
//! Implements the collaborator traits of `imgprov_core` against a real
//! Docker Engine and the local system.

pub mod docker;
pub mod host;

// Re-export common types
pub use docker::{DockerClient, DockerEndpoint, DockerError, ImageReference};
pub use host::SystemHost;

/// imgprov Runtime version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
