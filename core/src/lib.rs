//! imgprov Core - image provenance manifests.
//!
//! Parses the requested repo tags, drives an [`ImageRuntime`] to pull them,
//! matches the runtime's local images against the request and assembles the
//! manifest written for downstream archival.

pub mod config;
pub mod error;
pub mod inventory;
pub mod manifest;
pub mod pipeline;
pub mod runtime;
pub mod tags;

// Re-export commonly used types
pub use config::{ManifestConfig, DEFAULT_DOCKER_URI};
pub use error::{ManifestError, Result};
pub use inventory::{match_images, LocalImage, GIT_REF_LABEL};
pub use manifest::{ImageInfo, Manifest, DATE_FORMAT};
pub use runtime::{HostResolver, ImageRuntime};
pub use tags::parse_repo_tags;

/// imgprov version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
