//! Docker Engine API collaborator.
//!
//! Talks HTTP/1.1 to the engine over its unix socket (or plain TCP) and
//! implements [`imgprov_core::ImageRuntime`]:
//!
//! - pull: `POST /v1.22/images/create?fromImage=<name>&tag=<tag>`
//! - list: `GET /v1.22/images/json?all=1`

mod client;
pub mod endpoint;
mod progress;
pub mod reference;

pub use client::DockerClient;
pub use endpoint::DockerEndpoint;
pub use reference::ImageReference;

use thiserror::Error;

/// Engine API version prefix.
pub const API_VERSION: &str = "v1.22";

/// User agent sent with every request.
pub const USER_AGENT: &str = "engine-api-cli-1.0";

/// Docker Engine transport errors.
#[derive(Error, Debug)]
pub enum DockerError {
    /// Invalid docker URI
    #[error("{0}")]
    Endpoint(String),

    /// Invalid image reference
    #[error("{0}")]
    Reference(String),

    /// Could not reach the engine
    #[error("cannot connect to docker at {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    /// HTTP protocol failure
    #[error("docker request failed: {0}")]
    Http(#[from] hyper::Error),

    /// Request construction failure
    #[error("invalid docker request: {0}")]
    Request(#[from] hyper::http::Error),

    /// Engine answered with a non-success status
    #[error("docker returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Engine reported a failure inside the pull progress stream
    #[error("{0}")]
    Pull(String),

    /// Response body could not be decoded
    #[error("invalid docker response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Writing pull progress failed
    #[error("failed to write pull progress: {0}")]
    Progress(#[source] std::io::Error),
}
