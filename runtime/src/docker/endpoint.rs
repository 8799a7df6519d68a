//! Docker Engine endpoint parsing.

use std::fmt;
use std::path::PathBuf;

use url::Url;

use super::DockerError;

/// Default port for `tcp://` endpoints without one.
const DEFAULT_TCP_PORT: u16 = 2375;

/// Where the Docker Engine API listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockerEndpoint {
    /// Unix domain socket (e.g., /var/run/docker.sock)
    Unix(PathBuf),
    /// Plain HTTP over TCP
    Tcp { host: String, port: u16 },
}

impl DockerEndpoint {
    /// Parse a `unix://`, `tcp://` or `http://` URI.
    pub fn parse(uri: &str) -> Result<Self, DockerError> {
        let url = Url::parse(uri.trim())
            .map_err(|e| DockerError::Endpoint(format!("invalid docker URI '{}': {}", uri, e)))?;

        match url.scheme() {
            "unix" => {
                if url.path().is_empty() || url.path() == "/" {
                    return Err(DockerError::Endpoint(format!(
                        "docker URI '{}' has no socket path",
                        uri
                    )));
                }
                Ok(DockerEndpoint::Unix(PathBuf::from(url.path())))
            }
            "tcp" | "http" => {
                let host = url
                    .host_str()
                    .filter(|h| !h.is_empty())
                    .ok_or_else(|| {
                        DockerError::Endpoint(format!("docker URI '{}' has no host", uri))
                    })?
                    .to_string();
                let port = url.port().unwrap_or(match url.scheme() {
                    "http" => 80,
                    _ => DEFAULT_TCP_PORT,
                });
                Ok(DockerEndpoint::Tcp { host, port })
            }
            other => Err(DockerError::Endpoint(format!(
                "unsupported docker URI scheme '{}' (expected unix, tcp or http)",
                other
            ))),
        }
    }

    /// Value for the HTTP `Host` header.
    pub fn host_header(&self) -> String {
        match self {
            DockerEndpoint::Unix(_) => "docker".to_string(),
            DockerEndpoint::Tcp { host, port } => format!("{}:{}", host, port),
        }
    }
}

impl fmt::Display for DockerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DockerEndpoint::Unix(path) => write!(f, "unix://{}", path.display()),
            DockerEndpoint::Tcp { host, port } => write!(f, "tcp://{}:{}", host, port),
        }
    }
}
