//! HTTP client for the Docker Engine API.

use std::collections::HashMap;

use async_trait::async_trait;
use hyper::body::HttpBody;
use hyper::client::conn::SendRequest;
use hyper::header::{HOST, USER_AGENT as USER_AGENT_HEADER};
use hyper::{Body, Method, Request, Response, StatusCode};
use imgprov_core::error::{ManifestError, Result};
use imgprov_core::{ImageRuntime, LocalImage};
use serde::Deserialize;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use url::form_urlencoded;

use super::endpoint::DockerEndpoint;
use super::progress::ProgressScanner;
use super::reference::ImageReference;
use super::{DockerError, API_VERSION, USER_AGENT};

/// Entry of `GET /images/json`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ImageSummary {
    id: String,
    #[serde(default)]
    repo_tags: Option<Vec<String>>,
    #[serde(default)]
    labels: Option<HashMap<String, String>>,
}

impl From<ImageSummary> for LocalImage {
    fn from(summary: ImageSummary) -> Self {
        LocalImage {
            id: summary.id,
            tags: summary.repo_tags.unwrap_or_default(),
            labels: summary.labels.unwrap_or_default(),
        }
    }
}

/// Error body returned with non-success statuses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Docker Engine API client.
///
/// Opens one connection per request; nothing is shared between calls.
pub struct DockerClient {
    endpoint: DockerEndpoint,
}

impl DockerClient {
    /// Create a client for the given endpoint.
    pub fn new(endpoint: DockerEndpoint) -> Self {
        Self { endpoint }
    }

    /// Create a client from a docker URI (e.g., "unix:///var/run/docker.sock").
    pub fn from_uri(uri: &str) -> Result<Self> {
        let endpoint =
            DockerEndpoint::parse(uri).map_err(|e| ManifestError::ConfigError(e.to_string()))?;
        Ok(Self::new(endpoint))
    }

    /// The endpoint this client talks to.
    pub fn endpoint(&self) -> &DockerEndpoint {
        &self.endpoint
    }

    /// Pull an image, copying the engine's progress stream to stderr.
    pub async fn pull_image(&self, reference: &str) -> std::result::Result<usize, DockerError> {
        let parsed = ImageReference::parse(reference)?;
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("fromImage", &parsed.name)
            .append_pair("tag", parsed.api_tag())
            .finish();

        let response = self
            .send(Method::POST, &format!("/{}/images/create?{}", API_VERSION, query))
            .await?;
        let mut body = check_status(response).await?;

        let mut stderr = tokio::io::stderr();
        let mut scanner = ProgressScanner::default();
        while let Some(chunk) = body.data().await {
            let chunk = chunk?;
            stderr.write_all(&chunk).await.map_err(DockerError::Progress)?;
            scanner.feed(&chunk)?;
        }
        stderr.flush().await.map_err(DockerError::Progress)?;

        scanner.finish()
    }

    /// List all local images, including intermediate ones.
    pub async fn images(&self) -> std::result::Result<Vec<LocalImage>, DockerError> {
        let response = self
            .send(Method::GET, &format!("/{}/images/json?all=1", API_VERSION))
            .await?;
        let body = check_status(response).await?;
        let bytes = hyper::body::to_bytes(body).await?;

        let summaries: Vec<ImageSummary> = serde_json::from_slice(&bytes)?;
        Ok(summaries.into_iter().map(LocalImage::from).collect())
    }

    /// Send a body-less request and return the response head.
    async fn send(
        &self,
        method: Method,
        path_and_query: &str,
    ) -> std::result::Result<Response<Body>, DockerError> {
        let mut sender = self.connect().await?;

        let request = Request::builder()
            .method(method)
            .uri(path_and_query)
            .header(HOST, self.endpoint.host_header())
            .header(USER_AGENT_HEADER, USER_AGENT)
            .body(Body::empty())?;

        tracing::debug!(
            endpoint = %self.endpoint,
            method = %request.method(),
            uri = %request.uri(),
            "Docker API request"
        );
        Ok(sender.send_request(request).await?)
    }

    async fn connect(&self) -> std::result::Result<SendRequest<Body>, DockerError> {
        let connect_error = |source| DockerError::Connect {
            endpoint: self.endpoint.to_string(),
            source,
        };

        match &self.endpoint {
            #[cfg(unix)]
            DockerEndpoint::Unix(path) => {
                let stream = tokio::net::UnixStream::connect(path)
                    .await
                    .map_err(connect_error)?;
                handshake(stream).await
            }
            #[cfg(not(unix))]
            DockerEndpoint::Unix(_) => Err(connect_error(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "unix sockets are not supported on this platform",
            ))),
            DockerEndpoint::Tcp { host, port } => {
                let stream = TcpStream::connect((host.as_str(), *port))
                    .await
                    .map_err(connect_error)?;
                handshake(stream).await
            }
        }
    }
}

/// Run the HTTP/1 handshake and drive the connection in the background.
async fn handshake<T>(io: T) -> std::result::Result<SendRequest<Body>, DockerError>
where
    T: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (sender, connection) = hyper::client::conn::handshake(io).await?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::debug!(error = %e, "Docker connection closed with error");
        }
    });
    Ok(sender)
}

/// Pass through success responses, turn anything else into [`DockerError::Api`].
async fn check_status(response: Response<Body>) -> std::result::Result<Body, DockerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.into_body());
    }

    let bytes = hyper::body::to_bytes(response.into_body()).await?;
    Err(DockerError::Api {
        status: status.as_u16(),
        message: api_error_message(status, &bytes),
    })
}

fn api_error_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(parsed) = serde_json::from_slice::<ApiErrorBody>(body) {
        return parsed.message;
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        text
    }
}

#[async_trait]
impl ImageRuntime for DockerClient {
    async fn pull(&self, reference: &str) -> Result<()> {
        let messages = self
            .pull_image(reference)
            .await
            .map_err(|e| ManifestError::AcquisitionError {
                reference: reference.to_string(),
                message: e.to_string(),
            })?;
        tracing::debug!(reference = %reference, messages, "Pull finished");
        Ok(())
    }

    async fn list_images(&self) -> Result<Vec<LocalImage>> {
        self.images()
            .await
            .map_err(|e| ManifestError::EnumerationError(e.to_string()))
    }
}
