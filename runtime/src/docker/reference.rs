//! Image reference splitting for the Docker pull API.
//!
//! `POST /images/create` takes the image name and the tag as separate query
//! parameters, so `registry.example.org:5000/app:v1` has to become
//! `fromImage=registry.example.org:5000/app` and `tag=v1`.

use super::DockerError;

/// Default tag when none is specified.
const DEFAULT_TAG: &str = "latest";

/// Parsed image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// Image name including any registry host (e.g., "discoenv/apps")
    pub name: String,
    /// Tag (e.g., "qa", "v1.2.0")
    pub tag: Option<String>,
    /// Digest (e.g., "sha256:abc123...")
    pub digest: Option<String>,
}

impl ImageReference {
    /// Parse an image reference string.
    ///
    /// Supports formats:
    /// - `alpine` → alpine, no tag
    /// - `alpine:3.19` → alpine, tag 3.19
    /// - `localhost:5000/app` → localhost:5000/app, no tag
    /// - `harbor.cyverse.org/de/apps:qa` → harbor.cyverse.org/de/apps, tag qa
    /// - `alpine@sha256:abc...` → alpine, digest sha256:abc...
    pub fn parse(reference: &str) -> Result<Self, DockerError> {
        if reference.trim().is_empty() {
            return Err(DockerError::Reference("empty image reference".to_string()));
        }
        // The reference is matched verbatim against local tags later, so it
        // cannot be cleaned up here.
        if reference.trim() != reference {
            return Err(DockerError::Reference(format!(
                "image reference '{}' has surrounding whitespace",
                reference
            )));
        }

        // Split off digest first (@ separator)
        let (name_tag, digest) = match reference.rfind('@') {
            Some(at_pos) => {
                let digest_part = &reference[at_pos + 1..];
                if !digest_part.contains(':') {
                    return Err(DockerError::Reference(format!(
                        "invalid digest in reference '{}': expected algorithm:hex",
                        reference
                    )));
                }
                (&reference[..at_pos], Some(digest_part.to_string()))
            }
            None => (reference, None),
        };

        // A tag colon can only appear after the last slash; anything before
        // that is a registry port.
        let tag_start = name_tag.rfind('/').map(|pos| pos + 1).unwrap_or(0);
        let (name, tag) = match name_tag[tag_start..].rfind(':') {
            Some(colon_pos) => {
                let colon_pos = tag_start + colon_pos;
                (
                    &name_tag[..colon_pos],
                    Some(name_tag[colon_pos + 1..].to_string()),
                )
            }
            None => (name_tag, None),
        };

        if name.is_empty() {
            return Err(DockerError::Reference(format!(
                "empty image name in reference '{}'",
                reference
            )));
        }
        if tag.as_deref() == Some("") {
            return Err(DockerError::Reference(format!(
                "empty tag in reference '{}'",
                reference
            )));
        }

        Ok(ImageReference {
            name: name.to_string(),
            tag,
            digest,
        })
    }

    /// Value for the `tag` query parameter: the digest if present, then the
    /// tag, then `latest`.
    pub fn api_tag(&self) -> &str {
        self.digest
            .as_deref()
            .or(self.tag.as_deref())
            .unwrap_or(DEFAULT_TAG)
    }
}
