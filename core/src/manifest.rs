//! Manifest assembly and serialization.
//!
//! The manifest file is consumed by downstream archival tooling, so the field
//! names and their order are fixed:
//!
//! ```json
//! {
//!   "hostname": "build-01",
//!   "date": "2024-03-01T12:30:05-07:00",
//!   "images": [
//!     {
//!       "repo-tag": "discoenv/apps:qa",
//!       "image-id": "sha256:4f1c...",
//!       "git-ref": "9c3e2d1"
//!     }
//!   ]
//! }
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{ManifestError, Result};

/// Timestamp format of the `date` field: second precision with a numeric
/// UTC offset (`+00:00` for UTC).
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// One matched image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    #[serde(rename = "repo-tag")]
    pub repo_tag: String,
    #[serde(rename = "image-id")]
    pub image_id: String,
    #[serde(rename = "git-ref")]
    pub git_ref: String,
}

/// The persisted provenance manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Host that produced the manifest, empty if unknown
    pub hostname: String,
    /// Generation time, formatted with [`DATE_FORMAT`]
    pub date: String,
    /// Matched images in match order
    pub images: Vec<ImageInfo>,
}

impl Manifest {
    /// Wrap matched images with the hostname and the current local time.
    pub fn assemble(images: Vec<ImageInfo>, hostname: Option<String>) -> Self {
        Self::assemble_at(images, hostname, Local::now())
    }

    /// Wrap matched images with the hostname and an explicit timestamp.
    pub fn assemble_at<Tz>(
        images: Vec<ImageInfo>,
        hostname: Option<String>,
        generated_at: DateTime<Tz>,
    ) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Self {
            hostname: hostname.unwrap_or_default(),
            date: generated_at.format(DATE_FORMAT).to_string(),
            images,
        }
    }

    /// Render as two-space indented JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the manifest to `path`, creating or truncating the file.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;

        let output_error = |source| ManifestError::OutputError {
            path: path.to_path_buf(),
            source,
        };
        let mut file = File::create(path).map_err(output_error)?;
        file.write_all(json.as_bytes()).map_err(output_error)?;
        file.flush().map_err(output_error)?;

        tracing::info!(
            path = %path.display(),
            images = self.images.len(),
            "Wrote image manifest"
        );
        Ok(())
    }
}
