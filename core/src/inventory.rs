//! Local image inventory and matching against the requested repo tags.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::manifest::ImageInfo;

/// Label carrying the git ref an image was built from.
pub const GIT_REF_LABEL: &str = "org.cyverse.git-ref";

/// One image in the local image store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalImage {
    /// Image content identifier (e.g., "sha256:abc123...")
    pub id: String,
    /// Repo tags currently pointing at this image, in store order
    pub tags: Vec<String>,
    /// Image labels
    pub labels: HashMap<String, String>,
}

impl LocalImage {
    /// Create an image record with no labels.
    pub fn new(id: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            id: id.into(),
            tags,
            labels: HashMap::new(),
        }
    }

    /// Add a label.
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Value of the git ref label, or an empty string.
    pub fn git_ref(&self) -> &str {
        self.labels
            .get(GIT_REF_LABEL)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// Match the local inventory against the requested repo tags.
///
/// Walks images in inventory order, each image's tags in order, and the
/// requested list in order; every exact match emits one entry. Nothing is
/// merged: an image matching two requested tags yields two entries, and a
/// tag requested twice yields two entries.
pub fn match_images(inventory: &[LocalImage], requested: &[String]) -> Vec<ImageInfo> {
    let mut matched = Vec::new();

    for image in inventory {
        for tag in &image.tags {
            for wanted in requested {
                if tag == wanted {
                    matched.push(ImageInfo {
                        repo_tag: tag.clone(),
                        image_id: image.id.clone(),
                        git_ref: image.git_ref().to_string(),
                    });
                }
            }
        }
    }

    matched
}

/// Requested repo tags that no entry was produced for, in request order.
pub fn unmatched<'a>(requested: &'a [String], matched: &[ImageInfo]) -> Vec<&'a str> {
    requested
        .iter()
        .filter(|wanted| !matched.iter().any(|info| &info.repo_tag == *wanted))
        .map(String::as_str)
        .collect()
}
