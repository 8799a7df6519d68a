//! Collaborators the pipeline drives: the image runtime and the host identity.

use async_trait::async_trait;

use crate::error::Result;
use crate::inventory::LocalImage;

/// A container image runtime with a local image store.
#[async_trait]
pub trait ImageRuntime: Send + Sync {
    /// Pull `reference` into the local store.
    ///
    /// Returns only once the pull has finished. Progress output goes to the
    /// implementation's side channel and is not returned.
    async fn pull(&self, reference: &str) -> Result<()>;

    /// List every image in the local store, in the store's order.
    async fn list_images(&self) -> Result<Vec<LocalImage>>;
}

/// Source of the machine's hostname.
pub trait HostResolver: Send + Sync {
    /// The hostname, or `None` if it cannot be determined.
    fn hostname(&self) -> Option<String>;
}
