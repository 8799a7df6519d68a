//! Manifest generation pipeline.
//!
//! ```text
//! repo tags ─▶ parse ─▶ pull each (in order) ─▶ list local images
//!                                                     │
//!            write ◀─ assemble (hostname, date) ◀─ match
//! ```
//!
//! Every stage is fail-fast. The manifest file is written last, so an error
//! anywhere earlier leaves no file behind.

use crate::config::ManifestConfig;
use crate::error::{ManifestError, Result};
use crate::inventory::{match_images, unmatched};
use crate::manifest::Manifest;
use crate::runtime::{HostResolver, ImageRuntime};
use crate::tags::parse_repo_tags;

/// Run the whole pipeline and write the manifest to `config.output`.
pub async fn run(
    config: &ManifestConfig,
    runtime: &dyn ImageRuntime,
    host: &dyn HostResolver,
) -> Result<Manifest> {
    config.validate()?;

    let requested = parse_repo_tags(&config.repo_tags)?;
    if requested.is_empty() {
        return Err(ManifestError::ConfigError(
            "--repo-tags does not name any images".to_string(),
        ));
    }

    let manifest = build_manifest(&requested, runtime, host).await?;
    manifest.write_to(&config.output)?;
    Ok(manifest)
}

/// Pull, list, match and assemble, without writing anything.
pub async fn build_manifest(
    requested: &[String],
    runtime: &dyn ImageRuntime,
    host: &dyn HostResolver,
) -> Result<Manifest> {
    acquire(runtime, requested).await?;

    let inventory = runtime.list_images().await?;
    tracing::debug!(count = inventory.len(), "Listed local images");

    let images = match_images(&inventory, requested);
    for reference in unmatched(requested, &images) {
        tracing::warn!(reference = %reference, "Requested image not found in local images");
    }

    Ok(Manifest::assemble(images, host.hostname()))
}

/// Pull every requested reference in order, stopping at the first failure.
pub async fn acquire(runtime: &dyn ImageRuntime, requested: &[String]) -> Result<()> {
    for reference in requested {
        tracing::info!(reference = %reference, "Pulling image");
        runtime.pull(reference).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{LocalImage, GIT_REF_LABEL};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeRuntime {
        images: Vec<LocalImage>,
        fail_on: Option<String>,
        fail_listing: bool,
        calls: Mutex<Vec<String>>,
    }

    impl FakeRuntime {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ImageRuntime for FakeRuntime {
        async fn pull(&self, reference: &str) -> Result<()> {
            self.calls.lock().unwrap().push(format!("pull {reference}"));
            if self.fail_on.as_deref() == Some(reference) {
                return Err(ManifestError::AcquisitionError {
                    reference: reference.to_string(),
                    message: "pull access denied".to_string(),
                });
            }
            Ok(())
        }

        async fn list_images(&self) -> Result<Vec<LocalImage>> {
            self.calls.lock().unwrap().push("list".to_string());
            if self.fail_listing {
                return Err(ManifestError::EnumerationError("daemon unavailable".to_string()));
            }
            Ok(self.images.clone())
        }
    }

    struct FixedHost(Option<&'static str>);

    impl HostResolver for FixedHost {
        fn hostname(&self) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    fn requested(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_acquire_pulls_in_order() {
        let runtime = FakeRuntime::default();
        acquire(&runtime, &requested(&["b:1", "a:1", "b:1"])).await.unwrap();
        assert_eq!(runtime.calls(), vec!["pull b:1", "pull a:1", "pull b:1"]);
    }

    #[tokio::test]
    async fn test_acquire_stops_at_first_failure() {
        let runtime = FakeRuntime {
            fail_on: Some("b:1".to_string()),
            ..Default::default()
        };
        let err = acquire(&runtime, &requested(&["a:1", "b:1", "c:1"])).await.unwrap_err();
        assert!(matches!(err, ManifestError::AcquisitionError { ref reference, .. } if reference == "b:1"));
        assert_eq!(runtime.calls(), vec!["pull a:1", "pull b:1"]);
    }

    #[tokio::test]
    async fn test_build_manifest_lists_after_pulls() {
        let runtime = FakeRuntime {
            images: vec![
                LocalImage::new("sha1", requested(&["repo/x:v1", "repo/x:v2"])),
                LocalImage::new("sha2", requested(&["repo/y:v1"])).with_label(GIT_REF_LABEL, "abcd"),
            ],
            ..Default::default()
        };
        let manifest = build_manifest(
            &requested(&["repo/x:v1", "repo/y:v1"]),
            &runtime,
            &FixedHost(Some("build-01")),
        )
        .await
        .unwrap();

        assert_eq!(runtime.calls(), vec!["pull repo/x:v1", "pull repo/y:v1", "list"]);
        assert_eq!(manifest.hostname, "build-01");
        assert_eq!(manifest.images.len(), 2);
        assert_eq!(manifest.images[0].image_id, "sha1");
        assert_eq!(manifest.images[0].git_ref, "");
        assert_eq!(manifest.images[1].image_id, "sha2");
        assert_eq!(manifest.images[1].git_ref, "abcd");
    }

    #[tokio::test]
    async fn test_build_manifest_unknown_hostname() {
        let runtime = FakeRuntime::default();
        let manifest = build_manifest(&requested(&["a:1"]), &runtime, &FixedHost(None))
            .await
            .unwrap();
        assert_eq!(manifest.hostname, "");
        assert!(manifest.images.is_empty());
    }

    #[tokio::test]
    async fn test_build_manifest_listing_failure() {
        let runtime = FakeRuntime {
            fail_listing: true,
            ..Default::default()
        };
        let err = build_manifest(&requested(&["a:1"]), &runtime, &FixedHost(None))
            .await
            .unwrap_err();
        assert!(matches!(err, ManifestError::EnumerationError(_)));
    }

    #[tokio::test]
    async fn test_run_rejects_empty_reference_list() {
        let runtime = FakeRuntime::default();
        let config = ManifestConfig {
            repo_tags: ",,\n,,".to_string(),
            output: std::path::PathBuf::from("unused.json"),
            ..Default::default()
        };
        let err = run(&config, &runtime, &FixedHost(None)).await.unwrap_err();
        assert!(matches!(err, ManifestError::ConfigError(_)));
        assert!(runtime.calls().is_empty());
    }

    #[tokio::test]
    async fn test_run_rejects_malformed_record_before_pulling() {
        let runtime = FakeRuntime::default();
        let config = ManifestConfig {
            repo_tags: "a:1,\"b:1".to_string(),
            output: std::path::PathBuf::from("unused.json"),
            ..Default::default()
        };
        let err = run(&config, &runtime, &FixedHost(None)).await.unwrap_err();
        assert!(matches!(err, ManifestError::ParseError { .. }));
        assert!(runtime.calls().is_empty());
    }
}
