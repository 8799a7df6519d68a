use std::path::PathBuf;

use crate::error::{ManifestError, Result};

/// Default Docker Engine endpoint.
pub const DEFAULT_DOCKER_URI: &str = "unix:///var/run/docker.sock";

/// Manifest generation configuration
#[derive(Debug, Clone)]
pub struct ManifestConfig {
    /// Docker Engine endpoint (unix://, tcp:// or http://)
    pub docker_uri: String,

    /// Comma-separated record of requested repo tags
    pub repo_tags: String,

    /// Destination of the manifest file
    pub output: PathBuf,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            docker_uri: DEFAULT_DOCKER_URI.to_string(),
            repo_tags: String::new(),
            output: PathBuf::new(),
        }
    }
}

impl ManifestConfig {
    /// Check that every required setting is present.
    pub fn validate(&self) -> Result<()> {
        if self.repo_tags.is_empty() {
            return Err(ManifestError::ConfigError(
                "--repo-tags must be set".to_string(),
            ));
        }
        if self.output.as_os_str().is_empty() {
            return Err(ManifestError::ConfigError(
                "--output must be set".to_string(),
            ));
        }
        if self.docker_uri.trim().is_empty() {
            return Err(ManifestError::ConfigError(
                "--docker-uri must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ManifestConfig {
        ManifestConfig {
            repo_tags: "discoenv/apps:qa".to_string(),
            output: PathBuf::from("manifest.json"),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_docker_uri() {
        let config = ManifestConfig::default();
        assert_eq!(config.docker_uri, "unix:///var/run/docker.sock");
    }

    #[test]
    fn test_validate_ok() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_missing_repo_tags() {
        let config = ManifestConfig {
            repo_tags: String::new(),
            ..valid_config()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ManifestError::ConfigError(ref m) if m.contains("--repo-tags")));
    }

    #[test]
    fn test_validate_blank_repo_tags_is_set() {
        let config = ManifestConfig {
            repo_tags: "  ".to_string(),
            ..valid_config()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_missing_output() {
        let config = ManifestConfig {
            output: PathBuf::new(),
            ..valid_config()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ManifestError::ConfigError(ref m) if m.contains("--output")));
    }

    #[test]
    fn test_validate_blank_docker_uri() {
        let config = ManifestConfig {
            docker_uri: "  ".to_string(),
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }
}
