//! imgprov CLI - build an image provenance manifest.
//!
//! ```text
//! imgprov --repo-tags discoenv/apps:qa,discoenv/analyses:qa --output manifest.json
//! ```

use std::path::PathBuf;

use clap::Parser;
use imgprov_core::{pipeline, ManifestConfig, DEFAULT_DOCKER_URI};
use imgprov_runtime::{DockerClient, SystemHost};

/// Pull the requested images and record which local image each repo tag
/// resolves to.
#[derive(Parser, Debug)]
#[command(name = "imgprov", version, about)]
pub struct Cli {
    /// The docker URI
    #[arg(long = "docker-uri", default_value = DEFAULT_DOCKER_URI)]
    pub docker_uri: String,

    /// A CSV record of the docker repo tags to generate a manifest from
    #[arg(long = "repo-tags")]
    pub repo_tags: String,

    /// The file to write the JSON manifest to
    #[arg(long)]
    pub output: PathBuf,
}

impl Cli {
    /// Convert the parsed flags into the pipeline configuration.
    pub fn into_config(self) -> ManifestConfig {
        ManifestConfig {
            docker_uri: self.docker_uri,
            repo_tags: self.repo_tags,
            output: self.output,
        }
    }
}

/// Run the manifest pipeline for the parsed command line.
pub async fn execute(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = cli.into_config();
    config.validate()?;

    let docker = DockerClient::from_uri(&config.docker_uri)?;
    tracing::debug!(endpoint = %docker.endpoint(), "Using docker endpoint");

    let manifest = pipeline::run(&config, &docker, &SystemHost).await?;
    tracing::info!(
        output = %config.output.display(),
        images = manifest.images.len(),
        "Manifest complete"
    );
    Ok(())
}
