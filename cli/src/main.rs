//! imgprov CLI entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use imgprov_cli::{execute, Cli};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing; stdout is left alone
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = execute(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
