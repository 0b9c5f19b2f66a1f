//! Changeset CLI binary.

use anyhow::Result;
use changeset::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the changeset CLI.
///
/// Uses tokio's current_thread runtime; the only I/O is reading the
/// change-set and config files.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Can be controlled via RUST_LOG environment variable
    // Example: RUST_LOG=changeset=debug,changeset_graph=trace cargo run -- order plan.yaml
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("changeset=info,changeset_graph=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting changeset CLI");

    let cli = Cli::parse_args();
    cli.execute().await?;

    tracing::debug!("Changeset CLI completed successfully");
    Ok(())
}
