// qprofile/src/main.rs

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Setup Logging (Tracing)
    // RUST_LOG=debug qprofile check ... pour voir les détails
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "qprofile starting");

    match cli.command {
        Commands::List {
            project_dir,
            format,
        } => commands::list::execute(project_dir, format),
        Commands::Show {
            project_dir,
            language,
            name,
        } => commands::show::execute(project_dir, &language, &name),
        Commands::Check { project_dir } => commands::check::execute(project_dir),
    }
}
