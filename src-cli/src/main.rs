//! docfill command-line entry point

mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Command};

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    tracing::debug!("Starting docfill {}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Fill(args) => commands::fill(args).await,
        Command::Extract(args) => commands::extract(args),
        Command::Sanitize(args) => commands::sanitize(args),
        Command::Columns(args) => commands::columns(args),
        Command::Init(args) => commands::init(args),
    }
}
