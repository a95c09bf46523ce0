use anyhow::Context;
use clap::Parser;
use tracing::info;
use zaprun_core::AppConfig;

use cli::{Cli, Command};

mod cli;
mod commands;

/// Initialize tracing subscriber for logging
fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose > 0),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    info!("Starting zaprun v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load_with_env(cli.config.as_deref())
        .context("failed to load configuration")?;

    match cli.command {
        Command::Scan(args) => commands::scan(config, &args).await,
        Command::Upload { files } => commands::upload(&config, &files).await,
        Command::Config => commands::show_config(&config),
    }
}
