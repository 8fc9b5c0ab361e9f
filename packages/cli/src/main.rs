mod cli;
mod commands;
mod config;
mod context;
mod prompt;
mod render;

use anyhow::Context as _;
use clap::Parser;
use tracing::Level;

use crate::cli::Cli;
use crate::context::Context;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = config::AppConfig::load().context("Failed to load config")?;
    let ctx = Context::new(config, cli.yes)?;

    commands::run(&ctx, cli.command).await
}
