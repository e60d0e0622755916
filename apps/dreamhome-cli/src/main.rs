//! Dream Home command line entry point.

mod adapter;
mod cli;
mod commands;
mod config;
mod progress;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::commands::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries command output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut cli_config = match config::CliConfig::load() {
        Ok(c) => {
            tracing::debug!(api = %c.api_base_url, "configuration loaded");
            c
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to load config, using defaults");
            config::CliConfig::default()
        }
    };
    if let Some(url) = cli.api_url {
        cli_config.api_base_url = url;
    }

    let ctx = Context::new(cli_config)?;

    match cli.command {
        Command::Signup {
            username,
            email,
            password,
        } => commands::sign_up(&ctx, username, email, password).await,
        Command::Signin(credentials) => commands::show_account(&ctx, &credentials).await,
        Command::CreateListing(args) => commands::create_listing(&ctx, args).await,
        Command::Avatar { credentials, image } => {
            commands::avatar(&ctx, &credentials, &image).await
        }
        Command::Config => commands::show_config(&ctx.config),
    }
}
