//! # MassChat CLI
//!
//! Command-line administration for MassChat messaging accounts.

#![forbid(unsafe_code)]
#![deny(warnings)]

use clap::Parser;
use mc_cli::{
    cli::{Cli, Command},
    commands::{run_accounts, run_config, run_login, run_logout, run_session, run_sync, run_token_status},
    context::prompt_token,
    output::error,
    AppContext, CliResult,
};
use mc_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(cli).await {
        error(&e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let format = cli.output;
    let ctx = || load_context(cli.api_url.as_deref(), cli.ask_token);

    match cli.command {
        Command::Config(cmd) => run_config(cmd, &Config::config_path()?),
        Command::Accounts(cmd) => run_accounts(cmd, &ctx()?, format).await,
        Command::TokenStatus => run_token_status(&ctx()?, format).await,
        Command::Sync { export } => run_sync(&ctx()?, export.as_deref(), format).await,
        Command::Session => run_session(&ctx()?, format).await,
        Command::Login => run_login(&ctx()?, format).await,
        Command::Logout => run_logout(&ctx()?, format).await,
    }
}

/// Loads configuration with environment overrides applied and builds the
/// command context.
fn load_context(api_url: Option<&str>, ask_token: bool) -> CliResult<AppContext> {
    let mut config = Config::load()?;
    if let Some(url) = api_url {
        config.api_base_url = url.to_string();
    }
    if ask_token {
        prompt_token(&mut config)?;
    }
    AppContext::new(config)
}
