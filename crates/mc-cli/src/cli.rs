//! CLI argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

/// MassChat CLI - administration tool for MassChat messaging accounts.
#[derive(Debug, Parser)]
#[command(name = "mc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// API base URL (overrides config and MC_API_BASE_URL).
    #[arg(short, long)]
    pub api_url: Option<String>,

    /// Prompt for the access token instead of reading MC_ACCESS_TOKEN.
    #[arg(long)]
    pub ask_token: bool,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Messaging account commands.
    #[command(subcommand)]
    Accounts(AccountCommand),

    /// Ask the backend whether the current token is valid.
    TokenStatus,

    /// Refetch accounts and token status together.
    Sync {
        /// Write the fetched accounts as JSON to this file.
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Sync the session from the identity provider and show it.
    Session,

    /// Wait for the identity provider to confirm a session.
    Login,

    /// Sign out and clear the local session.
    Logout,

    /// Configuration management.
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Account commands.
#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// List all accounts.
    List {
        /// Only show accounts of this provider.
        #[arg(long)]
        provider: Option<String>,
    },

    /// Get an account by ID.
    Get {
        /// Account ID.
        id: i64,
    },

    /// Create an account.
    Create {
        /// Display name.
        #[arg(long)]
        name: String,

        /// Messaging provider.
        #[arg(long)]
        provider: String,

        /// Phone number bound to the account.
        #[arg(long)]
        phone_number: Option<String>,

        /// Provider endpoint URL.
        #[arg(long)]
        endpoint: Option<String>,

        /// Greeting sent to new conversations.
        #[arg(long)]
        welcome_text: Option<String>,
    },
}

/// Config commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,

    /// Set a configuration value.
    Set {
        /// Configuration key.
        key: String,
        /// Configuration value.
        value: String,
    },

    /// Initialize configuration interactively.
    Init,
}
