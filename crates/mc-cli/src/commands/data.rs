//! Token status and data refresh commands.

use std::path::Path;

use mc_client::{DataSnapshot, MassChatAccount};

use crate::context::AppContext;
use crate::output::{info, output_single, render_yaml, success, OutputFormat};

/// Shows the backend's view of the current token.
pub async fn run_token_status(ctx: &AppContext, format: OutputFormat) -> crate::CliResult<()> {
    let status = ctx.call(|c| c.check_token_status()).await?;
    output_single(&status, format)
}

/// Refetches accounts and token status, optionally exporting the accounts.
pub async fn run_sync(
    ctx: &AppContext,
    export: Option<&Path>,
    format: OutputFormat,
) -> crate::CliResult<()> {
    let snapshot = ctx.call(|c| c.refresh()).await?;

    match format {
        OutputFormat::Table => print_summary(&snapshot),
        OutputFormat::Quiet => {}
        other => output_single(&snapshot, other)?,
    }

    if let Some(path) = export {
        export_accounts(&snapshot.accounts, path)?;
        if format != OutputFormat::Quiet {
            success(&format!(
                "Exported {} accounts to {}",
                snapshot.accounts.len(),
                path.display()
            ));
        }
    }
    Ok(())
}

fn print_summary(snapshot: &DataSnapshot) {
    success(&format!(
        "Data refreshed at {}",
        snapshot.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    println!();
    println!("Accounts: {}", snapshot.accounts.len());
    if snapshot.token_status.0.is_null() {
        info("Token status: no details returned");
    } else {
        println!("Token status:");
        print!("{}", render_yaml(&snapshot.token_status.0, 1));
    }
}

/// Writes accounts as pretty-printed JSON.
pub fn export_accounts(accounts: &[MassChatAccount], path: &Path) -> crate::CliResult<()> {
    let json = serde_json::to_string_pretty(accounts)?;
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), count = accounts.len(), "accounts exported");
    Ok(())
}
