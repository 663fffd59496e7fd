//! Account management commands.

use chrono::{DateTime, NaiveDateTime};
use mc_client::{MassChatAccount, NewAccount};
use serde::Serialize;
use tabled::Tabled;

use crate::cli::AccountCommand;
use crate::context::AppContext;
use crate::output::{output, output_single, success, OutputFormat};

const MISSING: &str = "N/A";

/// Account representation for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct AccountRow {
    /// Account ID.
    #[tabled(rename = "ID")]
    pub id: String,
    /// Display name.
    #[tabled(rename = "Name")]
    pub name: String,
    /// Messaging provider.
    #[tabled(rename = "Provider")]
    pub provider: String,
    /// Phone number.
    #[tabled(rename = "Phone Number")]
    pub phone_number: String,
    /// Provider endpoint.
    #[tabled(rename = "Endpoint")]
    pub endpoint: String,
    /// Creation date.
    #[tabled(rename = "Created")]
    pub created: String,
}

impl From<&MassChatAccount> for AccountRow {
    fn from(account: &MassChatAccount) -> Self {
        Self {
            id: account.id.map_or_else(|| MISSING.to_string(), |id| id.to_string()),
            name: or_missing(account.name.as_deref()),
            provider: or_missing(account.provider.as_deref()),
            phone_number: or_missing(account.phone_number.as_deref()),
            endpoint: account
                .endpoint
                .as_deref()
                .map_or_else(|| MISSING.to_string(), |e| truncate(e, 40)),
            created: account
                .create_date
                .as_deref()
                .map_or_else(|| MISSING.to_string(), format_date),
        }
    }
}

fn or_missing(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or(MISSING)
        .to_string()
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let head: String = value.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

/// Formats a backend timestamp as `Jan 5, 2024`; unparseable values are
/// shown unchanged.
fn format_date(raw: &str) -> String {
    const DISPLAY: &str = "%b %-d, %Y";
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(DISPLAY).to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format(DISPLAY).to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return dt.format(DISPLAY).to_string();
    }
    raw.to_string()
}

/// Runs an account command.
pub async fn run_accounts(
    cmd: AccountCommand,
    ctx: &AppContext,
    format: OutputFormat,
) -> crate::CliResult<()> {
    match cmd {
        AccountCommand::List { provider } => list_accounts(ctx, provider.as_deref(), format).await,
        AccountCommand::Get { id } => get_account(ctx, id, format).await,
        AccountCommand::Create {
            name,
            provider,
            phone_number,
            endpoint,
            welcome_text,
        } => {
            let mut account = NewAccount::new(name, provider);
            if let Some(phone_number) = phone_number {
                account = account.with_phone_number(phone_number);
            }
            if let Some(endpoint) = endpoint {
                account = account.with_endpoint(endpoint);
            }
            if let Some(welcome_text) = welcome_text {
                account = account.with_welcome_text(welcome_text);
            }
            create_account(ctx, &account, format).await
        }
    }
}

/// Lists accounts, optionally filtered by provider.
async fn list_accounts(
    ctx: &AppContext,
    provider: Option<&str>,
    format: OutputFormat,
) -> crate::CliResult<()> {
    let accounts = ctx.call(|c| async move { c.accounts().list().await }).await?;
    let accounts = filter_by_provider(accounts, provider);

    let rows: Vec<AccountRow> = accounts.iter().map(AccountRow::from).collect();
    let ids = accounts.iter().filter_map(|a| a.id).map(|id| id.to_string());
    output(&rows, ids, format)
}

fn filter_by_provider(accounts: Vec<MassChatAccount>, provider: Option<&str>) -> Vec<MassChatAccount> {
    match provider {
        Some(wanted) => accounts
            .into_iter()
            .filter(|a| {
                a.provider
                    .as_deref()
                    .is_some_and(|p| p.eq_ignore_ascii_case(wanted))
            })
            .collect(),
        None => accounts,
    }
}

/// Gets an account by ID.
async fn get_account(ctx: &AppContext, id: i64, format: OutputFormat) -> crate::CliResult<()> {
    let account = ctx.call(|c| async move { c.accounts().get(id).await }).await?;
    output_single(&account, format)
}

/// Creates an account.
async fn create_account(
    ctx: &AppContext,
    account: &NewAccount,
    format: OutputFormat,
) -> crate::CliResult<()> {
    account.validate()?;
    let created = ctx
        .call(|c| async move { c.accounts().create(account).await })
        .await?;

    match format {
        OutputFormat::Quiet => {
            if let Some(id) = created.id {
                println!("{id}");
            }
        }
        OutputFormat::Table => {
            let id = created.id.map_or_else(|| MISSING.to_string(), |id| id.to_string());
            success(&format!("Account '{}' created with ID: {}", account.name, id));
        }
        other => output_single(&created, other)?,
    }
    Ok(())
}
