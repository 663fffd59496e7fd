//! Session commands.

use chrono::{DateTime, Utc};
use mc_auth::{NoticeLevel, SsoCallback};
use mc_session::SessionUser;
use serde::Serialize;

use crate::context::AppContext;
use crate::error::CliError;
use crate::output::{self, info, output_single, success, OutputFormat};

/// Session representation for display. Never carries the token.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    /// Identity provider user id.
    pub account_no: String,
    /// Primary email.
    pub email: String,
    /// Badge initials.
    pub initials: String,
    /// Granted roles.
    pub roles: Vec<String>,
    /// Claims expiry.
    pub expires_at: DateTime<Utc>,
    /// Whether the claims are past their expiry.
    pub expired: bool,
}

impl From<SessionUser> for SessionView {
    fn from(user: SessionUser) -> Self {
        Self {
            initials: user.initials(),
            expired: user.is_expired(),
            roles: user.roles.into_iter().collect(),
            account_no: user.account_no,
            email: user.email,
            expires_at: user.expires_at,
        }
    }
}

/// Syncs the session from the identity provider and shows it.
pub async fn run_session(ctx: &AppContext, format: OutputFormat) -> crate::CliResult<()> {
    ctx.authenticate().await?;
    show_session(ctx, format)
}

fn show_session(ctx: &AppContext, format: OutputFormat) -> crate::CliResult<()> {
    let user = ctx
        .store()
        .user()
        .ok_or_else(|| CliError::Auth("no session".to_string()))?;
    let view = SessionView::from(user);

    match format {
        OutputFormat::Quiet => println!("{}", view.account_no),
        OutputFormat::Table => {
            success(&format!("Signed in as {} [{}]", display_email(&view.email), view.initials));
            println!();
            println!("Account: {}", view.account_no);
            println!("Roles:   {}", view.roles.join(", "));
            let expires = view.expires_at.format("%Y-%m-%d %H:%M:%S UTC");
            if view.expired {
                println!("Expires: {expires} (expired)");
            } else {
                println!("Expires: {expires}");
            }
        }
        other => output_single(&view, other)?,
    }
    Ok(())
}

fn display_email(email: &str) -> &str {
    if email.is_empty() {
        "(no email)"
    } else {
        email
    }
}

/// Waits for the identity provider to confirm a session, then syncs it.
///
/// Uses the SSO callback timers from configuration: sign-in is checked
/// once the provider has loaded and the confirm delay passed, and the wait
/// gives up after the timeout.
pub async fn run_login(ctx: &AppContext, format: OutputFormat) -> crate::CliResult<()> {
    if format != OutputFormat::Quiet {
        info("Waiting for the identity provider to confirm your session...");
    }

    let callback = SsoCallback::new(ctx.effects().clone(), ctx.effects().clone())
        .with_config(&ctx.config().sso);
    let handle = callback.mount(ctx.provider().subscribe());
    let state = handle.outcome().await;
    handle.unmount();

    for notice in ctx.effects().drain_notices() {
        if format != OutputFormat::Quiet || notice.level == NoticeLevel::Error {
            output::notice(&notice);
        }
    }
    if let Some(route) = ctx.effects().last_route() {
        tracing::debug!(route = %route, "SSO callback navigated");
    }

    state.into_result()?;
    ctx.authenticate().await?;
    if format != OutputFormat::Quiet {
        println!();
    }
    show_session(ctx, format)
}

/// Signs out of the identity provider and clears the local session.
pub async fn run_logout(ctx: &AppContext, format: OutputFormat) -> crate::CliResult<()> {
    ctx.sync_session().await;
    let result = ctx.flows().sign_out().await;

    if format != OutputFormat::Quiet {
        if let Some(route) = ctx.effects().last_route() {
            info(&format!("Signed out, next stop {route}"));
        }
    }
    result?;
    if format != OutputFormat::Quiet {
        success("Session cleared");
    }
    Ok(())
}
