//! Configuration management commands.

use std::io::{BufRead, Write};
use std::path::Path;

use mc_core::{AuthConfig, Config};

use crate::cli::ConfigCommand;
use crate::output::{info, success};
use crate::CliError;

/// Runs a config command against the configuration file at `path`.
///
/// Only the file is read and written. Environment overrides apply to the
/// other commands and never end up in the saved file.
pub fn run_config(cmd: ConfigCommand, path: &Path) -> crate::CliResult<()> {
    let mut config = Config::load_from(path)?;
    match cmd {
        ConfigCommand::Show => {
            info(&format!("Configuration file: {}", path.display()));
            println!();
            print!("{}", render_config(&config));
            Ok(())
        }
        ConfigCommand::Set { key, value } => {
            set_value(&mut config, &key, &value)?;
            save(&config, path)?;
            success(&format!("Set {key} = {value}"));
            Ok(())
        }
        ConfigCommand::Init => {
            info("Initializing MassChat CLI configuration...");
            println!();
            let stdin = std::io::stdin();
            init_config(&mut config, &mut stdin.lock(), &mut std::io::stdout())?;
            save(&config, path)?;
            println!();
            success(&format!("Configuration saved to: {}", path.display()));
            Ok(())
        }
    }
}

fn save(config: &Config, path: &Path) -> crate::CliResult<()> {
    config.validate()?;
    config.save_to(path)?;
    Ok(())
}

/// Renders the configuration for display. The access token is never shown.
pub fn render_config(config: &Config) -> String {
    let mut out = String::new();
    out.push_str(&format!("api_base_url: {}\n", config.api_base_url));
    out.push_str(&format!("app_origin: {}\n", config.app_origin));
    out.push_str(&format!("request_timeout_secs: {}\n", config.request_timeout_secs));
    out.push_str(&format!("session.token_lifetime_secs: {}\n", config.session.token_lifetime_secs));
    out.push_str(&format!("sso.confirm_delay_ms: {}\n", config.sso.confirm_delay_ms));
    out.push_str(&format!("sso.timeout_ms: {}\n", config.sso.timeout_ms));

    match &config.auth {
        Some(auth) => {
            out.push_str(&format!("auth.user_id: {}\n", auth.user_id));
            if let Some(email) = &auth.email {
                out.push_str(&format!("auth.email: {email}\n"));
            }
            let token = if auth.access_token.is_some() { "set" } else { "not set" };
            out.push_str(&format!("auth.access_token: {token}\n"));
        }
        None => out.push_str("auth: not configured\n"),
    }
    out
}

/// Sets a configuration value by key.
pub fn set_value(config: &mut Config, key: &str, value: &str) -> crate::CliResult<()> {
    match key {
        "api_base_url" | "api_url" => config.api_base_url = value.to_string(),
        "app_origin" | "origin" => config.app_origin = value.to_string(),
        "request_timeout_secs" => config.request_timeout_secs = parse_number(key, value)?,
        "session.token_lifetime_secs" | "token_lifetime_secs" => {
            config.session.token_lifetime_secs = parse_number(key, value)?;
        }
        "sso.confirm_delay_ms" => config.sso.confirm_delay_ms = parse_number(key, value)?,
        "sso.timeout_ms" => config.sso.timeout_ms = parse_number(key, value)?,
        "auth.user_id" | "user_id" => {
            if value.is_empty() || value == "none" {
                config.auth = None;
            } else {
                auth_mut(config).user_id = value.to_string();
            }
        }
        "auth.email" | "email" => {
            let email = (!value.is_empty() && value != "none").then(|| value.to_string());
            auth_mut(config).email = email;
        }
        _ => {
            return Err(CliError::InvalidArgument(format!(
                "Unknown configuration key: {key}. Known keys: api_base_url, app_origin, \
                 request_timeout_secs, session.token_lifetime_secs, sso.confirm_delay_ms, \
                 sso.timeout_ms, auth.user_id, auth.email"
            )));
        }
    }
    Ok(())
}

fn auth_mut(config: &mut Config) -> &mut AuthConfig {
    config.auth.get_or_insert_with(|| AuthConfig {
        user_id: "local".to_string(),
        email: None,
        access_token: None,
    })
}

fn parse_number(key: &str, value: &str) -> crate::CliResult<u64> {
    value
        .parse()
        .map_err(|_| CliError::InvalidArgument(format!("{key} must be a number, got '{value}'")))
}

/// Prompts for the main settings, keeping current values on empty input.
pub fn init_config<R: BufRead, W: Write>(
    config: &mut Config,
    input: &mut R,
    out: &mut W,
) -> crate::CliResult<()> {
    if let Some(url) = prompt(input, out, "API base URL", &config.api_base_url)? {
        config.api_base_url = url;
    }
    if let Some(origin) = prompt(input, out, "App origin", &config.app_origin)? {
        config.app_origin = origin;
    }

    let current_user = config
        .auth
        .as_ref()
        .map_or_else(|| "(none)".to_string(), |a| a.user_id.clone());
    if let Some(user_id) = prompt(input, out, "User ID", &current_user)? {
        if user_id != "(none)" {
            auth_mut(config).user_id = user_id;
        }
    }

    if config.auth.is_some() {
        let current_email = config
            .auth
            .as_ref()
            .and_then(|a| a.email.clone())
            .unwrap_or_else(|| "(none)".to_string());
        if let Some(email) = prompt(input, out, "Email", &current_email)? {
            auth_mut(config).email = (email != "(none)").then_some(email);
        }
    }
    Ok(())
}

fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
    current: &str,
) -> crate::CliResult<Option<String>> {
    write!(out, "{label} [{current}]: ")?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let trimmed = line.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}
