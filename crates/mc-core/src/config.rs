//! Admin client configuration.
//!
//! Configuration is read from `~/.masschat/mc.toml` when present and then
//! overridden by environment variables (a `.env` file is honoured).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Path the identity provider redirects back to after OAuth.
pub const SSO_CALLBACK_PATH: &str = "/sso-callback";

/// Admin client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the MassChat REST API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Origin the dashboard is served from (used for OAuth redirects).
    #[serde(default = "default_app_origin")]
    pub app_origin: String,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Session settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// SSO callback timers.
    #[serde(default)]
    pub sso: SsoConfig,

    /// Pre-issued credentials for the static token provider.
    pub auth: Option<AuthConfig>,
}

/// Session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Lifetime written into synced session claims, in seconds.
    #[serde(default = "default_token_lifetime_secs")]
    pub token_lifetime_secs: u64,
}

/// SSO callback timers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SsoConfig {
    /// Delay after the provider loads before checking sign-in, in milliseconds.
    #[serde(default = "default_sso_confirm_delay_ms")]
    pub confirm_delay_ms: u64,

    /// Hard upper bound on the callback wait, in milliseconds.
    #[serde(default = "default_sso_timeout_ms")]
    pub timeout_ms: u64,
}

/// Credentials for the static token provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Identity provider user id.
    pub user_id: String,
    /// Primary email address.
    pub email: Option<String>,
    /// Bearer token issued by the identity provider.
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
}

fn default_api_base_url() -> String {
    "http://localhost:8099".to_string()
}

fn default_app_origin() -> String {
    "http://localhost:5173".to_string()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

const fn default_token_lifetime_secs() -> u64 {
    60 * 60
}

const fn default_sso_confirm_delay_ms() -> u64 {
    2_000
}

const fn default_sso_timeout_ms() -> u64 {
    15_000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            app_origin: default_app_origin(),
            request_timeout_secs: default_request_timeout_secs(),
            session: SessionConfig::default(),
            sso: SsoConfig::default(),
            auth: None,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_lifetime_secs: default_token_lifetime_secs(),
        }
    }
}

impl Default for SsoConfig {
    fn default() -> Self {
        Self {
            confirm_delay_ms: default_sso_confirm_delay_ms(),
            timeout_ms: default_sso_timeout_ms(),
        }
    }
}

impl SsoConfig {
    /// Delay before the happy-path sign-in check.
    #[must_use]
    pub const fn confirm_delay(&self) -> Duration {
        Duration::from_millis(self.confirm_delay_ms)
    }

    /// Fallback timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl SessionConfig {
    /// Token lifetime written into synced claims.
    #[must_use]
    pub const fn token_lifetime(&self) -> Duration {
        Duration::from_secs(self.token_lifetime_secs)
    }
}

impl Config {
    /// Loads the configuration file (if any) and applies environment overrides.
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a specific file, falling back to defaults
    /// when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("failed to parse config: {e}")))
    }

    /// Saves configuration to the default file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Saves configuration to a specific file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Gets the configuration file path.
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs_next::home_dir()
            .ok_or_else(|| Error::Config("could not determine home directory".to_string()))?;
        Ok(home.join(".masschat").join("mc.toml"))
    }

    /// Applies `MC_*` overrides read through `lookup`.
    ///
    /// Unparseable numeric values are ignored and the current value kept.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("MC_API_BASE_URL") {
            self.api_base_url = url;
        }
        if let Some(origin) = lookup("MC_APP_ORIGIN") {
            self.app_origin = origin;
        }
        if let Some(v) = lookup("MC_REQUEST_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.request_timeout_secs = v;
        }
        if let Some(v) = lookup("MC_TOKEN_LIFETIME_SECS").and_then(|v| v.parse().ok()) {
            self.session.token_lifetime_secs = v;
        }
        if let Some(v) = lookup("MC_SSO_CONFIRM_DELAY_MS").and_then(|v| v.parse().ok()) {
            self.sso.confirm_delay_ms = v;
        }
        if let Some(v) = lookup("MC_SSO_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            self.sso.timeout_ms = v;
        }

        if let Some(token) = lookup("MC_ACCESS_TOKEN") {
            let user_id = lookup("MC_USER_ID")
                .or_else(|| self.auth.as_ref().map(|a| a.user_id.clone()))
                .unwrap_or_else(|| "local".to_string());
            let email = lookup("MC_USER_EMAIL").or_else(|| self.auth.as_ref().and_then(|a| a.email.clone()));
            self.auth = Some(AuthConfig {
                user_id,
                email,
                access_token: Some(token),
            });
        }
    }

    /// Checks that URLs parse and timers are ordered.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.api_base_url)
            .map_err(|e| Error::Config(format!("invalid api_base_url '{}': {e}", self.api_base_url)))?;
        Url::parse(&self.app_origin)
            .map_err(|e| Error::Config(format!("invalid app_origin '{}': {e}", self.app_origin)))?;

        if self.sso.confirm_delay_ms >= self.sso.timeout_ms {
            return Err(Error::Config(format!(
                "sso.confirm_delay_ms ({}) must be shorter than sso.timeout_ms ({})",
                self.sso.confirm_delay_ms, self.sso.timeout_ms
            )));
        }
        Ok(())
    }

    /// URL the identity provider returns to after an OAuth round-trip.
    #[must_use]
    pub fn sso_redirect_url(&self) -> String {
        format!("{}{}", self.app_origin.trim_end_matches('/'), SSO_CALLBACK_PATH)
    }

    /// URL the identity provider lands on once the OAuth flow completes.
    #[must_use]
    pub fn sso_complete_url(&self) -> String {
        format!("{}/", self.app_origin.trim_end_matches('/'))
    }

    /// HTTP request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
