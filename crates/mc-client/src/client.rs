//! HTTP client with session-aware bearer authentication.

use std::sync::Arc;
use std::time::Duration;

use mc_core::Config;
use mc_session::SessionStore;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::accounts::Accounts;
use crate::error::{parse_error_message, ClientError, ClientResult};

const TOKEN_STATUS_PATH: &str = "/auth/token-status";

/// Backend report on the current bearer token.
///
/// The payload shape is owned by the backend and passed through as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenStatus(pub serde_json::Value);

/// API client for the MassChat backend.
///
/// Cheap to clone; clones share the connection pool and the session store.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<SessionStore>,
}

impl ApiClient {
    /// Creates a client from configuration.
    pub fn new(config: &Config, store: Arc<SessionStore>) -> ClientResult<Self> {
        Self::with_base_url(&config.api_base_url, config.request_timeout(), store)
    }

    /// Creates a client against an explicit base URL.
    pub fn with_base_url(
        base_url: &str,
        timeout: Duration,
        store: Arc<SessionStore>,
    ) -> ClientResult<Self> {
        Url::parse(base_url)
            .map_err(|e| ClientError::Config(format!("invalid base URL '{base_url}': {e}")))?;

        let http = reqwest::Client::builder().timeout(timeout).build()?;
        tracing::debug!(base_url, "API client initialized");

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
        })
    }

    /// Gets the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The session store this client authenticates from.
    #[must_use]
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Account resources.
    #[must_use]
    pub fn accounts(&self) -> Accounts<'_> {
        Accounts::new(self)
    }

    /// Asks the backend whether the current token is valid.
    pub async fn check_token_status(&self) -> ClientResult<TokenStatus> {
        self.get(TOKEN_STATUS_PATH).await
    }

    /// Makes a GET request.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(Method::GET, path, None::<&()>).await
    }

    /// Makes a POST request with a JSON body.
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send(Method::POST, path, Some(body)).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.http.request(method, url);
        match self.store.access_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult<T> {
        let mut builder = self.request(method.clone(), path);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!(endpoint = path, method = %method, error = %e, "API request failed without response");
            ClientError::Http(e)
        })?;

        self.handle_response(&method, path, response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        method: &Method,
        path: &str,
        response: Response,
    ) -> ClientResult<T> {
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
            return serde_json::from_slice(body).map_err(ClientError::Json);
        }

        let text = response.text().await.unwrap_or_default();
        tracing::error!(
            status = status.as_u16(),
            endpoint = path,
            method = %method,
            "API error response"
        );

        if status == StatusCode::UNAUTHORIZED {
            self.store.reset();
            tracing::warn!(endpoint = path, "API rejected session token, session reset");
            return Err(ClientError::Unauthorized);
        }

        let message = parse_error_message(&text).unwrap_or_else(|| {
            if text.trim().is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                text
            }
        });
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
