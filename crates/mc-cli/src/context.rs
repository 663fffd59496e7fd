//! Wiring shared by every command.

use std::sync::Arc;

use mc_auth::{
    AuthFlows, AuthSync, EffectLog, GuardDecision, IdentityProvider, RouteGuard, StaticTokenProvider,
    SyncOutcome,
};
use mc_client::{ApiClient, ClientResult};
use mc_core::{AuthConfig, Config};
use mc_session::SessionStore;

use crate::error::{CliError, CliResult};
use crate::output;

/// Session store, identity provider and API client for one CLI invocation.
pub struct AppContext {
    config: Config,
    store: Arc<SessionStore>,
    provider: Arc<dyn IdentityProvider>,
    effects: Arc<EffectLog>,
    guard: RouteGuard,
    client: ApiClient,
}

impl AppContext {
    /// Builds the context with the static token provider described by
    /// `config.auth`.
    pub fn new(config: Config) -> CliResult<Self> {
        let provider = Arc::new(StaticTokenProvider::from_config(config.auth.as_ref()));
        Self::with_provider(config, provider)
    }

    /// Builds the context around an explicit provider.
    pub fn with_provider(config: Config, provider: Arc<dyn IdentityProvider>) -> CliResult<Self> {
        let store = Arc::new(SessionStore::new());
        let effects = Arc::new(EffectLog::new());
        let guard = RouteGuard::new(Arc::clone(&store), effects.clone());
        let client = ApiClient::new(&config, Arc::clone(&store))?;

        Ok(Self {
            config,
            store,
            provider,
            effects,
            guard,
            client,
        })
    }

    /// Configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Session store.
    #[must_use]
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Identity provider.
    #[must_use]
    pub fn provider(&self) -> &Arc<dyn IdentityProvider> {
        &self.provider
    }

    /// Recorded navigations and notices.
    #[must_use]
    pub fn effects(&self) -> &Arc<EffectLog> {
        &self.effects
    }

    /// Auth flows bound to this context.
    #[must_use]
    pub fn flows(&self) -> AuthFlows {
        AuthFlows::new(
            Some(Arc::clone(&self.provider)),
            Arc::clone(&self.store),
            self.effects.clone(),
            self.effects.clone(),
            &self.config,
        )
    }

    /// Syncs the session store from the identity provider.
    pub async fn sync_session(&self) -> SyncOutcome {
        AuthSync::new(Arc::clone(&self.provider), Arc::clone(&self.store))
            .with_token_lifetime(self.config.session.token_lifetime())
            .sync(&self.provider.snapshot())
            .await
    }

    /// Evaluates the route guard against the current provider state.
    pub fn check_guard(&self) -> GuardDecision {
        self.guard.check(&self.provider.snapshot())
    }

    /// Syncs the session and requires the guard to let protected content
    /// through.
    pub async fn authenticate(&self) -> CliResult<()> {
        let outcome = self.sync_session().await;
        tracing::debug!(?outcome, "session sync before command");

        match (self.check_guard(), outcome) {
            (GuardDecision::Render, _) => Ok(()),
            (GuardDecision::Loading, _) => Err(CliError::Auth(
                "identity provider is still loading".to_string(),
            )),
            (_, SyncOutcome::Failed(err)) => Err(err.into()),
            (GuardDecision::Redirected(route), _) => Err(not_signed_in(route.path())),
            (GuardDecision::Blocked, _) => Err(not_signed_in(mc_auth::Route::SignIn.path())),
        }
    }

    /// Authenticates, then runs an API call.
    ///
    /// A 401 resets the session; the guard is re-checked so the sign-in
    /// redirect is reported.
    pub async fn call<'a, T, F, Fut>(&'a self, request: F) -> CliResult<T>
    where
        F: FnOnce(&'a ApiClient) -> Fut,
        Fut: std::future::Future<Output = ClientResult<T>> + 'a,
    {
        self.authenticate().await?;

        match request(&self.client).await {
            Ok(value) => Ok(value),
            Err(err) if err.is_unauthorized() => {
                if let GuardDecision::Redirected(route) = self.check_guard() {
                    output::warning(&format!("Session reset, redirected to {route}"));
                }
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn not_signed_in(route: &str) -> CliError {
    CliError::Auth(format!(
        "not signed in (redirected to {route}); set MC_ACCESS_TOKEN or pass --ask-token"
    ))
}

/// Replaces the configured token with one typed at a hidden prompt.
pub fn prompt_token(config: &mut Config) -> CliResult<()> {
    let token = output::prompt_secret("Access token: ")?;
    let token = token.trim();
    if token.is_empty() {
        return Err(CliError::InvalidArgument("access token is empty".to_string()));
    }

    let current = config.auth.take();
    config.auth = Some(AuthConfig {
        user_id: current
            .as_ref()
            .map_or_else(|| "local".to_string(), |a| a.user_id.clone()),
        email: current.and_then(|a| a.email),
        access_token: Some(token.to_string()),
    });
    Ok(())
}
