//! Test harness for end-to-end scenarios.
//!
//! [`ScriptedIdentityProvider`] stands in for the third-party identity SDK:
//! tests drive its published state directly, and its interactive calls
//! publish the state a real SDK would after a successful sign-in.

#![forbid(unsafe_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mc_auth::{
    AttemptResult, AttemptStatus, AuthFlows, AuthSync, EffectLog, IdentityProvider, OAuthStrategy,
    ProviderError, ProviderResult, ProviderSnapshot, ProviderUser, RouteGuard, SignInCredentials,
    SignUpRegistration,
};
use mc_client::ApiClient;
use mc_core::Config;
use mc_session::SessionStore;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use wiremock::MockServer;

/// Identity provider whose state is driven by the test.
pub struct ScriptedIdentityProvider {
    state: watch::Sender<ProviderSnapshot>,
    token: Mutex<Option<String>>,
    pending_user: Mutex<Option<ProviderUser>>,
    require_second_factor: Mutex<bool>,
    fail_token: Mutex<bool>,
}

impl ScriptedIdentityProvider {
    /// Starts in the loading state.
    pub fn new() -> Self {
        let (state, _) = watch::channel(ProviderSnapshot::loading());
        Self {
            state,
            token: Mutex::new(None),
            pending_user: Mutex::new(None),
            require_second_factor: Mutex::new(false),
            fail_token: Mutex::new(false),
        }
    }

    /// Publishes a loaded, signed-out state.
    pub fn finish_loading(&self) {
        self.state.send_replace(ProviderSnapshot::signed_out());
    }

    /// Publishes `user` as signed in with `token`.
    pub fn sign_in_as(&self, user: ProviderUser, token: &str) {
        *self.token.lock() = Some(token.to_string());
        self.state.send_replace(ProviderSnapshot::signed_in(user));
    }

    /// Replaces the token the provider hands out.
    pub fn rotate_token(&self, token: &str) {
        *self.token.lock() = Some(token.to_string());
    }

    /// Makes token fetches fail.
    pub fn fail_token_fetch(&self, fail: bool) {
        *self.fail_token.lock() = fail;
    }

    /// Requires an OTP after password sign-in.
    pub fn require_second_factor(&self) {
        *self.require_second_factor.lock() = true;
    }

    /// The user a pending interactive sign-in will activate.
    pub fn expect_user(&self, user: ProviderUser, token: &str) {
        *self.pending_user.lock() = Some(user);
        *self.token.lock() = Some(token.to_string());
    }
}

impl Default for ScriptedIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for ScriptedIdentityProvider {
    fn snapshot(&self) -> ProviderSnapshot {
        self.state.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<ProviderSnapshot> {
        self.state.subscribe()
    }

    async fn get_token(&self) -> ProviderResult<Option<String>> {
        if *self.fail_token.lock() {
            return Err(ProviderError::new("token endpoint unreachable"));
        }
        Ok(self.token.lock().clone())
    }

    async fn sign_out(&self) -> ProviderResult<()> {
        *self.token.lock() = None;
        self.state.send_replace(ProviderSnapshot::signed_out());
        Ok(())
    }

    async fn set_active(&self, session_id: &str) -> ProviderResult<()> {
        let user = self
            .pending_user
            .lock()
            .take()
            .ok_or_else(|| ProviderError::new(format!("unknown session {session_id}")))?;
        self.state.send_replace(ProviderSnapshot::signed_in(user));
        Ok(())
    }

    async fn authenticate_with_redirect(
        &self,
        _strategy: OAuthStrategy,
        _redirect_url: &str,
        _redirect_url_complete: &str,
    ) -> ProviderResult<()> {
        Ok(())
    }

    async fn sign_in(&self, credentials: &SignInCredentials) -> ProviderResult<AttemptResult> {
        if credentials.password != "correct-horse" {
            return Err(ProviderError::new("Password is incorrect. Try again.")
                .with_code("form_password_incorrect"));
        }
        if *self.require_second_factor.lock() {
            Ok(AttemptResult::pending(AttemptStatus::NeedsSecondFactor))
        } else {
            Ok(AttemptResult::complete("sess_password"))
        }
    }

    async fn sign_up(&self, _registration: &SignUpRegistration) -> ProviderResult<AttemptResult> {
        Ok(AttemptResult::pending(AttemptStatus::MissingRequirements))
    }

    async fn attempt_second_factor(&self, code: &str) -> ProviderResult<AttemptResult> {
        self.verify(code, "sess_second_factor")
    }

    async fn attempt_email_verification(&self, code: &str) -> ProviderResult<AttemptResult> {
        self.verify(code, "sess_sign_up")
    }

    async fn prepare_second_factor(&self) -> ProviderResult<()> {
        Ok(())
    }

    async fn prepare_email_verification(&self) -> ProviderResult<()> {
        Ok(())
    }
}

impl ScriptedIdentityProvider {
    fn verify(&self, code: &str, session_id: &str) -> ProviderResult<AttemptResult> {
        if code == "424242" {
            Ok(AttemptResult::complete(session_id))
        } else {
            Err(ProviderError::new("Incorrect code").with_code("form_code_incorrect"))
        }
    }
}

/// Wired-up client components against a mock backend.
pub struct TestEnv {
    /// Mock MassChat backend.
    pub server: MockServer,
    /// Scripted identity provider.
    pub provider: Arc<ScriptedIdentityProvider>,
    /// Shared session store.
    pub store: Arc<SessionStore>,
    /// Recorded navigations and notices.
    pub effects: Arc<EffectLog>,
    /// Route guard.
    pub guard: RouteGuard,
    /// REST client.
    pub client: ApiClient,
    /// Configuration pointing at the mock backend.
    pub config: Config,
}

impl TestEnv {
    /// Starts a mock backend and wires everything to it.
    pub async fn new() -> anyhow::Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("mc_auth=debug,mc_client=debug")
            .with_test_writer()
            .try_init();

        let server = MockServer::start().await;
        let config = Config {
            api_base_url: server.uri(),
            app_origin: "https://admin.masschat.test".to_string(),
            ..Config::default()
        };

        let provider = Arc::new(ScriptedIdentityProvider::new());
        let store = Arc::new(SessionStore::new());
        let effects = Arc::new(EffectLog::new());
        let guard = RouteGuard::new(Arc::clone(&store), effects.clone());
        let client = ApiClient::new(&config, Arc::clone(&store))?;

        Ok(Self {
            server,
            provider,
            store,
            effects,
            guard,
            client,
            config,
        })
    }

    /// Provider as a trait object.
    pub fn identity(&self) -> Arc<dyn IdentityProvider> {
        self.provider.clone()
    }

    /// Sync bridge over this environment's provider and store.
    pub fn sync(&self) -> AuthSync {
        AuthSync::new(self.identity(), Arc::clone(&self.store))
    }

    /// Runs the sync bridge in the background for the life of the handle.
    pub fn spawn_sync(&self) -> JoinHandle<()> {
        let sync = self.sync();
        let rx = self.provider.subscribe();
        tokio::spawn(async move { sync.run(rx).await })
    }

    /// Auth flows bound to this environment.
    pub fn flows(&self) -> AuthFlows {
        AuthFlows::new(
            Some(self.identity()),
            Arc::clone(&self.store),
            self.effects.clone(),
            self.effects.clone(),
            &self.config,
        )
    }

    /// Checks the guard against the provider's current state.
    pub fn check_guard(&self) -> mc_auth::GuardDecision {
        self.guard.check(&self.provider.snapshot())
    }

    /// Waits until the store holds a token, or `timeout` passes.
    pub async fn wait_for_session(&self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            if self.store.is_authenticated() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        self.store.is_authenticated()
    }
}

/// A provider user with an email.
pub fn user(id: &str, email: &str) -> ProviderUser {
    ProviderUser::new(id).with_email(email)
}
