//! OAuth redirect (SSO callback) resolution.
//!
//! When the identity provider redirects back after an OAuth round-trip the
//! session may not be ready yet. Two timers race to resolve the callback:
//!
//! - the confirm timer fires a short delay after the provider reports
//!   loaded; if the user is signed in the callback succeeds, otherwise it
//!   keeps waiting. It re-arms whenever provider state changes.
//! - the fallback timer fires once, a fixed time after mount, and times the
//!   callback out if nothing else resolved it.
//!
//! Resolution is single-assignment: the first terminal transition wins,
//! performs its navigation, and aborts both timers. Dropping the
//! [`SsoCallbackHandle`] (unmount) aborts them as well.

use std::sync::Arc;
use std::time::Duration;

use mc_core::SsoConfig;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::AbortHandle;

use crate::effects::{Navigator, Notice, Notifier, Route};
use crate::error::{AuthError, AuthResult};
use crate::provider::ProviderSnapshot;

/// Default confirm delay.
pub const DEFAULT_CONFIRM_DELAY: Duration = Duration::from_secs(2);

/// Default fallback timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// SSO callback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SsoState {
    /// Waiting for the provider.
    Pending,
    /// Signed in; navigated home.
    Succeeded,
    /// Gave up; navigated to sign-in.
    TimedOut,
}

impl SsoState {
    /// Whether no further transition can happen.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Converts a terminal state into a result.
    pub fn into_result(self) -> AuthResult<()> {
        match self {
            Self::Succeeded => Ok(()),
            Self::TimedOut | Self::Pending => Err(AuthError::SsoTimeout),
        }
    }
}

/// Builder for SSO callback handlers.
pub struct SsoCallback {
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    confirm_delay: Duration,
    timeout: Duration,
}

impl SsoCallback {
    /// Creates a handler with the default timers.
    #[must_use]
    pub fn new(navigator: Arc<dyn Navigator>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            navigator,
            notifier,
            confirm_delay: DEFAULT_CONFIRM_DELAY,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Uses the timers from configuration.
    #[must_use]
    pub fn with_config(self, config: &SsoConfig) -> Self {
        self.with_timers(config.confirm_delay(), config.timeout())
    }

    /// Overrides both timers.
    #[must_use]
    pub const fn with_timers(mut self, confirm_delay: Duration, timeout: Duration) -> Self {
        self.confirm_delay = confirm_delay;
        self.timeout = timeout;
        self
    }

    /// Mounts the callback: starts both timers against `provider` state.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn mount(&self, provider: watch::Receiver<ProviderSnapshot>) -> SsoCallbackHandle {
        let (state, state_rx) = watch::channel(SsoState::Pending);
        let shared = Arc::new(Shared {
            state,
            navigator: Arc::clone(&self.navigator),
            notifier: Arc::clone(&self.notifier),
            timers: Mutex::new(Vec::with_capacity(2)),
        });

        let confirm = tokio::spawn(confirm_timer(
            Arc::clone(&shared),
            provider,
            self.confirm_delay,
        ));
        let fallback = tokio::spawn(fallback_timer(Arc::clone(&shared), self.timeout));
        shared
            .timers
            .lock()
            .extend([confirm.abort_handle(), fallback.abort_handle()]);

        // A timer may have resolved before its handle was registered.
        if shared.current().is_terminal() {
            shared.cancel_timers();
        }

        SsoCallbackHandle { shared, state_rx }
    }
}

struct Shared {
    state: watch::Sender<SsoState>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    timers: Mutex<Vec<AbortHandle>>,
}

impl Shared {
    fn current(&self) -> SsoState {
        *self.state.borrow()
    }

    /// Moves `Pending` to `outcome`. Only the first caller wins and runs the
    /// outcome's side effects; later calls are no-ops.
    fn resolve(&self, outcome: SsoState) -> bool {
        let won = self.state.send_if_modified(|state| {
            if *state == SsoState::Pending {
                *state = outcome;
                true
            } else {
                false
            }
        });
        if !won {
            return false;
        }

        match outcome {
            SsoState::Succeeded => {
                tracing::info!("SSO callback completed");
                self.notifier.notify(Notice::success("Successfully signed in"));
                self.navigator.navigate(Route::Home);
            }
            SsoState::TimedOut => {
                tracing::warn!("SSO callback timed out");
                self.notifier
                    .notify(Notice::error(AuthError::SsoTimeout.user_message()));
                self.navigator.navigate(Route::SignIn);
            }
            SsoState::Pending => {}
        }

        self.cancel_timers();
        true
    }

    fn cancel_timers(&self) {
        for timer in self.timers.lock().drain(..) {
            timer.abort();
        }
    }
}

async fn confirm_timer(
    shared: Arc<Shared>,
    mut provider: watch::Receiver<ProviderSnapshot>,
    delay: Duration,
) {
    let mut open = true;
    loop {
        let snapshot = provider.borrow_and_update().clone();

        if !snapshot.is_loaded {
            if !open || provider.changed().await.is_err() {
                // Provider gone before loading; the fallback timer decides.
                return;
            }
            continue;
        }

        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);
        let fired = loop {
            tokio::select! {
                () = &mut sleep => break true,
                changed = provider.changed(), if open => match changed {
                    Ok(()) => break false,
                    Err(_) => open = false,
                },
            }
        };
        if !fired {
            // Provider state changed: re-arm with the new snapshot.
            continue;
        }

        if snapshot.is_signed_in {
            shared.resolve(SsoState::Succeeded);
            return;
        }

        tracing::debug!("waiting for authentication to complete");
        if !open || provider.changed().await.is_err() {
            return;
        }
    }
}

async fn fallback_timer(shared: Arc<Shared>, timeout: Duration) {
    tokio::time::sleep(timeout).await;
    shared.resolve(SsoState::TimedOut);
}

/// A mounted SSO callback.
///
/// Dropping the handle unmounts the callback and cancels both timers.
pub struct SsoCallbackHandle {
    shared: Arc<Shared>,
    state_rx: watch::Receiver<SsoState>,
}

impl SsoCallbackHandle {
    /// Current state.
    #[must_use]
    pub fn state(&self) -> SsoState {
        *self.state_rx.borrow()
    }

    /// Waits for a terminal state.
    pub async fn outcome(&self) -> SsoState {
        let mut rx = self.state_rx.clone();
        // The sender lives in `shared`, which this handle keeps alive.
        let terminal = rx.wait_for(|state| state.is_terminal()).await.map(|state| *state);
        terminal.unwrap_or_else(|_| self.state())
    }

    /// Unmounts the callback, cancelling any pending timer.
    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for SsoCallbackHandle {
    fn drop(&mut self) {
        self.shared.cancel_timers();
    }
}
