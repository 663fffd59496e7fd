//! # mc-auth
//!
//! Authentication state synchronization for the MassChat admin client.
//!
//! The identity provider is a black box behind [`IdentityProvider`]. This
//! crate keeps the local [`SessionStore`](mc_session::SessionStore) in step
//! with it and decides what the user is allowed to see:
//!
//! - [`AuthSync`] copies the provider's signed-in user and token into the store
//! - [`RouteGuard`] gates protected views and redirects to sign-in once per transition
//! - [`SsoCallback`] resolves an OAuth redirect with a confirm timer racing a fallback timeout
//! - [`AuthFlows`] drives password, OAuth, sign-up and OTP interactions
//!
//! Side effects (navigation, user notices) go through the [`Navigator`] and
//! [`Notifier`] traits.
//!
//! ## Example
//!
//! ```ignore
//! let store = Arc::new(SessionStore::new());
//! let provider: Arc<dyn IdentityProvider> = Arc::new(StaticTokenProvider::from_config(config.auth.as_ref()));
//! let sync = AuthSync::new(Arc::clone(&provider), Arc::clone(&store));
//! sync.sync(&provider.snapshot()).await;
//!
//! let guard = RouteGuard::new(store, navigator);
//! if guard.check(&provider.snapshot()).renders() {
//!     // show the protected view
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod effects;
pub mod error;
pub mod flows;
pub mod guard;
pub mod provider;
pub mod sso;
pub mod static_provider;
pub mod sync;

pub use effects::{EffectLog, Navigator, Notice, NoticeLevel, Notifier, Route};
pub use error::{AuthError, AuthResult};
pub use flows::{AuthFlows, OtpMode, SignInOutcome, SignUpOutcome};
pub use guard::{GuardDecision, GuardState, RouteGuard};
pub use provider::{
    AttemptResult, AttemptStatus, IdentityProvider, OAuthStrategy, ProviderError, ProviderResult,
    ProviderSnapshot, ProviderUser, SignInCredentials, SignUpRegistration,
};
pub use sso::{SsoCallback, SsoCallbackHandle, SsoState};
pub use static_provider::StaticTokenProvider;
pub use sync::{AuthSync, SyncOutcome};
