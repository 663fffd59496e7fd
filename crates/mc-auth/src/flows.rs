//! Interactive sign-in, sign-up and OTP flows.

use std::sync::Arc;

use mc_core::Config;
use mc_session::SessionStore;

use crate::effects::{Navigator, Notice, Notifier, Route};
use crate::error::{AuthError, AuthResult};
use crate::provider::{
    AttemptResult, AttemptStatus, IdentityProvider, OAuthStrategy, ProviderError,
    SignInCredentials, SignUpRegistration,
};

/// Minimum password length accepted by the forms.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Length of a one-time passcode.
pub const OTP_LENGTH: usize = 6;

/// Which pending attempt an OTP belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpMode {
    /// Second factor of a password sign-in.
    SignIn,
    /// Email verification of a sign-up.
    SignUp,
}

/// Result of a password sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInOutcome {
    /// Session active; navigated home.
    SignedIn,
    /// OTP required; navigated to the OTP screen.
    NeedsSecondFactor,
    /// The provider wants another step this client does not drive.
    Incomplete(AttemptStatus),
}

/// Result of a sign-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// Session active; navigated home.
    SignedUp,
    /// Email verification pending; navigated to the OTP screen.
    NeedsVerification,
}

/// Drives user-initiated authentication against the identity provider.
///
/// Every action refuses with [`AuthError::ProviderUnavailable`] when no
/// provider is attached. Provider rejections are surfaced as an error
/// notice carrying the provider's message or a per-action fallback.
pub struct AuthFlows {
    provider: Option<Arc<dyn IdentityProvider>>,
    store: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    redirect_url: String,
    redirect_url_complete: String,
}

impl AuthFlows {
    /// Creates the flows.
    #[must_use]
    pub fn new(
        provider: Option<Arc<dyn IdentityProvider>>,
        store: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        config: &Config,
    ) -> Self {
        Self {
            provider,
            store,
            navigator,
            notifier,
            redirect_url: config.sso_redirect_url(),
            redirect_url_complete: config.sso_complete_url(),
        }
    }

    fn provider(&self) -> AuthResult<&Arc<dyn IdentityProvider>> {
        self.provider.as_ref().ok_or_else(|| {
            let err = AuthError::ProviderUnavailable;
            self.notifier.notify(Notice::error(err.user_message()));
            err
        })
    }

    fn reject(&self, action: &str, err: &ProviderError, fallback: &str) -> AuthError {
        tracing::warn!(action, error = %err, "identity provider rejected request");
        let rejected = AuthError::rejected(err, fallback);
        self.notifier.notify(Notice::error(rejected.user_message()));
        rejected
    }

    fn invalid(&self, message: &str) -> AuthError {
        self.notifier.notify(Notice::error(message));
        AuthError::Validation(message.to_string())
    }

    async fn activate(&self, attempt: &AttemptResult, action: &str, fallback: &str) -> AuthResult<()> {
        let provider = self.provider()?;
        let Some(session_id) = attempt.created_session_id.as_deref() else {
            return Err(self.reject(action, &ProviderError::default(), fallback));
        };
        provider
            .set_active(session_id)
            .await
            .map_err(|e| self.reject(action, &e, fallback))
    }

    /// Password sign-in.
    pub async fn sign_in(&self, email: &str, password: &str) -> AuthResult<SignInOutcome> {
        let provider = self.provider()?;
        if let Err(msg) = validate_email(email) {
            return Err(self.invalid(msg));
        }
        if let Err(msg) = validate_password(password) {
            return Err(self.invalid(msg));
        }

        const FALLBACK: &str = "An error occurred during sign-in";
        let credentials = SignInCredentials {
            identifier: email.to_string(),
            password: password.to_string(),
        };
        let attempt = provider
            .sign_in(&credentials)
            .await
            .map_err(|e| self.reject("sign-in", &e, FALLBACK))?;

        match attempt.status {
            AttemptStatus::Complete => {
                self.activate(&attempt, "sign-in", FALLBACK).await?;
                self.notifier.notify(Notice::success("Signed in successfully"));
                self.navigator.navigate(Route::Home);
                Ok(SignInOutcome::SignedIn)
            }
            AttemptStatus::NeedsSecondFactor => {
                self.navigator.navigate(Route::Otp);
                Ok(SignInOutcome::NeedsSecondFactor)
            }
            other => {
                tracing::debug!(status = ?other, "sign-in needs further steps");
                Ok(SignInOutcome::Incomplete(other))
            }
        }
    }

    /// Starts an OAuth redirect; the provider returns to the SSO callback.
    pub async fn sign_in_with_oauth(&self, strategy: OAuthStrategy) -> AuthResult<()> {
        let provider = self.provider()?;
        provider
            .authenticate_with_redirect(strategy, &self.redirect_url, &self.redirect_url_complete)
            .await
            .map_err(|e| {
                let fallback = format!("An error occurred during {} sign-in", strategy.as_str());
                self.reject("oauth", &e, &fallback)
            })
    }

    /// Registers a new user and starts email verification.
    pub async fn sign_up(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> AuthResult<SignUpOutcome> {
        let provider = self.provider()?;
        if first_name.trim().is_empty() {
            return Err(self.invalid("First name is required"));
        }
        if last_name.trim().is_empty() {
            return Err(self.invalid("Last name is required"));
        }
        if let Err(msg) = validate_email(email) {
            return Err(self.invalid(msg));
        }
        if let Err(msg) = validate_password(password) {
            return Err(self.invalid(msg));
        }

        const FALLBACK: &str = "An error occurred during sign-up";
        let registration = SignUpRegistration {
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            email_address: email.to_string(),
            password: password.to_string(),
        };
        let attempt = provider
            .sign_up(&registration)
            .await
            .map_err(|e| self.reject("sign-up", &e, FALLBACK))?;
        provider
            .prepare_email_verification()
            .await
            .map_err(|e| self.reject("sign-up", &e, FALLBACK))?;

        if attempt.status == AttemptStatus::Complete {
            self.activate(&attempt, "sign-up", FALLBACK).await?;
            self.notifier.notify(Notice::success("Account created successfully"));
            self.navigator.navigate(Route::Home);
            Ok(SignUpOutcome::SignedUp)
        } else {
            self.notifier.notify(Notice::info("Please verify your email address"));
            self.navigator.navigate(Route::Otp);
            Ok(SignUpOutcome::NeedsVerification)
        }
    }

    /// Submits a one-time passcode for the pending attempt.
    ///
    /// Returns whether a session was activated.
    pub async fn verify_otp(&self, mode: OtpMode, code: &str) -> AuthResult<bool> {
        let provider = self.provider()?;
        let code = code.trim();
        if code.is_empty() {
            return Err(self.invalid("Please enter your otp code."));
        }
        if code.len() != OTP_LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(self.invalid("Verification code must be 6 digits"));
        }

        const FALLBACK: &str = "Verification code is invalid";
        let attempt = match mode {
            OtpMode::SignIn => provider.attempt_second_factor(code).await,
            OtpMode::SignUp => provider.attempt_email_verification(code).await,
        }
        .map_err(|e| self.reject("otp", &e, FALLBACK))?;

        if attempt.status != AttemptStatus::Complete {
            if mode == OtpMode::SignUp {
                self.notifier.notify(Notice::error("Verification failed"));
            }
            return Ok(false);
        }

        self.activate(&attempt, "otp", FALLBACK).await?;
        let message = match mode {
            OtpMode::SignIn => "Sign-in successful!",
            OtpMode::SignUp => "Email verified successfully!",
        };
        self.notifier.notify(Notice::success(message));
        self.navigator.navigate(Route::Home);
        Ok(true)
    }

    /// Sends a fresh passcode for the pending attempt.
    pub async fn resend_code(&self, mode: OtpMode) -> AuthResult<()> {
        let provider = self.provider()?;
        const FALLBACK: &str = "Failed to send a new code";
        let (result, message) = match mode {
            OtpMode::SignIn => (
                provider.prepare_second_factor().await,
                "A new code has been sent",
            ),
            OtpMode::SignUp => (
                provider.prepare_email_verification().await,
                "A new code has been sent to your email",
            ),
        };
        result.map_err(|e| self.reject("resend", &e, FALLBACK))?;
        self.notifier.notify(Notice::success(message));
        Ok(())
    }

    /// Signs out of the provider and clears the local session.
    ///
    /// The local session is cleared and the user sent to sign-in even if the
    /// provider call fails.
    pub async fn sign_out(&self) -> AuthResult<()> {
        let provider = self.provider()?;
        let result = provider.sign_out().await;

        self.store.reset();
        self.navigator.navigate(Route::SignIn);

        result.map_err(|e| self.reject("sign-out", &e, "Failed to sign out"))
    }
}

/// Checks the shape of an email address.
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    const MESSAGE: &str = "Please enter a valid email address.";
    let Some((local, domain)) = email.split_once('@') else {
        return Err(MESSAGE);
    };
    let valid = !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'));
    if valid {
        Ok(())
    } else {
        Err(MESSAGE)
    }
}

/// Checks the minimum password length.
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        Err("Password must be at least 8 characters.")
    } else {
        Ok(())
    }
}
