//! Navigation and user-notice side effects.

use std::fmt;

use parking_lot::Mutex;
use serde::Serialize;

/// Dashboard routes the auth layer navigates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    /// Dashboard home.
    Home,
    /// Sign-in screen.
    SignIn,
    /// One-time passcode entry.
    Otp,
}

impl Route {
    /// URL path of the route.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::SignIn => "/sign-in",
            Self::Otp => "/otp",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Severity of a user notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Action succeeded.
    Success,
    /// Informational.
    Info,
    /// Action failed.
    Error,
}

/// A transient message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Message text.
    pub message: String,
}

impl Notice {
    /// Success notice.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// Informational notice.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// Error notice.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Performs navigation.
pub trait Navigator: Send + Sync {
    /// Navigates to `route`.
    fn navigate(&self, route: Route);
}

/// Shows notices to the user.
pub trait Notifier: Send + Sync {
    /// Shows `notice`.
    fn notify(&self, notice: Notice);
}

/// In-memory recorder of navigations and notices.
///
/// Used by the CLI to report what an auth interaction did, and by tests to
/// assert on side effects.
#[derive(Debug, Default)]
pub struct EffectLog {
    routes: Mutex<Vec<Route>>,
    notices: Mutex<Vec<Notice>>,
}

impl EffectLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All navigations, oldest first.
    #[must_use]
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().clone()
    }

    /// The most recent navigation.
    #[must_use]
    pub fn last_route(&self) -> Option<Route> {
        self.routes.lock().last().copied()
    }

    /// All notices, oldest first.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    /// Removes and returns recorded notices.
    pub fn drain_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock())
    }
}

impl Navigator for EffectLog {
    fn navigate(&self, route: Route) {
        tracing::info!(route = %route, "navigate");
        self.routes.lock().push(route);
    }
}

impl Notifier for EffectLog {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}
