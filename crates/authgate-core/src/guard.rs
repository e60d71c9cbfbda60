//! Pre-entry hook for protected routes.

use tracing::{debug, error, instrument};

use crate::traits::AuthSession;

/// Name of the route every rejected navigation is sent to.
pub const LOGIN_ROUTE: &str = "login";

/// A route as seen by the guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub name: Option<String>,
    pub path: String,
}

impl RouteDescriptor {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            path: path.into(),
        }
    }

    /// A route known only by its path.
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            name: None,
            path: path.into(),
        }
    }
}

/// Where a redirect points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    Named(String),
}

/// The guard's decision for one navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Proceed to the requested route.
    Allow,
    /// Abandon the requested route and go elsewhere.
    Redirect(RouteTarget),
}

/// Gates protected routes on the state of an [`AuthSession`].
///
/// Each call is a single hop from pending to allowed or redirected. The guard
/// never retries; credential renewal is the session's concern.
///
/// # Example
///
/// ```
/// use authgate_core::{AuthSession, Navigation, NavigationGuard, RouteDescriptor, RouteTarget};
///
/// struct LoggedOut;
///
/// #[async_trait::async_trait]
/// impl AuthSession for LoggedOut {
///     fn is_authenticated(&self) -> bool { false }
///     async fn check_auth(&self) -> authgate_core::Result<bool> { Ok(false) }
/// }
///
/// # async fn example() {
/// let guard = NavigationGuard::new(LoggedOut);
/// let to = RouteDescriptor::new("profile", "/profile");
/// assert_eq!(
///     guard.before_enter(&to, None).await,
///     Navigation::Redirect(RouteTarget::Named("login".to_string())),
/// );
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct NavigationGuard<S> {
    session: S,
    login_route: String,
}

impl<S: AuthSession> NavigationGuard<S> {
    pub fn new(session: S) -> Self {
        Self {
            session,
            login_route: LOGIN_ROUTE.to_string(),
        }
    }

    /// Send rejected navigations to a different named route.
    pub fn with_login_route(mut self, name: impl Into<String>) -> Self {
        self.login_route = name.into();
        self
    }

    /// Name of the redirect target.
    pub fn login_route(&self) -> &str {
        &self.login_route
    }

    /// The guarded session.
    pub fn session(&self) -> &S {
        &self.session
    }

    /// Decide whether navigation to `to` may proceed.
    #[instrument(skip(self, to, from), fields(path = %to.path))]
    pub async fn before_enter(
        &self,
        to: &RouteDescriptor,
        from: Option<&RouteDescriptor>,
    ) -> Navigation {
        if !self.session.is_authenticated() {
            debug!("No credential held, redirecting");
            return self.redirect();
        }

        match self.session.check_auth().await {
            Ok(true) => {
                debug!("Session valid");
                Navigation::Allow
            }
            Ok(false) => {
                debug!("Session rejected, redirecting");
                self.redirect()
            }
            Err(e) => {
                error!(error = %e, from = ?from.map(|r| r.path.as_str()), "Auth guard error");
                self.redirect()
            }
        }
    }

    /// Continuation-passing form of [`before_enter`](Self::before_enter):
    /// `next` is invoked exactly once with the decision.
    pub async fn run<F>(&self, to: &RouteDescriptor, from: Option<&RouteDescriptor>, next: F)
    where
        F: FnOnce(Navigation),
    {
        next(self.before_enter(to, from).await);
    }

    fn redirect(&self) -> Navigation {
        Navigation::Redirect(RouteTarget::Named(self.login_route.clone()))
    }
}
