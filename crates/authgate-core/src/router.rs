//! Named route table with guarded entry.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::Result;
use crate::error::InvalidInputError;
use crate::guard::{Navigation, NavigationGuard, RouteDescriptor, RouteTarget};
use crate::traits::AuthSession;

/// A route in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDef {
    pub name: String,
    pub path: String,
    pub protected: bool,
}

impl RouteDef {
    /// A route anyone may enter.
    pub fn public(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            protected: false,
        }
    }

    /// A route gated by the navigation guard.
    pub fn protected(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            protected: true,
        }
    }

    fn descriptor(&self) -> RouteDescriptor {
        RouteDescriptor::new(&self.name, &self.path)
    }
}

/// Outcome of a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The route actually entered.
    pub route: RouteDescriptor,
    /// The requested route, when the guard redirected away from it.
    pub redirected_from: Option<RouteDescriptor>,
}

impl Resolution {
    pub fn was_redirected(&self) -> bool {
        self.redirected_from.is_some()
    }
}

/// Resolves paths to routes and runs the guard before protected ones.
#[derive(Debug)]
pub struct Router<S> {
    routes: Vec<RouteDef>,
    guard: NavigationGuard<S>,
}

impl<S: AuthSession> Router<S> {
    /// Build a router.
    ///
    /// # Errors
    ///
    /// Returns an error if route names repeat or the guard's login route is
    /// missing.
    pub fn new(routes: Vec<RouteDef>, guard: NavigationGuard<S>) -> Result<Self> {
        let mut names = HashSet::new();
        for route in &routes {
            if !names.insert(route.name.as_str()) {
                return Err(InvalidInputError::Route {
                    value: route.name.clone(),
                    reason: "duplicate route name".to_string(),
                }
                .into());
            }
        }

        match routes.iter().find(|r| r.name == guard.login_route()) {
            None => {
                return Err(InvalidInputError::Route {
                    value: guard.login_route().to_string(),
                    reason: "redirect target route is not defined".to_string(),
                }
                .into());
            }
            Some(login) if login.protected => {
                return Err(InvalidInputError::Route {
                    value: login.name.clone(),
                    reason: "redirect target route must not be protected".to_string(),
                }
                .into());
            }
            Some(_) => {}
        }

        Ok(Self { routes, guard })
    }

    /// Look up a route by name.
    pub fn route(&self, name: &str) -> Option<&RouteDef> {
        self.routes.iter().find(|r| r.name == name)
    }

    /// Look up a route by path. Query strings and trailing slashes are ignored.
    pub fn resolve(&self, path: &str) -> Option<&RouteDef> {
        let wanted = normalize(path);
        self.routes.iter().find(|r| normalize(&r.path) == wanted)
    }

    pub fn guard(&self) -> &NavigationGuard<S> {
        &self.guard
    }

    /// Navigate to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if no route matches `path`.
    pub async fn navigate(&self, path: &str, from: Option<&RouteDescriptor>) -> Result<Resolution> {
        let target = self.resolve(path).ok_or_else(|| InvalidInputError::Route {
            value: path.to_string(),
            reason: "no route matches this path".to_string(),
        })?;

        if !target.protected {
            debug!(route = %target.name, "Entering public route");
            return Ok(Resolution {
                route: target.descriptor(),
                redirected_from: None,
            });
        }

        match self.guard.before_enter(&target.descriptor(), from).await {
            Navigation::Allow => Ok(Resolution {
                route: target.descriptor(),
                redirected_from: None,
            }),
            Navigation::Redirect(RouteTarget::Named(name)) => {
                let redirect = self.route(&name).ok_or_else(|| InvalidInputError::Route {
                    value: name.clone(),
                    reason: "redirect target route is not defined".to_string(),
                })?;
                info!(from = %target.name, to = %redirect.name, "Navigation redirected");
                Ok(Resolution {
                    route: redirect.descriptor(),
                    redirected_from: Some(target.descriptor()),
                })
            }
        }
    }
}

fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}
