//! authgate-http - HTTP-backed session store.
//!
//! [`SessionStore`] talks to a REST auth backend and keeps the resulting
//! session in a [`SessionStorage`](authgate_core::SessionStorage). It
//! implements [`AuthSession`](authgate_core::AuthSession), so it plugs
//! straight into a [`NavigationGuard`](authgate_core::NavigationGuard).

mod backend;
mod rest;
mod session;

pub use backend::{AuthBackend, LOGIN_FAILED, REGISTRATION_FAILED};
pub use session::SessionStore;
