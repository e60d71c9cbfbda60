//! Authentication state as seen by a navigation guard.

use async_trait::async_trait;

use crate::Result;

/// The view of a session a [`NavigationGuard`](crate::NavigationGuard) needs.
#[async_trait]
pub trait AuthSession: Send + Sync {
    /// Returns true if a credential is held. Must not touch the network.
    fn is_authenticated(&self) -> bool;

    /// Validate the credential against the backend.
    ///
    /// Implementations should degrade failures to `Ok(false)`; an `Err` is
    /// treated by guards as an unexpected fault.
    async fn check_auth(&self) -> Result<bool>;
}

#[async_trait]
impl<T: AuthSession + ?Sized> AuthSession for std::sync::Arc<T> {
    fn is_authenticated(&self) -> bool {
        (**self).is_authenticated()
    }

    async fn check_auth(&self) -> Result<bool> {
        (**self).check_auth().await
    }
}
