//! authgate-core - Core types and traits for client-side auth sessions.
//!
//! This crate holds everything that does not touch the network: the
//! credential and user types, deployment configuration, the persisted
//! snapshot format, and the navigation guard that gates protected routes
//! on an [`AuthSession`].

pub mod config;
pub mod credentials;
pub mod error;
pub mod guard;
pub mod router;
pub mod snapshot;
pub mod storage;
pub mod tokens;
pub mod traits;
pub mod types;

pub use config::{AuthConfig, AuthScheme, Endpoints, LoginField, RenewalStrategy};
pub use credentials::{Credentials, Registration};
pub use error::Error;
pub use guard::{LOGIN_ROUTE, Navigation, NavigationGuard, RouteDescriptor, RouteTarget};
pub use router::{Resolution, RouteDef, Router};
pub use snapshot::Snapshot;
pub use storage::MemoryStorage;
pub use tokens::{AccessToken, RefreshToken, RenewalCredential, SessionId};
pub use traits::{AuthSession, SessionStorage, StorageOp};
pub use types::{ApiUrl, UserId, UserRecord};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
