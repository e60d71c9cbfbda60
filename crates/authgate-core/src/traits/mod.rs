//! Core traits for session storage and access checks.

mod session;
mod storage;

pub use session::AuthSession;
pub use storage::{SessionStorage, StorageOp};
