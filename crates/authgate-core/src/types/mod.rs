//! Core value types.

mod api_url;
mod user;

pub use api_url::ApiUrl;
pub use user::{UserId, UserRecord};
