//! REST transport for the auth backend.
//!
//! This module provides the HTTP client and the wire types of the auth
//! endpoints.

mod client;
mod endpoints;

pub(crate) use client::ApiClient;
pub(crate) use endpoints::*;
