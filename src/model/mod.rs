//! Data transfer objects shared between the HTTP API and its callers.

pub mod api;
pub mod discord;
pub mod user;
