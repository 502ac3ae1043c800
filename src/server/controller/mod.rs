//! HTTP request handlers.
//!
//! Controllers read the session, call the matching service and convert the result
//! into a JSON response. Errors are returned as `AppError` and mapped to responses
//! in `server::error`.

pub mod auth;
pub mod discord;

#[cfg(test)]
mod test;
