//! Server-side API backend and business logic.
//!
//! This module contains the backend of the application: the HTTP API used by the
//! character sheet front end, Discord login, and the Discord lookups the front end
//! cannot perform itself because they need the bot token. The backend uses Axum as the
//! web framework, tower-sessions for login state and reqwest for Discord's REST API.
//!
//! # Architecture
//!
//! The server follows a layered architecture with clear separation of concerns:
//!
//! - **Controller Layer** (`controller/`) - HTTP request handlers and DTO conversion
//! - **Service Layer** (`service/`) - Discord lookups, retry and the common guild computation
//! - **Error Layer** (`error/`) - Application error types and HTTP response mapping
//! - **Middleware** (`middleware/`) - Session wrappers and authentication guard
//!
//! # Infrastructure
//!
//! - **Configuration** (`config`) - Environment-based application configuration
//! - **State** (`state`) - Shared application state (HTTP clients, cache, config values)
//! - **Startup** (`startup`) - Initialization of sessions, clients and CORS
//! - **Router** (`router`) - Axum route configuration and API documentation
//!
//! # Request Flow
//!
//! 1. **Router** receives HTTP request and routes to appropriate controller
//! 2. **Session layer** loads the session referenced by the cookie
//! 3. **Controller** reads session data, calls the service
//! 4. **Service** calls Discord through the retrying fetcher and computes the result
//! 5. **Controller** returns the JSON response, or `AppError` maps the failure

pub mod config;
pub mod controller;
pub mod error;
pub mod middleware;
pub mod router;
pub mod service;
pub mod startup;
pub mod state;
pub mod util;
