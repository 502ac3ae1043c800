//! Service layer for business logic and orchestration.
//!
//! This module contains the service layer of the application, which sits between the
//! controller (API) layer and Discord's REST API. Services are responsible for:
//!
//! - **Business Logic**: Implementing core rules such as the common guild computation
//! - **Orchestration**: Coordinating multiple Discord API calls
//! - **Error Mapping**: Turning transport failures into typed application errors

pub mod auth;
pub mod discord;
