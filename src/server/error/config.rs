use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dioxus_logger::tracing;
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is not set.
    ///
    /// The application requires this environment variable to be defined. Check the
    /// documentation or `.env.example` file for required configuration variables.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Environment variable is set but its value cannot be used.
    #[error("Invalid value for environment variable {name}: {reason}")]
    InvalidEnvVar {
        /// Name of the offending variable
        name: String,
        /// Why the value was rejected
        reason: String,
    },

    /// The Discord bot token is not configured.
    ///
    /// The server starts without it, but every request that needs to act as the
    /// bot fails until `DISCORD_BOT_TOKEN` is provided.
    #[error("Discord bot token is not configured (DISCORD_BOT_TOKEN)")]
    MissingBotToken,
}

/// Converts configuration errors into HTTP responses.
///
/// Configuration problems are operator mistakes, so the full error is logged at error
/// level and the client only receives a generic 500 response.
impl IntoResponse for ConfigError {
    fn into_response(self) -> Response {
        tracing::error!("Server misconfiguration: {}", self);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto {
                error: "Server is misconfigured, please contact an administrator.".to_string(),
            }),
        )
            .into_response()
    }
}
