use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dioxus_logger::tracing;
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum AuthError {
    /// No Discord access token is stored in the session.
    ///
    /// The caller either never logged in or the session expired. Discord API
    /// calls on behalf of the user are impossible without this token.
    #[error("No Discord access token in session")]
    MissingProviderToken,

    /// No Discord user is stored in the session.
    #[error("User not found in session")]
    UserNotInSession,

    /// CSRF state validation failed during OAuth callback.
    ///
    /// The CSRF state token in the OAuth callback URL does not match the token stored
    /// in the session, indicating a potential CSRF attack or an invalid callback request.
    #[error("Failed to login user due to CSRF state mismatch")]
    CsrfValidationFailed,

    /// Exchanging the OAuth2 authorization code for an access token failed.
    #[error("Failed to exchange authorization code: {0}")]
    TokenExchange(String),
}

/// Converts authentication errors into HTTP responses.
///
/// - `MissingProviderToken` / `UserNotInSession` → 401 Unauthorized with "User not authenticated"
/// - `CsrfValidationFailed` → 400 Bad Request with "There was an issue logging you in"
/// - `TokenExchange` → 502 Bad Gateway with "There was an issue logging you in"
///
/// All errors are logged at debug level for diagnostics while keeping client-facing messages
/// generic to avoid information leakage.
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        let (status, message) = match self {
            Self::MissingProviderToken | Self::UserNotInSession => {
                (StatusCode::UNAUTHORIZED, "User not authenticated.")
            }
            Self::CsrfValidationFailed => (
                StatusCode::BAD_REQUEST,
                "There was an issue logging you in, please try again.",
            ),
            Self::TokenExchange(_) => (
                StatusCode::BAD_GATEWAY,
                "There was an issue logging you in, please try again.",
            ),
        };

        (
            status,
            Json(ErrorDto {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}
