use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Json,
};
use dioxus_logger::tracing;
use serde::Deserialize;
use tower_sessions::Session;
use utoipa::IntoParams;

use crate::{
    model::{api::ErrorDto, user::UserDto},
    server::{
        error::{auth::AuthError, AppError},
        middleware::{
            auth::AuthGuard,
            session::{AuthSession, CsrfSession},
        },
        service::auth::AuthService,
        state::AppState,
    },
};

pub static AUTH_TAG: &str = "auth";

/// Query parameters for the OAuth callback endpoint.
///
/// All fields are optional so a denied consent (`error` set, no `code`) still reaches
/// the handler instead of failing extraction.
///
/// # Fields
/// - `state` - CSRF protection token that must match the value stored in the session
/// - `code` - Authorization code used to exchange for access tokens
/// - `error` - OAuth2 error code sent by Discord when the user cancels
#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CallbackParams {
    /// CSRF state token to be validated against the session value.
    pub state: Option<String>,
    /// Authorization code from Discord SSO for token exchange.
    pub code: Option<String>,
    /// OAuth2 error, e.g. `access_denied`.
    pub error: Option<String>,
}

/// GET /api/auth/login - Redirect to Discord's OAuth2 consent screen
///
/// Stores a fresh CSRF token in the session before redirecting.
#[utoipa::path(
    get,
    path = "/api/auth/login",
    tag = AUTH_TAG,
    responses(
        (status = 307, description = "Redirect to Discord authorization page"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let auth_service = AuthService::new(
        &state.http_client,
        &state.oauth_client,
        &state.fetcher,
        &state.discord_api_url,
    );

    let (url, csrf_token) = auth_service.login_url();

    // Store CSRF token in session for verification during callback
    CsrfSession::new(&session)
        .set_token(csrf_token.secret())
        .await?;

    Ok(Redirect::temporary(url.as_str()))
}

/// GET /api/auth/callback - Complete the OAuth2 flow
///
/// Validates the CSRF state, exchanges the code for an access token and stores the
/// Discord user together with that token in the session. A callback without a code
/// (consent denied) redirects back to the application without logging in.
#[utoipa::path(
    get,
    path = "/api/auth/callback",
    tag = AUTH_TAG,
    params(CallbackParams),
    responses(
        (status = 303, description = "Logged in or consent denied, redirect to the application"),
        (status = 400, description = "CSRF state mismatch", body = ErrorDto),
        (status = 502, description = "Discord token exchange or user lookup failed", body = ErrorDto)
    ),
)]
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> Result<impl IntoResponse, AppError> {
    let auth_service = AuthService::new(
        &state.http_client,
        &state.oauth_client,
        &state.fetcher,
        &state.discord_api_url,
    );

    validate_csrf(&session, params.state.as_deref()).await?;

    let Some(code) = params.code else {
        tracing::debug!(
            "Discord login ended without a code: {}",
            params.error.as_deref().unwrap_or("no error given")
        );
        return Ok(Redirect::to(&state.app_url));
    };

    let logged_in = auth_service.callback(code).await?;

    AuthSession::new(&session)
        .login(&logged_in.user, &logged_in.access_token)
        .await?;

    Ok(Redirect::to(&state.app_url))
}

/// GET /api/auth/logout - Clear the session
///
/// Also drops the cached common servers of the user.
#[utoipa::path(
    get,
    path = "/api/auth/logout",
    tag = AUTH_TAG,
    responses(
        (status = 303, description = "Logged out, redirect to the application"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let auth_session = AuthSession::new(&session);

    if let Some(user) = auth_session.get_user().await? {
        state.guild_cache.invalidate(&user.id).await;
    }

    auth_session.clear().await;

    Ok(Redirect::to(&state.app_url))
}

/// GET /api/auth/user - Get the logged in Discord user
#[utoipa::path(
    get,
    path = "/api/auth/user",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Logged in user", body = UserDto),
        (status = 401, description = "User not authenticated", body = ErrorDto)
    ),
)]
pub async fn get_user(session: Session) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&session).require().await?;

    Ok((StatusCode::OK, Json(user)))
}

async fn validate_csrf(session: &Session, csrf_state: Option<&str>) -> Result<(), AppError> {
    let stored_state = CsrfSession::new(session).take_token().await?;

    if let (Some(stored), Some(received)) = (stored_state, csrf_state) {
        if stored == received {
            return Ok(());
        }
    }

    Err(AppError::AuthErr(AuthError::CsrfValidationFailed))
}
