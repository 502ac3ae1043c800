use axum::http::{header, HeaderValue, Method};
use dioxus_logger::tracing;
use oauth2::{basic::BasicClient, AuthUrl, ClientId, ClientSecret, RedirectUrl, TokenUrl};
use time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::server::{
    config::Config,
    error::{config::ConfigError, AppError},
    state::OAuth2Client,
};

/// Creates the session layer backed by an in-memory store.
///
/// Sessions expire after 7 days of inactivity. They hold the Discord user and their
/// access token only, so losing them on restart just requires logging in again. The
/// cookie is marked secure when the application is served over HTTPS.
///
/// # Returns
/// - `SessionManagerLayer<MemoryStore>` - Layer to apply on the router
pub fn setup_session(config: &Config) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_secure(config.app_url.starts_with("https://"))
        .with_expiry(Expiry::OnInactivity(Duration::days(7)))
}

/// Builds the HTTP client shared by the OAuth2 exchange and Discord lookups.
///
/// Redirects are disabled, following the oauth2 crate's guidance against SSRF through
/// token endpoint redirects.
///
/// # Returns
/// - `Ok(reqwest::Client)` - Configured client
/// - `Err(AppError::ReqwestErr(_))` - TLS backend could not be initialized
pub fn setup_reqwest_client() -> Result<reqwest::Client, AppError> {
    let client = reqwest::ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    Ok(client)
}

/// Builds the Discord OAuth2 client from configuration.
///
/// # Returns
/// - `Ok(OAuth2Client)` - Client with authorization, token and redirect URLs set
/// - `Err(AppError::ConfigErr(InvalidEnvVar))` - One of the URLs is malformed
pub fn setup_oauth_client(config: &Config) -> Result<OAuth2Client, AppError> {
    let invalid = |name: &str| {
        let name = name.to_string();
        move |e: url::ParseError| ConfigError::InvalidEnvVar {
            name,
            reason: e.to_string(),
        }
    };

    let client = BasicClient::new(ClientId::new(config.discord_client_id.clone()))
        .set_client_secret(ClientSecret::new(config.discord_client_secret.clone()))
        .set_auth_uri(
            AuthUrl::new(config.discord_auth_url.clone()).map_err(invalid("DISCORD_AUTH_URL"))?,
        )
        .set_token_uri(
            TokenUrl::new(config.discord_token_url.clone()).map_err(invalid("DISCORD_TOKEN_URL"))?,
        )
        .set_redirect_uri(
            RedirectUrl::new(config.discord_redirect_url.clone())
                .map_err(invalid("DISCORD_REDIRECT_URL"))?,
        );

    Ok(client)
}

/// Builds the CORS layer for the configured front end origins.
///
/// Credentials are allowed so the session cookie is sent with cross-origin requests.
///
/// # Returns
/// - `Ok(None)` - No origins configured, CORS is not needed
/// - `Ok(Some(CorsLayer))` - Layer allowing GET requests from the configured origins
/// - `Err(AppError::ConfigErr(InvalidEnvVar))` - An origin is not a valid header value
pub fn setup_cors(config: &Config) -> Result<Option<CorsLayer>, AppError> {
    if config.allowed_origins.is_empty() {
        return Ok(None);
    }

    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|e| ConfigError::InvalidEnvVar {
                name: "ALLOWED_ORIGINS".to_string(),
                reason: format!("{}: {}", origin, e),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    Ok(Some(cors))
}

/// Logs configuration that is optional at startup but required by some endpoints.
pub fn check_optional_config(config: &Config) {
    if config.discord_bot_token.is_none() {
        tracing::warn!(
            "DISCORD_BOT_TOKEN is not set, common server lookups will fail until it is configured"
        );
    }
}
