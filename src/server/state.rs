//! Application state shared across all request handlers.
//!
//! This module defines the `AppState` struct which holds all shared resources and
//! dependencies needed by the application. The state is initialized once during startup
//! and then cloned for each request handler through Axum's state extraction.
//!
//! The state includes:
//! - HTTP client for the OAuth2 token exchange
//! - Retrying fetcher for Discord API lookups
//! - OAuth2 client for Discord authentication
//! - Discord API base URL and bot token from configuration
//! - Common guild cache
//! - Application URL for redirects

use oauth2::basic::{BasicErrorResponseType, BasicTokenType};
use oauth2::{
    Client, EmptyExtraTokenFields, EndpointNotSet, EndpointSet, RevocationErrorResponseType,
    StandardErrorResponse, StandardRevocableToken, StandardTokenIntrospectionResponse,
    StandardTokenResponse,
};

use crate::server::{
    config::Config,
    service::discord::{CommonGuildCache, RetryingFetcher},
};

/// Type alias for the OAuth2 client configured for Discord authentication.
pub(crate) type OAuth2Client = Client<
    StandardErrorResponse<BasicErrorResponseType>,
    StandardTokenResponse<EmptyExtraTokenFields, BasicTokenType>,
    StandardTokenIntrospectionResponse<EmptyExtraTokenFields, BasicTokenType>,
    StandardRevocableToken,
    StandardErrorResponse<RevocationErrorResponseType>,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// Application state containing shared resources and dependencies.
///
/// All fields use cheap-to-clone types:
/// - `reqwest::Client` and `RetryingFetcher` use an `Arc` internally
/// - `OAuth2Client` is designed to be cloned
/// - `CommonGuildCache` uses `Arc` for shared state
/// - `String` is cloned when needed
#[derive(Clone)]
pub struct AppState {
    /// HTTP client for the OAuth2 token exchange.
    ///
    /// Configured without redirects as required for OAuth2 token requests.
    pub http_client: reqwest::Client,

    /// Retrying fetcher for Discord REST API lookups.
    ///
    /// Shares the connection pool of `http_client`.
    pub fetcher: RetryingFetcher,

    /// OAuth2 client for Discord authentication flow.
    pub oauth_client: OAuth2Client,

    /// Discord REST API base URL, without trailing slash.
    pub discord_api_url: String,

    /// Bot token used to list the bot's guilds.
    ///
    /// `None` when not configured; requests needing it fail with a configuration error.
    pub discord_bot_token: Option<String>,

    /// Cache of common guild lists per Discord user.
    pub guild_cache: CommonGuildCache,

    /// Application base URL, target of post-login and post-logout redirects.
    pub app_url: String,
}

impl AppState {
    /// Creates a new application state from configuration and initialized clients.
    ///
    /// # Arguments
    /// - `config` - Validated application configuration
    /// - `http_client` - HTTP client for external API requests
    /// - `oauth_client` - OAuth2 client for Discord authentication
    ///
    /// # Returns
    /// - `AppState` - Initialized application state ready for use
    pub fn new(config: &Config, http_client: reqwest::Client, oauth_client: OAuth2Client) -> Self {
        Self {
            fetcher: RetryingFetcher::new(http_client.clone()),
            http_client,
            oauth_client,
            discord_api_url: config.discord_api_url.clone(),
            discord_bot_token: config.discord_bot_token.clone(),
            guild_cache: CommonGuildCache::new(config.guild_cache_ttl),
            app_url: config.app_url.clone(),
        }
    }
}
