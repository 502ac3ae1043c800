//! OAuth2 login with Discord

use oauth2::{CsrfToken, Scope};
use url::Url;

use crate::server::{service::discord::RetryingFetcher, state::OAuth2Client};

pub mod callback;

/// Service for the Discord OAuth2 authorization code flow.
///
/// Only obtains the user's access token and profile; nothing is persisted beyond the
/// session, the token is used for later Discord lookups on the user's behalf.
pub struct AuthService<'a> {
    /// HTTP client used for the token exchange.
    pub http_client: &'a reqwest::Client,
    /// OAuth2 client for Discord authentication flow.
    pub oauth_client: &'a OAuth2Client,
    /// Fetcher used to read the user's profile after the exchange.
    pub fetcher: &'a RetryingFetcher,
    /// Discord REST API base URL.
    pub api_url: &'a str,
}

impl<'a> AuthService<'a> {
    pub fn new(
        http_client: &'a reqwest::Client,
        oauth_client: &'a OAuth2Client,
        fetcher: &'a RetryingFetcher,
        api_url: &'a str,
    ) -> Self {
        Self {
            http_client,
            oauth_client,
            fetcher,
            api_url,
        }
    }

    /// Generates a Discord OAuth2 login URL with CSRF protection.
    ///
    /// Creates an authorization URL that redirects users to Discord's OAuth2 consent screen.
    /// Requests scopes for user identity, guild list, and guild member information. Returns
    /// both the URL and CSRF token for callback validation.
    ///
    /// # Returns
    /// - `(Url, CsrfToken)` - Tuple containing the authorization URL and CSRF state token
    pub fn login_url(&self) -> (Url, CsrfToken) {
        let (authorize_url, csrf_state) = self
            .oauth_client
            .authorize_url(CsrfToken::new_random)
            // Request scope to retrieve user information, guilds, and guild member info
            .add_scope(Scope::new("identify".to_string()))
            .add_scope(Scope::new("guilds".to_string()))
            .add_scope(Scope::new("guilds.members.read".to_string()))
            .url();

        (authorize_url, csrf_state)
    }
}
