use crate::{
    model::user::UserDto,
    server::{
        error::{auth::AuthError, upstream::UpstreamSource, AppError},
        service::discord::fetch::{Credential, RetryingFetcher, DEFAULT_MAX_ATTEMPTS},
    },
};

pub struct DiscordUserService<'a> {
    fetcher: &'a RetryingFetcher,
    api_url: &'a str,
}

impl<'a> DiscordUserService<'a> {
    pub fn new(fetcher: &'a RetryingFetcher, api_url: &'a str) -> Self {
        Self { fetcher, api_url }
    }

    /// Retrieves a Discord user's information using provided access token.
    ///
    /// Fetches the authenticated user's Discord profile data including their ID, username
    /// and avatar. Uses the Discord API's "@me" endpoint.
    ///
    /// # Arguments
    /// - `access_token` - OAuth2 access token for the authenticated user
    ///
    /// # Returns
    /// - `Ok(UserDto)` - Successfully retrieved user information
    /// - `Err(AppError::AuthErr(TokenExchange))` - Token cannot be sent as a header
    /// - `Err(AppError::UpstreamErr(_))` - HTTP request failed or response parsing failed
    pub async fn get_current_user(&self, access_token: &str) -> Result<UserDto, AppError> {
        let headers = Credential::User(access_token)
            .headers()
            .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

        let url = format!("{}/users/@me", self.api_url);

        let user = self
            .fetcher
            .fetch_json(
                &url,
                headers,
                DEFAULT_MAX_ATTEMPTS,
                UpstreamSource::CurrentUser,
            )
            .await?;

        Ok(user)
    }
}
