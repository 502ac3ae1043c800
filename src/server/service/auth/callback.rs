use oauth2::{AuthorizationCode, TokenResponse};

use crate::{
    model::user::UserDto,
    server::{
        error::{auth::AuthError, AppError},
        service::{auth::AuthService, discord::DiscordUserService},
    },
};

/// Result of a completed login: the Discord user and their access token.
pub struct LoggedInUser {
    pub user: UserDto,
    pub access_token: String,
}

impl<'a> AuthService<'a> {
    /// Handles OAuth2 callback and authenticates user.
    ///
    /// Exchanges the authorization code for an access token, then fetches the user's
    /// Discord profile with it.
    ///
    /// # Arguments
    /// - `authorization_code` - OAuth2 authorization code from Discord callback
    ///
    /// # Returns
    /// - `Ok(LoggedInUser)` - Authenticated user with their access token
    /// - `Err(AppError::AuthErr(TokenExchange))` - OAuth2 token exchange failed
    /// - `Err(AppError::UpstreamErr(_))` - Failed to fetch user data from Discord API
    pub async fn callback(&self, authorization_code: String) -> Result<LoggedInUser, AppError> {
        let auth_code = AuthorizationCode::new(authorization_code);

        let token = self
            .oauth_client
            .exchange_code(auth_code)
            .request_async(self.http_client)
            .await
            .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

        let access_token = token.access_token().secret().clone();

        let user = DiscordUserService::new(self.fetcher, self.api_url)
            .get_current_user(&access_token)
            .await?;

        Ok(LoggedInUser { user, access_token })
    }
}
