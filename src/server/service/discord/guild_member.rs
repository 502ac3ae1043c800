use crate::{
    model::discord::GuildMemberDto,
    server::{
        error::{auth::AuthError, upstream::UpstreamSource, AppError},
        service::discord::fetch::{Credential, RetryingFetcher},
    },
};

/// Member lookups are interactive and fail fast.
const MEMBER_LOOKUP_ATTEMPTS: u32 = 1;

pub struct GuildMemberService<'a> {
    fetcher: &'a RetryingFetcher,
    api_url: &'a str,
}

impl<'a> GuildMemberService<'a> {
    pub fn new(fetcher: &'a RetryingFetcher, api_url: &'a str) -> Self {
        Self { fetcher, api_url }
    }

    /// Retrieves the logged in user's member object for a guild.
    ///
    /// Uses the user's OAuth2 token against `GET /users/@me/guilds/{guild_id}/member`,
    /// which requires the `guilds.members.read` scope. The front end reads the guild
    /// nickname from the result.
    ///
    /// # Arguments
    /// - `user_token` - OAuth2 access token from the session
    /// - `guild_id` - Discord guild ID
    ///
    /// # Returns
    /// - `Ok(GuildMemberDto)` - Member details of the user in that guild
    /// - `Err(AppError::AuthErr(MissingProviderToken))` - Token cannot be sent as a header
    /// - `Err(AppError::UpstreamErr(_))` - Discord lookup failed
    pub async fn get_current_member(
        &self,
        user_token: &str,
        guild_id: u64,
    ) -> Result<GuildMemberDto, AppError> {
        let headers = Credential::User(user_token)
            .headers()
            .map_err(|_| AuthError::MissingProviderToken)?;

        let url = format!("{}/users/@me/guilds/{}/member", self.api_url, guild_id);

        let member = self
            .fetcher
            .fetch_json(
                &url,
                headers,
                MEMBER_LOOKUP_ATTEMPTS,
                UpstreamSource::GuildMember,
            )
            .await?;

        Ok(member)
    }
}
