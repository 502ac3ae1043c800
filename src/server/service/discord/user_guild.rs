use std::collections::HashSet;

use dioxus_logger::tracing;

use crate::{
    model::discord::GuildDto,
    server::{
        error::{
            auth::AuthError,
            config::ConfigError,
            upstream::{UpstreamError, UpstreamSource},
            AppError,
        },
        service::discord::fetch::{Credential, RetryingFetcher, DEFAULT_MAX_ATTEMPTS},
    },
};

/// Computes the guilds shared by the logged in user and the bot.
///
/// Both guild lists are read from Discord's `GET /users/@me/guilds`, once with the
/// user's OAuth2 token and once with the bot token. Nothing is retained between calls.
pub struct CommonGuildService<'a> {
    fetcher: &'a RetryingFetcher,
    api_url: &'a str,
}

impl<'a> CommonGuildService<'a> {
    pub fn new(fetcher: &'a RetryingFetcher, api_url: &'a str) -> Self {
        Self { fetcher, api_url }
    }

    /// Returns the user's guilds in which the bot is also present.
    ///
    /// Credentials are checked before any request is sent. The two guild lists are
    /// fetched concurrently, each with up to `DEFAULT_MAX_ATTEMPTS` attempts. When both
    /// fetches fail the user side is reported.
    ///
    /// # Arguments
    /// - `user_token` - OAuth2 access token from the session, if any
    /// - `bot_token` - Bot token from configuration, if any
    ///
    /// # Returns
    /// - `Ok(Vec<GuildDto>)` - Common guilds in the order of the user's list, possibly empty
    /// - `Err(AppError::AuthErr(MissingProviderToken))` - No usable user token
    /// - `Err(AppError::ConfigErr(MissingBotToken))` - Bot token not configured
    /// - `Err(AppError::UpstreamErr(_))` - A guild list could not be retrieved
    pub async fn compute(
        &self,
        user_token: Option<&str>,
        bot_token: Option<&str>,
    ) -> Result<Vec<GuildDto>, AppError> {
        let Some(user_token) = user_token else {
            return Err(AuthError::MissingProviderToken.into());
        };
        let Some(bot_token) = bot_token else {
            return Err(ConfigError::MissingBotToken.into());
        };

        let user_headers = Credential::User(user_token)
            .headers()
            .map_err(|_| AuthError::MissingProviderToken)?;
        let bot_headers = Credential::Bot(bot_token)
            .headers()
            .map_err(|e| ConfigError::InvalidEnvVar {
                name: "DISCORD_BOT_TOKEN".to_string(),
                reason: e.to_string(),
            })?;

        let (user_guilds, bot_guilds) = tokio::join!(
            self.fetch_guilds(user_headers, UpstreamSource::UserGuilds),
            self.fetch_guilds(bot_headers, UpstreamSource::BotGuilds),
        );
        let user_guilds = user_guilds?;
        let bot_guilds = bot_guilds?;

        let common_guilds = intersect_guilds(user_guilds, &bot_guilds);

        tracing::debug!(
            "Found {} guilds shared with the bot ({} bot guilds)",
            common_guilds.len(),
            bot_guilds.len()
        );

        Ok(common_guilds)
    }

    async fn fetch_guilds(
        &self,
        headers: reqwest::header::HeaderMap,
        upstream: UpstreamSource,
    ) -> Result<Vec<GuildDto>, UpstreamError> {
        let url = format!("{}/users/@me/guilds", self.api_url);

        self.fetcher
            .fetch_json(&url, headers, DEFAULT_MAX_ATTEMPTS, upstream)
            .await
    }
}

/// Keeps the user guilds whose id appears in the bot guild list.
///
/// Builds a set of bot guild ids first, so the cost is linear in the size of both lists.
/// The user list order is preserved and no deduplication is performed.
pub fn intersect_guilds(user_guilds: Vec<GuildDto>, bot_guilds: &[GuildDto]) -> Vec<GuildDto> {
    let bot_guild_ids: HashSet<&str> = bot_guilds.iter().map(|g| g.id.as_str()).collect();

    user_guilds
        .into_iter()
        .filter(|guild| bot_guild_ids.contains(guild.id.as_str()))
        .collect()
}
