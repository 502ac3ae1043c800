use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dioxus_logger::tracing;
use thiserror::Error;

use crate::model::api::ErrorDto;

/// Discord API call that an `UpstreamError` originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamSource {
    /// `GET /users/@me/guilds` as the logged in user
    UserGuilds,
    /// `GET /users/@me/guilds` as the bot
    BotGuilds,
    /// `GET /users/@me` as the logged in user
    CurrentUser,
    /// `GET /users/@me/guilds/{guild_id}/member` as the logged in user
    GuildMember,
}

impl fmt::Display for UpstreamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UserGuilds => "user guild list",
            Self::BotGuilds => "bot guild list",
            Self::CurrentUser => "current user",
            Self::GuildMember => "guild member details",
        };
        f.write_str(name)
    }
}

/// Failure of a Discord API call after the retrying fetcher gave up.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Discord answered with a non-success status on the final attempt.
    #[error("Discord returned {status} for the {upstream}")]
    Status {
        upstream: UpstreamSource,
        status: StatusCode,
    },

    /// No response could be obtained on the final attempt.
    #[error("Request for the {upstream} failed: {error}")]
    Network {
        upstream: UpstreamSource,
        #[source]
        error: reqwest::Error,
    },

    /// Discord answered with a success status but the body did not match the expected shape.
    #[error("Failed to decode the {upstream} response: {error}")]
    Decode {
        upstream: UpstreamSource,
        #[source]
        error: reqwest::Error,
    },
}

impl UpstreamError {
    /// Which Discord API call failed.
    pub fn upstream(&self) -> UpstreamSource {
        match self {
            Self::Status { upstream, .. }
            | Self::Network { upstream, .. }
            | Self::Decode { upstream, .. } => *upstream,
        }
    }
}

/// Converts upstream errors into 502 Bad Gateway responses.
///
/// The message tells the client which Discord lookup failed; status codes and
/// transport errors are only logged.
impl IntoResponse for UpstreamError {
    fn into_response(self) -> Response {
        tracing::error!("Discord API failure: {}", self);

        let message = match self.upstream() {
            UpstreamSource::UserGuilds => {
                "Failed to retrieve the user's servers after several attempts."
            }
            UpstreamSource::BotGuilds => {
                "Failed to retrieve the bot's servers after several attempts."
            }
            UpstreamSource::CurrentUser => "Failed to retrieve the Discord user.",
            UpstreamSource::GuildMember => "Failed to retrieve the member details.",
        };

        (
            StatusCode::BAD_GATEWAY,
            Json(ErrorDto {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}
