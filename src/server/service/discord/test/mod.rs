use std::time::{Duration, Instant};

use axum::http::StatusCode;
use test_utils::{
    builder::TestBuilder,
    discord::{unreachable_url, BOT_TOKEN, USER_TOKEN},
    factory,
};

use crate::{
    model::discord::GuildDto,
    server::{
        error::{
            auth::AuthError,
            config::ConfigError,
            upstream::{UpstreamError, UpstreamSource},
            AppError,
        },
        service::discord::{
            fetch::{Credential, DEFAULT_MAX_ATTEMPTS, RETRY_DELAY},
            CommonGuildService, DiscordUserService, GuildMemberService, RetryingFetcher,
        },
    },
};

mod fetch;
mod guild_member;

fn fetcher() -> RetryingFetcher {
    RetryingFetcher::new(reqwest::Client::new())
}

fn guild_ids(guilds: &[GuildDto]) -> Vec<&str> {
    guilds.iter().map(|g| g.id.as_str()).collect()
}
