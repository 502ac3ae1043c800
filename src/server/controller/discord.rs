use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use dioxus_logger::tracing;
use serde::Deserialize;
use tower_sessions::Session;
use utoipa::IntoParams;

use crate::{
    model::{
        api::ErrorDto,
        discord::{GuildDto, GuildMemberDto},
    },
    server::{
        error::{auth::AuthError, AppError},
        middleware::session::AuthSession,
        service::discord::{CommonGuildService, GuildMemberService},
        state::AppState,
        util::parse::parse_guild_id,
    },
};

pub static DISCORD_TAG: &str = "discord";

/// Query parameters for the member details endpoint.
#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MemberDetailsParams {
    /// Discord guild ID.
    pub guild_id: Option<String>,
}

/// GET /api/discord/servers - Get the servers shared by the user and the bot
///
/// Returns the logged in user's Discord servers in which the bot is also present, in
/// the order Discord lists them for the user. Results are cached per user.
#[utoipa::path(
    get,
    path = "/api/discord/servers",
    tag = DISCORD_TAG,
    responses(
        (status = 200, description = "Servers shared with the bot", body = Vec<GuildDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Bot token not configured", body = ErrorDto),
        (status = 502, description = "Discord server lists could not be retrieved", body = ErrorDto)
    ),
)]
pub async fn get_common_guilds(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let auth_session = AuthSession::new(&session);
    let user = auth_session.get_user().await?;
    let user_token = auth_session.get_provider_token().await?;

    let cache_key = match (&user, &user_token) {
        (Some(user), Some(_)) => Some(user.id.as_str()),
        _ => None,
    };

    if let Some(user_id) = cache_key {
        if let Some(guilds) = state.guild_cache.get(user_id).await {
            tracing::debug!("Serving cached common servers for user {}", user_id);
            return Ok((StatusCode::OK, Json(guilds)));
        }
    }

    let guilds = CommonGuildService::new(&state.fetcher, &state.discord_api_url)
        .compute(user_token.as_deref(), state.discord_bot_token.as_deref())
        .await?;

    if let Some(user_id) = cache_key {
        state.guild_cache.insert(user_id, guilds.clone()).await;
    }

    Ok((StatusCode::OK, Json(guilds)))
}

/// GET /api/discord/member-details - Get the user's member details in a server
///
/// # Query Parameters
/// - `guild_id`: Discord guild ID
#[utoipa::path(
    get,
    path = "/api/discord/member-details",
    tag = DISCORD_TAG,
    params(MemberDetailsParams),
    responses(
        (status = 200, description = "Member details of the user", body = GuildMemberDto),
        (status = 400, description = "Missing or invalid guild_id", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 502, description = "Discord member lookup failed", body = ErrorDto)
    ),
)]
pub async fn get_member_details(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<MemberDetailsParams>,
) -> Result<impl IntoResponse, AppError> {
    let Some(user_token) = AuthSession::new(&session).get_provider_token().await? else {
        return Err(AuthError::MissingProviderToken.into());
    };

    let Some(guild_id) = params.guild_id else {
        return Err(AppError::BadRequest("Missing guild_id".to_string()));
    };
    let guild_id = parse_guild_id(&guild_id)?;

    let member = GuildMemberService::new(&state.fetcher, &state.discord_api_url)
        .get_current_member(&user_token, guild_id)
        .await?;

    Ok((StatusCode::OK, Json(member)))
}
