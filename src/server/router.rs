use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

use crate::{
    model::{
        api::ErrorDto,
        discord::{GuildDto, GuildMemberDto},
        user::UserDto,
    },
    server::{
        controller::{
            auth::{self, callback, get_user, login, logout},
            discord::{self, get_common_guilds, get_member_details},
        },
        state::AppState,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login,
        auth::callback,
        auth::logout,
        auth::get_user,
        discord::get_common_guilds,
        discord::get_member_details,
    ),
    components(schemas(ErrorDto, GuildDto, GuildMemberDto, UserDto)),
    tags(
        (name = "auth", description = "Discord login"),
        (name = "discord", description = "Discord server lookups"),
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", get(login))
        .route("/api/auth/callback", get(callback))
        .route("/api/auth/logout", get(logout))
        .route("/api/auth/user", get(get_user))
        .route("/api/discord/servers", get(get_common_guilds))
        .route("/api/discord/member-details", get(get_member_details))
        .route("/api/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
}
