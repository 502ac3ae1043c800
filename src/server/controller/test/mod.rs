use axum::{
    extract::{Query, State},
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use test_utils::{
    builder::TestBuilder,
    discord::{MockDiscord, AUTH_CODE, BOT_TOKEN, USER_TOKEN},
    factory,
};
use tower_sessions::Session;

use crate::{
    model::user::UserDto,
    server::{
        config::Config,
        middleware::session::{AuthSession, CsrfSession},
        startup::{setup_oauth_client, setup_reqwest_client},
        state::AppState,
    },
};


/// Builds the application state against the mock Discord API.
fn app_state(discord: &MockDiscord, bot_token: Option<&str>) -> AppState {
    let mut vars = vec![
        ("DISCORD_CLIENT_ID", "client"),
        ("DISCORD_CLIENT_SECRET", "secret"),
        (
            "DISCORD_REDIRECT_URL",
            "http://localhost:8080/api/auth/callback",
        ),
        ("DISCORD_API_URL", discord.url.as_str()),
    ];
    if let Some(token) = bot_token {
        vars.push(("DISCORD_BOT_TOKEN", token));
    }

    let mut config = Config::from_lookup(|name: &str| {
        vars.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.to_string())
    })
    .unwrap();
    config.discord_token_url = discord.token_url();

    let http_client = setup_reqwest_client().unwrap();
    let oauth_client = setup_oauth_client(&config).unwrap();

    AppState::new(&config, http_client, oauth_client)
}

fn user(id: &str) -> UserDto {
    UserDto {
        id: id.to_string(),
        username: "tester".to_string(),
        global_name: None,
        avatar: None,
    }
}

async fn logged_in(session: &Session, id: &str) {
    AuthSession::new(session)
        .login(&user(id), USER_TOKEN)
        .await
        .unwrap();
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &Response) -> &str {
    response.headers()[LOCATION].to_str().unwrap()
}
