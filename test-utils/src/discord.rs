//! Mock Discord REST API.
//!
//! Serves the subset of Discord's API the server calls, on `127.0.0.1` with a random
//! port. Each endpoint can be scripted to fail a number of times before answering, and
//! counts the requests it receives so tests can assert on retries.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use axum::{
    extract::{Form, Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, task::JoinHandle};

use crate::error::TestError;

/// OAuth2 access token accepted by the mock as the logged in user.
pub const USER_TOKEN: &str = "user-token";

/// Bot token accepted by the mock.
pub const BOT_TOKEN: &str = "bot-token";

/// Authorization code the mock token endpoint exchanges for `USER_TOKEN`.
pub const AUTH_CODE: &str = "auth-code";

/// Scripted behaviour of one endpoint.
pub(crate) struct Endpoint {
    body: Value,
    /// Remaining requests to answer with the failure status.
    failures: AtomicUsize,
    hits: AtomicUsize,
}

impl Endpoint {
    pub(crate) fn new(body: Value, failures: usize) -> Self {
        Self {
            body,
            failures: AtomicUsize::new(failures),
            hits: AtomicUsize::new(0),
        }
    }

    fn respond(&self, failure_status: StatusCode) -> Response {
        self.hits.fetch_add(1, Ordering::SeqCst);

        let should_fail = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| {
                remaining.checked_sub(1)
            })
            .is_ok();

        if should_fail {
            return (
                failure_status,
                Json(json!({ "message": "Scripted failure", "code": 0 })),
            )
                .into_response();
        }

        (StatusCode::OK, Json(self.body.clone())).into_response()
    }
}

pub(crate) struct MockDiscordState {
    pub(crate) user_guilds: Endpoint,
    pub(crate) bot_guilds: Endpoint,
    pub(crate) current_user: Endpoint,
    pub(crate) member: Endpoint,
    pub(crate) token_exchanges: AtomicUsize,
    pub(crate) failure_status: StatusCode,
    pub(crate) member_guild_ids: Mutex<Vec<String>>,
}

/// Handle on a running mock Discord API.
///
/// The server task is aborted when the handle is dropped.
pub struct MockDiscord {
    /// Base URL to use in place of `https://discord.com/api/v10`.
    pub url: String,
    state: Arc<MockDiscordState>,
    handle: JoinHandle<()>,
}

impl MockDiscord {
    pub(crate) async fn start(state: MockDiscordState) -> Result<Self, TestError> {
        let state = Arc::new(state);

        let router = Router::new()
            .route("/users/@me", get(current_user))
            .route("/users/@me/guilds", get(list_guilds))
            .route("/users/@me/guilds/{guild_id}/member", get(guild_member))
            .route("/oauth2/token", post(exchange_token))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            url: format!("http://{}", addr),
            state,
            handle,
        })
    }

    /// Requests received on `GET /users/@me/guilds` with the user token.
    pub fn user_guild_hits(&self) -> usize {
        self.state.user_guilds.hits.load(Ordering::SeqCst)
    }

    /// Requests received on `GET /users/@me/guilds` with the bot token.
    pub fn bot_guild_hits(&self) -> usize {
        self.state.bot_guilds.hits.load(Ordering::SeqCst)
    }

    /// Requests received on `GET /users/@me`.
    pub fn current_user_hits(&self) -> usize {
        self.state.current_user.hits.load(Ordering::SeqCst)
    }

    /// Requests received on `GET /users/@me/guilds/{guild_id}/member`.
    pub fn member_hits(&self) -> usize {
        self.state.member.hits.load(Ordering::SeqCst)
    }

    /// Guild IDs requested on the member endpoint, in order.
    pub fn member_guild_ids(&self) -> Vec<String> {
        self.state
            .member_guild_ids
            .lock()
            .map(|ids| ids.clone())
            .unwrap_or_default()
    }

    /// Requests received on `POST /oauth2/token`.
    pub fn token_exchange_hits(&self) -> usize {
        self.state.token_exchanges.load(Ordering::SeqCst)
    }

    /// URL of the mock OAuth2 token endpoint.
    pub fn token_url(&self) -> String {
        format!("{}/oauth2/token", self.url)
    }

    /// Total number of requests received by the mock.
    pub fn total_hits(&self) -> usize {
        self.user_guild_hits()
            + self.bot_guild_hits()
            + self.current_user_hits()
            + self.member_hits()
            + self.token_exchange_hits()
    }
}

impl Drop for MockDiscord {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Returns a URL on which nothing listens, to provoke connection errors.
///
/// Binds a random local port and releases it immediately.
pub async fn unreachable_url() -> Result<String, TestError> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    Ok(format!("http://{}", addr))
}

enum Caller {
    User,
    Bot,
}

fn caller(headers: &HeaderMap) -> Option<Caller> {
    let authorization = headers.get(AUTHORIZATION)?.to_str().ok()?;

    if authorization == format!("Bearer {}", USER_TOKEN) {
        Some(Caller::User)
    } else if authorization == format!("Bot {}", BOT_TOKEN) {
        Some(Caller::Bot)
    } else {
        None
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "401: Unauthorized", "code": 0 })),
    )
        .into_response()
}

async fn list_guilds(State(state): State<Arc<MockDiscordState>>, headers: HeaderMap) -> Response {
    match caller(&headers) {
        Some(Caller::User) => state.user_guilds.respond(state.failure_status),
        Some(Caller::Bot) => state.bot_guilds.respond(state.failure_status),
        None => unauthorized(),
    }
}

async fn current_user(State(state): State<Arc<MockDiscordState>>, headers: HeaderMap) -> Response {
    match caller(&headers) {
        Some(Caller::User) => state.current_user.respond(state.failure_status),
        _ => unauthorized(),
    }
}

async fn guild_member(
    State(state): State<Arc<MockDiscordState>>,
    Path(guild_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    match caller(&headers) {
        Some(Caller::User) => {
            if let Ok(mut ids) = state.member_guild_ids.lock() {
                ids.push(guild_id);
            }
            state.member.respond(state.failure_status)
        }
        _ => unauthorized(),
    }
}

async fn exchange_token(
    State(state): State<Arc<MockDiscordState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    state.token_exchanges.fetch_add(1, Ordering::SeqCst);

    let valid = form.get("grant_type").map(String::as_str) == Some("authorization_code")
        && form.get("code").map(String::as_str) == Some(AUTH_CODE);

    if !valid {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant" })),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        Json(json!({
            "access_token": USER_TOKEN,
            "token_type": "Bearer",
            "expires_in": 604800,
            "refresh_token": "refresh-token",
            "scope": "identify guilds guilds.members.read"
        })),
    )
        .into_response()
}
