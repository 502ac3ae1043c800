use super::*;

/// Tests that transient failures are retried until a success.
///
/// The user guild endpoint fails twice before answering. Two fixed delays are
/// waited in between, with no backoff growth.
///
/// Expected: Ok(200) after exactly 3 requests and roughly one second
#[tokio::test]
async fn retries_until_success() {
    let test = TestBuilder::new()
        .with_user_guilds(vec![factory::user_guild("1", "Tavern")])
        .failing_user_guild_requests(2)
        .build()
        .await
        .unwrap();
    let url = format!("{}/users/@me/guilds", test.discord.url);
    let headers = Credential::User(USER_TOKEN).headers().unwrap();

    let started = Instant::now();
    let response = fetcher().fetch(&url, headers, 3).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(test.discord.user_guild_hits(), 3);
    assert!(elapsed >= Duration::from_millis(1000), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(1500), "elapsed {:?}", elapsed);
}

/// Tests that a first-try success sends a single request without waiting.
///
/// Expected: Ok(200) after 1 request
#[tokio::test]
async fn returns_first_success_immediately() {
    let test = TestBuilder::new().build().await.unwrap();
    let url = format!("{}/users/@me/guilds", test.discord.url);
    let headers = Credential::Bot(BOT_TOKEN).headers().unwrap();

    let started = Instant::now();
    let response = fetcher().fetch(&url, headers, 3).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(test.discord.bot_guild_hits(), 1);
    assert!(started.elapsed() < RETRY_DELAY);
}

/// Tests that the failing response of the last attempt is handed back.
///
/// Expected: Ok(503) after exactly 3 requests
#[tokio::test]
async fn returns_last_failing_response_when_exhausted() {
    let test = TestBuilder::new()
        .failing_user_guild_requests(usize::MAX)
        .with_failure_status(StatusCode::SERVICE_UNAVAILABLE)
        .build()
        .await
        .unwrap();
    let url = format!("{}/users/@me/guilds", test.discord.url);
    let headers = Credential::User(USER_TOKEN).headers().unwrap();

    let response = fetcher().fetch(&url, headers, 3).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(test.discord.user_guild_hits(), 3);
}

/// Tests that a 4xx status counts as a failed attempt too.
///
/// Expected: Ok(404) after exactly 3 requests
#[tokio::test]
async fn retries_client_errors() {
    let test = TestBuilder::new()
        .failing_user_guild_requests(usize::MAX)
        .with_failure_status(StatusCode::NOT_FOUND)
        .build()
        .await
        .unwrap();
    let url = format!("{}/users/@me/guilds", test.discord.url);
    let headers = Credential::User(USER_TOKEN).headers().unwrap();

    let response = fetcher().fetch(&url, headers, 3).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(test.discord.user_guild_hits(), 3);
}

/// Tests that a network fault on every attempt surfaces as an error.
///
/// Expected: Err(reqwest::Error) after the delays between the 3 attempts
#[tokio::test]
async fn fails_when_no_response_is_obtained() {
    let url = format!("{}/users/@me/guilds", unreachable_url().await.unwrap());
    let headers = Credential::User(USER_TOKEN).headers().unwrap();

    let started = Instant::now();
    let result = fetcher().fetch(&url, headers, 3).await;

    assert!(result.is_err());
    assert!(started.elapsed() >= Duration::from_millis(1000));
}

/// Tests that zero attempts behaves like a single attempt.
///
/// Expected: Ok(500) after exactly 1 request
#[tokio::test]
async fn treats_zero_attempts_as_one() {
    let test = TestBuilder::new()
        .failing_user_guild_requests(usize::MAX)
        .build()
        .await
        .unwrap();
    let url = format!("{}/users/@me/guilds", test.discord.url);
    let headers = Credential::User(USER_TOKEN).headers().unwrap();

    let response = fetcher().fetch(&url, headers, 0).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(test.discord.user_guild_hits(), 1);
}

/// Tests that a final failing status is reported with its source.
///
/// Expected: Err(UpstreamError::Status) for the user guild list with status 500
#[tokio::test]
async fn fetch_json_reports_failing_status() {
    let test = TestBuilder::new()
        .failing_user_guild_requests(usize::MAX)
        .build()
        .await
        .unwrap();
    let url = format!("{}/users/@me/guilds", test.discord.url);
    let headers = Credential::User(USER_TOKEN).headers().unwrap();

    let result = fetcher()
        .fetch_json::<Vec<GuildDto>>(&url, headers, 1, UpstreamSource::UserGuilds)
        .await;

    assert!(matches!(
        result,
        Err(UpstreamError::Status {
            upstream: UpstreamSource::UserGuilds,
            status,
        }) if status == StatusCode::INTERNAL_SERVER_ERROR
    ));
}

/// Tests that a success body with the wrong shape is a decode error.
///
/// `GET /users/@me` returns an object, not a guild list.
///
/// Expected: Err(UpstreamError::Decode)
#[tokio::test]
async fn fetch_json_reports_malformed_body() {
    let test = TestBuilder::new().build().await.unwrap();
    let url = format!("{}/users/@me", test.discord.url);
    let headers = Credential::User(USER_TOKEN).headers().unwrap();

    let result = fetcher()
        .fetch_json::<Vec<GuildDto>>(&url, headers, 1, UpstreamSource::UserGuilds)
        .await;

    assert!(matches!(result, Err(UpstreamError::Decode { .. })));
    assert_eq!(test.discord.current_user_hits(), 1);
}

/// Tests that a network fault is reported with its source.
#[tokio::test]
async fn fetch_json_reports_network_error() {
    let url = format!("{}/users/@me/guilds", unreachable_url().await.unwrap());
    let headers = Credential::Bot(BOT_TOKEN).headers().unwrap();

    let result = fetcher()
        .fetch_json::<Vec<GuildDto>>(&url, headers, 1, UpstreamSource::BotGuilds)
        .await;

    assert!(matches!(
        result,
        Err(UpstreamError::Network {
            upstream: UpstreamSource::BotGuilds,
            ..
        })
    ));
}
