use axum::http::StatusCode;
use serde_json::Value;
use std::sync::{atomic::AtomicUsize, Mutex};

use crate::{
    context::TestContext,
    discord::{Endpoint, MockDiscord, MockDiscordState},
    error::TestError,
    factory,
};

/// Builder for creating test contexts with a scripted mock Discord API.
///
/// Provides a fluent interface for configuring what each Discord endpoint returns and
/// how many times it fails first. Call `build()` to start the mock.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::{builder::TestBuilder, factory};
///
/// let test = TestBuilder::new()
///     .with_user_guilds(vec![factory::user_guild("1", "Tavern")])
///     .with_bot_guilds(vec![])
///     .failing_bot_guild_requests(usize::MAX)
///     .build()
///     .await?;
/// ```
pub struct TestBuilder {
    user_guilds: Vec<Value>,
    bot_guilds: Vec<Value>,
    current_user: Value,
    member: Value,
    user_guild_failures: usize,
    bot_guild_failures: usize,
    current_user_failures: usize,
    member_failures: usize,
    failure_status: StatusCode,
}

impl TestBuilder {
    /// Creates a new test builder.
    ///
    /// By default both guild lists are empty, every endpoint succeeds, and failures
    /// use status 500.
    pub fn new() -> Self {
        Self {
            user_guilds: Vec::new(),
            bot_guilds: Vec::new(),
            current_user: factory::current_user("42", "tester"),
            member: factory::guild_member("42", None),
            user_guild_failures: 0,
            bot_guild_failures: 0,
            current_user_failures: 0,
            member_failures: 0,
            failure_status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Sets the guild list returned for the user token.
    pub fn with_user_guilds(mut self, guilds: Vec<Value>) -> Self {
        self.user_guilds = guilds;
        self
    }

    /// Sets the guild list returned for the bot token.
    pub fn with_bot_guilds(mut self, guilds: Vec<Value>) -> Self {
        self.bot_guilds = guilds;
        self
    }

    /// Sets the body of `GET /users/@me`.
    pub fn with_current_user(mut self, user: Value) -> Self {
        self.current_user = user;
        self
    }

    /// Sets the body of `GET /users/@me/guilds/{guild_id}/member`.
    pub fn with_member(mut self, member: Value) -> Self {
        self.member = member;
        self
    }

    /// Makes the first `count` user guild list requests fail.
    ///
    /// Use `usize::MAX` for an endpoint that never recovers.
    pub fn failing_user_guild_requests(mut self, count: usize) -> Self {
        self.user_guild_failures = count;
        self
    }

    /// Makes the first `count` bot guild list requests fail.
    pub fn failing_bot_guild_requests(mut self, count: usize) -> Self {
        self.bot_guild_failures = count;
        self
    }

    /// Makes the first `count` current user requests fail.
    pub fn failing_current_user_requests(mut self, count: usize) -> Self {
        self.current_user_failures = count;
        self
    }

    /// Makes the first `count` member requests fail.
    pub fn failing_member_requests(mut self, count: usize) -> Self {
        self.member_failures = count;
        self
    }

    /// Sets the status used for scripted failures.
    pub fn with_failure_status(mut self, status: StatusCode) -> Self {
        self.failure_status = status;
        self
    }

    /// Starts the mock Discord API and returns the test context.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Context with the mock listening on a random local port
    /// - `Err(TestError::Io)` - Failed to bind the listener
    pub async fn build(self) -> Result<TestContext, TestError> {
        let state = MockDiscordState {
            user_guilds: Endpoint::new(Value::Array(self.user_guilds), self.user_guild_failures),
            bot_guilds: Endpoint::new(Value::Array(self.bot_guilds), self.bot_guild_failures),
            current_user: Endpoint::new(self.current_user, self.current_user_failures),
            member: Endpoint::new(self.member, self.member_failures),
            token_exchanges: AtomicUsize::new(0),
            failure_status: self.failure_status,
            member_guild_ids: Mutex::new(Vec::new()),
        };

        let discord = MockDiscord::start(state).await?;

        Ok(TestContext::new(discord))
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
