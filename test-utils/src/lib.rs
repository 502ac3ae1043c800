//! rp-sheets Test Utils
//!
//! Provides shared testing utilities for the rp-sheets server. Tests talk to a mock
//! Discord REST API served by axum on a random local port, so the real HTTP client,
//! retry and JSON decoding paths are exercised end to end.
//!
//! # Overview
//!
//! The test utilities consist of these components:
//! - **TestBuilder**: Fluent builder for scripting the mock Discord API
//! - **TestContext**: Test environment containing the running mock and a session
//! - **MockDiscord**: Handle on the running mock with per-endpoint hit counters
//! - **factory**: JSON payloads shaped like Discord's responses
//! - **TestError**: Error types that can occur during test setup
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{builder::TestBuilder, factory};
//!
//! #[tokio::test]
//! async fn test_common_guilds() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_user_guilds(vec![factory::user_guild("1", "Tavern")])
//!         .with_bot_guilds(vec![factory::bot_guild("1", "Tavern")])
//!         .failing_user_guild_requests(2)
//!         .build()
//!         .await?;
//!
//!     let api_url = &test.discord.url;
//!     // Point the code under test at api_url...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod discord;
pub mod error;
pub mod factory;
