use std::sync::Arc;
use time::Duration;
use tower_sessions::{Expiry, MemoryStore, Session};

use crate::discord::MockDiscord;

/// Test context containing the mock Discord API and a session.
///
/// The session is created lazily on first access and persists for the lifetime of the
/// test context.
pub struct TestContext {
    /// Running mock Discord API.
    pub discord: MockDiscord,

    /// Optional session instance for session handling.
    ///
    /// Initialized lazily when `session()` is first called. Backed by an in-memory
    /// store that is private to this context.
    pub session: Option<Session>,
}

impl TestContext {
    /// Creates a test context around an already running mock.
    ///
    /// # Arguments
    /// - `discord` - Running mock Discord API
    ///
    /// # Returns
    /// - New `TestContext` instance with no session
    pub fn new(discord: MockDiscord) -> Self {
        Self {
            discord,
            session: None,
        }
    }

    /// Gets or creates the test session instance.
    ///
    /// Returns a reference to the existing session if one exists, otherwise
    /// creates a new session backed by an in-memory store. Subsequent calls return
    /// the same session instance.
    ///
    /// # Example
    /// ```rust,ignore
    /// let mut test = TestBuilder::new().build().await?;
    /// let session = test.session();
    ///
    /// // Use session in tests
    /// session.insert("auth:provider_token", "user-token").await?;
    /// ```
    pub fn session(&mut self) -> &Session {
        self.session.get_or_insert_with(|| {
            Session::new(
                None,
                Arc::new(MemoryStore::default()),
                Some(Expiry::OnInactivity(Duration::days(7))),
            )
        })
    }
}
