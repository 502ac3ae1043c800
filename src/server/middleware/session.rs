//! Type-safe session management wrappers.
//!
//! This module provides type-safe interfaces for managing different aspects of user sessions,
//! organized by concern. Each struct handles a specific domain of session data, preventing
//! typos, ensuring type consistency, and centralizing session-related logic.
//!
//! # Architecture
//!
//! Session management is split into focused concerns:
//! - `AuthSession` - Logged in Discord user and their OAuth2 access token
//! - `CsrfSession` - CSRF token management for OAuth flows
//!
//! Each struct wraps the same underlying `Session` but exposes only the methods
//! relevant to its concern.

use tower_sessions::Session;

use crate::{model::user::UserDto, server::error::AppError};

// Session key constants
const SESSION_AUTH_USER: &str = "auth:user";
const SESSION_AUTH_PROVIDER_TOKEN: &str = "auth:provider_token";
const SESSION_AUTH_CSRF_TOKEN: &str = "auth:csrf_token";

/// Authentication session management.
///
/// Handles the logged in Discord user and the OAuth2 access token that is used to call
/// Discord on their behalf.
pub struct AuthSession<'a> {
    /// The underlying tower-sessions Session instance.
    session: &'a Session,
}

impl<'a> AuthSession<'a> {
    /// Creates a new AuthSession wrapper.
    ///
    /// # Arguments
    /// - `session` - Reference to the tower-sessions Session to wrap
    ///
    /// # Returns
    /// A new AuthSession instance
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Stores the logged in user and their access token.
    ///
    /// Called after a successful OAuth2 callback. The session id is cycled first so a
    /// session id obtained before login cannot be reused afterwards.
    ///
    /// # Arguments
    /// - `user` - Discord user returned by `GET /users/@me`
    /// - `access_token` - OAuth2 access token of that user
    ///
    /// # Returns
    /// - `Ok(())` - User and token successfully stored
    /// - `Err(AppError::SessionErr(_))` - Failed to store in session
    pub async fn login(&self, user: &UserDto, access_token: &str) -> Result<(), AppError> {
        self.session.cycle_id().await?;
        self.session.insert(SESSION_AUTH_USER, user).await?;
        self.session
            .insert(SESSION_AUTH_PROVIDER_TOKEN, access_token)
            .await?;
        Ok(())
    }

    /// Retrieves the logged in user.
    ///
    /// # Returns
    /// - `Ok(Some(user))` - User is logged in
    /// - `Ok(None)` - No user in session (not logged in)
    /// - `Err(AppError::SessionErr(_))` - Failed to access session
    pub async fn get_user(&self) -> Result<Option<UserDto>, AppError> {
        let user = self.session.get::<UserDto>(SESSION_AUTH_USER).await?;
        Ok(user)
    }

    /// Retrieves the OAuth2 access token of the logged in user.
    ///
    /// # Returns
    /// - `Ok(Some(token))` - Token available
    /// - `Ok(None)` - No token in session
    /// - `Err(AppError::SessionErr(_))` - Failed to access session
    pub async fn get_provider_token(&self) -> Result<Option<String>, AppError> {
        let token = self
            .session
            .get::<String>(SESSION_AUTH_PROVIDER_TOKEN)
            .await?;
        Ok(token)
    }

    /// Clears all data from the session.
    ///
    /// Used during logout to remove the user, their token and any pending CSRF state.
    pub async fn clear(&self) {
        self.session.clear().await;
    }
}

/// CSRF protection session management.
///
/// Handles CSRF token storage and validation for OAuth flows. Tokens are stored
/// during login initiation and validated during the OAuth callback.
pub struct CsrfSession<'a> {
    /// The underlying tower-sessions Session instance.
    session: &'a Session,
}

impl<'a> CsrfSession<'a> {
    /// Creates a new CsrfSession wrapper.
    ///
    /// # Arguments
    /// - `session` - Reference to the tower-sessions Session to wrap
    ///
    /// # Returns
    /// A new CsrfSession instance
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Stores a CSRF token in the session.
    ///
    /// # Arguments
    /// - `token` - The CSRF token to store
    ///
    /// # Returns
    /// - `Ok(())` - Token successfully stored
    /// - `Err(AppError::SessionErr(_))` - Failed to store in session
    pub async fn set_token(&self, token: &str) -> Result<(), AppError> {
        self.session.insert(SESSION_AUTH_CSRF_TOKEN, token).await?;
        Ok(())
    }

    /// Retrieves and removes the CSRF token from the session.
    ///
    /// The token is removed so each one can only be used once.
    ///
    /// # Returns
    /// - `Ok(Some(token))` - CSRF token was found and removed
    /// - `Ok(None)` - No CSRF token in session
    /// - `Err(AppError::SessionErr(_))` - Failed to access session
    pub async fn take_token(&self) -> Result<Option<String>, AppError> {
        let token = self.session.remove(SESSION_AUTH_CSRF_TOKEN).await?;
        Ok(token)
    }
}
