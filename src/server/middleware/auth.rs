use tower_sessions::Session;

use crate::{
    model::user::UserDto,
    server::{
        error::{auth::AuthError, AppError},
        middleware::session::AuthSession,
    },
};

/// Guard for endpoints that require a logged in user.
pub struct AuthGuard<'a> {
    session: &'a Session,
}

impl<'a> AuthGuard<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Returns the logged in user or fails with `AuthError::UserNotInSession`.
    pub async fn require(&self) -> Result<UserDto, AppError> {
        let Some(user) = AuthSession::new(self.session).get_user().await? else {
            return Err(AuthError::UserNotInSession.into());
        };

        Ok(user)
    }
}
