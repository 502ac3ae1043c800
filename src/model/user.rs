use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Discord user stored in the session after a successful login.
///
/// Mirrors the subset of Discord's `GET /users/@me` response the front end needs
/// to render the user menu.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
pub struct UserDto {
    /// Discord snowflake, kept as the string Discord sends.
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}
