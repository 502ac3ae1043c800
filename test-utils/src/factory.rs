//! Test factories for Discord API payloads.
//!
//! These factories build `serde_json::Value`s shaped like what Discord's REST API
//! returns, for serving from the mock Discord API.

use serde_json::{json, Value};

/// Creates a guild entry as listed by `GET /users/@me/guilds` for a user.
///
/// # Arguments
/// - `id` - Discord guild ID (snowflake)
/// - `name` - Guild name
///
/// # Returns
/// - `Value` - Guild entry with `owner` false and permissions as a decimal string
pub fn user_guild(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "icon": null,
        "owner": false,
        "permissions": "104324673",
        "features": []
    })
}

/// Creates a guild entry as listed by `GET /users/@me/guilds` for the bot.
pub fn bot_guild(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "icon": "8342729096ea3675442027381ff50dfe",
        "owner": false,
        "permissions": "2147483647",
        "features": ["COMMUNITY"]
    })
}

/// Creates a user as returned by `GET /users/@me`.
pub fn current_user(id: &str, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "global_name": null,
        "avatar": null,
        "discriminator": "0"
    })
}

/// Creates a guild member as returned by `GET /users/@me/guilds/{guild_id}/member`.
///
/// # Arguments
/// - `user_id` - Discord user ID
/// - `nick` - Guild nickname, if any
pub fn guild_member(user_id: &str, nick: Option<&str>) -> Value {
    json!({
        "user": current_user(user_id, "tester"),
        "nick": nick,
        "avatar": null,
        "roles": [],
        "joined_at": "2024-01-01T12:00:00.000000+00:00",
        "deaf": false,
        "mute": false
    })
}
