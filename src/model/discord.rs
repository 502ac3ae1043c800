use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

use crate::model::user::UserDto;

/// Guild entry as returned by Discord's `GET /users/@me/guilds`.
///
/// `owner` and `permissions` are only meaningful on the user's guild list; the bot's
/// list is read with the same type and those fields are simply ignored.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, ToSchema)]
pub struct GuildDto {
    /// Discord snowflake, treated as an opaque identifier.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<bool>,
    /// Permission bitmask of the user in this guild.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_permissions",
        deserialize_with = "deserialize_permissions"
    )]
    #[schema(value_type = Option<String>)]
    pub permissions: Option<u64>,
}

/// Member details of the current user in a single guild.
///
/// Returned by Discord's `GET /users/@me/guilds/{guild_id}/member`; the front end
/// uses `nick` as the default character owner name.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, ToSchema)]
pub struct GuildMemberDto {
    #[serde(default)]
    pub user: Option<UserDto>,
    #[serde(default)]
    pub nick: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,
}

fn serialize_permissions<S>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(permissions) => serializer.serialize_str(&permissions.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Discord API v10 sends permissions as a decimal string, older payloads as a number.
fn deserialize_permissions<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrInt {
        String(String),
        Int(u64),
    }

    match Option::<StringOrInt>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StringOrInt::Int(value)) => Ok(Some(value)),
        Some(StringOrInt::String(value)) => {
            value.parse::<u64>().map(Some).map_err(D::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests parsing a user guild entry as Discord sends it.
    ///
    /// Expected: permissions parsed from the decimal string, unknown fields ignored
    #[test]
    fn parses_user_guild_entry() {
        let guild: GuildDto = serde_json::from_value(serde_json::json!({
            "id": "80351110224678912",
            "name": "1337 Krew",
            "icon": "8342729096ea3675442027381ff50dfe",
            "owner": true,
            "permissions": "36953089",
            "features": ["COMMUNITY", "NEWS"]
        }))
        .unwrap();

        assert_eq!(guild.id, "80351110224678912");
        assert_eq!(guild.owner, Some(true));
        assert_eq!(guild.permissions, Some(36953089));
    }

    /// Tests parsing a bot guild entry without user-only fields.
    ///
    /// Expected: owner and permissions are None, icon may be null
    #[test]
    fn parses_bot_guild_entry() {
        let guild: GuildDto = serde_json::from_value(serde_json::json!({
            "id": "1",
            "name": "Tavern",
            "icon": null
        }))
        .unwrap();

        assert_eq!(guild.icon, None);
        assert_eq!(guild.owner, None);
        assert_eq!(guild.permissions, None);
    }

    /// Tests that numeric permissions are accepted.
    #[test]
    fn parses_numeric_permissions() {
        let guild: GuildDto = serde_json::from_value(serde_json::json!({
            "id": "1",
            "name": "Tavern",
            "permissions": 8
        }))
        .unwrap();

        assert_eq!(guild.permissions, Some(8));
    }

    /// Tests that a malformed permission string is rejected.
    #[test]
    fn rejects_malformed_permissions() {
        let result = serde_json::from_value::<GuildDto>(serde_json::json!({
            "id": "1",
            "name": "Tavern",
            "permissions": "all of them"
        }));

        assert!(result.is_err());
    }

    /// Tests the JSON shape sent to the front end.
    ///
    /// Expected: permissions written back as a string, absent user-only fields omitted
    #[test]
    fn serializes_permissions_as_string() {
        let user_guild = GuildDto {
            id: "1".to_string(),
            name: "Tavern".to_string(),
            icon: None,
            owner: Some(false),
            permissions: Some(1024),
        };
        let bot_guild = GuildDto {
            owner: None,
            permissions: None,
            ..user_guild.clone()
        };

        let user_json = serde_json::to_value(&user_guild).unwrap();
        let bot_json = serde_json::to_value(&bot_guild).unwrap();

        assert_eq!(user_json["permissions"], "1024");
        assert!(bot_json.get("permissions").is_none());
        assert!(bot_json.get("owner").is_none());
        assert!(bot_json["icon"].is_null());
    }

    /// Tests parsing a guild member response.
    ///
    /// Expected: nickname, roles and join timestamp parsed
    #[test]
    fn parses_guild_member() {
        let member: GuildMemberDto = serde_json::from_value(serde_json::json!({
            "user": { "id": "42", "username": "bard" },
            "nick": "Lute Player",
            "avatar": null,
            "roles": ["100", "200"],
            "joined_at": "2015-04-26T06:26:56.936000+00:00",
            "deaf": false,
            "mute": false
        }))
        .unwrap();

        assert_eq!(member.nick.as_deref(), Some("Lute Player"));
        assert_eq!(member.roles, vec!["100".to_string(), "200".to_string()]);
        assert_eq!(member.user.map(|u| u.username), Some("bard".to_string()));
        assert!(member.joined_at.is_some());
    }
}
