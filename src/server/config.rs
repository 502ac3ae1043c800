use std::time::Duration;

use crate::server::error::{config::ConfigError, AppError};

const DISCORD_AUTH_URL: &str = "https://discord.com/oauth2/authorize";
const DISCORD_TOKEN_URL: &str = "https://discord.com/api/oauth2/token";
const DISCORD_API_URL: &str = "https://discord.com/api/v10";

const DEFAULT_APP_URL: &str = "/";
const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:8080";
/// Matches the daily revalidation window used for guild lists.
const DEFAULT_GUILD_CACHE_TTL_SECONDS: u64 = 86_400;
const MAX_GUILD_CACHE_TTL_SECONDS: u64 = 365 * 86_400;

pub struct Config {
    pub discord_client_id: String,
    pub discord_client_secret: String,
    pub discord_redirect_url: String,
    /// Absent bot token is reported per request, not at startup.
    pub discord_bot_token: Option<String>,

    pub discord_auth_url: String,
    pub discord_token_url: String,
    pub discord_api_url: String,

    pub app_url: String,
    pub server_addr: String,
    /// Zero disables the common guild cache.
    pub guild_cache_ttl: Duration,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let require =
            |name: &str| get(name).ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()));

        let guild_cache_ttl = match get("GUILD_CACHE_TTL_SECONDS") {
            Some(value) => value.trim().parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
                name: "GUILD_CACHE_TTL_SECONDS".to_string(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_GUILD_CACHE_TTL_SECONDS,
        };
        if guild_cache_ttl > MAX_GUILD_CACHE_TTL_SECONDS {
            return Err(ConfigError::InvalidEnvVar {
                name: "GUILD_CACHE_TTL_SECONDS".to_string(),
                reason: format!("must be at most {} seconds", MAX_GUILD_CACHE_TTL_SECONDS),
            }
            .into());
        }

        let allowed_origins = get("ALLOWED_ORIGINS")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            discord_client_id: require("DISCORD_CLIENT_ID")?,
            discord_client_secret: require("DISCORD_CLIENT_SECRET")?,
            discord_redirect_url: require("DISCORD_REDIRECT_URL")?,
            discord_bot_token: get("DISCORD_BOT_TOKEN"),
            discord_auth_url: DISCORD_AUTH_URL.to_string(),
            discord_token_url: DISCORD_TOKEN_URL.to_string(),
            discord_api_url: get("DISCORD_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DISCORD_API_URL.to_string()),
            app_url: get("APP_URL").unwrap_or_else(|| DEFAULT_APP_URL.to_string()),
            server_addr: get("SERVER_ADDR").unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string()),
            guild_cache_ttl: Duration::from_secs(guild_cache_ttl),
            allowed_origins,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("DISCORD_CLIENT_ID", "client"),
        ("DISCORD_CLIENT_SECRET", "secret"),
        ("DISCORD_REDIRECT_URL", "http://localhost:8080/api/auth/callback"),
    ];

    /// Tests that only the OAuth variables are required.
    ///
    /// Expected: Ok with defaults applied and no bot token
    #[test]
    fn applies_defaults() {
        let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();

        assert_eq!(config.discord_bot_token, None);
        assert_eq!(config.discord_api_url, DISCORD_API_URL);
        assert_eq!(config.app_url, "/");
        assert_eq!(config.server_addr, "0.0.0.0:8080");
        assert_eq!(config.guild_cache_ttl, Duration::from_secs(86_400));
        assert!(config.allowed_origins.is_empty());
    }

    /// Tests that a missing required variable is named in the error.
    #[test]
    fn reports_missing_variable() {
        let result = Config::from_lookup(lookup(&REQUIRED[..2]));

        assert!(matches!(
            result,
            Err(AppError::ConfigErr(ConfigError::MissingEnvVar(name))) if name == "DISCORD_REDIRECT_URL"
        ));
    }

    /// Tests that blank values count as unset.
    #[test]
    fn treats_blank_bot_token_as_missing() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("DISCORD_BOT_TOKEN", "  "));

        let config = Config::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.discord_bot_token, None);
    }

    /// Tests parsing of optional variables.
    ///
    /// Expected: trailing slash stripped from API url, origins split and trimmed
    #[test]
    fn parses_optional_variables() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("DISCORD_BOT_TOKEN", "bot-token"),
            ("DISCORD_API_URL", "http://127.0.0.1:9000/"),
            ("GUILD_CACHE_TTL_SECONDS", "0"),
            ("ALLOWED_ORIGINS", "http://localhost:3000, http://192.168.1.59:3000,"),
        ]);

        let config = Config::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.discord_bot_token.as_deref(), Some("bot-token"));
        assert_eq!(config.discord_api_url, "http://127.0.0.1:9000");
        assert_eq!(config.guild_cache_ttl, Duration::ZERO);
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:3000", "http://192.168.1.59:3000"]
        );
    }

    /// Tests that an unparsable cache TTL fails startup.
    #[test]
    fn rejects_invalid_cache_ttl() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("GUILD_CACHE_TTL_SECONDS", "a day"));

        let result = Config::from_lookup(lookup(&vars));

        assert!(matches!(
            result,
            Err(AppError::ConfigErr(ConfigError::InvalidEnvVar { .. }))
        ));
    }

    /// Tests that a cache TTL above one year fails startup.
    ///
    /// Expected: Err(InvalidEnvVar) for the largest u64, Ok at exactly one year
    #[test]
    fn rejects_oversized_cache_ttl() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("GUILD_CACHE_TTL_SECONDS", "18446744073709551615"));

        let result = Config::from_lookup(lookup(&vars));

        assert!(matches!(
            result,
            Err(AppError::ConfigErr(ConfigError::InvalidEnvVar { name, .. }))
                if name == "GUILD_CACHE_TTL_SECONDS"
        ));

        let mut vars = REQUIRED.to_vec();
        vars.push(("GUILD_CACHE_TTL_SECONDS", "31536000"));

        let config = Config::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.guild_cache_ttl, Duration::from_secs(31_536_000));
    }
}
