use crate::server::error::AppError;

/// Parses a Discord guild ID supplied by the client
///
/// # Arguments
/// - `value` - The string to attempt to parse into `u64`
///
/// # Returns
/// - `Ok(u64)` - Successfully parsed snowflake
/// - `Err(AppError::BadRequest)` - Value is not a positive integer
pub fn parse_guild_id(value: &str) -> Result<u64, AppError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid guild_id '{}'", value)))
}
