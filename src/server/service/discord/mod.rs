//! Discord REST API lookups.
//!
//! Every call goes through `fetch::RetryingFetcher`; the services here only build the
//! request for one endpoint and decode its response.

pub mod cache;
pub mod fetch;
pub mod guild_member;
pub mod user;
pub mod user_guild;

#[cfg(test)]
mod test;

pub use cache::CommonGuildCache;
pub use fetch::RetryingFetcher;
pub use guild_member::GuildMemberService;
pub use user::DiscordUserService;
pub use user_guild::CommonGuildService;
