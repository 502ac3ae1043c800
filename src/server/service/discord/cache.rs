//! Per-user cache of common guild lists.
//!
//! Discord's guild lists change rarely, so the result of a common guild computation is
//! kept in memory for a configurable duration keyed by the user's Discord ID. Only
//! successful computations are stored.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dioxus_logger::tracing;
use tokio::sync::RwLock;

use crate::model::discord::GuildDto;

/// Cached common guilds of one user with expiration timestamp.
#[derive(Clone)]
struct CachedGuilds {
    guilds: Vec<GuildDto>,
    expires_at: Instant,
}

impl CachedGuilds {
    /// Returns `None` when the expiry cannot be represented as an `Instant`.
    fn new(guilds: Vec<GuildDto>, ttl: Duration) -> Option<Self> {
        let expires_at = Instant::now().checked_add(ttl)?;

        Some(Self { guilds, expires_at })
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// In-memory cache of common guild lists shared by all request handlers.
///
/// A TTL of zero disables the cache: lookups always miss and inserts are ignored.
#[derive(Clone)]
pub struct CommonGuildCache {
    ttl: Duration,
    entries: Arc<RwLock<HashMap<String, CachedGuilds>>>,
}

impl CommonGuildCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the cached common guilds of a user if present and not expired.
    ///
    /// # Arguments
    /// - `user_id` - Discord ID of the user
    ///
    /// # Returns
    /// - `Some(Vec<GuildDto>)` - Cached result still within its TTL
    /// - `None` - Nothing cached, entry expired, or cache disabled
    pub async fn get(&self, user_id: &str) -> Option<Vec<GuildDto>> {
        if self.ttl.is_zero() {
            return None;
        }

        let entries = self.entries.read().await;

        entries
            .get(user_id)
            .filter(|cached| !cached.is_expired())
            .map(|cached| cached.guilds.clone())
    }

    /// Stores the common guilds of a user, replacing any previous entry.
    ///
    /// Expired entries of other users are dropped at the same time so the map does not
    /// grow with users who never come back.
    pub async fn insert(&self, user_id: &str, guilds: Vec<GuildDto>) {
        if self.ttl.is_zero() {
            return;
        }

        let Some(cached) = CachedGuilds::new(guilds, self.ttl) else {
            tracing::warn!("Guild cache TTL {:?} is out of range, not caching", self.ttl);
            return;
        };

        let mut entries = self.entries.write().await;

        entries.retain(|_, cached| !cached.is_expired());
        entries.insert(user_id.to_string(), cached);
    }

    /// Removes the cached entry of a user, used on logout.
    pub async fn invalidate(&self, user_id: &str) {
        self.entries.write().await.remove(user_id);
    }

    /// Number of stored entries, expired ones included.
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn guild(id: &str) -> GuildDto {
        GuildDto {
            id: id.to_string(),
            name: "Tavern".to_string(),
            icon: None,
            owner: Some(false),
            permissions: Some(0),
        }
    }

    /// Tests storing and reading back a user's guilds.
    ///
    /// Expected: stored list returned for that user only
    #[tokio::test]
    async fn test_insert_and_get() {
        let cache = CommonGuildCache::new(Duration::from_secs(60));

        cache.insert("1", vec![guild("A")]).await;

        assert_eq!(cache.get("1").await, Some(vec![guild("A")]));
        assert_eq!(cache.get("2").await, None);
    }

    /// Tests that entries are not served after their TTL.
    #[tokio::test]
    async fn test_entry_expires() {
        let cache = CommonGuildCache::new(Duration::from_millis(50));

        cache.insert("1", vec![guild("A")]).await;
        sleep(Duration::from_millis(100)).await;

        assert_eq!(cache.get("1").await, None);
    }

    /// Tests that expired entries are pruned on insert.
    #[tokio::test]
    async fn test_insert_prunes_expired_entries() {
        let cache = CommonGuildCache::new(Duration::from_millis(50));

        cache.insert("1", vec![guild("A")]).await;
        sleep(Duration::from_millis(100)).await;
        cache.insert("2", vec![guild("B")]).await;

        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get("2").await, Some(vec![guild("B")]));
    }

    /// Tests that a zero TTL disables the cache.
    #[tokio::test]
    async fn test_zero_ttl_disables_cache() {
        let cache = CommonGuildCache::new(Duration::ZERO);

        cache.insert("1", vec![guild("A")]).await;

        assert_eq!(cache.get("1").await, None);
        assert_eq!(cache.len().await, 0);
    }

    /// Tests manual invalidation of one user.
    #[tokio::test]
    async fn test_invalidate() {
        let cache = CommonGuildCache::new(Duration::from_secs(60));

        cache.insert("1", vec![guild("A")]).await;
        cache.insert("2", vec![guild("B")]).await;
        cache.invalidate("1").await;

        assert_eq!(cache.get("1").await, None);
        assert_eq!(cache.get("2").await, Some(vec![guild("B")]));
    }

    /// Tests that a TTL too large for an `Instant` skips caching instead of panicking.
    ///
    /// Expected: insert is a no-op, lookups miss
    #[tokio::test]
    async fn test_unrepresentable_ttl_skips_caching() {
        let cache = CommonGuildCache::new(Duration::from_secs(u64::MAX));

        cache.insert("1", vec![guild("A")]).await;

        assert_eq!(cache.get("1").await, None);
        assert_eq!(cache.len().await, 0);
    }
}
