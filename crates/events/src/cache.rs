//! Process-local cache for the two precomputed notices.
//!
//! Writes are last-write-wins; readers get whatever is stored, with no
//! freshness guarantee.

use std::collections::HashMap;

use tokio::sync::RwLock;

/// The named cache entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Announcement,
    FeaturedSpeaker,
}

impl CacheKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Announcement => "RECENT_ANNOUNCEMENTS",
            Self::FeaturedSpeaker => "FEATURED_SPEAKER",
        }
    }
}

/// Shared via `Arc<Cache>`.
#[derive(Debug, Default)]
pub struct Cache {
    entries: RwLock<HashMap<CacheKey, String>>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: CacheKey) -> Option<String> {
        self.entries.read().await.get(&key).cloned()
    }

    /// Stored text, or an empty string when the entry is absent.
    pub async fn get_or_empty(&self, key: CacheKey) -> String {
        self.get(key).await.unwrap_or_default()
    }

    pub async fn set(&self, key: CacheKey, value: impl Into<String>) {
        let value = value.into();
        tracing::debug!(key = key.as_str(), len = value.len(), "Cache entry set");
        self.entries.write().await.insert(key, value);
    }

    /// Returns `true` when an entry was removed.
    pub async fn delete(&self, key: CacheKey) -> bool {
        let removed = self.entries.write().await.remove(&key).is_some();
        if removed {
            tracing::debug!(key = key.as_str(), "Cache entry deleted");
        }
        removed
    }
}
