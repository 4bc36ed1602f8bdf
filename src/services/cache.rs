use crate::models::{CitySuggestion, TagSuggestion};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// In-memory TTL cache for autocomplete results
///
/// Repeated search terms are answered locally until their entry expires.
pub struct SearchCache {
    cities: moka::future::Cache<String, Vec<CitySuggestion>>,
    tags: moka::future::Cache<String, Vec<TagSuggestion>>,
}

impl SearchCache {
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let ttl = Duration::from_secs(ttl_secs);

        Self {
            cities: moka::future::CacheBuilder::new(max_entries)
                .time_to_live(ttl)
                .build(),
            tags: moka::future::CacheBuilder::new(max_entries)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub async fn cities(&self, term: &str) -> Option<Vec<CitySuggestion>> {
        let hit = self.cities.get(&CacheKey::search(term)).await;
        tracing::trace!("City cache {}: {}", if hit.is_some() { "hit" } else { "miss" }, term);
        hit
    }

    pub async fn store_cities(&self, term: &str, cities: Vec<CitySuggestion>) {
        self.cities.insert(CacheKey::search(term), cities).await;
    }

    pub async fn tags(&self, term: &str) -> Option<Vec<TagSuggestion>> {
        let hit = self.tags.get(&CacheKey::search(term)).await;
        tracing::trace!("Tag cache {}: {}", if hit.is_some() { "hit" } else { "miss" }, term);
        hit
    }

    pub async fn store_tags(&self, term: &str, tags: Vec<TagSuggestion>) {
        self.tags.insert(CacheKey::search(term), tags).await;
    }

    /// Drop cached tags, e.g. after a tag was created
    pub fn invalidate_tags(&self) {
        self.tags.invalidate_all();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            city_entries: self.cities.entry_count(),
            tag_entries: self.tags.entry_count(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub city_entries: u64,
    pub tag_entries: u64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Search terms are case-insensitive
    pub fn search(term: &str) -> String {
        term.trim().to_lowercase()
    }
}
