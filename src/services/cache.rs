use std::sync::Arc;
use std::time::Duration;

use crate::models::MentorCandidate;

const CANDIDATES_KEY: &str = "mentor_candidates";

/// In-process cache for the searchable mentor list
///
/// Search loads the same candidate set on every request, so it is kept for a
/// short TTL and dropped whenever a profile or verification changes. A TTL of
/// zero disables caching.
pub struct CandidateCache {
    inner: Option<moka::future::Cache<&'static str, Arc<Vec<MentorCandidate>>>>,
}

impl CandidateCache {
    pub fn new(ttl_secs: u64) -> Self {
        let inner = (ttl_secs > 0).then(|| {
            moka::future::CacheBuilder::new(1)
                .time_to_live(Duration::from_secs(ttl_secs))
                .build()
        });

        Self { inner }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    pub async fn get(&self) -> Option<Arc<Vec<MentorCandidate>>> {
        let cache = self.inner.as_ref()?;
        let hit = cache.get(CANDIDATES_KEY).await;
        if hit.is_some() {
            tracing::trace!("Candidate cache hit");
        }
        hit
    }

    /// Store a freshly loaded candidate list and hand it back shared
    pub async fn set(&self, candidates: Vec<MentorCandidate>) -> Arc<Vec<MentorCandidate>> {
        let candidates = Arc::new(candidates);
        if let Some(cache) = &self.inner {
            cache.insert(CANDIDATES_KEY, candidates.clone()).await;
        }
        candidates
    }

    pub async fn invalidate(&self) {
        if let Some(cache) = &self.inner {
            cache.invalidate(CANDIDATES_KEY).await;
            tracing::debug!("Candidate cache invalidated");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn candidates() -> Vec<MentorCandidate> {
        vec![MentorCandidate {
            user_id: Uuid::new_v4(),
            name: "Lisa Wang".to_string(),
            bio: "Data analyst".to_string(),
            skills: vec!["SQL".to_string()],
            available: true,
            experience_years: 6,
            hourly_rate: 75.0,
            avatar_url: String::new(),
        }]
    }

    #[tokio::test]
    async fn test_cache_set_get_invalidate() {
        let cache = CandidateCache::new(60);
        assert!(cache.get().await.is_none());

        cache.set(candidates()).await;
        let hit = cache.get().await.expect("cached list");
        assert_eq!(hit[0].name, "Lisa Wang");

        cache.invalidate().await;
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn test_disabled_cache_never_hits() {
        let cache = CandidateCache::new(0);
        assert!(!cache.is_enabled());

        let stored = cache.set(candidates()).await;
        assert_eq!(stored.len(), 1);
        assert!(cache.get().await.is_none());
    }
}
