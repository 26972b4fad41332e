use crate::core::fuzzy::partial_ratio;
use crate::models::{MentorCandidate, SearchResult};

/// Maximum number of hits returned by a search
pub const DEFAULT_RESULT_LIMIT: usize = 10;

/// Ranks mentor candidates against a free-text query
///
/// Eligibility filtering (role, verification, availability) happens in the
/// store before candidates reach the ranker; the ranker only scores, orders
/// and truncates.
#[derive(Debug, Clone)]
pub struct SearchRanker {
    limit: usize,
}

impl SearchRanker {
    /// `limit` is clamped to `1..=DEFAULT_RESULT_LIMIT`
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.clamp(1, DEFAULT_RESULT_LIMIT),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Score every candidate and return the best ones
    ///
    /// Results are sorted by score, highest first. The sort is stable, so
    /// candidates with equal scores keep their input order. A blank query scores
    /// every candidate 0 and therefore returns the first candidates unchanged.
    pub fn rank(&self, query: &str, candidates: &[MentorCandidate]) -> Vec<SearchResult> {
        let mut scored: Vec<(usize, u8)> = if query.trim().is_empty() {
            (0..candidates.len()).map(|idx| (idx, 0)).collect()
        } else {
            let needle = query.to_lowercase();
            candidates
                .iter()
                .enumerate()
                .map(|(idx, candidate)| (idx, partial_ratio(&needle, &search_field(candidate))))
                .collect()
        };

        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.truncate(self.limit);

        scored
            .into_iter()
            .map(|(idx, score)| SearchResult {
                candidate: candidates[idx].clone(),
                score,
            })
            .collect()
    }
}

impl Default for SearchRanker {
    fn default() -> Self {
        Self::new(DEFAULT_RESULT_LIMIT)
    }
}

/// Lower-cased `name bio skills...` text a query is matched against
pub fn search_field(candidate: &MentorCandidate) -> String {
    format!(
        "{} {} {}",
        candidate.name,
        candidate.bio,
        candidate.skills.join(" ")
    )
    .to_lowercase()
}
