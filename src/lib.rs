//! MentorLink - mentor search and session booking service
//!
//! This library provides the fuzzy search ranker that orders mentors against a
//! free-text query, and the conflict guard that keeps a mentor's booked
//! sessions from overlapping. Around them sit the PostgreSQL store, JWT/bcrypt
//! authentication and the actix-web HTTP surface.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod seed;
pub mod services;

// Re-export commonly used types
pub use crate::core::{check_conflict, partial_ratio, ConflictDecision, ScheduleError, SearchRanker};
pub use crate::models::{BookingInterval, BookingStatus, MentorCandidate, ProposedInterval, SearchResult};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        assert_eq!(partial_ratio("python", "python developer"), 100);
        assert!(SearchRanker::default().rank("python", &[]).is_empty());
    }
}
