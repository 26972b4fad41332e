// Core algorithm exports
pub mod conflict;
pub mod fuzzy;
pub mod ranker;

pub use conflict::{check_conflict, intervals_overlap, validate_interval, ConflictDecision, ScheduleError};
pub use fuzzy::{levenshtein, partial_ratio};
pub use ranker::{search_field, SearchRanker, DEFAULT_RESULT_LIMIT};
