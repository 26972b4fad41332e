// Service exports
pub mod auth;
pub mod cache;
pub mod notifier;
pub mod postgres;

pub use auth::{hash_password, verify_password, AuthError, Claims, TokenService};
pub use cache::CandidateCache;
pub use notifier::{MessageHub, RoomEvent};
pub use postgres::{NewBooking, NewUser, PostgresClient, PostgresError, UserRecord};
