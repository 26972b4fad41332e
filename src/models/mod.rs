// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Booking, BookingInterval, BookingStatus, Conversation, MentorCandidate, MentorOverview,
    Message, Profile, ProposedInterval, Role, SearchResult, User,
};
pub use requests::{
    ConversationParams, CreateMessageRequest, CreateScheduleRequest, LoginRequest,
    ProfileUpdate, RegisterRequest, SearchParams, UpdateScheduleRequest,
};
pub use responses::{ErrorResponse, HealthResponse, MessageResponse, SeedResponse, TokenResponse};
