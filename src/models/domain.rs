use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role, used by the request layer for capability checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Seeker,
    Mentor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Seeker => "seeker",
            Role::Mentor => "mentor",
            Role::Admin => "admin",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Seeker
    }
}

/// Registered account (never carries the password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_verified: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public profile attached 1:1 to a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bio: String,
    pub skills: Vec<String>,
    pub experience_years: i32,
    pub hourly_rate: f64,
    pub available: bool,
    pub avatar_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mentor as seen by the search ranker
///
/// Text fields default to empty strings so that partially filled records are
/// ranked instead of rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentorCandidate {
    pub user_id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(default)]
    pub experience_years: i32,
    #[serde(default)]
    pub hourly_rate: f64,
    #[serde(default)]
    pub avatar_url: String,
}

fn default_true() -> bool { true }

/// Ranked search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub candidate: MentorCandidate,
    pub score: u8,
}

/// Lifecycle of a booked session
///
/// `scheduled -> confirmed -> completed`, and `scheduled | confirmed -> cancelled`.
/// `completed` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Whether a booking in this status keeps its time slot occupied
    #[inline]
    pub fn is_blocking(&self) -> bool {
        matches!(self, BookingStatus::Scheduled | BookingStatus::Confirmed)
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// Re-asserting the current status is accepted so that an update can touch
    /// only the descriptive fields.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;

        if *self == next {
            return true;
        }

        matches!(
            (self, next),
            (Scheduled, Confirmed)
                | (Scheduled, Cancelled)
                | (Confirmed, Completed)
                | (Confirmed, Cancelled)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Scheduled => "scheduled",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

/// The slice of a stored booking the conflict guard reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingInterval {
    pub id: Uuid,
    pub mentor_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
}

/// A booking request that has not been persisted yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedInterval {
    pub mentor_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Stored mentoring session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub mentor_id: Uuid,
    pub seeker_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
    pub title: String,
    pub description: String,
    pub meeting_link: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn interval(&self) -> BookingInterval {
        BookingInterval {
            id: self.id,
            mentor_id: self.mentor_id,
            start_time: self.start_time,
            end_time: self.end_time,
            status: self.status,
        }
    }

    /// Mentor and seeker are the only parties allowed to see or change a booking
    pub fn is_party(&self, user_id: Uuid) -> bool {
        self.mentor_id == user_id || self.seeker_id == user_id
    }
}

/// Direct-message thread between users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub members: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn has_member(&self, user_id: Uuid) -> bool {
        self.members.contains(&user_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Admin listing entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorOverview {
    pub user: User,
    pub profile: Option<Profile>,
}
