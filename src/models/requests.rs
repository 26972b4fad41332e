use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::domain::{BookingStatus, Role};

/// Request to create an account
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Full replacement of the editable profile fields
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub bio: String,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub skills: Vec<String>,
    #[serde(default)]
    #[validate(range(min = 0, max = 80))]
    pub experience_years: i32,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub hourly_rate: f64,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    #[validate(length(max = 2048))]
    pub avatar_url: String,
}

impl Default for ProfileUpdate {
    fn default() -> Self {
        Self {
            bio: String::new(),
            skills: Vec::new(),
            experience_years: 0,
            hourly_rate: 0.0,
            available: default_available(),
            avatar_url: String::new(),
        }
    }
}

fn default_available() -> bool {
    true
}

/// Query string of `GET /search/mentors`
///
/// Alignment cost grows with the square of the query length, so long queries
/// are refused up front.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchParams {
    #[serde(default)]
    #[validate(length(max = 100))]
    pub q: String,
}

/// Query string of `POST /conversations`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationParams {
    pub mentor_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMessageRequest {
    pub conversation_id: Uuid,
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
}

/// Request to book a session with a mentor
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateScheduleRequest {
    pub mentor_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
}

/// Status change plus optional edits; absent fields keep their stored value
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateScheduleRequest {
    pub status: BookingStatus,
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 2048))]
    pub meeting_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_defaults_to_seeker() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"email":"ana@example.com","name":"Ana","password":"secret99"}"#,
        )
        .unwrap();

        assert_eq!(req.role, Role::Seeker);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_register_rejects_bad_email() {
        let req = RegisterRequest {
            email: "not-an-email".to_string(),
            name: "Ana".to_string(),
            password: "secret99".to_string(),
            role: Role::Seeker,
        };

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_profile_update_defaults() {
        let update: ProfileUpdate = serde_json::from_str("{}").unwrap();

        assert!(update.available);
        assert!(update.skills.is_empty());
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_profile_update_rejects_negative_rate() {
        let update = ProfileUpdate {
            hourly_rate: -5.0,
            ..ProfileUpdate::default()
        };

        assert!(update.validate().is_err());
    }

    #[test]
    fn test_update_schedule_parses_status() {
        let req: UpdateScheduleRequest =
            serde_json::from_str(r#"{"status":"confirmed","meeting_link":"https://meet.example/x"}"#)
                .unwrap();

        assert_eq!(req.status, BookingStatus::Confirmed);
        assert!(req.title.is_none());
        assert_eq!(req.meeting_link.as_deref(), Some("https://meet.example/x"));
    }
}
