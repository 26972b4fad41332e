use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgExecutor, PgPool, Row};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::core::{check_conflict, ConflictDecision, ScheduleError};
use crate::models::{
    Booking, BookingInterval, BookingStatus, Conversation, MentorCandidate, MentorOverview,
    Message, Profile, ProfileUpdate, ProposedInterval, Role, UpdateScheduleRequest, User,
};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    Duplicate(String),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ScheduleError),

    #[error("Time slot already booked (conflicts with booking {0})")]
    SlotUnavailable(Uuid),
}

/// New account as written by registration, admin bootstrap and seeding
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    pub is_verified: bool,
}

/// Account row together with its password hash, used only for login
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

/// Booking request after authentication
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub interval: ProposedInterval,
    pub seeker_id: Uuid,
    pub title: String,
    pub description: String,
}

const USER_COLUMNS: &str = "id, email, name, role, is_verified, is_active, created_at, updated_at";

const PROFILE_COLUMNS: &str = "id, user_id, bio, skills, experience_years, hourly_rate, available, avatar_url, created_at, updated_at";

const SCHEDULE_COLUMNS: &str = "id, mentor_id, seeker_id, start_time, end_time, status, title, description, meeting_link, created_at, updated_at";

/// PostgreSQL store for users, profiles, conversations and schedules
///
/// Handles are cheap to share behind an `Arc`; every method borrows a
/// connection from the pool for the duration of the call.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Build a client without connecting or migrating; connections open on
    /// first use. Must be called inside a Tokio runtime.
    pub fn connect_lazy(database_url: &str, acquire_timeout: Duration) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(acquire_timeout)
            .connect_lazy(database_url)?;

        Ok(Self { pool })
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }

    /// Insert a user and its profile in one transaction
    ///
    /// A taken email surfaces as `PostgresError::Duplicate`.
    pub async fn create_user(
        &self,
        new_user: &NewUser,
        profile: &ProfileUpdate,
    ) -> Result<User, PostgresError> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            "INSERT INTO users (id, email, name, password_hash, role, is_verified, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, TRUE) \
             RETURNING {USER_COLUMNS}"
        );

        let row = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(&new_user.email)
            .bind(&new_user.name)
            .bind(&new_user.password_hash)
            .bind(new_user.role)
            .bind(new_user.is_verified)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    PostgresError::Duplicate(format!("email {}", new_user.email))
                }
                other => PostgresError::SqlxError(other),
            })?;

        let user = user_from_row(&row)?;

        sqlx::query(
            r#"
            INSERT INTO profiles (id, user_id, bio, skills, experience_years, hourly_rate, available, avatar_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user.id)
        .bind(&profile.bio)
        .bind(&profile.skills)
        .bind(profile.experience_years)
        .bind(profile.hourly_rate)
        .bind(profile.available)
        .bind(&profile.avatar_url)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!("Created {} account {}", user.role.as_str(), user.id);

        Ok(user)
    }

    /// Look up an account for login or token resolution
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, PostgresError> {
        let query = format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1");

        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(UserRecord {
                user: user_from_row(&row)?,
                password_hash: row.try_get("password_hash")?,
            })),
            None => Ok(None),
        }
    }

    pub async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, PostgresError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        let row = sqlx::query(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose().map_err(Into::into)
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>, PostgresError> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1");

        let row = sqlx::query(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(profile_from_row).transpose().map_err(Into::into)
    }

    /// Replace the editable profile fields; `None` when the user has no profile
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Option<Profile>, PostgresError> {
        let query = format!(
            "UPDATE profiles SET bio = $2, skills = $3, experience_years = $4, hourly_rate = $5, \
             available = $6, avatar_url = $7, updated_at = NOW() \
             WHERE user_id = $1 RETURNING {PROFILE_COLUMNS}"
        );

        let row = sqlx::query(&query)
            .bind(user_id)
            .bind(&update.bio)
            .bind(&update.skills)
            .bind(update.experience_years)
            .bind(update.hourly_rate)
            .bind(update.available)
            .bind(&update.avatar_url)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(profile_from_row).transpose().map_err(Into::into)
    }

    /// Mentors eligible for search: verified, active and marked available
    ///
    /// Ordered by account creation so ranking ties are deterministic.
    pub async fn list_mentor_candidates(&self, limit: usize) -> Result<Vec<MentorCandidate>, PostgresError> {
        let query = r#"
            SELECT u.id AS user_id, u.name, p.bio, p.skills, p.available,
                   p.experience_years, p.hourly_rate, p.avatar_url
            FROM users u
            JOIN profiles p ON p.user_id = u.id
            WHERE u.role = 'mentor' AND u.is_verified AND u.is_active AND p.available
            ORDER BY u.created_at ASC, u.id ASC
            LIMIT $1
        "#;

        let rows = sqlx::query(query)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        let candidates = rows
            .iter()
            .map(|row| -> Result<MentorCandidate, sqlx::Error> {
                Ok(MentorCandidate {
                    user_id: row.try_get("user_id")?,
                    name: row.try_get::<Option<String>, _>("name")?.unwrap_or_default(),
                    bio: row.try_get::<Option<String>, _>("bio")?.unwrap_or_default(),
                    skills: row.try_get::<Option<Vec<String>>, _>("skills")?.unwrap_or_default(),
                    available: row.try_get("available")?,
                    experience_years: row.try_get("experience_years")?,
                    hourly_rate: row.try_get("hourly_rate")?,
                    avatar_url: row.try_get::<Option<String>, _>("avatar_url")?.unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        tracing::debug!("Loaded {} mentor candidates", candidates.len());

        Ok(candidates)
    }

    /// Every mentor account with its profile, verified or not
    pub async fn list_mentors(&self) -> Result<Vec<MentorOverview>, PostgresError> {
        let query = r#"
            SELECT u.id, u.email, u.name, u.role, u.is_verified, u.is_active, u.created_at, u.updated_at,
                   p.id AS profile_id, p.bio, p.skills, p.experience_years, p.hourly_rate,
                   p.available, p.avatar_url, p.created_at AS profile_created_at,
                   p.updated_at AS profile_updated_at
            FROM users u
            LEFT JOIN profiles p ON p.user_id = u.id
            WHERE u.role = 'mentor'
            ORDER BY u.created_at ASC
            LIMIT 100
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        let mentors = rows
            .iter()
            .map(|row| -> Result<MentorOverview, sqlx::Error> {
                let user = user_from_row(row)?;
                let profile_id: Option<Uuid> = row.try_get("profile_id")?;
                let profile = match profile_id {
                    Some(id) => Some(Profile {
                        id,
                        user_id: user.id,
                        bio: row.try_get("bio")?,
                        skills: row.try_get("skills")?,
                        experience_years: row.try_get("experience_years")?,
                        hourly_rate: row.try_get("hourly_rate")?,
                        available: row.try_get("available")?,
                        avatar_url: row.try_get("avatar_url")?,
                        created_at: row.try_get("profile_created_at")?,
                        updated_at: row.try_get("profile_updated_at")?,
                    }),
                    None => None,
                };
                Ok(MentorOverview { user, profile })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(mentors)
    }

    /// Mark a mentor as verified; `false` if no mentor has that id
    pub async fn verify_mentor(&self, mentor_id: Uuid) -> Result<bool, PostgresError> {
        let result = sqlx::query(
            "UPDATE users SET is_verified = TRUE, updated_at = NOW() WHERE id = $1 AND role = 'mentor'",
        )
        .bind(mentor_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a mentor; the profile and dependent rows go with it (cascade)
    pub async fn delete_mentor(&self, mentor_id: Uuid) -> Result<bool, PostgresError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1 AND role = 'mentor'")
            .bind(mentor_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_conversations(&self, user_id: Uuid) -> Result<Vec<Conversation>, PostgresError> {
        let rows = sqlx::query(
            r#"
            SELECT id, members, created_at, updated_at
            FROM conversations
            WHERE $1 = ANY(members)
            ORDER BY updated_at DESC
            LIMIT 100
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(conversation_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    pub async fn get_conversation(&self, conversation_id: Uuid) -> Result<Option<Conversation>, PostgresError> {
        let row = sqlx::query("SELECT id, members, created_at, updated_at FROM conversations WHERE id = $1")
            .bind(conversation_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(conversation_from_row).transpose().map_err(Into::into)
    }

    /// Return the conversation between two users, creating it if needed
    ///
    /// A single upsert on the ordered member pair, so two users opening the
    /// thread at the same moment end up in the same conversation.
    pub async fn find_or_create_conversation(
        &self,
        user_id: Uuid,
        other_id: Uuid,
    ) -> Result<Conversation, PostgresError> {
        let row = sqlx::query(
            r#"
            INSERT INTO conversations (id, members, pair_key)
            VALUES ($1, $2, $3)
            ON CONFLICT (pair_key) DO UPDATE SET pair_key = EXCLUDED.pair_key
            RETURNING id, members, created_at, updated_at, (xmax = 0) AS inserted
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vec![user_id, other_id])
        .bind(pair_key(user_id, other_id))
        .fetch_one(&self.pool)
        .await?;

        let conversation = conversation_from_row(&row)?;
        if row.try_get::<bool, _>("inserted")? {
            tracing::debug!("Created conversation {} between {} and {}", conversation.id, user_id, other_id);
        }

        Ok(conversation)
    }

    /// Oldest first
    pub async fn list_messages(&self, conversation_id: Uuid, limit: usize) -> Result<Vec<Message>, PostgresError> {
        let rows = sqlx::query(
            r#"
            SELECT id, conversation_id, sender_id, content, created_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at ASC
            LIMIT $2
            "#,
        )
        .bind(conversation_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(message_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    /// Persist a message and bump the conversation's `updated_at`
    pub async fn insert_message(
        &self,
        conversation_id: Uuid,
        sender_id: Uuid,
        content: &str,
    ) -> Result<Message, PostgresError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            INSERT INTO messages (id, conversation_id, sender_id, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, conversation_id, sender_id, content, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(conversation_id)
        .bind(sender_id)
        .bind(content)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE conversations SET updated_at = NOW() WHERE id = $1")
            .bind(conversation_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        message_from_row(&row).map_err(Into::into)
    }

    /// The mentor's scheduled and confirmed bookings in creation order
    pub async fn list_active_bookings(&self, mentor_id: Uuid) -> Result<Vec<BookingInterval>, PostgresError> {
        fetch_active_bookings(&self.pool, mentor_id)
            .await
            .map_err(Into::into)
    }

    /// Conflict-checked booking insert
    ///
    /// The mentor row is locked for the duration of the transaction, so two
    /// concurrent requests for the same mentor cannot both pass the conflict
    /// check before either one commits.
    pub async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, PostgresError> {
        let mentor_id = booking.interval.mentor_id;
        let mut tx = self.pool.begin().await?;

        let mentor = sqlx::query("SELECT id FROM users WHERE id = $1 AND role = 'mentor' FOR UPDATE")
            .bind(mentor_id)
            .fetch_optional(&mut *tx)
            .await?;

        if mentor.is_none() {
            return Err(PostgresError::NotFound(format!("mentor {}", mentor_id)));
        }

        let active = fetch_active_bookings(&mut *tx, mentor_id).await?;

        if let ConflictDecision::Conflict(existing) = check_conflict(&booking.interval, &active)? {
            tracing::debug!(
                "Booking request for mentor {} overlaps booking {}",
                mentor_id,
                existing.id
            );
            return Err(PostgresError::SlotUnavailable(existing.id));
        }

        let query = format!(
            "INSERT INTO schedules (id, mentor_id, seeker_id, start_time, end_time, status, title, description) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {SCHEDULE_COLUMNS}"
        );

        let row = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(mentor_id)
            .bind(booking.seeker_id)
            .bind(booking.interval.start_time)
            .bind(booking.interval.end_time)
            .bind(BookingStatus::Scheduled)
            .bind(&booking.title)
            .bind(&booking.description)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        booking_from_row(&row).map_err(Into::into)
    }

    /// Bookings where the user is the mentor (`as_mentor`) or the seeker
    pub async fn list_bookings(&self, user_id: Uuid, as_mentor: bool) -> Result<Vec<Booking>, PostgresError> {
        let column = if as_mentor { "mentor_id" } else { "seeker_id" };
        let query = format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE {column} = $1 ORDER BY start_time ASC LIMIT 100"
        );

        let rows = sqlx::query(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(booking_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    pub async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, PostgresError> {
        let query = format!("SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE id = $1");

        let row = sqlx::query(&query)
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(booking_from_row).transpose().map_err(Into::into)
    }

    /// Compare-and-set update: applies only while the stored status still equals
    /// `expected`. `None` means the row vanished or changed underneath.
    pub async fn update_booking(
        &self,
        booking_id: Uuid,
        expected: BookingStatus,
        update: &UpdateScheduleRequest,
    ) -> Result<Option<Booking>, PostgresError> {
        let query = format!(
            "UPDATE schedules SET status = $3, \
             title = COALESCE($4, title), \
             description = COALESCE($5, description), \
             meeting_link = COALESCE($6, meeting_link), \
             updated_at = NOW() \
             WHERE id = $1 AND status = $2 \
             RETURNING {SCHEDULE_COLUMNS}"
        );

        let row = sqlx::query(&query)
            .bind(booking_id)
            .bind(expected)
            .bind(update.status)
            .bind(update.title.as_deref())
            .bind(update.description.as_deref())
            .bind(update.meeting_link.as_deref())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(booking_from_row).transpose().map_err(Into::into)
    }

    pub async fn delete_booking(&self, booking_id: Uuid) -> Result<bool, PostgresError> {
        let result = sqlx::query("DELETE FROM schedules WHERE id = $1")
            .bind(booking_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Order-independent identity of a two-member conversation
fn pair_key(a: Uuid, b: Uuid) -> Vec<Uuid> {
    if a <= b {
        vec![a, b]
    } else {
        vec![b, a]
    }
}

async fn fetch_active_bookings<'e, E>(executor: E, mentor_id: Uuid) -> Result<Vec<BookingInterval>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let rows = sqlx::query(
        r#"
        SELECT id, mentor_id, start_time, end_time, status
        FROM schedules
        WHERE mentor_id = $1 AND status IN ('scheduled', 'confirmed')
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(mentor_id)
    .fetch_all(executor)
    .await?;

    rows.iter()
        .map(|row| -> Result<BookingInterval, sqlx::Error> {
            Ok(BookingInterval {
                id: row.try_get("id")?,
                mentor_id: row.try_get("mentor_id")?,
                start_time: row.try_get("start_time")?,
                end_time: row.try_get("end_time")?,
                status: row.try_get("status")?,
            })
        })
        .collect()
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        role: row.try_get("role")?,
        is_verified: row.try_get("is_verified")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn profile_from_row(row: &PgRow) -> Result<Profile, sqlx::Error> {
    Ok(Profile {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        bio: row.try_get("bio")?,
        skills: row.try_get("skills")?,
        experience_years: row.try_get("experience_years")?,
        hourly_rate: row.try_get("hourly_rate")?,
        available: row.try_get("available")?,
        avatar_url: row.try_get("avatar_url")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn conversation_from_row(row: &PgRow) -> Result<Conversation, sqlx::Error> {
    Ok(Conversation {
        id: row.try_get("id")?,
        members: row.try_get("members")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn message_from_row(row: &PgRow) -> Result<Message, sqlx::Error> {
    Ok(Message {
        id: row.try_get("id")?,
        conversation_id: row.try_get("conversation_id")?,
        sender_id: row.try_get("sender_id")?,
        content: row.try_get("content")?,
        created_at: row.try_get("created_at")?,
    })
}

fn booking_from_row(row: &PgRow) -> Result<Booking, sqlx::Error> {
    Ok(Booking {
        id: row.try_get("id")?,
        mentor_id: row.try_get("mentor_id")?,
        seeker_id: row.try_get("seeker_id")?,
        start_time: row.try_get("start_time")?,
        end_time: row.try_get("end_time")?,
        status: row.try_get("status")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        meeting_link: row.try_get("meeting_link")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
