use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{BookingInterval, ProposedInterval};

/// Input errors raised before any overlap is computed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Invalid interval: start {start} must be before end {end}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Stored booking {id} has an invalid interval")]
    CorruptBooking { id: Uuid },
}

/// Outcome of a conflict check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictDecision<'a> {
    Clear,
    /// First blocking booking that overlaps the proposal
    Conflict(&'a BookingInterval),
}

impl<'a> ConflictDecision<'a> {
    pub fn is_conflict(&self) -> bool {
        matches!(self, ConflictDecision::Conflict(_))
    }

    pub fn conflicting(&self) -> Option<&'a BookingInterval> {
        match self {
            ConflictDecision::Conflict(booking) => Some(booking),
            ConflictDecision::Clear => None,
        }
    }
}

/// Reject empty and inverted intervals
#[inline]
pub fn validate_interval(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), ScheduleError> {
    if start >= end {
        return Err(ScheduleError::InvalidInterval { start, end });
    }
    Ok(())
}

/// Inclusive overlap: intervals that only share a boundary instant still overlap
#[inline]
pub fn intervals_overlap(
    proposed_start: DateTime<Utc>,
    proposed_end: DateTime<Utc>,
    existing_start: DateTime<Utc>,
    existing_end: DateTime<Utc>,
) -> bool {
    existing_start <= proposed_end && existing_end >= proposed_start
}

/// Decide whether `proposed` collides with any of the mentor's bookings
///
/// `existing` is expected to hold the mentor's scheduled and confirmed bookings,
/// but every entry is re-checked: bookings for another mentor or in a
/// non-blocking status are skipped. The scan follows input order and stops at
/// the first overlap.
pub fn check_conflict<'a>(
    proposed: &ProposedInterval,
    existing: &'a [BookingInterval],
) -> Result<ConflictDecision<'a>, ScheduleError> {
    validate_interval(proposed.start_time, proposed.end_time)?;

    for booking in existing {
        if booking.mentor_id != proposed.mentor_id {
            tracing::warn!(
                "Skipping booking {} of mentor {} while checking mentor {}",
                booking.id,
                booking.mentor_id,
                proposed.mentor_id
            );
            continue;
        }

        if !booking.status.is_blocking() {
            continue;
        }

        if booking.start_time >= booking.end_time {
            return Err(ScheduleError::CorruptBooking { id: booking.id });
        }

        if intervals_overlap(
            proposed.start_time,
            proposed.end_time,
            booking.start_time,
            booking.end_time,
        ) {
            return Ok(ConflictDecision::Conflict(booking));
        }
    }

    Ok(ConflictDecision::Clear)
}
