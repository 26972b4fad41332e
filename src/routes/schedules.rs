use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::core::validate_interval;
use crate::models::{
    Booking, BookingStatus, CreateScheduleRequest, MessageResponse, ProposedInterval, Role,
    UpdateScheduleRequest,
};
use crate::routes::{ApiError, AppState, CurrentUser};
use crate::services::NewBooking;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/schedules", web::post().to(create_schedule))
        .route("/schedules", web::get().to(list_schedules))
        .route("/schedules/{id}", web::get().to(get_schedule))
        .route("/schedules/{id}", web::put().to(update_schedule))
        .route("/schedules/{id}", web::delete().to(delete_schedule));
}

/// Load a booking the caller is a party to
async fn party_booking(state: &AppState, booking_id: Uuid, user_id: Uuid) -> Result<Booking, ApiError> {
    let booking = state
        .postgres
        .get_booking(booking_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Schedule not found".to_string()))?;

    if !booking.is_party(user_id) {
        return Err(ApiError::Forbidden("Not authorized to access this schedule".to_string()));
    }

    Ok(booking)
}

/// Book a session with a mentor
///
/// POST /api/schedules
///
/// Request body:
/// ```json
/// {
///   "mentor_id": "uuid",
///   "start_time": "2026-03-02T10:00:00Z",
///   "end_time": "2026-03-02T11:00:00Z",
///   "title": "string",
///   "description": "string"
/// }
/// ```
async fn create_schedule(
    state: web::Data<AppState>,
    user: CurrentUser,
    body: web::Json<CreateScheduleRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = body.into_inner();
    req.validate()?;
    validate_interval(req.start_time, req.end_time)?;

    let new_booking = NewBooking {
        interval: ProposedInterval {
            mentor_id: req.mentor_id,
            start_time: req.start_time,
            end_time: req.end_time,
        },
        seeker_id: user.id,
        title: req.title,
        description: req.description,
    };

    let booking = state.postgres.create_booking(&new_booking).await?;

    tracing::info!(
        "Booked {} with mentor {} for {} ({} - {})",
        booking.id,
        booking.mentor_id,
        booking.seeker_id,
        booking.start_time,
        booking.end_time
    );

    Ok(HttpResponse::Ok().json(booking))
}

async fn list_schedules(
    state: web::Data<AppState>,
    user: CurrentUser,
) -> Result<HttpResponse, ApiError> {
    let as_mentor = user.role == Role::Mentor;
    let bookings = state.postgres.list_bookings(user.id, as_mentor).await?;

    Ok(HttpResponse::Ok().json(bookings))
}

async fn get_schedule(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let booking = party_booking(&state, path.into_inner(), user.id).await?;
    Ok(HttpResponse::Ok().json(booking))
}

/// Move a booking through its lifecycle and edit its details
///
/// PUT /api/schedules/{id}
async fn update_schedule(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdateScheduleRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;

    let booking = party_booking(&state, path.into_inner(), user.id).await?;
    check_transition(booking.status, body.status)?;

    let updated = state
        .postgres
        .update_booking(booking.id, booking.status, &body)
        .await?
        .ok_or_else(|| ApiError::Conflict("Schedule was modified concurrently".to_string()))?;

    tracing::info!(
        "Schedule {} moved {} -> {} by {}",
        updated.id,
        booking.status.as_str(),
        updated.status.as_str(),
        user.id
    );

    Ok(HttpResponse::Ok().json(updated))
}

async fn delete_schedule(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let booking = party_booking(&state, path.into_inner(), user.id).await?;

    if !state.postgres.delete_booking(booking.id).await? {
        return Err(ApiError::NotFound("Schedule not found".to_string()));
    }

    tracing::info!("Schedule {} deleted by {}", booking.id, user.id);

    Ok(HttpResponse::Ok().json(MessageResponse::new("Schedule deleted successfully")))
}

fn check_transition(current: BookingStatus, next: BookingStatus) -> Result<(), ApiError> {
    if current.can_transition_to(next) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "Cannot change status from {} to {}",
            current.as_str(),
            next.as_str()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_transitions() {
        assert!(check_transition(BookingStatus::Scheduled, BookingStatus::Confirmed).is_ok());
        assert!(check_transition(BookingStatus::Confirmed, BookingStatus::Completed).is_ok());
        assert!(check_transition(BookingStatus::Scheduled, BookingStatus::Cancelled).is_ok());
        assert!(check_transition(BookingStatus::Confirmed, BookingStatus::Cancelled).is_ok());
    }

    #[test]
    fn test_terminal_states_are_final() {
        let err = check_transition(BookingStatus::Cancelled, BookingStatus::Scheduled).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "Cannot change status from cancelled to scheduled"));

        assert!(check_transition(BookingStatus::Completed, BookingStatus::Confirmed).is_err());
        assert!(check_transition(BookingStatus::Scheduled, BookingStatus::Completed).is_err());
    }
}
