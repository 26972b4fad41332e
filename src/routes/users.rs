use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::models::ProfileUpdate;
use crate::routes::{ApiError, AppState, CurrentUser};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/users/me", web::get().to(get_me))
        .route("/users/me/profile", web::get().to(get_my_profile))
        .route("/users/me/profile", web::put().to(update_my_profile));
}

async fn get_me(user: CurrentUser) -> HttpResponse {
    HttpResponse::Ok().json(user.0)
}

async fn get_my_profile(
    state: web::Data<AppState>,
    user: CurrentUser,
) -> Result<HttpResponse, ApiError> {
    let profile = state
        .postgres
        .get_profile(user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    Ok(HttpResponse::Ok().json(profile))
}

/// Replace the caller's profile
///
/// Any change can move a mentor in or out of search results, so the cached
/// candidate list is dropped.
async fn update_my_profile(
    state: web::Data<AppState>,
    user: CurrentUser,
    body: web::Json<ProfileUpdate>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;

    let profile = state
        .postgres
        .update_profile(user.id, &body)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    state.cache.invalidate().await;

    tracing::info!("Updated profile for user {}", user.id);

    Ok(HttpResponse::Ok().json(profile))
}
