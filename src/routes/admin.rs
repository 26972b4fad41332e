use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::models::{MessageResponse, Role, SeedResponse};
use crate::routes::{require_role, ApiError, AppState, CurrentUser};
use crate::seed::seed_demo_mentors;
use crate::services::hash_password;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/admin/mentors", web::get().to(list_mentors))
        .route("/admin/mentors/{id}/verify", web::put().to(verify_mentor))
        .route("/admin/mentors/{id}", web::delete().to(delete_mentor))
        .route("/admin/seed-data", web::post().to(seed_data));
}

async fn list_mentors(
    state: web::Data<AppState>,
    user: CurrentUser,
) -> Result<HttpResponse, ApiError> {
    require_role(&user, Role::Admin)?;

    let mentors = state.postgres.list_mentors().await?;
    Ok(HttpResponse::Ok().json(mentors))
}

async fn verify_mentor(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_role(&user, Role::Admin)?;
    let mentor_id = path.into_inner();

    if !state.postgres.verify_mentor(mentor_id).await? {
        return Err(ApiError::NotFound("Mentor not found".to_string()));
    }

    state.cache.invalidate().await;
    tracing::info!("Mentor {} verified by {}", mentor_id, user.id);

    Ok(HttpResponse::Ok().json(MessageResponse::new("Mentor verified successfully")))
}

async fn delete_mentor(
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_role(&user, Role::Admin)?;
    let mentor_id = path.into_inner();

    if !state.postgres.delete_mentor(mentor_id).await? {
        return Err(ApiError::NotFound("Mentor not found".to_string()));
    }

    state.cache.invalidate().await;
    tracing::info!("Mentor {} deleted by {}", mentor_id, user.id);

    Ok(HttpResponse::Ok().json(MessageResponse::new("Mentor deleted successfully")))
}

/// Insert the demo mentor roster
///
/// POST /api/admin/seed-data
async fn seed_data(
    state: web::Data<AppState>,
    user: CurrentUser,
) -> Result<HttpResponse, ApiError> {
    require_role(&user, Role::Admin)?;

    let password = state.settings.seed.mentor_password.clone();
    let cost = state.settings.auth.bcrypt_cost;
    let password_hash = web::block(move || hash_password(&password, cost)).await??;

    let (created, skipped) = seed_demo_mentors(&state.postgres, &password_hash).await?;

    if created > 0 {
        state.cache.invalidate().await;
    }

    Ok(HttpResponse::Ok().json(SeedResponse {
        message: format!("Seeded {} mentors", created),
        created,
        skipped,
    }))
}
