use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest, HttpResponse};
use futures::future::LocalBoxFuture;
use std::ops::Deref;
use validator::Validate;

use crate::models::{LoginRequest, ProfileUpdate, RegisterRequest, Role, TokenResponse, User};
use crate::routes::{ApiError, AppState};
use crate::services::{hash_password, verify_password, NewUser, PostgresError};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/auth/register", web::post().to(register))
        .route("/auth/login", web::post().to(login));
}

/// The authenticated caller, resolved from the `Authorization: Bearer` header
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl Deref for CurrentUser {
    type Target = User;

    fn deref(&self) -> &User {
        &self.0
    }
}

impl FromRequest for CurrentUser {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = bearer_token(req);

        Box::pin(async move {
            let state = state.ok_or_else(|| ApiError::Internal("Application state missing".to_string()))?;
            let token = token.ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

            let claims = state.tokens.verify(&token)?;

            let record = state
                .postgres
                .find_user_by_email(&claims.sub)
                .await?
                .ok_or_else(ApiError::credentials)?;

            if !record.user.is_active {
                return Err(ApiError::BadRequest("Inactive user".to_string()));
            }

            Ok(CurrentUser(record.user))
        })
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    (scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty())
        .then(|| token.trim().to_string())
}

/// Capability check applied at the request layer
pub fn require_role(user: &User, role: Role) -> Result<(), ApiError> {
    if user.role == role {
        return Ok(());
    }

    let required = match role {
        Role::Seeker => "Seeker",
        Role::Mentor => "Mentor",
        Role::Admin => "Admin",
    };

    Err(ApiError::Forbidden(format!("{} access required", required)))
}

/// Create an account and return a bearer token
///
/// POST /api/auth/register
async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = body.into_inner();
    req.validate()?;

    if req.role == Role::Admin {
        return Err(ApiError::BadRequest("Cannot register as admin".to_string()));
    }

    if state.postgres.find_user_by_email(&req.email).await?.is_some() {
        return Err(ApiError::BadRequest("Email already registered".to_string()));
    }

    let cost = state.settings.auth.bcrypt_cost;
    let password = req.password;
    let password_hash = web::block(move || hash_password(&password, cost)).await??;

    let new_user = NewUser {
        email: req.email,
        name: req.name,
        password_hash,
        role: req.role,
        is_verified: false,
    };

    let user = match state.postgres.create_user(&new_user, &ProfileUpdate::default()).await {
        Ok(user) => user,
        Err(PostgresError::Duplicate(_)) => {
            return Err(ApiError::BadRequest("Email already registered".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!("Registered {} account {}", user.role.as_str(), user.id);

    let token = state.tokens.issue(&user.email)?;
    Ok(HttpResponse::Ok().json(TokenResponse::bearer(token)))
}

/// POST /api/auth/login
async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = body.into_inner();
    req.validate()?;

    let rejected = || ApiError::Unauthorized("Incorrect email or password".to_string());

    let record = state
        .postgres
        .find_user_by_email(&req.email)
        .await?
        .ok_or_else(rejected)?;

    let password = req.password;
    let stored_hash = record.password_hash.clone();
    let matches = web::block(move || verify_password(&password, &stored_hash)).await??;

    if !matches {
        tracing::debug!("Failed login for {}", record.user.id);
        return Err(rejected());
    }

    let token = state.tokens.issue(&record.user.email)?;
    Ok(HttpResponse::Ok().json(TokenResponse::bearer(token)))
}
