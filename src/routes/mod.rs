// Route exports
pub mod admin;
pub mod auth;
pub mod conversations;
pub mod error;
pub mod health;
pub mod schedules;
pub mod search;
pub mod users;

pub use auth::{require_role, CurrentUser};
pub use error::ApiError;

use actix_web::web;
use std::sync::Arc;

use crate::config::Settings;
use crate::core::SearchRanker;
use crate::services::{CandidateCache, MessageHub, PostgresClient, TokenService};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub cache: Arc<CandidateCache>,
    pub hub: Arc<MessageHub>,
    pub tokens: Arc<TokenService>,
    pub ranker: SearchRanker,
    pub settings: Arc<Settings>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(health::configure)
            .configure(auth::configure)
            .configure(users::configure)
            .configure(search::configure)
            .configure(conversations::configure)
            .configure(schedules::configure)
            .configure(admin::configure),
    );
}
