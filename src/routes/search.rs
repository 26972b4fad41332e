use actix_web::{web, HttpResponse};
use std::sync::Arc;
use validator::Validate;

use crate::models::{MentorCandidate, SearchParams};
use crate::routes::{ApiError, AppState, CurrentUser};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/search/mentors", web::get().to(search_mentors));
}

/// Rank searchable mentors against a free-text query
///
/// GET /api/search/mentors?q=python
async fn search_mentors(
    state: web::Data<AppState>,
    _user: CurrentUser,
    params: web::Query<SearchParams>,
) -> Result<HttpResponse, ApiError> {
    let SearchParams { q } = checked_query(params.into_inner())?;
    let candidates = load_candidates(&state).await?;

    // Scoring is CPU-bound; keep it off the worker thread
    let ranker = state.ranker.clone();
    let pool = candidates.clone();
    let query = q.clone();
    let results = web::block(move || ranker.rank(&query, &pool)).await?;

    tracing::info!(
        "Search {:?} returned {} of {} candidates",
        q,
        results.len(),
        candidates.len()
    );

    Ok(HttpResponse::Ok().json(results))
}

fn checked_query(params: SearchParams) -> Result<SearchParams, ApiError> {
    params.validate()?;
    Ok(params)
}

async fn load_candidates(state: &AppState) -> Result<Arc<Vec<MentorCandidate>>, ApiError> {
    if let Some(cached) = state.cache.get().await {
        return Ok(cached);
    }

    let fresh = state
        .postgres
        .list_mentor_candidates(state.settings.search.candidate_limit)
        .await?;

    tracing::debug!("Loaded {} mentor candidates", fresh.len());

    Ok(state.cache.set(fresh).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorResponse;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;

    #[test]
    fn test_query_up_to_limit_accepted() {
        let params = SearchParams { q: "é".repeat(100) };
        assert!(checked_query(params).is_ok());
    }

    #[actix_web::test]
    async fn test_overlong_query_rejected() {
        let err = checked_query(SearchParams { q: "python ".repeat(60) }).unwrap_err();
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body()).await.unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.error, "validation_failed");
    }
}
