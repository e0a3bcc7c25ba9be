//! Axum route handlers for the Matching API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::matching::matcher::{MatchSummary, DEFAULT_MATCH_LIMIT};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MatchesQuery {
    pub limit: Option<usize>,
}

/// GET /api/v1/jobs/:id/matches
///
/// Ranked AI matches for one job. Authorization (job owner or admin) is
/// enforced by the gateway in front of this service, not here.
pub async fn handle_get_matches(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
    Query(query): Query<MatchesQuery>,
) -> Result<Json<MatchSummary>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_MATCH_LIMIT);
    if limit == 0 {
        return Err(AppError::Validation(
            "limit must be a positive integer".to_string(),
        ));
    }

    let summary = state.matcher.compute_matches(job_id, limit).await?;

    Ok(Json(summary))
}
