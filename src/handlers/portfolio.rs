use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use super::error_response;
use crate::{
    config::MAX_HISTORY_POINTS,
    error::ServiceError,
    models::{
        portfolio::{
            AggregateStats, AllocationQuery, AllocationResponse, HistoryQuery, HistoryResponse,
            UpcomingUnlocksResponse,
        },
        token::ErrorResponse,
    },
    AppState,
};

/// Handler for GET /api/portfolio/totals
pub async fn get_totals(
    State(state): State<AppState>,
) -> Result<Json<AggregateStats>, (StatusCode, Json<ErrorResponse>)> {
    state.portfolio.totals().map(Json).map_err(error_response)
}

/// Handler for GET /api/portfolio/allocation
/// Whole-portfolio token allocation, or a single entry when `vault_id` is given
pub async fn get_allocation(
    State(state): State<AppState>,
    Query(query): Query<AllocationQuery>,
) -> Result<Json<AllocationResponse>, (StatusCode, Json<ErrorResponse>)> {
    let entries = state
        .portfolio
        .allocation(query.vault_id)
        .await
        .map_err(error_response)?;

    Ok(Json(AllocationResponse {
        vault_id: query.vault_id,
        entries: entries.to_vec(),
    }))
}

/// Handler for GET /api/portfolio/history
/// Synthetic value series for the growth chart
pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, (StatusCode, Json<ErrorResponse>)> {
    let point_count = query.points.unwrap_or(state.history_points);
    if point_count > MAX_HISTORY_POINTS {
        return Err(error_response(ServiceError::validation(
            "points",
            format!("must be at most {}", MAX_HISTORY_POINTS),
        )));
    }

    let points = state
        .portfolio
        .history(query.vault_id, point_count)
        .await
        .map_err(error_response)?;

    Ok(Json(HistoryResponse {
        vault_id: query.vault_id,
        synthetic: true,
        points: points.to_vec(),
    }))
}

/// Handler for GET /api/portfolio/unlocks
pub async fn get_upcoming_unlocks(State(state): State<AppState>) -> Json<UpcomingUnlocksResponse> {
    Json(UpcomingUnlocksResponse {
        unlocks: state.portfolio.upcoming_unlocks(),
    })
}
