use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use super::error_response;
use crate::{
    models::{
        token::ErrorResponse,
        vault::{VaultDetailResponse, VaultDraft, VaultListQuery, VaultListResponse, VaultPreview},
    },
    services::dashboard,
    AppState,
};

/// Handler for GET /api/vaults
/// Lists vaults, optionally filtered by a name/category search
pub async fn list_vaults(
    State(state): State<AppState>,
    Query(query): Query<VaultListQuery>,
) -> Json<VaultListResponse> {
    let catalog = state.portfolio.catalog();
    let vaults: Vec<_> = match query.search.as_deref() {
        Some(search) => catalog.search(search).into_iter().cloned().collect(),
        None => catalog.vaults().to_vec(),
    };

    tracing::info!("Listing {} vaults (search: {:?})", vaults.len(), query.search);

    Json(VaultListResponse {
        total_count: vaults.len(),
        vaults,
    })
}

/// Handler for GET /api/vaults/{id}
pub async fn get_vault(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<VaultDetailResponse>, (StatusCode, Json<ErrorResponse>)> {
    let vault = state.portfolio.vault(id).map_err(error_response)?;

    Ok(Json(VaultDetailResponse {
        stats: dashboard::vault_stats(vault),
        unlock_date: vault.unlock_date(Utc::now().date_naive()),
        vault: vault.clone(),
    }))
}

/// Handler for POST /api/vaults/preview
/// Validates a draft vault and returns what it would look like. Nothing is stored.
pub async fn preview_vault(
    State(state): State<AppState>,
    Json(draft): Json<VaultDraft>,
) -> Result<Json<VaultPreview>, (StatusCode, Json<ErrorResponse>)> {
    tracing::info!("Previewing vault draft '{}'", draft.name);

    state
        .portfolio
        .preview(&draft)
        .map(Json)
        .map_err(error_response)
}
