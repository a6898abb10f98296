use axum::{http::StatusCode, Json};

use crate::error::ServiceError;
use crate::models::token::ErrorResponse;

pub mod portfolio;
pub mod vaults;

pub async fn hello_vaultlock() -> &'static str {
    "Hello from VaultLock Backend!"
}

/// Map a service failure onto the JSON error body handlers return
pub fn error_response(err: ServiceError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &err {
        ServiceError::Aggregator(_) => {
            tracing::warn!("Portfolio aggregation failed: {}", err);
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ServiceError::VaultNotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Validation { .. } => StatusCode::BAD_REQUEST,
    };

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}
