// src/lib.rs

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use services::portfolio_service::PortfolioService;

#[derive(Clone)]
pub struct AppState {
    pub portfolio: PortfolioService,
    pub history_points: usize,
}

pub mod config;
pub mod error;

pub mod services {
    pub mod dashboard;
    pub mod portfolio_aggregator;
    pub mod portfolio_service;
    pub mod token_tables;
    pub mod vault_catalog;
}

pub mod models;
pub mod handlers;

/// All API routes with tracing and permissive CORS for the dashboard frontend
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::hello_vaultlock))
        .route("/api/vaults", get(handlers::vaults::list_vaults))
        .route("/api/vaults/preview", post(handlers::vaults::preview_vault))
        .route("/api/vaults/{id}", get(handlers::vaults::get_vault))
        .route("/api/portfolio/totals", get(handlers::portfolio::get_totals))
        .route("/api/portfolio/allocation", get(handlers::portfolio::get_allocation))
        .route("/api/portfolio/history", get(handlers::portfolio::get_history))
        .route("/api/portfolio/unlocks", get(handlers::portfolio::get_upcoming_unlocks))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
