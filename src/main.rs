use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vaultlock_backend::{
    build_router, config::AppConfig, services::portfolio_service::PortfolioService, AppState,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,vaultlock_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().expect("Invalid configuration");
    let catalog = config.load_catalog().expect("Failed to load vaults");

    tracing::info!(
        vaults = catalog.len(),
        priced_tokens = config.prices.len(),
        history_points = config.history_points,
        cache_ttl_secs = config.cache_ttl.as_secs(),
        "Starting portfolio service"
    );

    let state = AppState {
        portfolio: PortfolioService::new(
            catalog,
            config.prices.clone(),
            config.palette.clone(),
            config.cache_ttl,
        ),
        history_points: config.history_points,
    };

    let app = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!(
        "Server listening on {}",
        listener
            .local_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| config.bind_addr.clone())
    );

    axum::serve(listener, app).await.expect("Server error");
}
