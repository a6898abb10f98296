use std::time::Duration;

use axum::Router;
use vaultlock_backend::{
    build_router,
    services::{
        portfolio_service::PortfolioService,
        token_tables::{TokenPalette, TokenPriceTable},
        vault_catalog::VaultCatalog,
    },
    AppState,
};

/// Router over the demo vaults with the default price table
pub fn build_test_router() -> Router {
    build_test_router_with_prices(TokenPriceTable::default())
}

pub fn build_test_router_with_prices(prices: TokenPriceTable) -> Router {
    build_test_router_with(VaultCatalog::seeded(), prices, TokenPalette::default())
}

pub fn build_test_router_with(
    catalog: VaultCatalog,
    prices: TokenPriceTable,
    palette: TokenPalette,
) -> Router {
    let state = AppState {
        portfolio: PortfolioService::new(catalog, prices, palette, Duration::from_secs(60)),
        history_points: 20,
    };

    build_router(state)
}
