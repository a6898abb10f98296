use chrono::{NaiveDate, Utc};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

use crate::error::ServiceError;
use crate::models::portfolio::{AggregateStats, AllocationEntry, HistoryPoint, UpcomingUnlock};
use crate::models::vault::{Vault, VaultDraft, VaultPreview};
use crate::services::dashboard;
use crate::services::portfolio_aggregator::{self, Selection};
use crate::services::token_tables::{TokenPalette, TokenPriceTable};
use crate::services::vault_catalog::VaultCatalog;

/// (selected vault, point count, day the series ends on)
type HistoryKey = (Option<u32>, usize, NaiveDate);

/// Serves aggregator views over the catalog and memoizes them.
///
/// The catalog and tables never change after construction, so the selected
/// vault id (plus point count and date for history) fully determines a result.
#[derive(Clone)]
pub struct PortfolioService {
    catalog: Arc<VaultCatalog>,
    prices: Arc<TokenPriceTable>,
    palette: Arc<TokenPalette>,
    allocation_cache: Cache<Option<u32>, Arc<Vec<AllocationEntry>>>,
    history_cache: Cache<HistoryKey, Arc<Vec<HistoryPoint>>>,
}

impl PortfolioService {
    pub fn new(
        catalog: VaultCatalog,
        prices: TokenPriceTable,
        palette: TokenPalette,
        cache_ttl: Duration,
    ) -> Self {
        let allocation_cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(cache_ttl)
            .build();
        let history_cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(cache_ttl)
            .build();

        Self {
            catalog: Arc::new(catalog),
            prices: Arc::new(prices),
            palette: Arc::new(palette),
            allocation_cache,
            history_cache,
        }
    }

    pub fn catalog(&self) -> &VaultCatalog {
        &self.catalog
    }

    pub fn vault(&self, id: u32) -> Result<&Vault, ServiceError> {
        self.catalog.find(id).ok_or(ServiceError::VaultNotFound(id))
    }

    pub fn totals(&self) -> Result<AggregateStats, ServiceError> {
        let stats = portfolio_aggregator::compute_totals(self.catalog.vaults(), &self.prices)?;

        tracing::debug!(
            total_usd_value = %stats.total_usd_value,
            active_vaults = stats.active_vaults,
            "Computed portfolio totals"
        );

        Ok(stats)
    }

    pub async fn allocation(
        &self,
        vault_id: Option<u32>,
    ) -> Result<Arc<Vec<AllocationEntry>>, ServiceError> {
        if let Some(cached) = self.allocation_cache.get(&vault_id).await {
            tracing::debug!("Cache hit for allocation {:?}", vault_id);
            return Ok(cached);
        }

        let selection = self.selection(vault_id)?;
        let entries = Arc::new(portfolio_aggregator::compute_allocation(
            selection,
            &self.prices,
            &self.palette,
        )?);

        self.allocation_cache.insert(vault_id, entries.clone()).await;
        Ok(entries)
    }

    pub async fn history(
        &self,
        vault_id: Option<u32>,
        point_count: usize,
    ) -> Result<Arc<Vec<HistoryPoint>>, ServiceError> {
        self.history_on(vault_id, point_count, today()).await
    }

    pub async fn history_on(
        &self,
        vault_id: Option<u32>,
        point_count: usize,
        today: NaiveDate,
    ) -> Result<Arc<Vec<HistoryPoint>>, ServiceError> {
        let key = (vault_id, point_count, today);
        if let Some(cached) = self.history_cache.get(&key).await {
            tracing::debug!("Cache hit for history {:?}", key);
            return Ok(cached);
        }

        let selection = self.selection(vault_id)?;
        let points = Arc::new(portfolio_aggregator::compute_history(
            selection,
            &self.prices,
            point_count,
            today,
        )?);

        self.history_cache.insert(key, points.clone()).await;
        Ok(points)
    }

    pub fn upcoming_unlocks(&self) -> Vec<UpcomingUnlock> {
        dashboard::upcoming_unlocks(self.catalog.vaults(), today())
    }

    pub fn preview(&self, draft: &VaultDraft) -> Result<VaultPreview, ServiceError> {
        dashboard::preview_vault(draft, &self.prices, &self.palette, today())
    }

    fn selection(&self, vault_id: Option<u32>) -> Result<Selection<'_>, ServiceError> {
        match vault_id {
            Some(id) => Ok(Selection::Vault(self.vault(id)?)),
            None => Ok(Selection::Portfolio(self.catalog.vaults())),
        }
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AggregatorError;
    use crate::models::token::TokenSymbol;
    use rust_decimal_macros::dec;

    fn service() -> PortfolioService {
        PortfolioService::new(
            VaultCatalog::seeded(),
            TokenPriceTable::default(),
            TokenPalette::default(),
            Duration::from_secs(60),
        )
    }

    #[test]
    fn test_totals() {
        let stats = service().totals().unwrap();
        assert_eq!(stats.total_usd_value, dec!(22585));
        assert_eq!(stats.active_vaults, 3);
        assert_eq!(stats.average_lock_period, 47);
    }

    #[tokio::test]
    async fn test_allocation_is_memoized() {
        let service = service();

        let first = service.allocation(None).await.unwrap();
        let second = service.allocation(None).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 3);

        let selected = service.allocation(Some(2)).await.unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name.as_str(), "USDC");
    }

    #[tokio::test]
    async fn test_history_keyed_by_date() {
        let service = service();
        let day_one = NaiveDate::from_ymd_opt(2024, 4, 10).unwrap();
        let day_two = NaiveDate::from_ymd_opt(2024, 4, 11).unwrap();

        let first = service.history_on(None, 20, day_one).await.unwrap();
        let again = service.history_on(None, 20, day_one).await.unwrap();
        let next_day = service.history_on(None, 20, day_two).await.unwrap();

        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(next_day[19].date, day_one);
        assert_eq!(first[19].value, dec!(22585));
    }

    #[tokio::test]
    async fn test_missing_vault() {
        let service = service();
        assert_eq!(
            service.allocation(Some(42)).await.unwrap_err(),
            ServiceError::VaultNotFound(42)
        );
        assert_eq!(
            service.history(Some(42), 20).await.unwrap_err(),
            ServiceError::VaultNotFound(42)
        );
    }

    #[tokio::test]
    async fn test_unknown_token_is_not_cached_as_success() {
        let service = PortfolioService::new(
            VaultCatalog::seeded(),
            TokenPriceTable::parse_list("ETH=2050,USDC=1").unwrap(),
            TokenPalette::default(),
            Duration::from_secs(60),
        );

        let expected = ServiceError::Aggregator(AggregatorError::UnknownToken(
            TokenSymbol::new("DAI").unwrap(),
        ));
        assert_eq!(service.totals().unwrap_err(), expected);
        assert_eq!(service.allocation(None).await.unwrap_err(), expected);
        assert_eq!(service.allocation(None).await.unwrap_err(), expected);

        // A vault holding a priced token still works
        assert_eq!(service.allocation(Some(1)).await.unwrap().len(), 1);
    }
}
