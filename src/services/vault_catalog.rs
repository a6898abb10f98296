use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashSet;
use std::path::Path;

use crate::error::CatalogError;
use crate::models::token::TokenSymbol;
use crate::models::vault::{Holding, Vault, VaultStatus};

/// Largest holding a vault may carry, in token units
pub const MAX_HOLDING_AMOUNT: Decimal = dec!(1_000_000_000_000);
/// Longest remaining lock, about a century
pub const MAX_DAYS_LEFT: u32 = 36_525;
pub const MAX_VAULTS: usize = 100_000;

/// Read-only set of vaults served by the API.
///
/// Loaded once at startup; nothing is written back.
#[derive(Debug, Clone, Default)]
pub struct VaultCatalog {
    vaults: Vec<Vault>,
}

impl VaultCatalog {
    pub fn new(vaults: Vec<Vault>) -> Result<Self, CatalogError> {
        if vaults.len() > MAX_VAULTS {
            return Err(CatalogError::TooManyVaults(vaults.len()));
        }

        let mut seen = HashSet::new();

        for vault in &vaults {
            if !seen.insert(vault.id) {
                return Err(CatalogError::DuplicateVaultId(vault.id));
            }

            if vault.progress > 100 {
                return Err(CatalogError::ProgressOutOfRange {
                    id: vault.id,
                    progress: vault.progress,
                });
            }

            if vault.holding.amount > MAX_HOLDING_AMOUNT {
                return Err(CatalogError::AmountOutOfRange {
                    id: vault.id,
                    amount: vault.holding.amount.to_string(),
                    max: MAX_HOLDING_AMOUNT.to_string(),
                });
            }

            if vault.days_left > MAX_DAYS_LEFT {
                return Err(CatalogError::DaysLeftOutOfRange {
                    id: vault.id,
                    days_left: vault.days_left,
                    max: MAX_DAYS_LEFT,
                });
            }

            if !vault.is_lifecycle_consistent() {
                tracing::warn!(
                    vault_id = vault.id,
                    progress = vault.progress,
                    status = vault.status.as_str(),
                    days_left = vault.days_left,
                    "Vault lifecycle fields disagree"
                );
            }
        }

        tracing::debug!("Vault catalog holds {} vaults", vaults.len());

        Ok(Self { vaults })
    }

    /// Load a JSON array of vaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        tracing::info!("Loading vaults from {}", path.display());

        let contents = std::fs::read_to_string(path)?;
        let vaults: Vec<Vault> = serde_json::from_str(&contents)?;

        Self::new(vaults)
    }

    /// The demo vaults shown on the dashboard
    pub fn seeded() -> Self {
        let vault = |id, name: &str, category: &str, holding, progress, status, days_left| Vault {
            id,
            name: name.to_string(),
            category: category.to_string(),
            holding,
            progress,
            status,
            days_left,
        };

        Self {
            vaults: vec![
                vault(
                    1,
                    "Long-term Savings",
                    "Savings",
                    Holding::new(dec!(2.5), TokenSymbol::known("ETH")),
                    65,
                    VaultStatus::Locked,
                    127,
                ),
                vault(
                    2,
                    "Trading Control",
                    "Trading",
                    Holding::new(dec!(5000), TokenSymbol::known("USDC")),
                    30,
                    VaultStatus::Locked,
                    45,
                ),
                vault(
                    3,
                    "Emergency Fund",
                    "Savings",
                    Holding::new(dec!(1.2), TokenSymbol::known("ETH")),
                    90,
                    VaultStatus::Unlocking,
                    15,
                ),
                vault(
                    4,
                    "Education Fund",
                    "Goals",
                    Holding::new(dec!(10000), TokenSymbol::known("DAI")),
                    100,
                    VaultStatus::Completed,
                    0,
                ),
            ],
        }
    }

    pub fn vaults(&self) -> &[Vault] {
        &self.vaults
    }

    pub fn find(&self, id: u32) -> Option<&Vault> {
        self.vaults.iter().find(|v| v.id == id)
    }

    /// Case-insensitive match on name or category; a blank query returns everything
    pub fn search(&self, query: &str) -> Vec<&Vault> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.vaults.iter().collect();
        }

        self.vaults
            .iter()
            .filter(|v| {
                v.name.to_lowercase().contains(&needle)
                    || v.category.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.vaults.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vaults.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_seeded_catalog() {
        let catalog = VaultCatalog::seeded();
        assert_eq!(catalog.len(), 4);
        assert!(catalog.vaults().iter().all(|v| v.is_lifecycle_consistent()));
        assert_eq!(catalog.find(3).map(|v| v.name.as_str()), Some("Emergency Fund"));
        assert!(catalog.find(99).is_none());
    }

    #[test]
    fn test_search() {
        let catalog = VaultCatalog::seeded();

        let names: Vec<&str> = catalog.search("fund").iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Emergency Fund", "Education Fund"]);

        // Category match
        assert_eq!(catalog.search("SAVINGS").len(), 2);
        assert_eq!(catalog.search("   ").len(), 4);
        assert!(catalog.search("retirement").is_empty());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut vaults = VaultCatalog::seeded().vaults().to_vec();
        vaults[1].id = 1;

        assert!(matches!(
            VaultCatalog::new(vaults),
            Err(CatalogError::DuplicateVaultId(1))
        ));
    }

    #[test]
    fn test_progress_over_100_rejected() {
        let mut vaults = VaultCatalog::seeded().vaults().to_vec();
        vaults[0].progress = 101;

        assert!(matches!(
            VaultCatalog::new(vaults),
            Err(CatalogError::ProgressOutOfRange { id: 1, progress: 101 })
        ));
    }

    #[test]
    fn test_oversized_holding_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id": 9, "name": "Whale", "category": "Savings",
                  "holding": "50000000000000000000000000 ETH",
                  "progress": 10, "status": "locked", "days_left": 30}}
            ]"#
        )
        .unwrap();

        assert!(matches!(
            VaultCatalog::from_json_file(file.path()),
            Err(CatalogError::AmountOutOfRange { id: 9, .. })
        ));
    }

    #[test]
    fn test_holding_at_max_accepted() {
        let mut vaults = VaultCatalog::seeded().vaults().to_vec();
        vaults[0].holding.amount = MAX_HOLDING_AMOUNT;
        assert!(VaultCatalog::new(vaults.clone()).is_ok());

        vaults[0].holding.amount = MAX_HOLDING_AMOUNT + dec!(0.1);
        assert!(matches!(
            VaultCatalog::new(vaults),
            Err(CatalogError::AmountOutOfRange { id: 1, .. })
        ));
    }

    #[test]
    fn test_days_left_bound() {
        let mut vaults = VaultCatalog::seeded().vaults().to_vec();
        vaults[1].days_left = MAX_DAYS_LEFT;
        assert!(VaultCatalog::new(vaults.clone()).is_ok());

        vaults[1].days_left = 4_000_000_000;
        assert!(matches!(
            VaultCatalog::new(vaults),
            Err(CatalogError::DaysLeftOutOfRange {
                id: 2,
                days_left: 4_000_000_000,
                ..
            })
        ));
    }

    #[test]
    fn test_too_many_vaults_rejected() {
        let template = VaultCatalog::seeded().vaults()[0].clone();
        let vaults: Vec<Vault> = (0..=MAX_VAULTS as u32)
            .map(|id| Vault { id, ..template.clone() })
            .collect();

        assert!(matches!(
            VaultCatalog::new(vaults),
            Err(CatalogError::TooManyVaults(n)) if n == MAX_VAULTS + 1
        ));
    }

    #[test]
    fn test_inconsistent_vault_is_accepted() {
        let mut vaults = VaultCatalog::seeded().vaults().to_vec();
        vaults[3].days_left = 12;

        let catalog = VaultCatalog::new(vaults).unwrap();
        assert!(!catalog.find(4).unwrap().is_lifecycle_consistent());
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id": 7, "name": "House", "category": "Goals", "holding": "3 ETH",
                  "progress": 10, "status": "locked", "days_left": 300}}
            ]"#
        )
        .unwrap();

        let catalog = VaultCatalog::from_json_file(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find(7).unwrap().holding.to_string(), "3 ETH");
    }

    #[test]
    fn test_from_json_file_errors() {
        assert!(matches!(
            VaultCatalog::from_json_file("/nonexistent/vaults.json"),
            Err(CatalogError::Io(_))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": 1, "holding": "abc"}}]"#).unwrap();
        assert!(matches!(
            VaultCatalog::from_json_file(file.path()),
            Err(CatalogError::Parse(_))
        ));
    }
}
