//! Runtime configuration read from the environment.
//!
//! # Environment Variables
//!
//! * `BIND_ADDR` - Address the HTTP server listens on (default: 0.0.0.0:3000)
//! * `VAULTS_FILE` - JSON file with the vault list (default: built-in demo vaults)
//! * `TOKEN_PRICES` - USD prices as `ETH=2050,USDC=1,DAI=1` (default: those values)
//! * `TOKEN_COLORS` - Extra or replacement chart colors as `SOL=#14F195` (default: ETH, USDC, DAI colors)
//! * `HISTORY_POINTS` - Points on the value chart when not requested (default: 20)
//! * `PORTFOLIO_CACHE_TTL_SECS` - How long computed views are memoized (default: 60)

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::services::portfolio_aggregator::DEFAULT_HISTORY_POINTS;
use crate::services::token_tables::{TokenPalette, TokenPriceTable};
use crate::services::vault_catalog::VaultCatalog;

const ENV_BIND_ADDR: &str = "BIND_ADDR";
const ENV_VAULTS_FILE: &str = "VAULTS_FILE";
const ENV_TOKEN_PRICES: &str = "TOKEN_PRICES";
const ENV_TOKEN_COLORS: &str = "TOKEN_COLORS";
const ENV_HISTORY_POINTS: &str = "HISTORY_POINTS";
const ENV_CACHE_TTL: &str = "PORTFOLIO_CACHE_TTL_SECS";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_CACHE_TTL_SECS: u64 = 60;

/// Upper bound on requested history length
pub const MAX_HISTORY_POINTS: usize = 365;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub vaults_file: Option<PathBuf>,
    pub prices: TokenPriceTable,
    pub palette: TokenPalette,
    pub history_points: usize,
    pub cache_ttl: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes `std::env::var`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = lookup(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let vaults_file = lookup(ENV_VAULTS_FILE)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let prices = match lookup(ENV_TOKEN_PRICES) {
            Some(list) => TokenPriceTable::parse_list(&list)?,
            None => TokenPriceTable::default(),
        };

        let palette = match lookup(ENV_TOKEN_COLORS) {
            Some(list) => TokenPalette::with_overrides(&list)?,
            None => TokenPalette::default(),
        };

        // Every priced token needs a chart color
        if let Some(symbol) = prices.symbols().into_iter().find(|s| !palette.contains(s)) {
            return Err(ConfigError::MissingColor(symbol.clone()));
        }

        let history_points = match lookup(ENV_HISTORY_POINTS) {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n <= MAX_HISTORY_POINTS => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_HISTORY_POINTS,
                        value: raw,
                    })
                }
            },
            None => DEFAULT_HISTORY_POINTS,
        };

        let cache_ttl_secs = match lookup(ENV_CACHE_TTL) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: ENV_CACHE_TTL,
                value: raw,
            })?,
            None => DEFAULT_CACHE_TTL_SECS,
        };

        Ok(Self {
            bind_addr,
            vaults_file,
            prices,
            palette,
            history_points,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
        })
    }

    /// Vaults from `VAULTS_FILE`, or the demo set when unset
    pub fn load_catalog(&self) -> Result<VaultCatalog, ConfigError> {
        match &self.vaults_file {
            Some(path) => Ok(VaultCatalog::from_json_file(path)?),
            None => {
                tracing::info!("VAULTS_FILE not set - serving demo vaults");
                Ok(VaultCatalog::seeded())
            }
        }
    }
}
