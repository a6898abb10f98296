//! Explicit token lookup tables used by the portfolio aggregator.
//!
//! Both tables are validated when built and answer lookups for tokens they
//! do not know with `AggregatorError::UnknownToken`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use crate::error::{AggregatorError, PaletteError, PriceTableError};
use crate::models::token::TokenSymbol;

/// Highest accepted unit price. Together with the catalog's amount and size
/// bounds this keeps every valuation within `Decimal` range.
pub const MAX_TOKEN_PRICE: Decimal = dec!(1_000_000_000);

/// Static USD unit prices. No freshness guarantee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPriceTable {
    prices: HashMap<TokenSymbol, Decimal>,
}

impl TokenPriceTable {
    pub fn new(
        entries: impl IntoIterator<Item = (TokenSymbol, Decimal)>,
    ) -> Result<Self, PriceTableError> {
        let mut prices = HashMap::new();

        for (symbol, price) in entries {
            if price.is_sign_negative() && !price.is_zero() {
                return Err(PriceTableError::NegativePrice {
                    symbol,
                    price: price.to_string(),
                });
            }
            if price > MAX_TOKEN_PRICE {
                return Err(PriceTableError::PriceTooLarge {
                    symbol,
                    price: price.to_string(),
                    max: MAX_TOKEN_PRICE.to_string(),
                });
            }
            match prices.entry(symbol) {
                Entry::Occupied(entry) => {
                    return Err(PriceTableError::DuplicateSymbol(entry.key().clone()))
                }
                Entry::Vacant(entry) => {
                    entry.insert(price);
                }
            }
        }

        Ok(Self { prices })
    }

    /// Parse a comma-separated list such as `ETH=2050,USDC=1,DAI=1`
    pub fn parse_list(list: &str) -> Result<Self, PriceTableError> {
        let mut entries = Vec::new();

        for raw in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (symbol, price) = raw
                .split_once('=')
                .ok_or_else(|| PriceTableError::MalformedEntry(raw.to_string()))?;
            let price = Decimal::from_str(price.trim())
                .map_err(|_| PriceTableError::MalformedEntry(raw.to_string()))?;
            entries.push((TokenSymbol::new(symbol)?, price));
        }

        Self::new(entries)
    }

    pub fn price_of(&self, symbol: &TokenSymbol) -> Result<Decimal, AggregatorError> {
        self.prices
            .get(symbol)
            .copied()
            .ok_or_else(|| AggregatorError::UnknownToken(symbol.clone()))
    }

    /// Priced symbols in alphabetical order
    pub fn symbols(&self) -> Vec<&TokenSymbol> {
        let mut symbols: Vec<_> = self.prices.keys().collect();
        symbols.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        symbols
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl Default for TokenPriceTable {
    fn default() -> Self {
        Self {
            prices: default_symbols()
                .into_iter()
                .zip([dec!(2050), dec!(1), dec!(1)])
                .collect(),
        }
    }
}

/// Display color per token for the allocation chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPalette {
    colors: HashMap<TokenSymbol, String>,
}

impl TokenPalette {
    pub fn new(entries: impl IntoIterator<Item = (TokenSymbol, String)>) -> Self {
        Self {
            colors: entries.into_iter().collect(),
        }
    }

    /// Default colors extended by a list such as `SOL=#14F195,ETH=#627EEA`.
    /// Listed tokens replace their default color.
    pub fn with_overrides(list: &str) -> Result<Self, PaletteError> {
        let mut palette = Self::default();
        let mut listed = HashSet::new();

        for raw in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (symbol, color) = raw
                .split_once('=')
                .ok_or_else(|| PaletteError::MalformedEntry(raw.to_string()))?;
            let symbol = TokenSymbol::new(symbol)?;
            let color = color.trim();

            if !is_hex_color(color) {
                return Err(PaletteError::InvalidColor {
                    symbol,
                    color: color.to_string(),
                });
            }
            if !listed.insert(symbol.clone()) {
                return Err(PaletteError::DuplicateSymbol(symbol));
            }
            palette.colors.insert(symbol, color.to_uppercase());
        }

        Ok(palette)
    }

    pub fn color_of(&self, symbol: &TokenSymbol) -> Result<&str, AggregatorError> {
        self.colors
            .get(symbol)
            .map(String::as_str)
            .ok_or_else(|| AggregatorError::UnknownToken(symbol.clone()))
    }

    pub fn contains(&self, symbol: &TokenSymbol) -> bool {
        self.colors.contains_key(symbol)
    }
}

fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

impl Default for TokenPalette {
    fn default() -> Self {
        Self::new(
            default_symbols()
                .into_iter()
                .zip(["#8B5CF6", "#3B82F6", "#EF4444"].map(String::from)),
        )
    }
}

fn default_symbols() -> [TokenSymbol; 3] {
    ["ETH", "USDC", "DAI"].map(TokenSymbol::known)
}
