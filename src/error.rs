//! Error types shared across the crate.

use thiserror::Error;

use crate::models::token::TokenSymbol;

/// The only failure the portfolio aggregator can produce.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregatorError {
    #[error("unknown token: {0}")]
    UnknownToken(TokenSymbol),
}

/// Failure to parse a `"<amount> <SYMBOL>"` holding or a bare token symbol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HoldingParseError {
    #[error("holding '{0}' must look like '<amount> <SYMBOL>'")]
    Malformed(String),
    #[error("invalid amount '{0}'")]
    InvalidAmount(String),
    #[error("amount must not be negative: {0}")]
    NegativeAmount(String),
    #[error("invalid token symbol '{0}'")]
    InvalidSymbol(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceTableError {
    #[error("negative price for {symbol}: {price}")]
    NegativePrice { symbol: TokenSymbol, price: String },
    #[error("price for {symbol} is {price}, must be at most {max}")]
    PriceTooLarge {
        symbol: TokenSymbol,
        price: String,
        max: String,
    },
    #[error("duplicate price for {0}")]
    DuplicateSymbol(TokenSymbol),
    #[error("malformed price entry '{0}', expected SYMBOL=PRICE")]
    MalformedEntry(String),
    #[error(transparent)]
    Symbol(#[from] HoldingParseError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("invalid color '{color}' for {symbol}, expected #RRGGBB")]
    InvalidColor { symbol: TokenSymbol, color: String },
    #[error("duplicate color for {0}")]
    DuplicateSymbol(TokenSymbol),
    #[error("malformed color entry '{0}', expected SYMBOL=#RRGGBB")]
    MalformedEntry(String),
    #[error(transparent)]
    Symbol(#[from] HoldingParseError),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate vault id {0}")]
    DuplicateVaultId(u32),
    #[error("vault {id} has progress {progress}, must be at most 100")]
    ProgressOutOfRange { id: u32, progress: u8 },
    #[error("vault {id} holds {amount}, must be at most {max}")]
    AmountOutOfRange {
        id: u32,
        amount: String,
        max: String,
    },
    #[error("vault {id} has {days_left} days left, must be at most {max}")]
    DaysLeftOutOfRange { id: u32, days_left: u32, max: u32 },
    #[error("catalog holds {0} vaults, must be at most {max}", max = crate::services::vault_catalog::MAX_VAULTS)]
    TooManyVaults(usize),
    #[error("failed to read vault file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse vault file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
    #[error(transparent)]
    Prices(#[from] PriceTableError),
    #[error(transparent)]
    Palette(#[from] PaletteError),
    #[error("token {0} has a price but no chart color")]
    MissingColor(TokenSymbol),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Errors surfaced by the portfolio service to the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Aggregator(#[from] AggregatorError),
    #[error("vault {0} not found")]
    VaultNotFound(u32),
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
}

impl ServiceError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ServiceError::Validation {
            field,
            message: message.into(),
        }
    }
}
