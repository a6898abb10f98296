use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HoldingParseError;

/// Upper-cased ticker symbol such as `ETH` or `USDC`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenSymbol(String);

impl TokenSymbol {
    pub fn new(raw: &str) -> Result<Self, HoldingParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(HoldingParseError::InvalidSymbol(raw.to_string()));
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// For symbols written in source; skips validation.
    pub(crate) fn known(symbol: &str) -> Self {
        Self(symbol.to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TokenSymbol {
    type Err = HoldingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TokenSymbol {
    type Error = HoldingParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<TokenSymbol> for String {
    fn from(symbol: TokenSymbol) -> Self {
        symbol.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
