use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::token::TokenSymbol;
use crate::error::HoldingParseError;

/// Lifecycle status of a time-lock vault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VaultStatus {
    Locked,
    Unlocking,
    Completed,
}

impl VaultStatus {
    /// Locked and unlocking vaults still hold funds
    pub fn is_active(&self) -> bool {
        matches!(self, VaultStatus::Locked | VaultStatus::Unlocking)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VaultStatus::Locked => "locked",
            VaultStatus::Unlocking => "unlocking",
            VaultStatus::Completed => "completed",
        }
    }
}

/// Amount of a single token held by a vault, written as `"2.5 ETH"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Holding {
    pub amount: Decimal,
    pub token: TokenSymbol,
}

impl Holding {
    pub fn new(amount: Decimal, token: TokenSymbol) -> Self {
        Self { amount, token }
    }
}

impl FromStr for Holding {
    type Err = HoldingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(amount_str), Some(token_str), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(HoldingParseError::Malformed(s.to_string()));
        };

        let amount = Decimal::from_str(amount_str)
            .map_err(|_| HoldingParseError::InvalidAmount(amount_str.to_string()))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(HoldingParseError::NegativeAmount(amount_str.to_string()));
        }

        Ok(Self {
            amount,
            token: TokenSymbol::new(token_str)?,
        })
    }
}

impl TryFrom<String> for Holding {
    type Error = HoldingParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Holding> for String {
    fn from(holding: Holding) -> Self {
        holding.to_string()
    }
}

impl fmt::Display for Holding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.token)
    }
}

/// A time-lock vault record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vault {
    pub id: u32,
    pub name: String,
    pub category: String,
    pub holding: Holding,
    pub progress: u8, // 0-100
    pub status: VaultStatus,
    pub days_left: u32,
}

impl Vault {
    pub fn token(&self) -> &TokenSymbol {
        &self.holding.token
    }

    /// True when progress, status and days left all agree on whether the
    /// vault has finished its lock period.
    pub fn is_lifecycle_consistent(&self) -> bool {
        let finished_by_progress = self.progress >= 100;
        let finished_by_status = self.status == VaultStatus::Completed;
        let finished_by_days = self.days_left == 0;

        finished_by_progress == finished_by_status && finished_by_status == finished_by_days
    }

    /// Saturates at `NaiveDate::MAX` past the end of the calendar
    pub fn unlock_date(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_add_days(Days::new(u64::from(self.days_left)))
            .unwrap_or(NaiveDate::MAX)
    }
}

/// Query parameters for GET /api/vaults
#[derive(Debug, Clone, Deserialize)]
pub struct VaultListQuery {
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultListResponse {
    pub vaults: Vec<Vault>,
    pub total_count: usize,
}

/// Display card shown for a selected vault
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultStat {
    pub title: String,
    pub value: String,
    pub change: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultDetailResponse {
    pub vault: Vault,
    pub stats: Vec<VaultStat>,
    pub unlock_date: NaiveDate,
}

/// Body for POST /api/vaults/preview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultDraft {
    pub name: String,
    pub token: String,
    pub amount: String,
    pub lock_period_months: u32,
}

/// What a drafted vault would look like once created. Nothing is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultPreview {
    pub name: String,
    pub holding: Holding,
    pub usd_value: Decimal,
    pub color: String,
    pub lock_period_months: u32,
    pub lock_date: NaiveDate,
    pub unlock_date: NaiveDate,
    pub days_left: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn vault(progress: u8, status: VaultStatus, days_left: u32) -> Vault {
        Vault {
            id: 1,
            name: "Long-term Savings".to_string(),
            category: "Savings".to_string(),
            holding: "2.5 ETH".parse().unwrap(),
            progress,
            status,
            days_left,
        }
    }

    #[test]
    fn test_parse_holding() {
        let holding: Holding = "2.5 ETH".parse().unwrap();
        assert_eq!(holding.amount, dec!(2.5));
        assert_eq!(holding.token.as_str(), "ETH");

        let holding: Holding = "  10000   dai ".parse().unwrap();
        assert_eq!(holding.amount, dec!(10000));
        assert_eq!(holding.token.as_str(), "DAI");
    }

    #[test]
    fn test_parse_holding_errors() {
        assert!(matches!(
            "2.5".parse::<Holding>(),
            Err(HoldingParseError::Malformed(_))
        ));
        assert!(matches!(
            "2.5 ETH extra".parse::<Holding>(),
            Err(HoldingParseError::Malformed(_))
        ));
        assert!(matches!(
            "lots ETH".parse::<Holding>(),
            Err(HoldingParseError::InvalidAmount(_))
        ));
        assert!(matches!(
            "-1 ETH".parse::<Holding>(),
            Err(HoldingParseError::NegativeAmount(_))
        ));
        assert!(matches!(
            "1 E/TH".parse::<Holding>(),
            Err(HoldingParseError::InvalidSymbol(_))
        ));
    }

    #[test]
    fn test_holding_serializes_as_string() {
        let holding: Holding = "5000 USDC".parse().unwrap();
        assert_eq!(serde_json::to_string(&holding).unwrap(), "\"5000 USDC\"");
    }

    #[test]
    fn test_vault_json_shape() {
        let json = r#"{
            "id": 4,
            "name": "Education Fund",
            "category": "Goals",
            "holding": "10000 DAI",
            "progress": 100,
            "status": "completed",
            "days_left": 0
        }"#;

        let vault: Vault = serde_json::from_str(json).unwrap();
        assert_eq!(vault.id, 4);
        assert_eq!(vault.status, VaultStatus::Completed);
        assert_eq!(vault.holding.amount, dec!(10000));
        assert!(vault.is_lifecycle_consistent());
    }

    #[test]
    fn test_status_activity() {
        assert!(VaultStatus::Locked.is_active());
        assert!(VaultStatus::Unlocking.is_active());
        assert!(!VaultStatus::Completed.is_active());
    }

    #[test]
    fn test_lifecycle_consistency() {
        assert!(vault(65, VaultStatus::Locked, 127).is_lifecycle_consistent());
        assert!(vault(100, VaultStatus::Completed, 0).is_lifecycle_consistent());
        assert!(!vault(100, VaultStatus::Completed, 12).is_lifecycle_consistent());
        assert!(!vault(40, VaultStatus::Completed, 0).is_lifecycle_consistent());
        assert!(!vault(100, VaultStatus::Locked, 0).is_lifecycle_consistent());
    }

    #[test]
    fn test_unlock_date() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let vault = vault(65, VaultStatus::Locked, 127);
        assert_eq!(
            vault.unlock_date(today),
            NaiveDate::from_ymd_opt(2024, 5, 16).unwrap()
        );
    }

    #[test]
    fn test_unlock_date_past_calendar_end() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let vault = vault(0, VaultStatus::Locked, 4_000_000_000);
        assert_eq!(vault.unlock_date(today), NaiveDate::MAX);
    }
}
