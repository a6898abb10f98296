use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::token::TokenSymbol;
use super::vault::Holding;

/// Sum of one token across all vaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSubtotal {
    pub token: TokenSymbol,
    pub amount: Decimal,
    pub usd_value: Decimal,
}

/// Portfolio-wide figures behind the dashboard stat cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub total_usd_value: Decimal,
    pub active_vaults: usize,
    pub average_lock_period: u32, // days
    pub value_by_token: Vec<TokenSubtotal>,
}

/// One slice of the allocation pie chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationEntry {
    pub name: TokenSymbol,
    pub amount: Decimal,
    pub usd_value: Decimal,
    pub percentage: Decimal, // one decimal place, 0-100
    pub color: String,
}

/// Point on the synthetic value chart.
///
/// These points are placeholder data for display, not measured history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub value: Decimal,
    pub usd_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingUnlock {
    pub vault_id: u32,
    pub vault: String,
    pub holding: Holding,
    pub days_left: u32,
    pub unlock_date: NaiveDate,
}

/// Query parameters for GET /api/portfolio/allocation
#[derive(Debug, Clone, Deserialize)]
pub struct AllocationQuery {
    pub vault_id: Option<u32>,
}

/// Query parameters for GET /api/portfolio/history
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryQuery {
    pub vault_id: Option<u32>,
    pub points: Option<usize>, // Default: HISTORY_POINTS, Max: 365
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault_id: Option<u32>,
    pub entries: Vec<AllocationEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault_id: Option<u32>,
    pub synthetic: bool,
    pub points: Vec<HistoryPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpcomingUnlocksResponse {
    pub unlocks: Vec<UpcomingUnlock>,
}
