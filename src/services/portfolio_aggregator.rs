//! Pure aggregation from vault records to dashboard-ready views.
//!
//! Every function here is a deterministic transformation of its inputs. The
//! only failure is a vault holding a token that the price table (or palette)
//! does not know. Vaults are expected to come from a `VaultCatalog`, whose
//! amount and size bounds, together with the price table's, keep every
//! valuation within `Decimal` range.

use chrono::{Duration, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use std::collections::HashMap;

use crate::error::AggregatorError;
use crate::models::portfolio::{AggregateStats, AllocationEntry, HistoryPoint, TokenSubtotal};
use crate::models::token::TokenSymbol;
use crate::models::vault::Vault;
use crate::services::token_tables::{TokenPalette, TokenPriceTable};

/// Number of points on the value chart when the caller does not choose
pub const DEFAULT_HISTORY_POINTS: usize = 20;

/// Which slice of the portfolio a view is computed for
#[derive(Debug, Clone, Copy)]
pub enum Selection<'a> {
    Portfolio(&'a [Vault]),
    Vault(&'a Vault),
}

/// Totals across all vaults: USD value, active count, mean days left and
/// per-token subtotals in order of first appearance.
pub fn compute_totals(
    vaults: &[Vault],
    prices: &TokenPriceTable,
) -> Result<AggregateStats, AggregatorError> {
    let mut value_by_token = Vec::new();
    for (token, amount) in group_by_token(vaults) {
        let usd_value = amount * prices.price_of(&token)?;
        value_by_token.push(TokenSubtotal {
            token,
            amount,
            usd_value,
        });
    }

    let total_usd_value: Decimal = value_by_token.iter().map(|s| s.usd_value).sum();
    let active_vaults = vaults.iter().filter(|v| v.status.is_active()).count();

    Ok(AggregateStats {
        total_usd_value,
        active_vaults,
        average_lock_period: average_days_left(vaults),
        value_by_token,
    })
}

/// Share of USD value per token, or a single 100% entry for a selected vault.
pub fn compute_allocation(
    selection: Selection<'_>,
    prices: &TokenPriceTable,
    palette: &TokenPalette,
) -> Result<Vec<AllocationEntry>, AggregatorError> {
    match selection {
        Selection::Vault(vault) => {
            let token = vault.token();
            let price = prices.price_of(token)?;
            let color = palette.color_of(token)?;

            Ok(vec![AllocationEntry {
                name: token.clone(),
                amount: vault.holding.amount,
                usd_value: vault.holding.amount * price,
                percentage: dec!(100.0),
                color: color.to_string(),
            }])
        }
        Selection::Portfolio(vaults) => {
            let totals = compute_totals(vaults, prices)?;

            totals
                .value_by_token
                .into_iter()
                .map(|subtotal| -> Result<AllocationEntry, AggregatorError> {
                    let color = palette.color_of(&subtotal.token)?.to_string();
                    let percentage = share_of(subtotal.usd_value, totals.total_usd_value);

                    Ok(AllocationEntry {
                        name: subtotal.token,
                        amount: subtotal.amount,
                        usd_value: subtotal.usd_value,
                        percentage,
                        color,
                    })
                })
                .collect()
        }
    }
}

/// Synthetic value series for the growth chart.
///
/// This is placeholder data, not a measurement: `point_count` points ramping
/// linearly from 80% to 100% of a baseline, one per day, ending the day
/// before `today`. The baseline is the selected vault's raw token amount or
/// the portfolio's total USD value.
pub fn compute_history(
    selection: Selection<'_>,
    prices: &TokenPriceTable,
    point_count: usize,
    today: NaiveDate,
) -> Result<Vec<HistoryPoint>, AggregatorError> {
    let (baseline, unit_price) = match selection {
        Selection::Vault(vault) => (vault.holding.amount, prices.price_of(vault.token())?),
        Selection::Portfolio(vaults) => {
            (compute_totals(vaults, prices)?.total_usd_value, Decimal::ONE)
        }
    };

    let points = (0..point_count)
        .map(|i| {
            let value = baseline * ramp_factor(i, point_count);
            HistoryPoint {
                date: today - Duration::days((point_count - i) as i64),
                value,
                usd_value: value * unit_price,
            }
        })
        .collect();

    Ok(points)
}

/// Sum of raw amounts per token, keeping first-seen order
fn group_by_token(vaults: &[Vault]) -> Vec<(TokenSymbol, Decimal)> {
    let mut index: HashMap<&TokenSymbol, usize> = HashMap::new();
    let mut grouped: Vec<(TokenSymbol, Decimal)> = Vec::new();

    for vault in vaults {
        match index.get(vault.token()) {
            Some(&i) => grouped[i].1 += vault.holding.amount,
            None => {
                index.insert(vault.token(), grouped.len());
                grouped.push((vault.token().clone(), vault.holding.amount));
            }
        }
    }

    grouped
}

/// Mean of `days_left` rounded half up; 0 for no vaults
fn average_days_left(vaults: &[Vault]) -> u32 {
    if vaults.is_empty() {
        return 0;
    }

    let count = vaults.len() as u64;
    let total: u64 = vaults.iter().map(|v| u64::from(v.days_left)).sum();

    u32::try_from((2 * total + count) / (2 * count)).unwrap_or(u32::MAX)
}

/// Percentage of `part` in `total` with exactly one decimal place; 0.0 when
/// total is 0
fn share_of(part: Decimal, total: Decimal) -> Decimal {
    let mut share = if total.is_zero() {
        Decimal::ZERO
    } else {
        (part / total * dec!(100))
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    };
    share.rescale(1);
    share
}

/// 0.8 at the first point, 1.0 at the last
fn ramp_factor(i: usize, point_count: usize) -> Decimal {
    if point_count <= 1 {
        return Decimal::ONE;
    }

    dec!(0.8) + dec!(0.2) * Decimal::from(i) / Decimal::from(point_count - 1)
}
