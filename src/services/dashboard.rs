use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::ServiceError;
use crate::models::portfolio::UpcomingUnlock;
use crate::models::token::TokenSymbol;
use crate::models::vault::{Holding, Vault, VaultDraft, VaultPreview, VaultStat, VaultStatus};
use crate::services::token_tables::{TokenPalette, TokenPriceTable};
use crate::services::vault_catalog::MAX_HOLDING_AMOUNT;

/// Lock periods offered when creating a vault, in months
pub const SUPPORTED_LOCK_PERIODS: [u32; 7] = [1, 3, 6, 12, 24, 36, 60];

/// Stat cards for a single selected vault
pub fn vault_stats(vault: &Vault) -> Vec<VaultStat> {
    let health = if vault.is_lifecycle_consistent() {
        "On Track"
    } else {
        "Needs Review"
    };

    vec![
        VaultStat {
            title: "Locked Amount".to_string(),
            value: vault.holding.to_string(),
            change: vault.category.clone(),
        },
        VaultStat {
            title: "Lock Progress".to_string(),
            value: format!("{}%", vault.progress),
            change: format!("{} days left", vault.days_left),
        },
        VaultStat {
            title: "Status".to_string(),
            value: vault.status.as_str().to_string(),
            change: health.to_string(),
        },
    ]
}

/// Vaults that have not completed, soonest unlock first
pub fn upcoming_unlocks(vaults: &[Vault], today: NaiveDate) -> Vec<UpcomingUnlock> {
    let mut pending: Vec<&Vault> = vaults
        .iter()
        .filter(|v| v.status != VaultStatus::Completed)
        .collect();
    pending.sort_by_key(|v| (v.days_left, v.id));

    pending
        .into_iter()
        .map(|v| UpcomingUnlock {
            vault_id: v.id,
            vault: v.name.clone(),
            holding: v.holding.clone(),
            days_left: v.days_left,
            unlock_date: v.unlock_date(today),
        })
        .collect()
}

/// Validate a draft vault and describe it as it would be once locked today
pub fn preview_vault(
    draft: &VaultDraft,
    prices: &TokenPriceTable,
    palette: &TokenPalette,
    today: NaiveDate,
) -> Result<VaultPreview, ServiceError> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(ServiceError::validation("name", "must not be blank"));
    }

    let token = TokenSymbol::new(&draft.token)
        .map_err(|e| ServiceError::validation("token", e.to_string()))?;

    let amount = Decimal::from_str(draft.amount.trim()).map_err(|_| {
        ServiceError::validation("amount", format!("'{}' is not a number", draft.amount))
    })?;
    if amount <= Decimal::ZERO {
        return Err(ServiceError::validation("amount", "must be greater than zero"));
    }
    if amount > MAX_HOLDING_AMOUNT {
        return Err(ServiceError::validation(
            "amount",
            format!("must be at most {}", MAX_HOLDING_AMOUNT),
        ));
    }

    if !SUPPORTED_LOCK_PERIODS.contains(&draft.lock_period_months) {
        return Err(ServiceError::validation(
            "lock_period_months",
            format!(
                "{} is not one of {:?}",
                draft.lock_period_months, SUPPORTED_LOCK_PERIODS
            ),
        ));
    }

    let price = prices.price_of(&token)?;
    let color = palette.color_of(&token)?.to_string();

    let unlock_date = today
        .checked_add_months(Months::new(draft.lock_period_months))
        .ok_or_else(|| ServiceError::validation("lock_period_months", "unlock date out of range"))?;
    let days_left = u32::try_from((unlock_date - today).num_days()).unwrap_or(0);

    Ok(VaultPreview {
        name: name.to_string(),
        usd_value: amount * price,
        holding: Holding::new(amount, token),
        color,
        lock_period_months: draft.lock_period_months,
        lock_date: today,
        unlock_date,
        days_left,
    })
}
