// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Budget arithmetic: account reconciliation, brand rollups and the
//! daily/total planning rules for detailed budgets.

use crate::error::ValidationError;
use crate::models::{AdAccount, Brand, DetailedBudget, MonthlyBudget, MonthlyTargets};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// Days per month used to turn a daily plan into a monthly total.
pub fn planning_days_per_month() -> Decimal {
    Decimal::new(304, 1)
}

/// Monthly total for a daily plan, rounded to cents.
pub fn planned_total_from_daily(daily: Decimal) -> Decimal {
    (daily * planning_days_per_month()).round_dp(2)
}

/// Daily plan implied by a monthly total, rounded to cents.
pub fn planned_daily_from_total(total: Decimal) -> Decimal {
    (total / planning_days_per_month()).round_dp(2)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountBudgetSummary {
    pub account: AdAccount,
    pub brands: Vec<Brand>,
    pub monthly_budgets: Vec<MonthlyBudget>,
    pub detailed_budgets: Vec<DetailedBudget>,
    pub planned: Decimal,
    pub target: Decimal,
    pub balance: Decimal,
}

/// Planned vs target per ad account.
///
/// `monthly` must already be narrowed to the month being reconciled. Planned
/// spend counts every detailed budget on the account, active or not. Accounts
/// with neither monthly nor detailed rows are left out.
pub fn reconcile_accounts(
    accounts: &[AdAccount],
    brands: &[Brand],
    monthly: &[MonthlyBudget],
    detailed: &[DetailedBudget],
) -> Vec<AccountBudgetSummary> {
    let brand_by_id: HashMap<i64, &Brand> = brands.iter().map(|b| (b.id, b)).collect();

    accounts
        .iter()
        .filter_map(|account| {
            let account_monthly: Vec<MonthlyBudget> = monthly
                .iter()
                .filter(|mb| account.brand_ids.contains(&mb.brand_id))
                .cloned()
                .collect();
            let account_detailed: Vec<DetailedBudget> = detailed
                .iter()
                .filter(|db| db.account_id == account.id)
                .cloned()
                .collect();
            if account_monthly.is_empty() && account_detailed.is_empty() {
                return None;
            }

            let planned: Decimal = account_detailed.iter().map(|db| db.total_planned).sum();
            let category = account.platform.category;
            let target: Decimal = account_monthly
                .iter()
                .map(|mb| mb.target_for(category))
                .sum();

            Some(AccountBudgetSummary {
                account: account.clone(),
                brands: account
                    .brand_ids
                    .iter()
                    .filter_map(|id| brand_by_id.get(id).map(|b| (*b).clone()))
                    .collect(),
                monthly_budgets: account_monthly,
                detailed_budgets: account_detailed,
                planned,
                target,
                balance: target - planned,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandTotals {
    pub brand: Brand,
    pub total: Decimal,
    pub google: Decimal,
    pub meta: Decimal,
}

/// Sum each brand's monthly targets, independent of accounts.
pub fn brand_totals(brands: &[Brand], monthly: &[MonthlyBudget]) -> Vec<BrandTotals> {
    let brand_by_id: HashMap<i64, &Brand> = brands.iter().map(|b| (b.id, b)).collect();
    let mut out: Vec<BrandTotals> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();

    for mb in monthly {
        let Some(brand) = brand_by_id.get(&mb.brand_id) else {
            continue;
        };
        let i = *index.entry(mb.brand_id).or_insert_with(|| {
            out.push(BrandTotals {
                brand: (*brand).clone(),
                total: Decimal::ZERO,
                google: Decimal::ZERO,
                meta: Decimal::ZERO,
            });
            out.len() - 1
        });
        let entry = &mut out[i];
        entry.total += mb.target_total;
        entry.google += mb.target_google;
        entry.meta += mb.target_meta;
    }
    out
}

/// Requested change to a monthly budget; `None` leaves that platform alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TargetPatch {
    pub google: Option<Decimal>,
    pub meta: Option<Decimal>,
}

impl TargetPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.google.is_none() && self.meta.is_none() {
            return Err(ValidationError::MissingField("google or meta target"));
        }
        if self.google.is_some_and(|g| g < Decimal::ZERO) {
            return Err(ValidationError::Negative("google target"));
        }
        if self.meta.is_some_and(|m| m < Decimal::ZERO) {
            return Err(ValidationError::Negative("meta target"));
        }
        Ok(())
    }
}

/// Targets after applying `patch`: the untouched platform keeps its existing
/// value, or zero when there is no existing row.
pub fn merge_targets(existing: Option<&MonthlyBudget>, patch: TargetPatch) -> MonthlyTargets {
    let (google, meta) = existing
        .map(|mb| (mb.target_google, mb.target_meta))
        .unwrap_or((Decimal::ZERO, Decimal::ZERO));
    MonthlyTargets {
        google: patch.google.unwrap_or(google),
        meta: patch.meta.unwrap_or(meta),
    }
}

/// Single-field edits to a detailed budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailedEdit {
    Daily(Decimal),
    Total(Decimal),
    Results(i64),
    Notes(Option<String>),
    Active(bool),
}

/// Apply `edit`, keeping daily and total in step with each other.
pub fn apply_edit(budget: &mut DetailedBudget, edit: DetailedEdit) -> Result<(), ValidationError> {
    match edit {
        DetailedEdit::Daily(daily) => {
            if daily < Decimal::ZERO {
                return Err(ValidationError::Negative("daily budget"));
            }
            budget.daily_planned = daily;
            budget.total_planned = planned_total_from_daily(daily);
        }
        DetailedEdit::Total(total) => {
            if total < Decimal::ZERO {
                return Err(ValidationError::Negative("total budget"));
            }
            budget.total_planned = total;
            budget.daily_planned = planned_daily_from_total(total);
        }
        DetailedEdit::Results(results) => {
            if results < 0 {
                return Err(ValidationError::Negative("planned results"));
            }
            budget.planned_results = results;
        }
        DetailedEdit::Notes(notes) => {
            budget.notes = notes.filter(|n| !n.trim().is_empty());
        }
        DetailedEdit::Active(active) => budget.active = active,
    }
    Ok(())
}

/// The account a brand advertises through on a given platform.
pub fn resolve_account(
    accounts: &[AdAccount],
    brand_id: i64,
    platform_id: i64,
) -> Result<&AdAccount, ValidationError> {
    accounts
        .iter()
        .find(|a| a.platform.id == platform_id && a.brand_ids.contains(&brand_id))
        .ok_or(ValidationError::NoAccountForCombination {
            brand_id,
            platform_id,
        })
}
