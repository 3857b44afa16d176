// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Budget screens and budget mutations.

use crate::budget::{
    AccountBudgetSummary, BrandTotals, DetailedEdit, TargetPatch, apply_edit, brand_totals,
    merge_targets, planned_total_from_daily, reconcile_accounts, resolve_account,
};
use crate::error::{Result, StoreError, ValidationError};
use crate::models::{DetailedBudget, MonthlyBudget, NewDetailedBudget};
use crate::period::YearMonth;
use crate::reporting::fetch_or_empty;
use crate::store::DataStore;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetOverview {
    pub period: YearMonth,
    pub brand_totals: Vec<BrandTotals>,
    pub accounts: Vec<AccountBudgetSummary>,
    pub warnings: Vec<String>,
}

impl BudgetOverview {
    pub fn total_target(&self) -> Decimal {
        self.brand_totals.iter().map(|b| b.total).sum()
    }

    pub fn total_planned(&self) -> Decimal {
        self.accounts.iter().map(|a| a.planned).sum()
    }
}

/// Brand rollups and per-account reconciliation for one month.
pub fn load_budget_overview(store: &dyn DataStore, period: YearMonth) -> BudgetOverview {
    let mut warnings = Vec::new();
    let brands = fetch_or_empty("brands", store.brands(), &mut warnings);
    let accounts = fetch_or_empty("ad accounts", store.ad_accounts(), &mut warnings);
    let monthly = fetch_or_empty(
        "monthly budgets",
        store.monthly_budgets(Some(period)),
        &mut warnings,
    );
    let detailed = fetch_or_empty("detailed budgets", store.detailed_budgets(), &mut warnings);

    BudgetOverview {
        period,
        brand_totals: brand_totals(&brands, &monthly),
        accounts: reconcile_accounts(&accounts, &brands, &monthly, &detailed),
        warnings,
    }
}

/// Set one or both platform targets for a brand's month, creating the row on
/// first use.
pub fn upsert_monthly_budget(
    store: &dyn DataStore,
    brand_id: i64,
    period: YearMonth,
    patch: TargetPatch,
) -> Result<MonthlyBudget> {
    patch.validate()?;
    let existing = store.find_monthly_budget(brand_id, period)?;
    let targets = merge_targets(existing.as_ref(), patch);
    let saved = match existing {
        Some(mb) => store.update_monthly_budget(mb.id, &targets)?,
        None => store.insert_monthly_budget(brand_id, period, &targets)?,
    };
    tracing::info!(brand_id, %period, total = %saved.target_total, "monthly budget saved");
    Ok(saved)
}

pub fn delete_monthly_budget(store: &dyn DataStore, id: i64) -> Result<()> {
    if !store.delete_monthly_budget(id)? {
        return Err(StoreError::NotFound {
            table: "monthly_budgets",
            id,
        }
        .into());
    }
    Ok(())
}

/// What the user asks for when planning spend on a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailedBudgetDraft {
    pub brand_id: i64,
    pub platform_id: i64,
    pub model_id: i64,
    pub daily_planned: Decimal,
    pub planned_results: i64,
    pub notes: Option<String>,
}

/// Plan daily spend for a brand/platform/model in `period`.
///
/// Nothing is written unless the brand has an account on the platform and a
/// monthly budget for the period.
pub fn create_detailed_budget(
    store: &dyn DataStore,
    draft: DetailedBudgetDraft,
    period: YearMonth,
) -> Result<DetailedBudget> {
    if draft.daily_planned < Decimal::ZERO {
        return Err(ValidationError::Negative("daily budget").into());
    }
    if draft.planned_results < 0 {
        return Err(ValidationError::Negative("planned results").into());
    }

    let accounts = store.ad_accounts()?;
    let account = resolve_account(&accounts, draft.brand_id, draft.platform_id)?;

    let monthly = store
        .find_monthly_budget(draft.brand_id, period)?
        .ok_or(ValidationError::NoMonthlyBudget {
            brand_id: draft.brand_id,
            period,
        })?;

    if !store
        .product_models()?
        .iter()
        .any(|m| m.id == draft.model_id)
    {
        return Err(ValidationError::Unknown {
            kind: "model",
            name: draft.model_id.to_string(),
        }
        .into());
    }

    let new = NewDetailedBudget {
        monthly_budget_id: Some(monthly.id),
        account_id: account.id,
        model_id: draft.model_id,
        daily_planned: draft.daily_planned,
        total_planned: planned_total_from_daily(draft.daily_planned),
        planned_results: draft.planned_results,
        active: true,
        notes: draft.notes.filter(|n| !n.trim().is_empty()),
    };
    let created = store.insert_detailed_budget(&new)?;
    tracing::info!(
        id = created.id,
        account = %account.name,
        total = %created.total_planned,
        "detailed budget created"
    );
    Ok(created)
}

/// Apply edits in order and save once.
pub fn edit_detailed_budget(
    store: &dyn DataStore,
    id: i64,
    edits: Vec<DetailedEdit>,
) -> Result<DetailedBudget> {
    if edits.is_empty() {
        return Err(ValidationError::EmptyUpdate.into());
    }
    let mut budget = store.detailed_budget(id)?.ok_or(StoreError::NotFound {
        table: "detailed_budgets",
        id,
    })?;
    for edit in edits {
        apply_edit(&mut budget, edit)?;
    }
    store.update_detailed_budget(&budget)?;
    Ok(budget)
}

pub fn delete_detailed_budget(store: &dyn DataStore, id: i64) -> Result<()> {
    if !store.delete_detailed_budget(id)? {
        return Err(StoreError::NotFound {
            table: "detailed_budgets",
            id,
        }
        .into());
    }
    Ok(())
}
