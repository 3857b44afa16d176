// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Report assembly on top of a [`DataStore`]: fetch, then aggregate.

use crate::error::{Result, StoreResult, ValidationError};
use crate::hierarchy::{Hierarchy, build_hierarchy};
use crate::metrics::{Comparison, PeriodTotals, totals};
use crate::models::PerformanceRecord;
use crate::period::DateRange;
use crate::store::{DataStore, PerformanceFilter};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// Unwrap a fetch, or log it and carry on with an empty value.
pub(crate) fn fetch_or_empty<T: Default>(
    what: &str,
    res: StoreResult<T>,
    warnings: &mut Vec<String>,
) -> T {
    match res {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "failed to load {}", what);
            warnings.push(format!("could not load {}: {}", what, e));
            T::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PerformanceReport {
    pub range: DateRange,
    pub previous_range: DateRange,
    pub kpis: Comparison,
    pub hierarchy: Hierarchy,
    pub warnings: Vec<String>,
}

/// Current vs previous period performance, as KPIs and as a tree.
pub fn load_performance_report(
    store: &dyn DataStore,
    range: DateRange,
    account_id: Option<i64>,
) -> Result<PerformanceReport> {
    let range = DateRange::new(range.start, range.end)?;
    let previous_range = range.previous();
    let mut warnings = Vec::new();

    let current_filter = PerformanceFilter {
        account_id,
        ..PerformanceFilter::for_range(range)
    };
    let previous_filter = PerformanceFilter {
        account_id,
        ..PerformanceFilter::for_range(previous_range)
    };
    let current = fetch_or_empty(
        "current period performance",
        store.performance(&current_filter),
        &mut warnings,
    );
    let previous = fetch_or_empty(
        "previous period performance",
        store.performance(&previous_filter),
        &mut warnings,
    );

    let kpis = Comparison::new(
        totals(current.iter().map(|r| &r.row)),
        totals(previous.iter().map(|r| &r.row)),
    );
    let hierarchy = build_hierarchy(&current, &previous);
    tracing::debug!(
        %range,
        current_rows = current.len(),
        previous_rows = previous.len(),
        accounts = hierarchy.accounts.len(),
        "performance report built"
    );

    Ok(PerformanceReport {
        range,
        previous_range,
        kpis,
        hierarchy,
        warnings,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignSummary {
    pub name: String,
    pub totals: PeriodTotals,
    pub ctr: f64,
    pub cpc: Decimal,
    pub cpr: Decimal,
}

impl CampaignSummary {
    fn new(name: String, totals: PeriodTotals) -> Self {
        Self {
            name,
            ctr: totals.ctr(),
            cpc: totals.cpc(),
            cpr: totals.cpr(),
            totals,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub range: DateRange,
    pub rows: Vec<CampaignSummary>,
    pub totals: PeriodTotals,
    pub warnings: Vec<String>,
}

/// Side-by-side totals for a chosen set of campaigns.
///
/// Rows are grouped by campaign name, so campaigns sharing a name across
/// accounts collapse into one line.
pub fn load_comparison_report(
    store: &dyn DataStore,
    range: DateRange,
    campaign_ids: &[i64],
) -> Result<ComparisonReport> {
    let range = DateRange::new(range.start, range.end)?;
    if campaign_ids.is_empty() {
        return Err(ValidationError::NoCampaignsSelected.into());
    }
    let mut warnings = Vec::new();
    let filter = PerformanceFilter {
        campaign_ids: Some(campaign_ids.to_vec()),
        ..PerformanceFilter::for_range(range)
    };
    let records = fetch_or_empty(
        "campaign performance",
        store.performance(&filter),
        &mut warnings,
    );

    let rows = group_by_campaign_name(&records)
        .into_iter()
        .map(|(name, t)| CampaignSummary::new(name, t))
        .collect();
    Ok(ComparisonReport {
        range,
        rows,
        totals: totals(records.iter().map(|r| &r.row)),
        warnings,
    })
}

fn group_by_campaign_name(records: &[PerformanceRecord]) -> Vec<(String, PeriodTotals)> {
    let mut out: Vec<(String, PeriodTotals)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for rec in records {
        let name = rec
            .campaign
            .as_ref()
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("campaign #{}", rec.row.campaign_id));
        let i = *index.entry(name.clone()).or_insert_with(|| {
            out.push((name, PeriodTotals::default()));
            out.len() - 1
        });
        out[i].1 += &rec.row;
    }
    out
}
