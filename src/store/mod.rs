// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The table store the reports and budgets are computed from.

pub mod rest;
pub mod sqlite;

use crate::error::StoreResult;
use crate::models::{
    AdAccount, Audience, Brand, Campaign, DetailedBudget, Lead, LeadStage, MonthlyBudget,
    MonthlyTargets, NewAudience, NewDetailedBudget, NewLead, NewReportRow, PerformanceRecord,
    Platform, PlatformCategory, ProductModel, ReportRow,
};
use crate::period::{DateRange, YearMonth};

pub use rest::RestStore;
pub use sqlite::SqliteStore;

/// Which report rows to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformanceFilter {
    pub range: DateRange,
    pub account_id: Option<i64>,
    pub campaign_ids: Option<Vec<i64>>,
}

impl PerformanceFilter {
    pub fn for_range(range: DateRange) -> Self {
        Self {
            range,
            account_id: None,
            campaign_ids: None,
        }
    }
}

/// Which leads to fetch. Both bounds are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadFilter {
    pub range: Option<DateRange>,
    pub account_id: Option<i64>,
}

pub trait DataStore {
    fn brands(&self) -> StoreResult<Vec<Brand>>;
    fn insert_brand(&self, name: &str) -> StoreResult<Brand>;

    fn platforms(&self) -> StoreResult<Vec<Platform>>;
    fn insert_platform(&self, name: &str, category: PlatformCategory) -> StoreResult<Platform>;

    fn ad_accounts(&self) -> StoreResult<Vec<AdAccount>>;
    fn insert_ad_account(
        &self,
        name: &str,
        platform_id: i64,
        brand_ids: &[i64],
    ) -> StoreResult<AdAccount>;

    fn campaigns(&self) -> StoreResult<Vec<Campaign>>;
    fn insert_campaign(
        &self,
        name: &str,
        brand_id: Option<i64>,
        account_id: Option<i64>,
    ) -> StoreResult<Campaign>;

    fn product_models(&self) -> StoreResult<Vec<ProductModel>>;
    fn insert_product_model(&self, name: &str, brand_id: Option<i64>) -> StoreResult<ProductModel>;

    /// Report rows joined with their campaign, newest date first.
    fn performance(&self, filter: &PerformanceFilter) -> StoreResult<Vec<PerformanceRecord>>;
    fn insert_report_row(&self, row: &NewReportRow) -> StoreResult<ReportRow>;

    /// Monthly budgets, optionally narrowed to one month.
    fn monthly_budgets(&self, period: Option<YearMonth>) -> StoreResult<Vec<MonthlyBudget>>;
    fn find_monthly_budget(
        &self,
        brand_id: i64,
        period: YearMonth,
    ) -> StoreResult<Option<MonthlyBudget>>;
    fn insert_monthly_budget(
        &self,
        brand_id: i64,
        period: YearMonth,
        targets: &MonthlyTargets,
    ) -> StoreResult<MonthlyBudget>;
    fn update_monthly_budget(&self, id: i64, targets: &MonthlyTargets)
    -> StoreResult<MonthlyBudget>;
    fn delete_monthly_budget(&self, id: i64) -> StoreResult<bool>;

    fn detailed_budgets(&self) -> StoreResult<Vec<DetailedBudget>>;
    fn detailed_budget(&self, id: i64) -> StoreResult<Option<DetailedBudget>>;
    fn insert_detailed_budget(&self, new: &NewDetailedBudget) -> StoreResult<DetailedBudget>;
    fn update_detailed_budget(&self, budget: &DetailedBudget) -> StoreResult<()>;
    fn delete_detailed_budget(&self, id: i64) -> StoreResult<bool>;

    /// Leads, newest capture date first.
    fn leads(&self, filter: &LeadFilter) -> StoreResult<Vec<Lead>>;
    fn insert_lead(&self, new: &NewLead) -> StoreResult<Lead>;
    fn update_lead_stage(&self, id: i64, stage: LeadStage) -> StoreResult<Lead>;
    fn delete_lead(&self, id: i64) -> StoreResult<bool>;

    fn audiences(&self) -> StoreResult<Vec<Audience>>;
    fn insert_audience(&self, new: &NewAudience) -> StoreResult<Audience>;
    fn update_audience(&self, audience: &Audience) -> StoreResult<()>;
    fn delete_audience(&self, id: i64) -> StoreResult<bool>;
}
