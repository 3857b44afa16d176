// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::period::YearMonth;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: i64,
    pub name: String,
}

/// Which monthly target an ad platform draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformCategory {
    Google,
    Meta,
}

impl PlatformCategory {
    /// Guess from a platform's display name. Only used to seed the stored
    /// category when a platform is created without one.
    pub fn infer(platform_name: &str) -> Self {
        let name = platform_name.to_lowercase();
        if ["meta", "facebook", "instagram"]
            .iter()
            .any(|k| name.contains(k))
        {
            PlatformCategory::Meta
        } else {
            PlatformCategory::Google
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlatformCategory::Google => "google",
            PlatformCategory::Meta => "meta",
        }
    }
}

impl fmt::Display for PlatformCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" => Ok(PlatformCategory::Google),
            "meta" => Ok(PlatformCategory::Meta),
            other => Err(format!("unknown platform category '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub id: i64,
    pub name: String,
    pub category: PlatformCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdAccount {
    pub id: i64,
    pub name: String,
    pub platform: Platform,
    pub brand_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: i64,
    pub name: String,
    pub brand_id: Option<i64>,
    pub account_id: Option<i64>,
}

/// A product model that detailed budgets are planned against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductModel {
    pub id: i64,
    pub name: String,
    pub brand_id: Option<i64>,
}

/// One day of platform-reported performance for a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub id: i64,
    pub campaign_id: i64,
    pub date: NaiveDate,
    pub cost: Decimal,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: i64,
    pub reach: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReportRow {
    pub campaign_id: i64,
    pub date: NaiveDate,
    pub cost: Decimal,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: i64,
    pub reach: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRef {
    pub id: i64,
    pub name: String,
    pub platform: Option<Platform>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignRef {
    pub id: i64,
    pub name: String,
    pub brand: Option<Brand>,
    pub account: Option<AccountRef>,
}

/// A report row joined with the campaign it belongs to, as the store hands
/// it back. Any relation may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub row: ReportRow,
    pub campaign: Option<CampaignRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBudget {
    pub id: i64,
    pub brand_id: i64,
    pub month: u32,
    pub year: i32,
    pub target_google: Decimal,
    pub target_meta: Decimal,
    pub target_total: Decimal,
}

impl MonthlyBudget {
    pub fn period(&self) -> YearMonth {
        YearMonth {
            year: self.year,
            month: self.month,
        }
    }

    pub fn target_for(&self, category: PlatformCategory) -> Decimal {
        match category {
            PlatformCategory::Google => self.target_google,
            PlatformCategory::Meta => self.target_meta,
        }
    }
}

/// Both platform targets of a monthly budget; the total is always derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MonthlyTargets {
    pub google: Decimal,
    pub meta: Decimal,
}

impl MonthlyTargets {
    pub fn total(&self) -> Decimal {
        self.google + self.meta
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedBudget {
    pub id: i64,
    pub monthly_budget_id: Option<i64>,
    pub account_id: i64,
    pub model_id: i64,
    pub daily_planned: Decimal,
    pub total_planned: Decimal,
    pub planned_results: i64,
    pub active: bool,
    pub notes: Option<String>,
}

impl DetailedBudget {
    pub fn cost_per_result(&self) -> Option<Decimal> {
        (self.planned_results > 0)
            .then(|| (self.total_planned / Decimal::from(self.planned_results)).round_dp(2))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDetailedBudget {
    pub monthly_budget_id: Option<i64>,
    pub account_id: i64,
    pub model_id: i64,
    pub daily_planned: Decimal,
    pub total_planned: Decimal,
    pub planned_results: i64,
    pub active: bool,
    pub notes: Option<String>,
}

/// Where a lead sits in the sales funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LeadStage {
    InReview,
    Negotiating,
    Converted,
    Lost,
}

impl LeadStage {
    pub const ALL: [LeadStage; 4] = [
        LeadStage::InReview,
        LeadStage::Negotiating,
        LeadStage::Converted,
        LeadStage::Lost,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LeadStage::InReview => "in-review",
            LeadStage::Negotiating => "negotiating",
            LeadStage::Converted => "converted",
            LeadStage::Lost => "lost",
        }
    }

    /// Current stage for a stored value. Older rows carry the funnel's
    /// previous stage names, which fold into the four current ones.
    pub fn normalize(raw: &str) -> Option<Self> {
        let key = raw.trim().to_lowercase().replace([' ', '_'], "-");
        match key.as_str() {
            "in-review" | "new" | "contacted" | "registered" => Some(LeadStage::InReview),
            "negotiating" => Some(LeadStage::Negotiating),
            "converted" | "closed" | "qualified" => Some(LeadStage::Converted),
            "lost" | "not-converted" => Some(LeadStage::Lost),
            _ => None,
        }
    }
}

impl fmt::Display for LeadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeadStage::normalize(s).ok_or_else(|| {
            format!(
                "unknown lead stage '{}' (in-review, negotiating, converted or lost)",
                s.trim()
            )
        })
    }
}

/// A contact captured by an ad form. `stage` is kept as stored; use
/// [`Lead::stage`] for the normalized value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: i64,
    pub account_id: Option<i64>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
    pub form_name: Option<String>,
    #[serde(rename = "stage")]
    pub raw_stage: Option<String>,
    pub created_on: NaiveDate,
}

impl Lead {
    pub fn stage(&self) -> Option<LeadStage> {
        self.raw_stage.as_deref().and_then(LeadStage::normalize)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLead {
    pub account_id: Option<i64>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
    pub form_name: Option<String>,
    pub stage: Option<LeadStage>,
    pub created_on: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    All,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::All => "all",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            "all" | "any" => Ok(Gender::All),
            other => Err(format!("unknown gender '{}' (male, female or all)", other)),
        }
    }
}

/// Target audience profile for a product model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audience {
    pub id: i64,
    pub model_id: i64,
    pub profile_name: String,
    pub description: Option<String>,
    pub age_range: String,
    pub gender: Gender,
    pub location: Option<String>,
    pub interests: Vec<String>,
    pub behaviors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAudience {
    pub model_id: i64,
    pub profile_name: String,
    pub description: Option<String>,
    pub age_range: String,
    pub gender: Gender,
    pub location: Option<String>,
    pub interests: Vec<String>,
    pub behaviors: Vec<String>,
}
