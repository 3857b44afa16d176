// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Remote table store speaking PostgREST (`/rest/v1/<table>`).

use super::{DataStore, LeadFilter, PerformanceFilter};
use crate::error::{StoreError, StoreResult};
use crate::models::{
    AccountRef, AdAccount, Audience, Brand, Campaign, CampaignRef, DetailedBudget, Gender, Lead,
    LeadStage, MonthlyBudget, MonthlyTargets, NewAudience, NewDetailedBudget, NewLead,
    NewReportRow, PerformanceRecord, Platform, PlatformCategory, ProductModel, ReportRow,
};
use crate::period::YearMonth;
use crate::utils::http_client;
use chrono::NaiveDate;
use reqwest::blocking::{Client, RequestBuilder, Response};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

pub struct RestStore {
    client: Client,
    base: String,
    api_key: String,
}

/// Numeric columns may come back as JSON numbers, strings or null.
mod lenient {
    use crate::metrics::{lenient_count, lenient_decimal};
    use rust_decimal::Decimal;
    use rust_decimal::prelude::ToPrimitive;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn amount<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::Number(n)) => n
                .to_string()
                .parse::<Decimal>()
                .ok()
                .or_else(|| n.as_f64().and_then(|f| Decimal::try_from(f).ok()))
                .unwrap_or(Decimal::ZERO),
            Some(Value::String(s)) => lenient_decimal(Some(&s)),
            _ => Decimal::ZERO,
        })
    }

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().and_then(|f| f.trunc().to_i64()))
                .unwrap_or(0),
            Some(Value::String(s)) => lenient_count(Some(&s)),
            _ => 0,
        })
    }
}

#[derive(Deserialize)]
struct PerformanceJson {
    id: i64,
    campaign_id: i64,
    report_date: NaiveDate,
    #[serde(default, deserialize_with = "lenient::amount")]
    cost: Decimal,
    #[serde(default, deserialize_with = "lenient::count")]
    impressions: i64,
    #[serde(default, deserialize_with = "lenient::count")]
    clicks: i64,
    #[serde(default, deserialize_with = "lenient::count")]
    conversions: i64,
    #[serde(default, deserialize_with = "lenient::count")]
    reach: i64,
    #[serde(default)]
    campaigns: Option<CampaignJson>,
}

#[derive(Deserialize)]
struct CampaignJson {
    id: i64,
    name: String,
    #[serde(default)]
    brands: Option<Brand>,
    #[serde(default)]
    ad_accounts: Option<AccountJson>,
}

#[derive(Deserialize)]
struct AccountJson {
    id: i64,
    name: String,
    #[serde(default)]
    platforms: Option<Platform>,
}

impl From<PerformanceJson> for PerformanceRecord {
    fn from(p: PerformanceJson) -> Self {
        PerformanceRecord {
            row: ReportRow {
                id: p.id,
                campaign_id: p.campaign_id,
                date: p.report_date,
                cost: p.cost,
                impressions: p.impressions,
                clicks: p.clicks,
                conversions: p.conversions,
                reach: p.reach,
            },
            campaign: p.campaigns.map(|c| CampaignRef {
                id: c.id,
                name: c.name,
                brand: c.brands,
                account: c.ad_accounts.map(|a| AccountRef {
                    id: a.id,
                    name: a.name,
                    platform: a.platforms,
                }),
            }),
        }
    }
}

#[derive(Deserialize)]
struct AccountRowJson {
    id: i64,
    name: String,
    platforms: Platform,
    #[serde(default)]
    account_brands: Vec<BrandLink>,
}

#[derive(Deserialize)]
struct BrandLink {
    brand_id: i64,
}

#[derive(Deserialize)]
struct MonthlyJson {
    id: i64,
    brand_id: i64,
    month: u32,
    year: i32,
    #[serde(default, deserialize_with = "lenient::amount")]
    target_google: Decimal,
    #[serde(default, deserialize_with = "lenient::amount")]
    target_meta: Decimal,
    #[serde(default, deserialize_with = "lenient::amount")]
    target_total: Decimal,
}

impl From<MonthlyJson> for MonthlyBudget {
    fn from(m: MonthlyJson) -> Self {
        MonthlyBudget {
            id: m.id,
            brand_id: m.brand_id,
            month: m.month,
            year: m.year,
            target_google: m.target_google,
            target_meta: m.target_meta,
            target_total: m.target_total,
        }
    }
}

#[derive(Deserialize)]
struct DetailedJson {
    id: i64,
    #[serde(default)]
    monthly_budget_id: Option<i64>,
    account_id: i64,
    model_id: i64,
    #[serde(default, deserialize_with = "lenient::amount")]
    daily_planned: Decimal,
    #[serde(default, deserialize_with = "lenient::amount")]
    total_planned: Decimal,
    #[serde(default, deserialize_with = "lenient::count")]
    planned_results: i64,
    #[serde(default)]
    active: bool,
    #[serde(default)]
    notes: Option<String>,
}

impl From<DetailedJson> for DetailedBudget {
    fn from(d: DetailedJson) -> Self {
        DetailedBudget {
            id: d.id,
            monthly_budget_id: d.monthly_budget_id,
            account_id: d.account_id,
            model_id: d.model_id,
            daily_planned: d.daily_planned,
            total_planned: d.total_planned,
            planned_results: d.planned_results,
            active: d.active,
            notes: d.notes,
        }
    }
}

#[derive(Deserialize)]
struct LeadJson {
    id: i64,
    #[serde(default)]
    account_id: Option<i64>,
    name: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    form_name: Option<String>,
    #[serde(default)]
    stage: Option<String>,
    created_at: String,
}

impl TryFrom<LeadJson> for Lead {
    type Error = StoreError;

    fn try_from(l: LeadJson) -> StoreResult<Self> {
        // timestamps come back as 2024-03-10T14:02:11+00:00
        let day = l.created_at.get(..10).unwrap_or(l.created_at.as_str());
        let created_on =
            NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| StoreError::Malformed {
                table: "leads",
                detail: format!("invalid created_at '{}': {}", l.created_at, e),
            })?;
        Ok(Lead {
            id: l.id,
            account_id: l.account_id,
            name: l.name,
            email: l.email,
            phone: l.phone,
            source: l.source,
            form_name: l.form_name,
            raw_stage: l.stage,
            created_on,
        })
    }
}

#[derive(Deserialize)]
struct AudienceJson {
    id: i64,
    model_id: i64,
    profile_name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    age_range: Option<String>,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    interests: Option<Vec<String>>,
    #[serde(default)]
    behaviors: Option<Vec<String>>,
}

impl From<AudienceJson> for Audience {
    fn from(a: AudienceJson) -> Self {
        Audience {
            id: a.id,
            model_id: a.model_id,
            profile_name: a.profile_name,
            description: a.description,
            age_range: a.age_range.unwrap_or_default(),
            gender: a
                .gender
                .and_then(|g| g.parse::<Gender>().ok())
                .unwrap_or(Gender::All),
            location: a.location,
            interests: a.interests.unwrap_or_default(),
            behaviors: a.behaviors.unwrap_or_default(),
        }
    }
}

const LEAD_SELECT: &str =
    "id,account_id,name,email,phone,source,form_name,stage,created_at";

/// PostgREST query pairs for a lead fetch.
pub fn lead_query(filter: &LeadFilter) -> Vec<(String, String)> {
    let mut q = vec![("select".to_string(), LEAD_SELECT.to_string())];
    if let Some(range) = filter.range {
        q.push((
            "created_at".to_string(),
            format!("gte.{}T00:00:00", range.start),
        ));
        q.push((
            "created_at".to_string(),
            format!("lte.{}T23:59:59.999", range.end),
        ));
    }
    if let Some(account_id) = filter.account_id {
        q.push(("account_id".to_string(), eq(account_id)));
    }
    q.push(("order".to_string(), "created_at.desc.nullslast,id.desc".to_string()));
    q
}

const PERFORMANCE_SELECT: &str = "id,campaign_id,report_date,cost,impressions,clicks,conversions,reach,\
     campaigns(id,name,brands(id,name),ad_accounts(id,name,platforms(id,name,category)))";

const MONTHLY_SELECT: &str = "id,brand_id,month,year,target_google,target_meta,target_total";

/// PostgREST query pairs for a performance fetch.
pub fn performance_query(filter: &PerformanceFilter) -> Vec<(String, String)> {
    let select = if filter.account_id.is_some() {
        // filtering on an embedded column needs an inner join
        PERFORMANCE_SELECT.replacen("campaigns(", "campaigns!inner(", 1)
    } else {
        PERFORMANCE_SELECT.to_string()
    };
    let mut q = vec![
        ("select".to_string(), select),
        (
            "report_date".to_string(),
            format!("gte.{}", filter.range.start),
        ),
        ("report_date".to_string(), format!("lte.{}", filter.range.end)),
    ];
    if let Some(account_id) = filter.account_id {
        q.push(("campaigns.account_id".to_string(), format!("eq.{}", account_id)));
    }
    if let Some(ids) = &filter.campaign_ids {
        let list = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        q.push(("campaign_id".to_string(), format!("in.({})", list)));
    }
    q.push(("order".to_string(), "report_date.desc,id.desc".to_string()));
    q
}

/// Decode a performance response body.
pub fn decode_performance(body: &str) -> StoreResult<Vec<PerformanceRecord>> {
    let rows: Vec<PerformanceJson> =
        serde_json::from_str(body).map_err(|e| StoreError::Malformed {
            table: "performance_reports",
            detail: e.to_string(),
        })?;
    Ok(rows.into_iter().map(PerformanceRecord::from).collect())
}

fn eq(v: impl std::fmt::Display) -> String {
    format!("eq.{}", v)
}

impl RestStore {
    pub fn new(base_url: &str, api_key: &str) -> StoreResult<Self> {
        Ok(Self {
            client: http_client()?,
            base: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base, table)
    }

    fn send(&self, req: RequestBuilder) -> StoreResult<Response> {
        let resp = req
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            tracing::warn!(status = status.as_u16(), %body, "data service rejected request");
            return Err(StoreError::Service {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }

    fn select<T: DeserializeOwned>(
        &self,
        table: &'static str,
        query: &[(String, String)],
    ) -> StoreResult<Vec<T>> {
        let resp = self.send(self.client.get(self.url(table)).query(query))?;
        let body = resp.text()?;
        serde_json::from_str(&body).map_err(|e| StoreError::Malformed {
            table,
            detail: e.to_string(),
        })
    }

    fn returning<T: DeserializeOwned>(
        &self,
        table: &'static str,
        req: RequestBuilder,
    ) -> StoreResult<Vec<T>> {
        let resp = self.send(req.header("Prefer", "return=representation"))?;
        let body = resp.text()?;
        serde_json::from_str(&body).map_err(|e| StoreError::Malformed {
            table,
            detail: e.to_string(),
        })
    }

    fn insert<T: DeserializeOwned>(&self, table: &'static str, body: &Value) -> StoreResult<T> {
        let req = self.client.post(self.url(table)).json(body);
        self.returning::<T>(table, req)?
            .into_iter()
            .next()
            .ok_or(StoreError::EmptyResponse(table))
    }

    fn update<T: DeserializeOwned>(
        &self,
        table: &'static str,
        id: i64,
        body: &Value,
    ) -> StoreResult<T> {
        let req = self
            .client
            .patch(self.url(table))
            .query(&[("id", eq(id))])
            .json(body);
        self.returning::<T>(table, req)?
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound { table, id })
    }

    fn delete(&self, table: &'static str, id: i64) -> StoreResult<bool> {
        let req = self.client.delete(self.url(table)).query(&[("id", eq(id))]);
        let gone: Vec<Value> = self.returning(table, req)?;
        Ok(!gone.is_empty())
    }

    fn platform(&self, id: i64) -> StoreResult<Platform> {
        let q = [
            ("select".to_string(), "id,name,category".to_string()),
            ("id".to_string(), eq(id)),
        ];
        self.select::<Platform>("platforms", &q)?
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound {
                table: "platforms",
                id,
            })
    }
}

fn ordered(select: &str, order: &str) -> Vec<(String, String)> {
    vec![
        ("select".to_string(), select.to_string()),
        ("order".to_string(), order.to_string()),
    ]
}

impl DataStore for RestStore {
    fn brands(&self) -> StoreResult<Vec<Brand>> {
        self.select("brands", &ordered("id,name", "name"))
    }

    fn insert_brand(&self, name: &str) -> StoreResult<Brand> {
        self.insert("brands", &json!({ "name": name }))
    }

    fn platforms(&self) -> StoreResult<Vec<Platform>> {
        self.select("platforms", &ordered("id,name,category", "name"))
    }

    fn insert_platform(&self, name: &str, category: PlatformCategory) -> StoreResult<Platform> {
        self.insert(
            "platforms",
            &json!({ "name": name, "category": category.as_str() }),
        )
    }

    fn ad_accounts(&self) -> StoreResult<Vec<AdAccount>> {
        let rows: Vec<AccountRowJson> = self.select(
            "ad_accounts",
            &ordered(
                "id,name,platforms!inner(id,name,category),account_brands(brand_id)",
                "name",
            ),
        )?;
        Ok(rows
            .into_iter()
            .map(|a| AdAccount {
                id: a.id,
                name: a.name,
                platform: a.platforms,
                brand_ids: a.account_brands.into_iter().map(|l| l.brand_id).collect(),
            })
            .collect())
    }

    fn insert_ad_account(
        &self,
        name: &str,
        platform_id: i64,
        brand_ids: &[i64],
    ) -> StoreResult<AdAccount> {
        #[derive(Deserialize)]
        struct Created {
            id: i64,
        }
        let platform = self.platform(platform_id)?;
        let created: Created = self.insert(
            "ad_accounts",
            &json!({ "name": name, "platform_id": platform_id }),
        )?;
        if !brand_ids.is_empty() {
            let links: Vec<Value> = brand_ids
                .iter()
                .map(|b| json!({ "account_id": created.id, "brand_id": b }))
                .collect();
            let req = self
                .client
                .post(self.url("account_brands"))
                .json(&Value::Array(links));
            let linked: StoreResult<Vec<Value>> = self.returning("account_brands", req);
            if let Err(e) = linked {
                // no transactions over PostgREST; undo the account row by hand
                if let Err(cleanup) = self.delete("ad_accounts", created.id) {
                    tracing::warn!(id = created.id, error = %cleanup, "could not remove unlinked ad account");
                }
                return Err(e);
            }
        }
        Ok(AdAccount {
            id: created.id,
            name: name.to_string(),
            platform,
            brand_ids: brand_ids.to_vec(),
        })
    }

    fn campaigns(&self) -> StoreResult<Vec<Campaign>> {
        self.select(
            "campaigns",
            &ordered("id,name,brand_id,account_id", "name,id"),
        )
    }

    fn insert_campaign(
        &self,
        name: &str,
        brand_id: Option<i64>,
        account_id: Option<i64>,
    ) -> StoreResult<Campaign> {
        self.insert(
            "campaigns",
            &json!({ "name": name, "brand_id": brand_id, "account_id": account_id }),
        )
    }

    fn product_models(&self) -> StoreResult<Vec<ProductModel>> {
        self.select("models", &ordered("id,name,brand_id", "name,id"))
    }

    fn insert_product_model(&self, name: &str, brand_id: Option<i64>) -> StoreResult<ProductModel> {
        self.insert("models", &json!({ "name": name, "brand_id": brand_id }))
    }

    fn performance(&self, filter: &PerformanceFilter) -> StoreResult<Vec<PerformanceRecord>> {
        if filter.campaign_ids.as_ref().is_some_and(|ids| ids.is_empty()) {
            return Ok(Vec::new());
        }
        let resp = self.send(
            self.client
                .get(self.url("performance_reports"))
                .query(&performance_query(filter)),
        )?;
        let records = decode_performance(&resp.text()?)?;
        tracing::debug!(rows = records.len(), range = %filter.range, "performance rows fetched");
        Ok(records)
    }

    fn insert_report_row(&self, row: &NewReportRow) -> StoreResult<ReportRow> {
        let created: PerformanceJson = self.insert(
            "performance_reports",
            &json!({
                "campaign_id": row.campaign_id,
                "report_date": row.date.to_string(),
                "cost": row.cost,
                "impressions": row.impressions,
                "clicks": row.clicks,
                "conversions": row.conversions,
                "reach": row.reach,
            }),
        )?;
        Ok(PerformanceRecord::from(created).row)
    }

    fn monthly_budgets(&self, period: Option<YearMonth>) -> StoreResult<Vec<MonthlyBudget>> {
        let mut q = ordered(MONTHLY_SELECT, "year.desc,month.desc,brand_id");
        if let Some(p) = period {
            q.push(("year".to_string(), eq(p.year)));
            q.push(("month".to_string(), eq(p.month)));
        }
        let rows: Vec<MonthlyJson> = self.select("monthly_budgets", &q)?;
        Ok(rows.into_iter().map(MonthlyBudget::from).collect())
    }

    fn find_monthly_budget(
        &self,
        brand_id: i64,
        period: YearMonth,
    ) -> StoreResult<Option<MonthlyBudget>> {
        let q = [
            ("select".to_string(), MONTHLY_SELECT.to_string()),
            ("brand_id".to_string(), eq(brand_id)),
            ("year".to_string(), eq(period.year)),
            ("month".to_string(), eq(period.month)),
        ];
        let rows: Vec<MonthlyJson> = self.select("monthly_budgets", &q)?;
        Ok(rows.into_iter().next().map(MonthlyBudget::from))
    }

    fn insert_monthly_budget(
        &self,
        brand_id: i64,
        period: YearMonth,
        targets: &MonthlyTargets,
    ) -> StoreResult<MonthlyBudget> {
        let created: MonthlyJson = self.insert(
            "monthly_budgets",
            &json!({
                "brand_id": brand_id,
                "month": period.month,
                "year": period.year,
                "target_google": targets.google,
                "target_meta": targets.meta,
                "target_total": targets.total(),
            }),
        )?;
        Ok(created.into())
    }

    fn update_monthly_budget(
        &self,
        id: i64,
        targets: &MonthlyTargets,
    ) -> StoreResult<MonthlyBudget> {
        let updated: MonthlyJson = self.update(
            "monthly_budgets",
            id,
            &json!({
                "target_google": targets.google,
                "target_meta": targets.meta,
                "target_total": targets.total(),
            }),
        )?;
        Ok(updated.into())
    }

    fn delete_monthly_budget(&self, id: i64) -> StoreResult<bool> {
        self.delete("monthly_budgets", id)
    }

    fn detailed_budgets(&self) -> StoreResult<Vec<DetailedBudget>> {
        let rows: Vec<DetailedJson> =
            self.select("detailed_budgets", &ordered("*", "account_id,id"))?;
        Ok(rows.into_iter().map(DetailedBudget::from).collect())
    }

    fn detailed_budget(&self, id: i64) -> StoreResult<Option<DetailedBudget>> {
        let q = [
            ("select".to_string(), "*".to_string()),
            ("id".to_string(), eq(id)),
        ];
        let rows: Vec<DetailedJson> = self.select("detailed_budgets", &q)?;
        Ok(rows.into_iter().next().map(DetailedBudget::from))
    }

    fn insert_detailed_budget(&self, new: &NewDetailedBudget) -> StoreResult<DetailedBudget> {
        let created: DetailedJson = self.insert(
            "detailed_budgets",
            &json!({
                "monthly_budget_id": new.monthly_budget_id,
                "account_id": new.account_id,
                "model_id": new.model_id,
                "daily_planned": new.daily_planned,
                "total_planned": new.total_planned,
                "planned_results": new.planned_results,
                "active": new.active,
                "notes": new.notes,
            }),
        )?;
        Ok(created.into())
    }

    fn update_detailed_budget(&self, budget: &DetailedBudget) -> StoreResult<()> {
        let _: DetailedJson = self.update(
            "detailed_budgets",
            budget.id,
            &json!({
                "daily_planned": budget.daily_planned,
                "total_planned": budget.total_planned,
                "planned_results": budget.planned_results,
                "active": budget.active,
                "notes": budget.notes,
            }),
        )?;
        Ok(())
    }

    fn delete_detailed_budget(&self, id: i64) -> StoreResult<bool> {
        self.delete("detailed_budgets", id)
    }

    fn leads(&self, filter: &LeadFilter) -> StoreResult<Vec<Lead>> {
        let rows: Vec<LeadJson> = self.select("leads", &lead_query(filter))?;
        rows.into_iter().map(Lead::try_from).collect()
    }

    fn insert_lead(&self, new: &NewLead) -> StoreResult<Lead> {
        let created: LeadJson = self.insert(
            "leads",
            &json!({
                "account_id": new.account_id,
                "name": new.name,
                "email": new.email,
                "phone": new.phone,
                "source": new.source,
                "form_name": new.form_name,
                "stage": new.stage.map(LeadStage::as_str),
                "created_at": new.created_on.to_string(),
            }),
        )?;
        created.try_into()
    }

    fn update_lead_stage(&self, id: i64, stage: LeadStage) -> StoreResult<Lead> {
        let updated: LeadJson = self.update("leads", id, &json!({ "stage": stage.as_str() }))?;
        updated.try_into()
    }

    fn delete_lead(&self, id: i64) -> StoreResult<bool> {
        self.delete("leads", id)
    }

    fn audiences(&self) -> StoreResult<Vec<Audience>> {
        let rows: Vec<AudienceJson> =
            self.select("audiences", &ordered("*", "model_id,profile_name,id"))?;
        Ok(rows.into_iter().map(Audience::from).collect())
    }

    fn insert_audience(&self, new: &NewAudience) -> StoreResult<Audience> {
        let created: AudienceJson = self.insert(
            "audiences",
            &json!({
                "model_id": new.model_id,
                "profile_name": new.profile_name,
                "description": new.description,
                "age_range": new.age_range,
                "gender": new.gender.as_str(),
                "location": new.location,
                "interests": new.interests,
                "behaviors": new.behaviors,
            }),
        )?;
        Ok(created.into())
    }

    fn update_audience(&self, a: &Audience) -> StoreResult<()> {
        let _: AudienceJson = self.update(
            "audiences",
            a.id,
            &json!({
                "model_id": a.model_id,
                "profile_name": a.profile_name,
                "description": a.description,
                "age_range": a.age_range,
                "gender": a.gender.as_str(),
                "location": a.location,
                "interests": a.interests,
                "behaviors": a.behaviors,
            }),
        )?;
        Ok(())
    }

    fn delete_audience(&self, id: i64) -> StoreResult<bool> {
        self.delete("audiences", id)
    }
}
