// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{DataStore, LeadFilter, PerformanceFilter};
use crate::audience::split_list;
use crate::error::{StoreError, StoreResult};
use crate::metrics::{lenient_count, lenient_decimal};
use crate::models::{
    AccountRef, AdAccount, Audience, Brand, Campaign, CampaignRef, DetailedBudget, Gender, Lead,
    LeadStage, MonthlyBudget, MonthlyTargets, NewAudience, NewDetailedBudget, NewLead,
    NewReportRow, PerformanceRecord, Platform, PlatformCategory, ProductModel, ReportRow,
};
use crate::period::YearMonth;
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Local mirror of the remote tables.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    fn platform(&self, id: i64) -> StoreResult<Platform> {
        let (name, category): (String, String) = self
            .conn
            .query_row(
                "SELECT name, category FROM platforms WHERE id=?1",
                params![id],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?
            .ok_or(StoreError::NotFound {
                table: "platforms",
                id,
            })?;
        Ok(Platform {
            id,
            name,
            category: category_col("platforms", &category)?,
        })
    }

    fn monthly_budget(&self, id: i64) -> StoreResult<MonthlyBudget> {
        let raw = self
            .conn
            .query_row(
                "SELECT id, brand_id, month, year, target_google, target_meta, target_total
                 FROM monthly_budgets WHERE id=?1",
                params![id],
                raw_monthly,
            )
            .optional()?
            .ok_or(StoreError::NotFound {
                table: "monthly_budgets",
                id,
            })?;
        Ok(raw.into_budget())
    }

    fn lead(&self, id: i64) -> StoreResult<Lead> {
        let raw = self
            .conn
            .query_row(
                &format!("SELECT {} FROM leads WHERE id=?1", LEAD_COLUMNS),
                params![id],
                raw_lead,
            )
            .optional()?
            .ok_or(StoreError::NotFound { table: "leads", id })?;
        raw.into_lead()
    }

    fn audience(&self, id: i64) -> StoreResult<Audience> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM audiences WHERE id=?1", AUDIENCE_COLUMNS),
                params![id],
                raw_audience,
            )
            .optional()?
            .map(RawAudience::into_audience)
            .ok_or(StoreError::NotFound {
                table: "audiences",
                id,
            })
    }
}

fn category_col(table: &'static str, s: &str) -> StoreResult<PlatformCategory> {
    s.parse::<PlatformCategory>()
        .map_err(|detail| StoreError::Malformed { table, detail })
}

fn date_col(table: &'static str, s: &str) -> StoreResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| StoreError::Malformed {
        table,
        detail: format!("invalid date '{}': {}", s, e),
    })
}

fn amount_value(v: Value) -> Decimal {
    match v {
        Value::Integer(i) => Decimal::from(i),
        Value::Real(f) => Decimal::try_from(f).unwrap_or(Decimal::ZERO),
        Value::Text(s) => lenient_decimal(Some(&s)),
        Value::Null | Value::Blob(_) => Decimal::ZERO,
    }
}

fn count_value(v: Value) -> i64 {
    match v {
        Value::Integer(i) => i,
        Value::Real(f) if f.is_finite() => f.trunc() as i64,
        Value::Text(s) => lenient_count(Some(&s)),
        _ => 0,
    }
}

const LEAD_COLUMNS: &str = "id, account_id, name, email, phone, source, form_name, stage, created_on";

struct RawLead {
    id: i64,
    account_id: Option<i64>,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    source: Option<String>,
    form_name: Option<String>,
    stage: Option<String>,
    created_on: String,
}

impl RawLead {
    fn into_lead(self) -> StoreResult<Lead> {
        Ok(Lead {
            id: self.id,
            account_id: self.account_id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            source: self.source,
            form_name: self.form_name,
            raw_stage: self.stage,
            created_on: date_col("leads", &self.created_on)?,
        })
    }
}

fn raw_lead(r: &rusqlite::Row<'_>) -> rusqlite::Result<RawLead> {
    Ok(RawLead {
        id: r.get(0)?,
        account_id: r.get(1)?,
        name: r.get(2)?,
        email: r.get(3)?,
        phone: r.get(4)?,
        source: r.get(5)?,
        form_name: r.get(6)?,
        stage: r.get(7)?,
        created_on: r.get(8)?,
    })
}

const AUDIENCE_COLUMNS: &str =
    "id, model_id, profile_name, description, age_range, gender, location, interests, behaviors";

struct RawAudience {
    id: i64,
    model_id: i64,
    profile_name: String,
    description: Option<String>,
    age_range: String,
    gender: String,
    location: Option<String>,
    interests: Option<String>,
    behaviors: Option<String>,
}

impl RawAudience {
    fn into_audience(self) -> Audience {
        let gender = self.gender.parse::<Gender>().unwrap_or_else(|detail| {
            tracing::warn!(id = self.id, %detail, "audience gender read as all");
            Gender::All
        });
        Audience {
            id: self.id,
            model_id: self.model_id,
            profile_name: self.profile_name,
            description: self.description,
            age_range: self.age_range,
            gender,
            location: self.location,
            interests: list_col(self.interests.as_deref()),
            behaviors: list_col(self.behaviors.as_deref()),
        }
    }
}

fn raw_audience(r: &rusqlite::Row<'_>) -> rusqlite::Result<RawAudience> {
    Ok(RawAudience {
        id: r.get(0)?,
        model_id: r.get(1)?,
        profile_name: r.get(2)?,
        description: r.get(3)?,
        age_range: r.get(4)?,
        gender: r.get(5)?,
        location: r.get(6)?,
        interests: r.get(7)?,
        behaviors: r.get(8)?,
    })
}

/// JSON array column; plain comma-separated text is accepted too.
fn list_col(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    serde_json::from_str::<Vec<String>>(raw).unwrap_or_else(|_| split_list(raw))
}

fn list_json(items: &[String]) -> String {
    serde_json::Value::from(items.to_vec()).to_string()
}

/// Budget amount column; values that are not clean decimals are read
/// leniently and logged.
fn budget_amount(table: &'static str, id: i64, column: &'static str, v: Value) -> Decimal {
    let clean = match &v {
        Value::Integer(_) | Value::Real(_) => true,
        Value::Text(s) => s.trim().parse::<Decimal>().is_ok(),
        Value::Null | Value::Blob(_) => false,
    };
    if !clean {
        tracing::warn!(table, id, column, value = ?v, "non-numeric budget amount read leniently");
    }
    amount_value(v)
}

struct RawMonthly {
    id: i64,
    brand_id: i64,
    month: u32,
    year: i32,
    google: Value,
    meta: Value,
    total: Value,
}

impl RawMonthly {
    fn into_budget(self) -> MonthlyBudget {
        const T: &str = "monthly_budgets";
        MonthlyBudget {
            id: self.id,
            brand_id: self.brand_id,
            month: self.month,
            year: self.year,
            target_google: budget_amount(T, self.id, "target_google", self.google),
            target_meta: budget_amount(T, self.id, "target_meta", self.meta),
            target_total: budget_amount(T, self.id, "target_total", self.total),
        }
    }
}

fn raw_monthly(r: &rusqlite::Row<'_>) -> rusqlite::Result<RawMonthly> {
    Ok(RawMonthly {
        id: r.get(0)?,
        brand_id: r.get(1)?,
        month: r.get(2)?,
        year: r.get(3)?,
        google: r.get(4)?,
        meta: r.get(5)?,
        total: r.get(6)?,
    })
}

struct RawDetailed {
    id: i64,
    monthly_budget_id: Option<i64>,
    account_id: i64,
    model_id: i64,
    daily: Value,
    total: Value,
    results: i64,
    active: bool,
    notes: Option<String>,
}

impl RawDetailed {
    fn into_budget(self) -> DetailedBudget {
        const T: &str = "detailed_budgets";
        DetailedBudget {
            id: self.id,
            monthly_budget_id: self.monthly_budget_id,
            account_id: self.account_id,
            model_id: self.model_id,
            daily_planned: budget_amount(T, self.id, "daily_planned", self.daily),
            total_planned: budget_amount(T, self.id, "total_planned", self.total),
            planned_results: self.results,
            active: self.active,
            notes: self.notes,
        }
    }
}

const DETAILED_COLUMNS: &str = "id, monthly_budget_id, account_id, model_id, daily_planned, \
     total_planned, planned_results, active, notes";

fn raw_detailed(r: &rusqlite::Row<'_>) -> rusqlite::Result<RawDetailed> {
    Ok(RawDetailed {
        id: r.get(0)?,
        monthly_budget_id: r.get(1)?,
        account_id: r.get(2)?,
        model_id: r.get(3)?,
        daily: r.get(4)?,
        total: r.get(5)?,
        results: r.get(6)?,
        active: r.get(7)?,
        notes: r.get(8)?,
    })
}

impl DataStore for SqliteStore {
    fn brands(&self) -> StoreResult<Vec<Brand>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM brands ORDER BY name")?;
        let rows = stmt.query_map([], |r| {
            Ok(Brand {
                id: r.get(0)?,
                name: r.get(1)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn insert_brand(&self, name: &str) -> StoreResult<Brand> {
        self.conn
            .execute("INSERT INTO brands(name) VALUES (?1)", params![name])?;
        Ok(Brand {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    fn platforms(&self) -> StoreResult<Vec<Platform>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, category FROM platforms ORDER BY name")?;
        let rows = stmt.query_map([], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (id, name, category) = row?;
            out.push(Platform {
                id,
                name,
                category: category_col("platforms", &category)?,
            });
        }
        Ok(out)
    }

    fn insert_platform(&self, name: &str, category: PlatformCategory) -> StoreResult<Platform> {
        self.conn.execute(
            "INSERT INTO platforms(name, category) VALUES (?1, ?2)",
            params![name, category.as_str()],
        )?;
        Ok(Platform {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            category,
        })
    }

    fn ad_accounts(&self) -> StoreResult<Vec<AdAccount>> {
        let mut links: HashMap<i64, Vec<i64>> = HashMap::new();
        let mut stmt = self
            .conn
            .prepare("SELECT account_id, brand_id FROM account_brands ORDER BY account_id, brand_id")?;
        let rows = stmt.query_map([], |r| Ok((r.get::<_, i64>(0)?, r.get::<_, i64>(1)?)))?;
        for row in rows {
            let (account_id, brand_id) = row?;
            links.entry(account_id).or_default().push(brand_id);
        }

        let mut stmt = self.conn.prepare(
            "SELECT a.id, a.name, p.id, p.name, p.category
             FROM ad_accounts a JOIN platforms p ON a.platform_id=p.id
             ORDER BY a.name, p.name",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, i64>(2)?,
                r.get::<_, String>(3)?,
                r.get::<_, String>(4)?,
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (id, name, pid, pname, category) = row?;
            out.push(AdAccount {
                id,
                name,
                platform: Platform {
                    id: pid,
                    name: pname,
                    category: category_col("platforms", &category)?,
                },
                brand_ids: links.remove(&id).unwrap_or_default(),
            });
        }
        Ok(out)
    }

    fn insert_ad_account(
        &self,
        name: &str,
        platform_id: i64,
        brand_ids: &[i64],
    ) -> StoreResult<AdAccount> {
        let platform = self.platform(platform_id)?;
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO ad_accounts(name, platform_id) VALUES (?1, ?2)",
            params![name, platform_id],
        )?;
        let id = tx.last_insert_rowid();
        for brand_id in brand_ids {
            tx.execute(
                "INSERT OR IGNORE INTO account_brands(account_id, brand_id) VALUES (?1, ?2)",
                params![id, brand_id],
            )?;
        }
        tx.commit()?;
        Ok(AdAccount {
            id,
            name: name.to_string(),
            platform,
            brand_ids: brand_ids.to_vec(),
        })
    }

    fn campaigns(&self) -> StoreResult<Vec<Campaign>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, brand_id, account_id FROM campaigns ORDER BY name, id")?;
        let rows = stmt.query_map([], |r| {
            Ok(Campaign {
                id: r.get(0)?,
                name: r.get(1)?,
                brand_id: r.get(2)?,
                account_id: r.get(3)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn insert_campaign(
        &self,
        name: &str,
        brand_id: Option<i64>,
        account_id: Option<i64>,
    ) -> StoreResult<Campaign> {
        self.conn.execute(
            "INSERT INTO campaigns(name, brand_id, account_id) VALUES (?1, ?2, ?3)",
            params![name, brand_id, account_id],
        )?;
        Ok(Campaign {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            brand_id,
            account_id,
        })
    }

    fn product_models(&self) -> StoreResult<Vec<ProductModel>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, brand_id FROM models ORDER BY name, id")?;
        let rows = stmt.query_map([], |r| {
            Ok(ProductModel {
                id: r.get(0)?,
                name: r.get(1)?,
                brand_id: r.get(2)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn insert_product_model(&self, name: &str, brand_id: Option<i64>) -> StoreResult<ProductModel> {
        self.conn.execute(
            "INSERT INTO models(name, brand_id) VALUES (?1, ?2)",
            params![name, brand_id],
        )?;
        Ok(ProductModel {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            brand_id,
        })
    }

    fn performance(&self, filter: &PerformanceFilter) -> StoreResult<Vec<PerformanceRecord>> {
        let mut sql = String::from(
            "SELECT p.id, p.campaign_id, p.report_date, p.cost, p.impressions, p.clicks,
                    p.conversions, p.reach,
                    c.id, c.name, b.id, b.name, a.id, a.name, pl.id, pl.name, pl.category
             FROM performance_reports p
             LEFT JOIN campaigns c ON p.campaign_id=c.id
             LEFT JOIN brands b ON c.brand_id=b.id
             LEFT JOIN ad_accounts a ON c.account_id=a.id
             LEFT JOIN platforms pl ON a.platform_id=pl.id
             WHERE p.report_date >= ? AND p.report_date <= ?",
        );
        let mut args: Vec<Value> = vec![
            Value::Text(filter.range.start.to_string()),
            Value::Text(filter.range.end.to_string()),
        ];
        if let Some(account_id) = filter.account_id {
            sql.push_str(" AND c.account_id = ?");
            args.push(Value::Integer(account_id));
        }
        if let Some(ids) = &filter.campaign_ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            let marks = vec!["?"; ids.len()].join(",");
            sql.push_str(&format!(" AND p.campaign_id IN ({})", marks));
            args.extend(ids.iter().map(|id| Value::Integer(*id)));
        }
        sql.push_str(" ORDER BY p.report_date DESC, p.id DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(args.iter()))?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            let date: String = r.get(2)?;
            let row = ReportRow {
                id: r.get(0)?,
                campaign_id: r.get(1)?,
                date: date_col("performance_reports", &date)?,
                cost: amount_value(r.get(3)?),
                impressions: count_value(r.get(4)?),
                clicks: count_value(r.get(5)?),
                conversions: count_value(r.get(6)?),
                reach: count_value(r.get(7)?),
            };

            let campaign_id: Option<i64> = r.get(8)?;
            let campaign = match campaign_id {
                None => None,
                Some(cid) => {
                    let brand = match r.get::<_, Option<i64>>(10)? {
                        Some(bid) => Some(Brand {
                            id: bid,
                            name: r.get(11)?,
                        }),
                        None => None,
                    };
                    let account = match r.get::<_, Option<i64>>(12)? {
                        Some(aid) => {
                            let platform = match r.get::<_, Option<i64>>(14)? {
                                Some(pid) => {
                                    let category: String = r.get(16)?;
                                    Some(Platform {
                                        id: pid,
                                        name: r.get(15)?,
                                        category: category_col("platforms", &category)?,
                                    })
                                }
                                None => None,
                            };
                            Some(AccountRef {
                                id: aid,
                                name: r.get(13)?,
                                platform,
                            })
                        }
                        None => None,
                    };
                    Some(CampaignRef {
                        id: cid,
                        name: r.get(9)?,
                        brand,
                        account,
                    })
                }
            };
            out.push(PerformanceRecord { row, campaign });
        }
        tracing::debug!(rows = out.len(), range = %filter.range, "performance rows loaded");
        Ok(out)
    }

    fn insert_report_row(&self, row: &NewReportRow) -> StoreResult<ReportRow> {
        self.conn.execute(
            "INSERT INTO performance_reports(campaign_id, report_date, cost, impressions, clicks, conversions, reach)
             VALUES (?1,?2,?3,?4,?5,?6,?7)",
            params![
                row.campaign_id,
                row.date.to_string(),
                row.cost.to_string(),
                row.impressions,
                row.clicks,
                row.conversions,
                row.reach
            ],
        )?;
        Ok(ReportRow {
            id: self.conn.last_insert_rowid(),
            campaign_id: row.campaign_id,
            date: row.date,
            cost: row.cost,
            impressions: row.impressions,
            clicks: row.clicks,
            conversions: row.conversions,
            reach: row.reach,
        })
    }

    fn monthly_budgets(&self, period: Option<YearMonth>) -> StoreResult<Vec<MonthlyBudget>> {
        let base = "SELECT id, brand_id, month, year, target_google, target_meta, target_total
                    FROM monthly_budgets";
        let raws = if let Some(p) = period {
            let mut stmt = self
                .conn
                .prepare(&format!("{} WHERE year=?1 AND month=?2 ORDER BY brand_id", base))?;
            let rows = stmt.query_map(params![p.year, p.month], raw_monthly)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        } else {
            let mut stmt = self.conn.prepare(&format!(
                "{} ORDER BY year DESC, month DESC, brand_id",
                base
            ))?;
            let rows = stmt.query_map([], raw_monthly)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(raws.into_iter().map(RawMonthly::into_budget).collect())
    }

    fn find_monthly_budget(
        &self,
        brand_id: i64,
        period: YearMonth,
    ) -> StoreResult<Option<MonthlyBudget>> {
        let raw = self
            .conn
            .query_row(
                "SELECT id, brand_id, month, year, target_google, target_meta, target_total
                 FROM monthly_budgets WHERE brand_id=?1 AND year=?2 AND month=?3",
                params![brand_id, period.year, period.month],
                raw_monthly,
            )
            .optional()?;
        Ok(raw.map(RawMonthly::into_budget))
    }

    fn insert_monthly_budget(
        &self,
        brand_id: i64,
        period: YearMonth,
        targets: &MonthlyTargets,
    ) -> StoreResult<MonthlyBudget> {
        self.conn.execute(
            "INSERT INTO monthly_budgets(brand_id, month, year, target_google, target_meta, target_total)
             VALUES (?1,?2,?3,?4,?5,?6)",
            params![
                brand_id,
                period.month,
                period.year,
                targets.google.to_string(),
                targets.meta.to_string(),
                targets.total().to_string()
            ],
        )?;
        self.monthly_budget(self.conn.last_insert_rowid())
    }

    fn update_monthly_budget(
        &self,
        id: i64,
        targets: &MonthlyTargets,
    ) -> StoreResult<MonthlyBudget> {
        let n = self.conn.execute(
            "UPDATE monthly_budgets SET target_google=?1, target_meta=?2, target_total=?3 WHERE id=?4",
            params![
                targets.google.to_string(),
                targets.meta.to_string(),
                targets.total().to_string(),
                id
            ],
        )?;
        if n == 0 {
            return Err(StoreError::NotFound {
                table: "monthly_budgets",
                id,
            });
        }
        self.monthly_budget(id)
    }

    fn delete_monthly_budget(&self, id: i64) -> StoreResult<bool> {
        let n = self
            .conn
            .execute("DELETE FROM monthly_budgets WHERE id=?1", params![id])?;
        Ok(n > 0)
    }

    fn detailed_budgets(&self) -> StoreResult<Vec<DetailedBudget>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM detailed_budgets ORDER BY account_id, id",
            DETAILED_COLUMNS
        ))?;
        let raws = stmt
            .query_map([], raw_detailed)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(raws.into_iter().map(RawDetailed::into_budget).collect())
    }

    fn detailed_budget(&self, id: i64) -> StoreResult<Option<DetailedBudget>> {
        let raw = self
            .conn
            .query_row(
                &format!("SELECT {} FROM detailed_budgets WHERE id=?1", DETAILED_COLUMNS),
                params![id],
                raw_detailed,
            )
            .optional()?;
        Ok(raw.map(RawDetailed::into_budget))
    }

    fn insert_detailed_budget(&self, new: &NewDetailedBudget) -> StoreResult<DetailedBudget> {
        self.conn.execute(
            "INSERT INTO detailed_budgets(monthly_budget_id, account_id, model_id, daily_planned,
                 total_planned, planned_results, active, notes)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
            params![
                new.monthly_budget_id,
                new.account_id,
                new.model_id,
                new.daily_planned.to_string(),
                new.total_planned.to_string(),
                new.planned_results,
                new.active,
                new.notes
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.detailed_budget(id)?.ok_or(StoreError::NotFound {
            table: "detailed_budgets",
            id,
        })
    }

    fn update_detailed_budget(&self, budget: &DetailedBudget) -> StoreResult<()> {
        let n = self.conn.execute(
            "UPDATE detailed_budgets SET daily_planned=?1, total_planned=?2, planned_results=?3,
                 active=?4, notes=?5
             WHERE id=?6",
            params![
                budget.daily_planned.to_string(),
                budget.total_planned.to_string(),
                budget.planned_results,
                budget.active,
                budget.notes,
                budget.id
            ],
        )?;
        if n == 0 {
            return Err(StoreError::NotFound {
                table: "detailed_budgets",
                id: budget.id,
            });
        }
        Ok(())
    }

    fn delete_detailed_budget(&self, id: i64) -> StoreResult<bool> {
        let n = self
            .conn
            .execute("DELETE FROM detailed_budgets WHERE id=?1", params![id])?;
        Ok(n > 0)
    }

    fn leads(&self, filter: &LeadFilter) -> StoreResult<Vec<Lead>> {
        let mut sql = format!("SELECT {} FROM leads WHERE 1=1", LEAD_COLUMNS);
        let mut args: Vec<Value> = Vec::new();
        if let Some(range) = filter.range {
            sql.push_str(" AND created_on >= ? AND created_on <= ?");
            args.push(Value::Text(range.start.to_string()));
            args.push(Value::Text(range.end.to_string()));
        }
        if let Some(account_id) = filter.account_id {
            sql.push_str(" AND account_id = ?");
            args.push(Value::Integer(account_id));
        }
        sql.push_str(" ORDER BY created_on DESC, id DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let raws = stmt
            .query_map(params_from_iter(args), raw_lead)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        raws.into_iter().map(RawLead::into_lead).collect()
    }

    fn insert_lead(&self, new: &NewLead) -> StoreResult<Lead> {
        self.conn.execute(
            "INSERT INTO leads(account_id, name, email, phone, source, form_name, stage, created_on)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
            params![
                new.account_id,
                new.name,
                new.email,
                new.phone,
                new.source,
                new.form_name,
                new.stage.map(LeadStage::as_str),
                new.created_on.to_string()
            ],
        )?;
        self.lead(self.conn.last_insert_rowid())
    }

    fn update_lead_stage(&self, id: i64, stage: LeadStage) -> StoreResult<Lead> {
        let n = self.conn.execute(
            "UPDATE leads SET stage=?1 WHERE id=?2",
            params![stage.as_str(), id],
        )?;
        if n == 0 {
            return Err(StoreError::NotFound { table: "leads", id });
        }
        self.lead(id)
    }

    fn delete_lead(&self, id: i64) -> StoreResult<bool> {
        let n = self
            .conn
            .execute("DELETE FROM leads WHERE id=?1", params![id])?;
        Ok(n > 0)
    }

    fn audiences(&self) -> StoreResult<Vec<Audience>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM audiences ORDER BY model_id, profile_name, id",
            AUDIENCE_COLUMNS
        ))?;
        let raws = stmt
            .query_map([], raw_audience)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(raws.into_iter().map(RawAudience::into_audience).collect())
    }

    fn insert_audience(&self, new: &NewAudience) -> StoreResult<Audience> {
        self.conn.execute(
            "INSERT INTO audiences(model_id, profile_name, description, age_range, gender,
                 location, interests, behaviors)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
            params![
                new.model_id,
                new.profile_name,
                new.description,
                new.age_range,
                new.gender.as_str(),
                new.location,
                list_json(&new.interests),
                list_json(&new.behaviors)
            ],
        )?;
        self.audience(self.conn.last_insert_rowid())
    }

    fn update_audience(&self, a: &Audience) -> StoreResult<()> {
        let n = self.conn.execute(
            "UPDATE audiences SET model_id=?1, profile_name=?2, description=?3, age_range=?4,
                 gender=?5, location=?6, interests=?7, behaviors=?8
             WHERE id=?9",
            params![
                a.model_id,
                a.profile_name,
                a.description,
                a.age_range,
                a.gender.as_str(),
                a.location,
                list_json(&a.interests),
                list_json(&a.behaviors),
                a.id
            ],
        )?;
        if n == 0 {
            return Err(StoreError::NotFound {
                table: "audiences",
                id: a.id,
            });
        }
        Ok(())
    }

    fn delete_audience(&self, id: i64) -> StoreResult<bool> {
        let n = self
            .conn
            .execute("DELETE FROM audiences WHERE id=?1", params![id])?;
        Ok(n > 0)
    }
}
