// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::metrics::Variation;
use crate::models::{AdAccount, Brand, Campaign, Platform, ProductModel};
use crate::period::YearMonth;
use crate::store::DataStore;
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;

const UA: &str = concat!(
    "campaigndesk/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/campaigndesk)"
);

pub fn http_client() -> reqwest::Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<YearMonth> {
    Ok(s.parse::<YearMonth>()?)
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {:.2}", ccy, d.round_dp(2))
}

pub fn fmt_variation(v: &Variation) -> String {
    format!("{} ({:?})", v, v.tag)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

// Name lookups. Matching is case-insensitive on trimmed names.

fn same(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

pub fn find_brand(store: &dyn DataStore, name: &str) -> Result<Brand> {
    store
        .brands()?
        .into_iter()
        .find(|b| same(&b.name, name))
        .ok_or_else(|| anyhow!("Brand '{}' not found", name))
}

pub fn find_platform(store: &dyn DataStore, name: &str) -> Result<Platform> {
    store
        .platforms()?
        .into_iter()
        .find(|p| same(&p.name, name))
        .ok_or_else(|| anyhow!("Platform '{}' not found", name))
}

/// Ad account by name, narrowed by platform when names repeat across platforms.
pub fn find_account(
    store: &dyn DataStore,
    name: &str,
    platform: Option<&str>,
) -> Result<AdAccount> {
    let mut matches: Vec<AdAccount> = store
        .ad_accounts()?
        .into_iter()
        .filter(|a| same(&a.name, name))
        .filter(|a| platform.is_none_or(|p| same(&a.platform.name, p)))
        .collect();
    match matches.len() {
        0 => Err(anyhow!("Ad account '{}' not found", name)),
        1 => Ok(matches.remove(0)),
        _ => Err(anyhow!(
            "Ad account '{}' exists on several platforms; pass --platform",
            name
        )),
    }
}

pub fn find_model(store: &dyn DataStore, name: &str) -> Result<ProductModel> {
    store
        .product_models()?
        .into_iter()
        .find(|m| same(&m.name, name))
        .ok_or_else(|| anyhow!("Model '{}' not found", name))
}

/// Campaign by numeric id or by name.
pub fn find_campaign(store: &dyn DataStore, key: &str) -> Result<Campaign> {
    let campaigns = store.campaigns()?;
    if let Ok(id) = key.trim().parse::<i64>() {
        if let Some(c) = campaigns.iter().find(|c| c.id == id) {
            return Ok(c.clone());
        }
    }
    campaigns
        .into_iter()
        .find(|c| same(&c.name, key))
        .ok_or_else(|| anyhow!("Campaign '{}' not found", key))
}
