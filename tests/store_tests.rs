// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use campaigndesk::db;
use campaigndesk::models::{NewReportRow, PlatformCategory};
use campaigndesk::period::DateRange;
use campaigndesk::store::{DataStore, PerformanceFilter, SqliteStore};
use chrono::NaiveDate;
use rusqlite::params;
use rust_decimal::Decimal;

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
}

fn march() -> DateRange {
    DateRange::new(d(1), d(31)).unwrap()
}

struct Seed {
    store: SqliteStore,
    search: i64,
    social: i64,
    brand_campaign: i64,
    social_campaign: i64,
    loose_campaign: i64,
}

fn seed() -> Seed {
    let store = SqliteStore::new(db::open_in_memory().unwrap());
    let acme = store.insert_brand("Acme").unwrap().id;
    let google = store
        .insert_platform("Google Ads", PlatformCategory::Google)
        .unwrap();
    let meta = store
        .insert_platform("Meta Ads", PlatformCategory::Meta)
        .unwrap();
    let search = store.insert_ad_account("Acme", google.id, &[acme]).unwrap().id;
    let social = store.insert_ad_account("Acme", meta.id, &[acme]).unwrap().id;
    let brand_campaign = store
        .insert_campaign("Search Brand", Some(acme), Some(search))
        .unwrap()
        .id;
    let social_campaign = store
        .insert_campaign("Reels", Some(acme), Some(social))
        .unwrap()
        .id;
    let loose_campaign = store.insert_campaign("Loose", None, None).unwrap().id;
    Seed {
        store,
        search,
        social,
        brand_campaign,
        social_campaign,
        loose_campaign,
    }
}

fn add_row(store: &SqliteStore, campaign_id: i64, date: NaiveDate, cost: i64) {
    store
        .insert_report_row(&NewReportRow {
            campaign_id,
            date,
            cost: Decimal::from(cost),
            impressions: 100,
            clicks: 10,
            conversions: 1,
            reach: 50,
        })
        .unwrap();
}

#[test]
fn schema_init_is_idempotent() {
    let conn = db::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    db::init_schema(&conn).unwrap();
}

#[test]
fn accounts_carry_platform_and_brands() {
    let s = seed();
    let accounts = s.store.ad_accounts().unwrap();
    assert_eq!(accounts.len(), 2);
    let social = accounts.iter().find(|a| a.id == s.social).unwrap();
    assert_eq!(social.platform.category, PlatformCategory::Meta);
    assert_eq!(social.brand_ids.len(), 1);
}

#[test]
fn performance_joins_relations_newest_first() {
    let s = seed();
    add_row(&s.store, s.brand_campaign, d(5), 10);
    add_row(&s.store, s.brand_campaign, d(7), 20);
    add_row(&s.store, s.loose_campaign, d(6), 5);
    add_row(&s.store, s.brand_campaign, d(20), 99);

    let filter = PerformanceFilter::for_range(DateRange::new(d(1), d(10)).unwrap());
    let rows = s.store.performance(&filter).unwrap();
    let dates: Vec<NaiveDate> = rows.iter().map(|r| r.row.date).collect();
    assert_eq!(dates, vec![d(7), d(6), d(5)]);

    let first = rows[0].campaign.as_ref().unwrap();
    assert_eq!(first.name, "Search Brand");
    assert_eq!(first.brand.as_ref().unwrap().name, "Acme");
    let account = first.account.as_ref().unwrap();
    assert_eq!(account.id, s.search);
    assert_eq!(account.platform.as_ref().unwrap().name, "Google Ads");

    let loose = rows[1].campaign.as_ref().unwrap();
    assert!(loose.brand.is_none());
    assert!(loose.account.is_none());
}

#[test]
fn performance_filters_by_account_and_campaigns() {
    let s = seed();
    add_row(&s.store, s.brand_campaign, d(5), 10);
    add_row(&s.store, s.social_campaign, d(5), 30);

    let by_account = PerformanceFilter {
        account_id: Some(s.social),
        ..PerformanceFilter::for_range(march())
    };
    let rows = s.store.performance(&by_account).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].row.cost, Decimal::from(30));

    let by_campaign = PerformanceFilter {
        campaign_ids: Some(vec![s.brand_campaign]),
        ..PerformanceFilter::for_range(march())
    };
    assert_eq!(s.store.performance(&by_campaign).unwrap().len(), 1);

    let none = PerformanceFilter {
        campaign_ids: Some(vec![]),
        ..PerformanceFilter::for_range(march())
    };
    assert!(s.store.performance(&none).unwrap().is_empty());
}

#[test]
fn loosely_typed_metrics_are_coerced() {
    let s = seed();
    s.store
        .conn()
        .execute(
            "INSERT INTO performance_reports(campaign_id, report_date, cost, impressions, clicks, conversions, reach)
             VALUES (?1, '2024-03-02', 'n/a', '1200', 'lots', 3.7, NULL)",
            params![s.brand_campaign],
        )
        .unwrap();
    let rows = s
        .store
        .performance(&PerformanceFilter::for_range(march()))
        .unwrap();
    assert_eq!(rows.len(), 1);
    let r = &rows[0].row;
    assert_eq!(r.cost, Decimal::ZERO);
    assert_eq!(r.impressions, 1200);
    assert_eq!(r.clicks, 0);
    assert_eq!(r.conversions, 3);
    assert_eq!(r.reach, 0);
}

#[test]
fn non_numeric_budget_amount_reads_as_zero() {
    let s = seed();
    s.store
        .conn()
        .execute(
            "INSERT INTO monthly_budgets(brand_id, month, year, target_google, target_meta, target_total)
             VALUES (1, 3, 2024, 'abc', '250 BRL', '0')",
            [],
        )
        .unwrap();
    let budgets = s.store.monthly_budgets(None).unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].target_google, Decimal::ZERO);
    assert_eq!(budgets[0].target_meta, Decimal::from(250));
}
