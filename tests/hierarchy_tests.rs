// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use campaigndesk::hierarchy::{Level, Period, build_hierarchy};
use campaigndesk::metrics::PeriodTotals;
use campaigndesk::models::{
    AccountRef, Brand, CampaignRef, PerformanceRecord, Platform, PlatformCategory, ReportRow,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

struct Fixture {
    brand: Option<(i64, &'static str)>,
    account: Option<(i64, &'static str)>,
    platform: Option<(i64, &'static str)>,
}

const FULL_A: Fixture = Fixture {
    brand: Some((1, "Acme")),
    account: Some((10, "Acme BR")),
    platform: Some((100, "Google Ads")),
};

fn rec(id: i64, campaign: (i64, &str), cost: i64, clicks: i64, f: &Fixture) -> PerformanceRecord {
    PerformanceRecord {
        row: ReportRow {
            id,
            campaign_id: campaign.0,
            date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            cost: Decimal::from(cost),
            impressions: clicks * 10,
            clicks,
            conversions: 1,
            reach: 0,
        },
        campaign: Some(CampaignRef {
            id: campaign.0,
            name: campaign.1.to_string(),
            brand: f.brand.map(|(id, name)| Brand {
                id,
                name: name.to_string(),
            }),
            account: f.account.map(|(id, name)| AccountRef {
                id,
                name: name.to_string(),
                platform: f.platform.map(|(pid, pname)| Platform {
                    id: pid,
                    name: pname.to_string(),
                    category: PlatformCategory::infer(pname),
                }),
            }),
        }),
    }
}

#[test]
fn rows_roll_up_into_account_brand_campaign() {
    let current = vec![
        rec(1, (7, "Spring Sale"), 100, 10, &FULL_A),
        rec(2, (7, "Spring Sale"), 150, 20, &FULL_A),
    ];
    let h = build_hierarchy(&current, &[]);

    assert_eq!(h.skipped, 0);
    let account = h.accounts.get("Acme BR (Google Ads)").expect("account node");
    assert_eq!(account.level, Level::Account);
    assert_eq!(account.label(), "Acme BR (Google Ads)");
    let brand = account.children.get("Acme").expect("brand node");
    let campaign = brand.children.get("7").expect("campaign node");
    assert_eq!(campaign.name, "Spring Sale");
    assert_eq!(campaign.current.cost, Decimal::from(250));
    assert_eq!(campaign.current.clicks, 30);
    assert_eq!(brand.current, campaign.current);
    assert_eq!(account.current, brand.current);
    assert_eq!(*account.totals(Period::Previous), PeriodTotals::default());
}

#[test]
fn previous_only_nodes_are_appended_after_current_ones() {
    let meta = Fixture {
        brand: Some((2, "Bolt")),
        account: Some((20, "Bolt Social")),
        platform: Some((200, "Meta Ads")),
    };
    let current = vec![rec(1, (7, "Spring Sale"), 100, 10, &FULL_A)];
    let previous = vec![
        rec(2, (8, "Winter"), 40, 4, &meta),
        rec(3, (7, "Spring Sale"), 80, 8, &FULL_A),
    ];
    let h = build_hierarchy(&current, &previous);

    let keys: Vec<&str> = h.accounts.keys().collect();
    assert_eq!(keys, vec!["Acme BR (Google Ads)", "Bolt Social (Meta Ads)"]);
    let bolt = h.accounts.get("Bolt Social (Meta Ads)").unwrap();
    assert_eq!(bolt.current.cost, Decimal::ZERO);
    assert_eq!(bolt.previous.cost, Decimal::from(40));

    let spring = h.accounts.get("Acme BR (Google Ads)").unwrap();
    let c = spring.comparison();
    assert_eq!(c.current.cost, Decimal::from(100));
    assert_eq!(c.previous.cost, Decimal::from(80));
    assert_eq!(c.variations.cost.to_string(), "+25.00%");
}

#[test]
fn rows_missing_relations_are_skipped_and_counted() {
    let no_brand = Fixture {
        brand: None,
        ..FULL_A
    };
    let no_account = Fixture {
        account: None,
        ..FULL_A
    };
    let no_platform = Fixture {
        platform: None,
        ..FULL_A
    };
    let mut orphan = rec(4, (9, "Orphan"), 10, 1, &FULL_A);
    orphan.campaign = None;

    let current = vec![
        rec(1, (7, "Kept"), 100, 10, &FULL_A),
        rec(2, (8, "No brand"), 10, 1, &no_brand),
        rec(3, (8, "No account"), 10, 1, &no_account),
        orphan,
    ];
    let previous = vec![rec(5, (7, "Kept"), 10, 1, &no_platform)];
    let h = build_hierarchy(&current, &previous);

    assert_eq!(h.skipped, 4);
    assert_eq!(h.accounts.len(), 1);
    let account = h.accounts.get("Acme BR (Google Ads)").unwrap();
    assert_eq!(account.current.cost, Decimal::from(100));
    assert_eq!(account.previous.cost, Decimal::ZERO);
}

#[test]
fn rebuilding_gives_the_same_tree() {
    let current = vec![
        rec(1, (7, "Spring Sale"), 100, 10, &FULL_A),
        rec(2, (9, "Launch"), 50, 5, &FULL_A),
    ];
    let previous = vec![rec(3, (7, "Spring Sale"), 60, 6, &FULL_A)];
    assert_eq!(
        build_hierarchy(&current, &previous),
        build_hierarchy(&current, &previous)
    );
}

#[test]
fn flatten_walks_depth_first() {
    let current = vec![
        rec(1, (7, "Spring Sale"), 100, 10, &FULL_A),
        rec(2, (9, "Launch"), 50, 5, &FULL_A),
    ];
    let rows = build_hierarchy(&current, &[]).flatten();
    let shape: Vec<(Level, usize, &str)> = rows
        .iter()
        .map(|r| (r.level, r.depth, r.label.as_str()))
        .collect();
    assert_eq!(
        shape,
        vec![
            (Level::Account, 0, "Acme BR (Google Ads)"),
            (Level::Brand, 1, "Acme"),
            (Level::Campaign, 2, "Spring Sale"),
            (Level::Campaign, 2, "Launch"),
        ]
    );
    assert_eq!(rows[0].comparison.current.cost, Decimal::from(150));
}
