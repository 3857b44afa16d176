// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use campaigndesk::config::{Backend, get_currency, set_currency};
use campaigndesk::models::PlatformCategory;
use campaigndesk::store::{DataStore, SqliteStore};
use campaigndesk::{cli, commands, db};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::PathBuf;

fn run(store: &SqliteStore, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["campaigndesk"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    commands::dispatch(store, "BRL", &matches)
}

fn store() -> SqliteStore {
    SqliteStore::new(db::open_in_memory().unwrap())
}

fn catalog(store: &SqliteStore) {
    run(store, &["brand", "add", "Acme"]).unwrap();
    run(store, &["platform", "add", "Meta Ads"]).unwrap();
    run(store, &["platform", "add", "Search", "--category", "google"]).unwrap();
    run(
        store,
        &["account", "add", "Acme Social", "--platform", "meta ads", "--brand", "acme"],
    )
    .unwrap();
    run(store, &["model", "add", "Roadster", "--brand", "Acme"]).unwrap();
}

#[test]
fn catalog_commands_store_rows() {
    let s = store();
    catalog(&s);
    let platforms = s.platforms().unwrap();
    let meta = platforms.iter().find(|p| p.name == "Meta Ads").unwrap();
    assert_eq!(meta.category, PlatformCategory::Meta);
    let accounts = s.ad_accounts().unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].brand_ids, vec![s.brands().unwrap()[0].id]);

    run(&s, &["campaign", "add", "Reels", "--brand", "Acme", "--account", "Acme Social"]).unwrap();
    let campaigns = s.campaigns().unwrap();
    assert_eq!(campaigns[0].account_id, Some(accounts[0].id));

    run(
        &s,
        &["perf", "add", "--campaign", "Reels", "--date", "2024-03-11", "--cost", "12.5", "--clicks", "3"],
    )
    .unwrap();
    assert!(run(&s, &["perf", "add", "--campaign", "Reels", "--date", "2024-03-11", "--clicks=-3"]).is_err());
    assert!(run(&s, &["perf", "add", "--campaign", "Nope", "--date", "2024-03-11"]).is_err());
    run(&s, &["perf", "list", "--from", "2024-03-01", "--to", "2024-03-31", "--json"]).unwrap();
}

#[test]
fn budget_and_plan_flow() {
    let s = store();
    catalog(&s);

    let err = run(
        &s,
        &["plan", "add", "--brand", "Acme", "--platform", "Meta Ads", "--model", "Roadster", "--daily", "10", "--month", "2024-03"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("no monthly budget defined"));
    assert!(s.detailed_budgets().unwrap().is_empty());

    run(&s, &["budget", "set", "--brand", "Acme", "--month", "2024-03", "--meta", "1000"]).unwrap();
    run(&s, &["budget", "set", "--brand", "Acme", "--month", "2024-03", "--google", "250"]).unwrap();
    let mb = &s.monthly_budgets(None).unwrap()[0];
    assert_eq!(mb.target_total, Decimal::from(1250));

    run(
        &s,
        &["plan", "add", "--brand", "Acme", "--platform", "Meta Ads", "--model", "Roadster", "--daily", "10", "--results", "8", "--month", "2024-03"],
    )
    .unwrap();
    let plan = &s.detailed_budgets().unwrap()[0];
    assert_eq!(plan.total_planned, Decimal::from(304));
    let id = plan.id.to_string();

    run(&s, &["plan", "set", &id, "--total", "608"]).unwrap();
    run(&s, &["plan", "deactivate", &id]).unwrap();
    let plan = s.detailed_budget(plan.id).unwrap().unwrap();
    assert_eq!(plan.daily_planned, Decimal::from(20));
    assert!(!plan.active);
    assert!(run(&s, &["plan", "set", &id]).is_err());

    run(&s, &["budget", "overview", "--month", "2024-03", "--json"]).unwrap();
    run(&s, &["plan", "list"]).unwrap();
    run(&s, &["plan", "rm", &id]).unwrap();
    assert!(run(&s, &["plan", "rm", &id]).is_err());
}

#[test]
fn compare_requires_a_campaign() {
    let s = store();
    let err = run(&s, &["report", "compare", "--preset", "last7days"]).unwrap_err();
    assert!(err.to_string().contains("at least one campaign"));
}

#[test]
fn range_arguments() {
    let today = NaiveDate::from_ymd_opt(2024, 3, 16).unwrap();
    let parse = |args: &[&str]| {
        let mut argv = vec!["campaigndesk", "report", "performance"];
        argv.extend_from_slice(args);
        let m = cli::build_cli().get_matches_from(argv);
        let (_, report) = m.subcommand().unwrap();
        let (_, perf) = report.subcommand().unwrap();
        commands::range_from_args(perf, today)
    };

    let r = parse(&[]).unwrap();
    assert_eq!(r.start, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    let r = parse(&["--preset", "thisMonth"]).unwrap();
    assert_eq!(r.start, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    let r = parse(&["--from", "2024-02-01"]).unwrap();
    assert_eq!(r.end, today);
    assert!(parse(&["--to", "2024-02-01"]).is_err());
    assert!(parse(&["--from", "2024-03-20", "--to", "2024-03-01"]).is_err());
    assert!(parse(&["--preset", "fortnight"]).is_err());
}

#[test]
fn preset_and_dates_conflict() {
    let res = cli::build_cli().try_get_matches_from([
        "campaigndesk",
        "report",
        "performance",
        "--preset",
        "last7days",
        "--from",
        "2024-03-01",
    ]);
    assert!(res.is_err());
}

#[test]
fn backend_comes_from_environment() {
    let vars: HashMap<&str, &str> = HashMap::from([("CAMPAIGNDESK_DB", "/tmp/desk.sqlite")]);
    let backend = Backend::resolve(|k| vars.get(k).map(|v| v.to_string())).unwrap();
    assert_eq!(
        backend,
        Backend::Sqlite {
            path: PathBuf::from("/tmp/desk.sqlite")
        }
    );

    let vars: HashMap<&str, &str> = HashMap::from([
        ("CAMPAIGNDESK_DB", "/tmp/desk.sqlite"),
        ("CAMPAIGNDESK_REST_URL", "https://example.supabase.co"),
        ("CAMPAIGNDESK_REST_KEY", "anon"),
    ]);
    let backend = Backend::resolve(|k| vars.get(k).map(|v| v.to_string())).unwrap();
    assert!(matches!(backend, Backend::Rest { ref url, .. } if url == "https://example.supabase.co"));

    let vars: HashMap<&str, &str> =
        HashMap::from([("CAMPAIGNDESK_REST_URL", "https://example.supabase.co")]);
    assert!(Backend::resolve(|k| vars.get(k).map(|v| v.to_string())).is_err());
}

#[test]
fn currency_setting_round_trips() {
    let conn = db::open_in_memory().unwrap();
    set_currency(&conn, " usd ").unwrap();
    assert_eq!(get_currency(Some(&conn)).unwrap(), "USD");
    assert!(set_currency(&conn, "dollars").is_err());
    assert_eq!(get_currency(Some(&conn)).unwrap(), "USD");
}

#[test]
fn doctor_flags_unlinked_rows() {
    let s = store();
    catalog(&s);
    run(&s, &["platform", "add", "Facebook", "--category", "google"]).unwrap();
    run(&s, &["account", "add", "Orphan Ads", "--platform", "Search"]).unwrap();
    run(&s, &["campaign", "add", "Loose"]).unwrap();

    let issues = commands::doctor::check(&s).unwrap();
    let kinds: Vec<&str> = issues.iter().map(|(k, _)| k.as_str()).collect();
    assert!(kinds.contains(&"platform_category_differs_from_name"));
    assert!(kinds.contains(&"account_without_brand"));
    assert!(kinds.contains(&"campaign_unlinked"));
    assert!(!kinds.contains(&"monthly_total_mismatch"));
    run(&s, &["doctor"]).unwrap();
}
