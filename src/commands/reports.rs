// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{account_from_args, print_warnings, range_from_args};
use crate::metrics::Comparison;
use crate::reporting::{load_comparison_report, load_performance_report};
use crate::store::DataStore;
use crate::utils::{find_campaign, fmt_money, fmt_variation, maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(store: &dyn DataStore, ccy: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("performance", sub)) => performance(store, ccy, sub)?,
        Some(("compare", sub)) => compare(store, ccy, sub)?,
        _ => {}
    }
    Ok(())
}

fn kpi_rows(c: &Comparison, ccy: &str) -> Vec<Vec<String>> {
    let (cur, prev, var) = (&c.current, &c.previous, &c.variations);
    vec![
        vec![
            "Cost".into(),
            fmt_money(&cur.cost, ccy),
            fmt_money(&prev.cost, ccy),
            fmt_variation(&var.cost),
        ],
        vec![
            "Impressions".into(),
            cur.impressions.to_string(),
            prev.impressions.to_string(),
            fmt_variation(&var.impressions),
        ],
        vec![
            "Clicks".into(),
            cur.clicks.to_string(),
            prev.clicks.to_string(),
            fmt_variation(&var.clicks),
        ],
        vec![
            "Conversions".into(),
            cur.conversions.to_string(),
            prev.conversions.to_string(),
            fmt_variation(&var.conversions),
        ],
        vec![
            "Reach".into(),
            cur.reach.to_string(),
            prev.reach.to_string(),
            fmt_variation(&var.reach),
        ],
        vec![
            "CTR".into(),
            format!("{:.2}%", cur.ctr()),
            format!("{:.2}%", prev.ctr()),
            fmt_variation(&var.ctr),
        ],
        vec![
            "CPC".into(),
            fmt_money(&cur.cpc(), ccy),
            fmt_money(&prev.cpc(), ccy),
            fmt_variation(&var.cpc),
        ],
    ]
}

fn performance(store: &dyn DataStore, ccy: &str, sub: &clap::ArgMatches) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let range = range_from_args(sub, today)?;
    let account = account_from_args(store, sub)?;
    let report = load_performance_report(store, range, account.map(|a| a.id))?;
    print_warnings(&report.warnings);

    if sub.get_flag("jsonl") {
        maybe_print_json(false, true, &report.hierarchy.flatten())?;
        return Ok(());
    }
    if maybe_print_json(sub.get_flag("json"), false, &report)? {
        return Ok(());
    }

    println!("{} vs {}", report.range, report.previous_range);
    println!(
        "{}",
        pretty_table(
            &["Metric", "Current", "Previous", "Variation"],
            kpi_rows(&report.kpis, ccy)
        )
    );
    if report.hierarchy.is_empty() {
        println!("No performance data for this period.");
        return Ok(());
    }

    let data = report
        .hierarchy
        .flatten()
        .into_iter()
        .map(|row| {
            let c = &row.comparison;
            vec![
                format!("{}{}", "  ".repeat(row.depth), row.label),
                fmt_money(&c.current.cost, ccy),
                c.variations.cost.to_string(),
                c.current.impressions.to_string(),
                c.current.clicks.to_string(),
                format!("{:.2}%", c.current.ctr()),
                fmt_money(&c.current.cpc(), ccy),
                c.variations.cpc.to_string(),
                c.current.conversions.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "Account / Brand / Campaign",
                "Cost",
                "Δ Cost",
                "Impr.",
                "Clicks",
                "CTR",
                "CPC",
                "Δ CPC",
                "Conv."
            ],
            data
        )
    );
    if report.hierarchy.skipped > 0 {
        eprintln!(
            "note: {} row(s) without campaign, account, platform or brand were left out",
            report.hierarchy.skipped
        );
    }
    Ok(())
}

fn compare(store: &dyn DataStore, ccy: &str, sub: &clap::ArgMatches) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let range = range_from_args(sub, today)?;
    let ids = sub
        .get_many::<String>("campaign")
        .into_iter()
        .flatten()
        .map(|c| find_campaign(store, c).map(|c| c.id))
        .collect::<Result<Vec<_>>>()?;
    let report = load_comparison_report(store, range, &ids)?;
    print_warnings(&report.warnings);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report.rows)? {
        return Ok(());
    }

    let mut data: Vec<Vec<String>> = report
        .rows
        .iter()
        .map(|r| {
            vec![
                r.name.clone(),
                fmt_money(&r.totals.cost, ccy),
                r.totals.impressions.to_string(),
                r.totals.clicks.to_string(),
                format!("{:.2}%", r.ctr),
                fmt_money(&r.cpc, ccy),
                r.totals.conversions.to_string(),
                fmt_money(&r.cpr, ccy),
            ]
        })
        .collect();
    let t = &report.totals;
    data.push(vec![
        "Total".into(),
        fmt_money(&t.cost, ccy),
        t.impressions.to_string(),
        t.clicks.to_string(),
        format!("{:.2}%", t.ctr()),
        fmt_money(&t.cpc(), ccy),
        t.conversions.to_string(),
        fmt_money(&t.cpr(), ccy),
    ]);
    println!("{}", report.range);
    println!(
        "{}",
        pretty_table(
            &["Campaign", "Cost", "Impr.", "Clicks", "CTR", "CPC", "Conv.", "CPR"],
            data
        )
    );
    Ok(())
}
