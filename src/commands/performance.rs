// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{account_from_args, range_from_args};
use crate::metrics::totals;
use crate::models::NewReportRow;
use crate::store::{DataStore, PerformanceFilter};
use crate::utils::{find_campaign, fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;

pub fn handle(store: &dyn DataStore, ccy: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, ccy, sub)?,
        _ => {}
    }
    Ok(())
}

fn count_arg(sub: &clap::ArgMatches, name: &'static str) -> Result<i64> {
    let raw = sub.get_one::<String>(name).unwrap();
    let n: i64 = raw
        .trim()
        .parse()
        .with_context(|| format!("Invalid --{} '{}'", name, raw))?;
    if n < 0 {
        bail!("--{} must not be negative", name);
    }
    Ok(n)
}

fn add(store: &dyn DataStore, sub: &clap::ArgMatches) -> Result<()> {
    let campaign = find_campaign(store, sub.get_one::<String>("campaign").unwrap())?;
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let cost = parse_decimal(sub.get_one::<String>("cost").unwrap())?;
    if cost < Decimal::ZERO {
        bail!("--cost must not be negative");
    }
    let row = NewReportRow {
        campaign_id: campaign.id,
        date,
        cost,
        impressions: count_arg(sub, "impressions")?,
        clicks: count_arg(sub, "clicks")?,
        conversions: count_arg(sub, "conversions")?,
        reach: count_arg(sub, "reach")?,
    };
    let saved = store.insert_report_row(&row)?;
    println!(
        "Recorded {} for '{}' (row {})",
        saved.date, campaign.name, saved.id
    );
    Ok(())
}

fn list(store: &dyn DataStore, ccy: &str, sub: &clap::ArgMatches) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let range = range_from_args(sub, today)?;
    let account = account_from_args(store, sub)?;
    let filter = PerformanceFilter {
        account_id: account.map(|a| a.id),
        ..PerformanceFilter::for_range(range)
    };
    let records = store.performance(&filter)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &records)? {
        return Ok(());
    }

    let sum = totals(records.iter().map(|r| &r.row));
    let mut data: Vec<Vec<String>> = records
        .iter()
        .map(|rec| {
            let (campaign, account) = match &rec.campaign {
                Some(c) => (
                    c.name.clone(),
                    c.account
                        .as_ref()
                        .map(|a| a.name.clone())
                        .unwrap_or_else(|| "-".to_string()),
                ),
                None => (format!("#{}", rec.row.campaign_id), "-".to_string()),
            };
            vec![
                rec.row.date.to_string(),
                account,
                campaign,
                fmt_money(&rec.row.cost, ccy),
                rec.row.impressions.to_string(),
                rec.row.clicks.to_string(),
                rec.row.conversions.to_string(),
                rec.row.reach.to_string(),
            ]
        })
        .collect();
    data.push(vec![
        "Total".into(),
        String::new(),
        String::new(),
        fmt_money(&sum.cost, ccy),
        sum.impressions.to_string(),
        sum.clicks.to_string(),
        sum.conversions.to_string(),
        sum.reach.to_string(),
    ]);
    println!("{}", range);
    println!(
        "{}",
        pretty_table(
            &[
                "Date",
                "Account",
                "Campaign",
                "Cost",
                "Impressions",
                "Clicks",
                "Conversions",
                "Reach"
            ],
            data
        )
    );
    Ok(())
}
