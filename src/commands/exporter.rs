// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{account_from_args, print_warnings, range_from_args};
use crate::hierarchy::{FlatRow, Level};
use crate::reporting::load_performance_report;
use crate::store::DataStore;
use anyhow::{Result, bail};
use serde_json::json;
use std::path::Path;

pub fn handle(store: &dyn DataStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("report", sub)) => export_report(store, sub),
        _ => Ok(()),
    }
}

fn level_name(level: Level) -> &'static str {
    match level {
        Level::Account => "account",
        Level::Brand => "brand",
        Level::Campaign => "campaign",
    }
}

const CSV_HEADER: [&str; 16] = [
    "level",
    "depth",
    "name",
    "cost",
    "cost_prev",
    "cost_var",
    "impressions",
    "impressions_prev",
    "clicks",
    "clicks_prev",
    "conversions",
    "conversions_prev",
    "reach",
    "ctr",
    "cpc",
    "cpc_var",
];

pub fn write_csv(path: &Path, rows: &[FlatRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(CSV_HEADER)?;
    for row in rows {
        let c = &row.comparison;
        wtr.write_record([
            level_name(row.level).to_string(),
            row.depth.to_string(),
            row.label.clone(),
            c.current.cost.round_dp(2).to_string(),
            c.previous.cost.round_dp(2).to_string(),
            c.variations.cost.to_string(),
            c.current.impressions.to_string(),
            c.previous.impressions.to_string(),
            c.current.clicks.to_string(),
            c.previous.clicks.to_string(),
            c.current.conversions.to_string(),
            c.previous.conversions.to_string(),
            c.current.reach.to_string(),
            format!("{:.2}", c.current.ctr()),
            c.current.cpc().round_dp(2).to_string(),
            c.variations.cpc.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json(path: &Path, rows: &[FlatRow]) -> Result<()> {
    let items: Vec<_> = rows
        .iter()
        .map(|row| {
            json!({
                "level": level_name(row.level),
                "depth": row.depth,
                "name": row.label,
                "current": row.comparison.current,
                "previous": row.comparison.previous,
                "variations": row.comparison.variations,
            })
        })
        .collect();
    std::fs::write(path, serde_json::to_string_pretty(&items)?)?;
    Ok(())
}

fn export_report(store: &dyn DataStore, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = Path::new(sub.get_one::<String>("out").unwrap());
    let today = chrono::Local::now().date_naive();
    let range = range_from_args(sub, today)?;
    let account = account_from_args(store, sub)?;

    let report = load_performance_report(store, range, account.map(|a| a.id))?;
    print_warnings(&report.warnings);
    let rows = report.hierarchy.flatten();

    match fmt.as_str() {
        "csv" => write_csv(out, &rows)?,
        "json" => write_json(out, &rows)?,
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    println!(
        "Exported {} row(s) for {} to {}",
        rows.len(),
        report.range,
        out.display()
    );
    Ok(())
}
