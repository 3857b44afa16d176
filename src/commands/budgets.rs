// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::budget::TargetPatch;
use crate::commands::{month_from_args, print_warnings};
use crate::planning::{delete_monthly_budget, load_budget_overview, upsert_monthly_budget};
use crate::store::DataStore;
use crate::utils::{find_brand, fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use std::collections::HashMap;

pub fn handle(store: &dyn DataStore, ccy: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(store, ccy, sub)?,
        Some(("list", sub)) => list(store, ccy, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            delete_monthly_budget(store, id)?;
            println!("Removed monthly budget {}", id);
        }
        Some(("overview", sub)) => overview(store, ccy, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(store: &dyn DataStore, ccy: &str, sub: &clap::ArgMatches) -> Result<()> {
    let brand = find_brand(store, sub.get_one::<String>("brand").unwrap())?;
    let period = month_from_args(sub)?;
    let patch = TargetPatch {
        google: sub
            .get_one::<String>("google")
            .map(|s| parse_decimal(s))
            .transpose()?,
        meta: sub
            .get_one::<String>("meta")
            .map(|s| parse_decimal(s))
            .transpose()?,
    };
    let mb = upsert_monthly_budget(store, brand.id, period, patch)?;
    println!(
        "Budget for {} / {}: google {} + meta {} = {}",
        brand.name,
        period,
        fmt_money(&mb.target_google, ccy),
        fmt_money(&mb.target_meta, ccy),
        fmt_money(&mb.target_total, ccy)
    );
    Ok(())
}

fn list(store: &dyn DataStore, ccy: &str, sub: &clap::ArgMatches) -> Result<()> {
    let period = match sub.get_one::<String>("month") {
        Some(_) => Some(month_from_args(sub)?),
        None => None,
    };
    let budgets = store.monthly_budgets(period)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &budgets)? {
        return Ok(());
    }
    let brand_names: HashMap<i64, String> =
        store.brands()?.into_iter().map(|b| (b.id, b.name)).collect();
    let data = budgets
        .into_iter()
        .map(|mb| {
            vec![
                mb.id.to_string(),
                mb.period().to_string(),
                brand_names
                    .get(&mb.brand_id)
                    .cloned()
                    .unwrap_or_else(|| format!("#{}", mb.brand_id)),
                fmt_money(&mb.target_google, ccy),
                fmt_money(&mb.target_meta, ccy),
                fmt_money(&mb.target_total, ccy),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Id", "Month", "Brand", "Google", "Meta", "Total"], data)
    );
    Ok(())
}

fn overview(store: &dyn DataStore, ccy: &str, sub: &clap::ArgMatches) -> Result<()> {
    let period = month_from_args(sub)?;
    let ov = load_budget_overview(store, period);
    print_warnings(&ov.warnings);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &ov)? {
        return Ok(());
    }

    println!("Budgets for {}", ov.period);
    let brands = ov
        .brand_totals
        .iter()
        .map(|b| {
            vec![
                b.brand.name.clone(),
                fmt_money(&b.google, ccy),
                fmt_money(&b.meta, ccy),
                fmt_money(&b.total, ccy),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Brand", "Google", "Meta", "Total"], brands)
    );

    let accounts = ov
        .accounts
        .iter()
        .map(|a| {
            vec![
                format!("{} ({})", a.account.name, a.account.platform.name),
                a.brands
                    .iter()
                    .map(|b| b.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                fmt_money(&a.target, ccy),
                fmt_money(&a.planned, ccy),
                fmt_money(&a.balance, ccy),
                a.detailed_budgets.len().to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Account", "Brands", "Target", "Planned", "Balance", "Plans"],
            accounts
        )
    );
    println!(
        "Target {} / planned {}",
        fmt_money(&ov.total_target(), ccy),
        fmt_money(&ov.total_planned(), ccy)
    );
    Ok(())
}
