// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::budget::DetailedEdit;
use crate::commands::{account_from_args, month_from_args};
use crate::planning::{
    DetailedBudgetDraft, create_detailed_budget, delete_detailed_budget, edit_detailed_budget,
};
use crate::store::DataStore;
use crate::utils::{
    find_brand, find_model, find_platform, fmt_money, maybe_print_json, parse_decimal,
    pretty_table,
};
use anyhow::Result;
use std::collections::HashMap;

pub fn handle(store: &dyn DataStore, ccy: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, ccy, sub)?,
        Some(("list", sub)) => list(store, ccy, sub)?,
        Some(("set", sub)) => set(store, ccy, sub)?,
        Some(("activate", sub)) => toggle(store, sub, true)?,
        Some(("deactivate", sub)) => toggle(store, sub, false)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            delete_detailed_budget(store, id)?;
            println!("Removed detailed budget {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(store: &dyn DataStore, ccy: &str, sub: &clap::ArgMatches) -> Result<()> {
    let brand = find_brand(store, sub.get_one::<String>("brand").unwrap())?;
    let platform = find_platform(store, sub.get_one::<String>("platform").unwrap())?;
    let model = find_model(store, sub.get_one::<String>("model").unwrap())?;
    let draft = DetailedBudgetDraft {
        brand_id: brand.id,
        platform_id: platform.id,
        model_id: model.id,
        daily_planned: parse_decimal(sub.get_one::<String>("daily").unwrap())?,
        planned_results: *sub.get_one::<i64>("results").unwrap(),
        notes: sub.get_one::<String>("notes").cloned(),
    };
    let period = month_from_args(sub)?;
    let db = create_detailed_budget(store, draft, period)?;
    println!(
        "Planned {} for {} on {} ({} daily, {} for {}) id {}",
        model.name,
        brand.name,
        platform.name,
        fmt_money(&db.daily_planned, ccy),
        fmt_money(&db.total_planned, ccy),
        period,
        db.id
    );
    Ok(())
}

fn list(store: &dyn DataStore, ccy: &str, sub: &clap::ArgMatches) -> Result<()> {
    let account = account_from_args(store, sub)?;
    let budgets: Vec<_> = store
        .detailed_budgets()?
        .into_iter()
        .filter(|db| account.as_ref().is_none_or(|a| a.id == db.account_id))
        .collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &budgets)? {
        return Ok(());
    }

    let accounts: HashMap<i64, String> = store
        .ad_accounts()?
        .into_iter()
        .map(|a| (a.id, format!("{} ({})", a.name, a.platform.name)))
        .collect();
    let models: HashMap<i64, String> = store
        .product_models()?
        .into_iter()
        .map(|m| (m.id, m.name))
        .collect();
    let data = budgets
        .iter()
        .map(|db| {
            vec![
                db.id.to_string(),
                accounts
                    .get(&db.account_id)
                    .cloned()
                    .unwrap_or_else(|| format!("#{}", db.account_id)),
                models
                    .get(&db.model_id)
                    .cloned()
                    .unwrap_or_else(|| format!("#{}", db.model_id)),
                fmt_money(&db.daily_planned, ccy),
                fmt_money(&db.total_planned, ccy),
                db.planned_results.to_string(),
                db.cost_per_result()
                    .map(|c| fmt_money(&c, ccy))
                    .unwrap_or_else(|| "-".to_string()),
                if db.active { "yes" } else { "no" }.to_string(),
                db.notes.clone().unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "Id", "Account", "Model", "Daily", "Total", "Results", "Cost/Result", "Active",
                "Notes"
            ],
            data
        )
    );
    Ok(())
}

fn set(store: &dyn DataStore, ccy: &str, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let mut edits = Vec::new();
    if let Some(s) = sub.get_one::<String>("daily") {
        edits.push(DetailedEdit::Daily(parse_decimal(s)?));
    }
    if let Some(s) = sub.get_one::<String>("total") {
        edits.push(DetailedEdit::Total(parse_decimal(s)?));
    }
    if let Some(r) = sub.get_one::<i64>("results") {
        edits.push(DetailedEdit::Results(*r));
    }
    if let Some(n) = sub.get_one::<String>("notes") {
        edits.push(DetailedEdit::Notes(Some(n.clone())));
    }
    let db = edit_detailed_budget(store, id, edits)?;
    println!(
        "Detailed budget {}: {} daily, {} total, {} results",
        db.id,
        fmt_money(&db.daily_planned, ccy),
        fmt_money(&db.total_planned, ccy),
        db.planned_results
    );
    Ok(())
}

fn toggle(store: &dyn DataStore, sub: &clap::ArgMatches, active: bool) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    edit_detailed_budget(store, id, vec![DetailedEdit::Active(active)])?;
    println!(
        "Detailed budget {} {}",
        id,
        if active { "activated" } else { "deactivated" }
    );
    Ok(())
}
