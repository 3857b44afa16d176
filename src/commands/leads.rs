// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{account_from_args, optional_range_from_args};
use crate::leads::{
    LeadCriteria, brand_account_ids, capture_lead, delete_lead, filter_leads, set_lead_stage,
    stage_counts,
};
use crate::models::{LeadStage, NewLead};
use crate::store::{DataStore, LeadFilter};
use crate::utils::{find_brand, maybe_print_json, parse_date, pretty_table};
use anyhow::{Result, anyhow};
use std::collections::HashMap;

fn parse_stage(s: &str) -> Result<LeadStage> {
    s.parse::<LeadStage>().map_err(|e| anyhow!(e))
}

pub fn handle(store: &dyn DataStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("stage", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let stage = parse_stage(sub.get_one::<String>("stage").unwrap())?;
            let lead = set_lead_stage(store, id, stage)?;
            println!("Lead {} ({}) is now {}", lead.id, lead.name, stage);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            delete_lead(store, id)?;
            println!("Removed lead {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(store: &dyn DataStore, sub: &clap::ArgMatches) -> Result<()> {
    let account = account_from_args(store, sub)?;
    let stage = sub
        .get_one::<String>("stage")
        .map(|s| parse_stage(s))
        .transpose()?;
    let created_on = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => chrono::Local::now().date_naive(),
    };
    let text = |id: &str| sub.get_one::<String>(id).cloned();
    let lead = capture_lead(
        store,
        NewLead {
            account_id: account.as_ref().map(|a| a.id),
            name: sub.get_one::<String>("name").unwrap().clone(),
            email: text("email"),
            phone: text("phone"),
            source: text("source"),
            form_name: text("form"),
            stage,
            created_on,
        },
    )?;
    println!(
        "Added lead '{}' on {} (id {})",
        lead.name, lead.created_on, lead.id
    );
    Ok(())
}

fn list(store: &dyn DataStore, sub: &clap::ArgMatches) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let account = account_from_args(store, sub)?;
    let filter = LeadFilter {
        range: optional_range_from_args(sub, today)?,
        account_id: account.as_ref().map(|a| a.id),
    };
    let accounts = store.ad_accounts()?;
    let criteria = LeadCriteria {
        stage: sub
            .get_one::<String>("stage")
            .map(|s| parse_stage(s))
            .transpose()?,
        form: sub.get_one::<String>("form").cloned(),
        account_ids: match sub.get_one::<String>("brand") {
            Some(name) => Some(brand_account_ids(&accounts, find_brand(store, name)?.id)),
            None => None,
        },
    };
    let leads = filter_leads(store.leads(&filter)?, &criteria);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &leads)? {
        return Ok(());
    }

    let account_names: HashMap<i64, String> = accounts
        .into_iter()
        .map(|a| (a.id, format!("{} ({})", a.name, a.platform.name)))
        .collect();
    let counts = stage_counts(&leads);
    let data = leads
        .into_iter()
        .map(|l| {
            let stage = match (l.stage(), &l.raw_stage) {
                (Some(s), _) => s.to_string(),
                (None, Some(raw)) => format!("? {}", raw),
                (None, None) => "-".to_string(),
            };
            vec![
                l.id.to_string(),
                l.created_on.to_string(),
                l.name,
                l.email.unwrap_or_default(),
                l.phone.unwrap_or_default(),
                l.account_id
                    .map(|id| {
                        account_names
                            .get(&id)
                            .cloned()
                            .unwrap_or_else(|| format!("#{}", id))
                    })
                    .unwrap_or_default(),
                l.form_name.unwrap_or_default(),
                stage,
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Id", "Date", "Name", "Email", "Phone", "Account", "Form", "Stage"],
            data
        )
    );
    let summary = LeadStage::ALL
        .iter()
        .map(|s| format!("{} {}", s, counts.get(*s)))
        .collect::<Vec<_>>()
        .join(", ");
    println!(
        "{} leads: {}; conversion {:.2}%",
        counts.total(),
        summary,
        counts.conversion_rate()
    );
    Ok(())
}
