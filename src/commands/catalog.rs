// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Brands, platforms, ad accounts, campaigns and product models.

use crate::models::PlatformCategory;
use crate::store::DataStore;
use crate::utils::{find_account, find_brand, find_platform, maybe_print_json, pretty_table};
use anyhow::{Result, anyhow};
use std::collections::HashMap;

fn name_arg(sub: &clap::ArgMatches) -> Result<&str> {
    let name = sub.get_one::<String>("name").unwrap().trim();
    if name.is_empty() {
        return Err(anyhow!("Name must not be empty"));
    }
    Ok(name)
}

pub fn brands(store: &dyn DataStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let b = store.insert_brand(name_arg(sub)?)?;
            println!("Added brand '{}' (id {})", b.name, b.id);
        }
        Some(("list", sub)) => {
            let brands = store.brands()?;
            if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &brands)? {
                return Ok(());
            }
            let data = brands
                .into_iter()
                .map(|b| vec![b.id.to_string(), b.name])
                .collect();
            println!("{}", pretty_table(&["Id", "Brand"], data));
        }
        _ => {}
    }
    Ok(())
}

pub fn platforms(store: &dyn DataStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = name_arg(sub)?;
            let category = match sub.get_one::<String>("category") {
                Some(c) => c.parse::<PlatformCategory>().map_err(|e| anyhow!(e))?,
                None => PlatformCategory::infer(name),
            };
            let p = store.insert_platform(name, category)?;
            println!("Added platform '{}' [{}] (id {})", p.name, p.category, p.id);
        }
        Some(("list", sub)) => {
            let platforms = store.platforms()?;
            if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &platforms)? {
                return Ok(());
            }
            let data = platforms
                .into_iter()
                .map(|p| vec![p.id.to_string(), p.name, p.category.to_string()])
                .collect();
            println!("{}", pretty_table(&["Id", "Platform", "Category"], data));
        }
        _ => {}
    }
    Ok(())
}

pub fn accounts(store: &dyn DataStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = name_arg(sub)?;
            let platform = find_platform(store, sub.get_one::<String>("platform").unwrap())?;
            let brand_ids = sub
                .get_many::<String>("brand")
                .into_iter()
                .flatten()
                .map(|b| find_brand(store, b).map(|b| b.id))
                .collect::<Result<Vec<_>>>()?;
            let a = store.insert_ad_account(name, platform.id, &brand_ids)?;
            println!(
                "Added ad account '{}' on {} with {} brand(s) (id {})",
                a.name,
                a.platform.name,
                a.brand_ids.len(),
                a.id
            );
        }
        Some(("list", sub)) => {
            let accounts = store.ad_accounts()?;
            if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &accounts)? {
                return Ok(());
            }
            let brand_names: HashMap<i64, String> =
                store.brands()?.into_iter().map(|b| (b.id, b.name)).collect();
            let data = accounts
                .into_iter()
                .map(|a| {
                    let brands = a
                        .brand_ids
                        .iter()
                        .filter_map(|id| brand_names.get(id).cloned())
                        .collect::<Vec<_>>()
                        .join(", ");
                    vec![
                        a.id.to_string(),
                        a.name,
                        a.platform.name,
                        a.platform.category.to_string(),
                        brands,
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["Id", "Account", "Platform", "Category", "Brands"], data)
            );
        }
        _ => {}
    }
    Ok(())
}

pub fn campaigns(store: &dyn DataStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = name_arg(sub)?;
            let brand_id = match sub.get_one::<String>("brand") {
                Some(b) => Some(find_brand(store, b)?.id),
                None => None,
            };
            let account_id = match sub.get_one::<String>("account") {
                Some(a) => Some(
                    find_account(store, a, sub.get_one::<String>("platform").map(String::as_str))?
                        .id,
                ),
                None => None,
            };
            let c = store.insert_campaign(name, brand_id, account_id)?;
            println!("Added campaign '{}' (id {})", c.name, c.id);
        }
        Some(("list", sub)) => {
            let campaigns = store.campaigns()?;
            if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &campaigns)? {
                return Ok(());
            }
            let brand_names: HashMap<i64, String> =
                store.brands()?.into_iter().map(|b| (b.id, b.name)).collect();
            let account_names: HashMap<i64, String> = store
                .ad_accounts()?
                .into_iter()
                .map(|a| (a.id, format!("{} ({})", a.name, a.platform.name)))
                .collect();
            let lookup = |names: &HashMap<i64, String>, id: Option<i64>| {
                id.and_then(|id| names.get(&id).cloned())
                    .unwrap_or_else(|| "-".to_string())
            };
            let data = campaigns
                .into_iter()
                .map(|c| {
                    vec![
                        c.id.to_string(),
                        lookup(&brand_names, c.brand_id),
                        lookup(&account_names, c.account_id),
                        c.name,
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["Id", "Brand", "Account", "Campaign"], data)
            );
        }
        _ => {}
    }
    Ok(())
}

pub fn models(store: &dyn DataStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = name_arg(sub)?;
            let brand_id = match sub.get_one::<String>("brand") {
                Some(b) => Some(find_brand(store, b)?.id),
                None => None,
            };
            let model = store.insert_product_model(name, brand_id)?;
            println!("Added model '{}' (id {})", model.name, model.id);
        }
        Some(("list", sub)) => {
            let models = store.product_models()?;
            if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &models)? {
                return Ok(());
            }
            let brand_names: HashMap<i64, String> =
                store.brands()?.into_iter().map(|b| (b.id, b.name)).collect();
            let data = models
                .into_iter()
                .map(|model| {
                    vec![
                        model.id.to_string(),
                        model.name,
                        model
                            .brand_id
                            .and_then(|id| brand_names.get(&id).cloned())
                            .unwrap_or_else(|| "-".to_string()),
                    ]
                })
                .collect();
            println!("{}", pretty_table(&["Id", "Model", "Brand"], data));
        }
        _ => {}
    }
    Ok(())
}
