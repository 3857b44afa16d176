// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::audience::{
    AudiencePatch, create_audience, delete_audience, edit_audience, load_audience_groups,
    split_list,
};
use crate::commands::print_warnings;
use crate::models::{Gender, NewAudience};
use crate::store::DataStore;
use crate::utils::{find_brand, find_model, maybe_print_json, pretty_table};
use anyhow::{Result, anyhow};

fn parse_gender(s: &str) -> Result<Gender> {
    s.parse::<Gender>().map_err(|e| anyhow!(e))
}

pub fn handle(store: &dyn DataStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("set", sub)) => set(store, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            delete_audience(store, id)?;
            println!("Removed audience {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(store: &dyn DataStore, sub: &clap::ArgMatches) -> Result<()> {
    let model = find_model(store, sub.get_one::<String>("model").unwrap())?;
    let list = |id: &str| {
        sub.get_one::<String>(id)
            .map(|s| split_list(s))
            .unwrap_or_default()
    };
    let a = create_audience(
        store,
        NewAudience {
            model_id: model.id,
            profile_name: sub.get_one::<String>("profile").unwrap().trim().to_string(),
            description: sub.get_one::<String>("description").cloned(),
            age_range: sub.get_one::<String>("age").unwrap().trim().to_string(),
            gender: parse_gender(sub.get_one::<String>("gender").unwrap())?,
            location: sub.get_one::<String>("location").cloned(),
            interests: list("interests"),
            behaviors: list("behaviors"),
        },
    )?;
    println!(
        "Added audience '{}' for {} (id {})",
        a.profile_name, model.name, a.id
    );
    Ok(())
}

fn list(store: &dyn DataStore, sub: &clap::ArgMatches) -> Result<()> {
    let brand_id = match sub.get_one::<String>("brand") {
        Some(name) => Some(find_brand(store, name)?.id),
        None => None,
    };
    let groups = load_audience_groups(store, brand_id);
    print_warnings(&groups.warnings);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &groups.brands)? {
        return Ok(());
    }

    let mut data = Vec::new();
    for g in &groups.brands {
        for e in &g.entries {
            let a = &e.audience;
            data.push(vec![
                a.id.to_string(),
                g.brand.name.clone(),
                e.model.name.clone(),
                a.profile_name.clone(),
                a.age_range.clone(),
                a.gender.to_string(),
                a.location.clone().unwrap_or_default(),
                a.interests.join(", "),
                a.behaviors.join(", "),
            ]);
        }
    }
    println!(
        "{}",
        pretty_table(
            &[
                "Id",
                "Brand",
                "Model",
                "Profile",
                "Age",
                "Gender",
                "Location",
                "Interests",
                "Behaviors"
            ],
            data
        )
    );
    if groups.skipped > 0 {
        println!(
            "{} audience(s) without a model or brand not shown",
            groups.skipped
        );
    }
    Ok(())
}

fn set(store: &dyn DataStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let text = |id: &str| sub.get_one::<String>(id).cloned();
    let patch = AudiencePatch {
        model_id: match sub.get_one::<String>("model") {
            Some(name) => Some(find_model(store, name)?.id),
            None => None,
        },
        profile_name: text("profile"),
        description: text("description"),
        age_range: text("age"),
        gender: sub
            .get_one::<String>("gender")
            .map(|s| parse_gender(s))
            .transpose()?,
        location: text("location"),
        interests: sub.get_one::<String>("interests").map(|s| split_list(s)),
        behaviors: sub.get_one::<String>("behaviors").map(|s| split_list(s)),
    };
    let a = edit_audience(store, id, patch)?;
    println!(
        "Audience {}: {} ({}, {})",
        a.id, a.profile_name, a.age_range, a.gender
    );
    Ok(())
}
