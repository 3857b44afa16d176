// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::PlatformCategory;
use crate::store::DataStore;
use crate::utils::pretty_table;
use anyhow::Result;
use std::collections::HashSet;

/// Consistency findings as (issue, detail) pairs.
pub fn check(store: &dyn DataStore) -> Result<Vec<(String, String)>> {
    let mut issues = Vec::new();

    // 1) Platforms whose stored category disagrees with their name
    for p in store.platforms()? {
        let guessed = PlatformCategory::infer(&p.name);
        if guessed != p.category {
            issues.push((
                "platform_category_differs_from_name".into(),
                format!("{} is {} but looks like {}", p.name, p.category, guessed),
            ));
        }
    }

    // 2) Accounts no budget can reach
    let accounts = store.ad_accounts()?;
    for a in accounts.iter().filter(|a| a.brand_ids.is_empty()) {
        issues.push((
            "account_without_brand".into(),
            format!("{} ({})", a.name, a.platform.name),
        ));
    }

    // 3) Campaigns that never show up in the performance hierarchy
    for c in store.campaigns()? {
        if c.account_id.is_none() || c.brand_id.is_none() {
            issues.push(("campaign_unlinked".into(), format!("#{} {}", c.id, c.name)));
        }
    }

    // 4) Monthly totals out of step with their targets
    let monthly = store.monthly_budgets(None)?;
    for mb in &monthly {
        if mb.target_total != mb.target_google + mb.target_meta {
            issues.push((
                "monthly_total_mismatch".into(),
                format!(
                    "#{} {}: {} != {} + {}",
                    mb.id,
                    mb.period(),
                    mb.target_total,
                    mb.target_google,
                    mb.target_meta
                ),
            ));
        }
    }

    // 5) Detailed budgets detached from a monthly budget
    let monthly_ids: HashSet<i64> = monthly.iter().map(|mb| mb.id).collect();
    for db in store.detailed_budgets()? {
        let attached = db
            .monthly_budget_id
            .is_some_and(|id| monthly_ids.contains(&id));
        if !attached {
            issues.push(("detailed_without_monthly".into(), format!("#{}", db.id)));
        }
    }

    Ok(issues)
}

pub fn handle(store: &dyn DataStore) -> Result<()> {
    let rows: Vec<Vec<String>> = check(store)?
        .into_iter()
        .map(|(issue, detail)| vec![issue, detail])
        .collect();
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
