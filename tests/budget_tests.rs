// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use campaigndesk::budget::{
    DetailedEdit, TargetPatch, apply_edit, brand_totals, merge_targets, planned_daily_from_total,
    planned_total_from_daily, reconcile_accounts, resolve_account,
};
use campaigndesk::error::ValidationError;
use campaigndesk::models::{
    AdAccount, Brand, DetailedBudget, MonthlyBudget, Platform, PlatformCategory,
};
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn brand(id: i64, name: &str) -> Brand {
    Brand {
        id,
        name: name.into(),
    }
}

fn account(id: i64, name: &str, platform: &str, brand_ids: &[i64]) -> AdAccount {
    AdAccount {
        id,
        name: name.into(),
        platform: Platform {
            id: if platform.contains("Meta") { 2 } else { 1 },
            name: platform.into(),
            category: PlatformCategory::infer(platform),
        },
        brand_ids: brand_ids.to_vec(),
    }
}

fn monthly(id: i64, brand_id: i64, google: &str, meta: &str) -> MonthlyBudget {
    MonthlyBudget {
        id,
        brand_id,
        month: 3,
        year: 2024,
        target_google: dec(google),
        target_meta: dec(meta),
        target_total: dec(google) + dec(meta),
    }
}

fn detailed(id: i64, account_id: i64, total: &str, active: bool) -> DetailedBudget {
    DetailedBudget {
        id,
        monthly_budget_id: Some(1),
        account_id,
        model_id: 1,
        daily_planned: planned_daily_from_total(dec(total)),
        total_planned: dec(total),
        planned_results: 10,
        active,
        notes: None,
    }
}

#[test]
fn reconcile_uses_platform_target_and_counts_inactive_plans() {
    let brands = vec![brand(1, "Acme"), brand(2, "Bolt")];
    let accounts = vec![
        account(10, "Acme Search", "Google Ads", &[1]),
        account(11, "Acme Social", "Meta Ads", &[1, 2]),
        account(12, "Dormant", "Google Ads", &[]),
    ];
    let monthly = vec![monthly(1, 1, "1000", "600"), monthly(2, 2, "0", "400")];
    let detailed = vec![
        detailed(1, 10, "700", true),
        detailed(2, 10, "200", false),
        detailed(3, 11, "1100", true),
    ];

    let summaries = reconcile_accounts(&accounts, &brands, &monthly, &detailed);
    assert_eq!(summaries.len(), 2, "account with no budgets is left out");

    let search = &summaries[0];
    assert_eq!(search.account.id, 10);
    assert_eq!(search.target, dec("1000"));
    assert_eq!(search.planned, dec("900"));
    assert_eq!(search.balance, dec("100"));

    let social = &summaries[1];
    assert_eq!(social.target, dec("1000"));
    assert_eq!(social.planned, dec("1100"));
    assert_eq!(social.balance, dec("-100"));
    assert_eq!(
        social.brands.iter().map(|b| b.name.as_str()).collect::<Vec<_>>(),
        vec!["Acme", "Bolt"]
    );
    assert_eq!(social.monthly_budgets.len(), 2);
}

#[test]
fn brand_totals_follow_first_appearance_and_skip_unknown_brands() {
    let brands = vec![brand(1, "Acme"), brand(2, "Bolt")];
    let monthly = vec![
        monthly(1, 2, "100", "50"),
        monthly(2, 99, "1", "1"),
        monthly(3, 1, "10", "0"),
        monthly(4, 2, "5", "5"),
    ];
    let totals = brand_totals(&brands, &monthly);
    assert_eq!(totals.len(), 2);
    assert_eq!(totals[0].brand.name, "Bolt");
    assert_eq!(totals[0].google, dec("105"));
    assert_eq!(totals[0].meta, dec("55"));
    assert_eq!(totals[0].total, dec("160"));
    assert_eq!(totals[1].brand.name, "Acme");
    assert_eq!(totals[1].total, dec("10"));
}

#[test]
fn merging_targets_keeps_the_untouched_platform() {
    let existing = monthly(1, 1, "1000", "0");
    let patch = TargetPatch {
        google: None,
        meta: Some(dec("500")),
    };
    let merged = merge_targets(Some(&existing), patch);
    assert_eq!(merged.google, dec("1000"));
    assert_eq!(merged.meta, dec("500"));
    assert_eq!(merged.total(), dec("1500"));

    let fresh = merge_targets(None, patch);
    assert_eq!(fresh.google, Decimal::ZERO);
    assert_eq!(fresh.total(), dec("500"));
}

#[test]
fn target_patch_validation() {
    assert_eq!(
        TargetPatch::default().validate(),
        Err(ValidationError::MissingField("google or meta target"))
    );
    let negative = TargetPatch {
        google: Some(dec("-1")),
        meta: None,
    };
    assert_eq!(
        negative.validate(),
        Err(ValidationError::Negative("google target"))
    );
    let zero = TargetPatch {
        google: None,
        meta: Some(Decimal::ZERO),
    };
    assert!(zero.validate().is_ok());
}

#[test]
fn daily_and_total_stay_in_step() {
    assert_eq!(planned_total_from_daily(dec("100")), dec("3040.00"));
    assert_eq!(planned_total_from_daily(dec("33.33")), dec("1013.23"));
    assert_eq!(planned_daily_from_total(dec("3040")), dec("100"));

    let mut b = detailed(1, 10, "0", true);
    apply_edit(&mut b, DetailedEdit::Daily(dec("50"))).unwrap();
    assert_eq!(b.total_planned, dec("1520"));

    apply_edit(&mut b, DetailedEdit::Total(dec("1000"))).unwrap();
    assert_eq!(b.daily_planned, dec("32.89"));
    assert_eq!(b.total_planned, dec("1000"));

    apply_edit(&mut b, DetailedEdit::Results(40)).unwrap();
    assert_eq!(b.cost_per_result(), Some(dec("25")));

    apply_edit(&mut b, DetailedEdit::Notes(Some("  ".into()))).unwrap();
    assert_eq!(b.notes, None);
    apply_edit(&mut b, DetailedEdit::Active(false)).unwrap();
    assert!(!b.active);

    let before = b.clone();
    assert!(apply_edit(&mut b, DetailedEdit::Daily(dec("-1"))).is_err());
    assert_eq!(b, before);
}

#[test]
fn resolve_account_needs_matching_platform_and_brand() {
    let accounts = vec![
        account(10, "Acme Search", "Google Ads", &[1]),
        account(11, "Social", "Meta Ads", &[2]),
    ];
    assert_eq!(resolve_account(&accounts, 1, 1).unwrap().id, 10);
    assert_eq!(
        resolve_account(&accounts, 1, 2).unwrap_err(),
        ValidationError::NoAccountForCombination {
            brand_id: 1,
            platform_id: 2
        }
    );
}
