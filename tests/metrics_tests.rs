// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use campaigndesk::metrics::{
    Comparison, PeriodTotals, Polarity, Tag, VariationValue, decimal_variation, lenient_count,
    lenient_decimal, totals, variation,
};
use campaigndesk::models::ReportRow;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

fn row(cost: &str, impressions: i64, clicks: i64, conversions: i64, reach: i64) -> ReportRow {
    ReportRow {
        id: 1,
        campaign_id: 1,
        date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
        cost: Decimal::from_str(cost).unwrap(),
        impressions,
        clicks,
        conversions,
        reach,
    }
}

#[test]
fn totals_of_nothing_is_zero() {
    let t = totals(std::iter::empty());
    assert_eq!(t, PeriodTotals::default());
    assert_eq!(t.ctr(), 0.0);
    assert_eq!(t.cpc(), Decimal::ZERO);
    assert_eq!(t.cpr(), Decimal::ZERO);
}

#[test]
fn totals_sum_every_field() {
    let rows = [row("100.50", 1000, 50, 5, 800), row("49.50", 500, 25, 0, 300)];
    let t = totals(&rows);
    assert_eq!(t.cost, Decimal::from(150));
    assert_eq!(t.impressions, 1500);
    assert_eq!(t.clicks, 75);
    assert_eq!(t.conversions, 5);
    assert_eq!(t.reach, 1100);
    assert!((t.ctr() - 5.0).abs() < 1e-9);
    assert_eq!(t.cpc(), Decimal::from(2));
    assert_eq!(t.cpr(), Decimal::from(30));
}

#[test]
fn lenient_parsing_treats_garbage_as_zero() {
    assert_eq!(lenient_decimal(Some(" 12.5 ")), Decimal::from_str("12.5").unwrap());
    assert_eq!(lenient_decimal(Some("n/a")), Decimal::ZERO);
    assert_eq!(lenient_decimal(None), Decimal::ZERO);
    assert_eq!(lenient_count(Some("42")), 42);
    assert_eq!(lenient_count(Some("7.9")), 7);
    assert_eq!(lenient_count(Some("")), 0);
    assert_eq!(lenient_count(None), 0);
}

#[test]
fn lenient_parsing_reads_the_leading_number() {
    assert_eq!(lenient_count(Some("12 clicks")), 12);
    assert_eq!(lenient_count(Some("-3x")), -3);
    assert_eq!(lenient_count(Some("clicks: 12")), 0);
    assert_eq!(
        lenient_decimal(Some("12.5 BRL")),
        Decimal::from_str("12.5").unwrap()
    );
    assert_eq!(
        lenient_decimal(Some("-.25")),
        Decimal::from_str("-0.25").unwrap()
    );
    assert_eq!(lenient_decimal(Some("7.")), Decimal::from(7));
    assert_eq!(lenient_decimal(Some("-")), Decimal::ZERO);
}

#[test]
fn variation_from_zero_baseline() {
    let flat = variation(0.0, 0.0, Polarity::HigherIsBetter);
    assert_eq!(flat.value, VariationValue::Percent(0.0));
    assert_eq!(flat.tag, Tag::Neutral);
    assert_eq!(flat.to_string(), "+0.00%");

    let up = variation(10.0, 0.0, Polarity::HigherIsBetter);
    assert_eq!(up.value, VariationValue::Infinite);
    assert_eq!(up.tag, Tag::Positive);
    assert_eq!(up.to_string(), "+∞%");

    // growth from nothing stays positive even where lower is better
    let cost_up = variation(10.0, 0.0, Polarity::LowerIsBetter);
    assert_eq!(cost_up.tag, Tag::Positive);
}

#[test]
fn variation_respects_polarity() {
    let down = variation(50.0, 100.0, Polarity::HigherIsBetter);
    assert_eq!(down.value, VariationValue::Percent(-50.0));
    assert_eq!(down.tag, Tag::Negative);
    assert_eq!(down.to_string(), "-50.00%");

    let cheaper = variation(50.0, 100.0, Polarity::LowerIsBetter);
    assert_eq!(cheaper.tag, Tag::Positive);

    let same = variation(100.0, 100.0, Polarity::LowerIsBetter);
    assert_eq!(same.tag, Tag::Positive);

    let up = decimal_variation(Decimal::from(150), Decimal::from(100), Polarity::HigherIsBetter);
    assert_eq!(up.to_string(), "+50.00%");
    assert_eq!(up.tag, Tag::Positive);
}

#[test]
fn comparison_treats_rising_cpc_as_bad() {
    let current = totals(&[row("200", 1000, 50, 2, 0)]);
    let previous = totals(&[row("100", 1000, 50, 2, 0)]);
    let c = Comparison::new(current, previous);
    assert_eq!(c.variations.cost.tag, Tag::Positive);
    assert_eq!(c.variations.cpc.value, VariationValue::Percent(100.0));
    assert_eq!(c.variations.cpc.tag, Tag::Negative);
    assert_eq!(c.variations.clicks.tag, Tag::Positive);
    assert_eq!(c.variations.reach.tag, Tag::Neutral);
}
