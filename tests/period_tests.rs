// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use campaigndesk::error::ValidationError;
use campaigndesk::period::{DateRange, Preset, YearMonth};
use chrono::NaiveDate;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn previous_period_has_equal_length_and_ends_day_before() {
    let r = DateRange::new(d(2024, 3, 10), d(2024, 3, 16)).unwrap();
    let p = r.previous();
    assert_eq!(p.start, d(2024, 3, 3));
    assert_eq!(p.end, d(2024, 3, 9));
    assert_eq!(p.days(), r.days());

    let single = DateRange::new(d(2024, 3, 1), d(2024, 3, 1)).unwrap();
    assert_eq!(single.previous(), DateRange::new(d(2024, 2, 29), d(2024, 2, 29)).unwrap());
}

#[test]
fn inverted_range_is_rejected() {
    let err = DateRange::new(d(2024, 3, 16), d(2024, 3, 10)).unwrap_err();
    assert_eq!(
        err,
        ValidationError::InvertedRange {
            start: d(2024, 3, 16),
            end: d(2024, 3, 10)
        }
    );
}

#[test]
fn presets_resolve_relative_to_today() {
    let today = d(2024, 3, 16);
    assert_eq!(
        Preset::Last7Days.resolve(today),
        DateRange::new(d(2024, 3, 10), today).unwrap()
    );
    assert_eq!(
        Preset::Last15Days.resolve(today),
        DateRange::new(d(2024, 3, 2), today).unwrap()
    );
    assert_eq!(
        Preset::ThisMonth.resolve(today),
        DateRange::new(d(2024, 3, 1), today).unwrap()
    );
    assert_eq!(
        Preset::LastMonth.resolve(today),
        DateRange::new(d(2024, 2, 1), d(2024, 2, 29)).unwrap()
    );
    assert_eq!(
        Preset::Last6Months.resolve(today),
        DateRange::new(d(2023, 9, 16), today).unwrap()
    );
}

#[test]
fn preset_names_parse() {
    for name in Preset::NAMES {
        assert!(name.parse::<Preset>().is_ok(), "{}", name);
    }
    assert_eq!("last-month".parse::<Preset>().unwrap(), Preset::LastMonth);
    assert!("yesterday".parse::<Preset>().is_err());
}

#[test]
fn year_month_parses_and_prints() {
    let ym: YearMonth = "2024-03".parse().unwrap();
    assert_eq!(ym, YearMonth::new(2024, 3).unwrap());
    assert_eq!(ym.to_string(), "2024-03");
    assert_eq!(YearMonth::from_date(d(2024, 12, 31)).to_string(), "2024-12");
    assert!("2024-13".parse::<YearMonth>().is_err());
    assert!("March".parse::<YearMonth>().is_err());
}
