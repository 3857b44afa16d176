// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Report periods: inclusive date ranges, the matching previous period, and
//! calendar months for budgets.

use crate::error::ValidationError;
use chrono::{Datelike, Duration, Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Inclusive range of report dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The window of equal length ending the day before `start`.
    pub fn previous(&self) -> Self {
        let span = self.end - self.start;
        let end = self.start - Duration::days(1);
        Self {
            start: end - span,
            end,
        }
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Named shortcuts offered next to a custom range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Last7Days,
    Last15Days,
    ThisMonth,
    LastMonth,
    Last6Months,
}

impl Preset {
    pub const NAMES: [&'static str; 5] = [
        "last7days",
        "last15days",
        "thisMonth",
        "lastMonth",
        "last6months",
    ];

    pub fn resolve(self, today: NaiveDate) -> DateRange {
        let (start, end) = match self {
            Preset::Last7Days => (today - Duration::days(6), today),
            Preset::Last15Days => (today - Duration::days(14), today),
            Preset::ThisMonth => (first_of_month(today), today),
            Preset::LastMonth => {
                let end = first_of_month(today) - Duration::days(1);
                (first_of_month(end), end)
            }
            Preset::Last6Months => (
                today.checked_sub_months(Months::new(6)).unwrap_or(today),
                today,
            ),
        };
        DateRange { start, end }
    }
}

impl FromStr for Preset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "last7days" => Ok(Preset::Last7Days),
            "last15days" => Ok(Preset::Last15Days),
            "thisMonth" | "this-month" => Ok(Preset::ThisMonth),
            "lastMonth" | "last-month" => Ok(Preset::LastMonth),
            "last6months" => Ok(Preset::Last6Months),
            other => Err(ValidationError::Unknown {
                kind: "period preset",
                name: other.to_string(),
            }),
        }
    }
}

fn first_of_month(d: NaiveDate) -> NaiveDate {
    d.with_day(1).unwrap_or(d)
}

/// A calendar month, the granularity of monthly budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(d: NaiveDate) -> Self {
        Self {
            year: d.year(),
            month: d.month(),
        }
    }

    /// Wall-clock month. Budget screens always look at "now".
    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ValidationError::Unknown {
            kind: "month (expected YYYY-MM)",
            name: s.to_string(),
        };
        let (y, m) = s.split_once('-').ok_or_else(invalid)?;
        let year = y.parse::<i32>().map_err(|_| invalid())?;
        let month = m.parse::<u32>().map_err(|_| invalid())?;
        YearMonth::new(year, month).ok_or_else(invalid)
    }
}
