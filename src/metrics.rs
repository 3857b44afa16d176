// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Metric totals, derived rates and period-over-period variation.

use crate::models::ReportRow;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use std::fmt;
use std::ops::AddAssign;

/// Summed performance for one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PeriodTotals {
    pub cost: Decimal,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: i64,
    pub reach: i64,
}

impl PeriodTotals {
    pub fn add_row(&mut self, row: &ReportRow) {
        self.cost += row.cost;
        self.impressions += row.impressions;
        self.clicks += row.clicks;
        self.conversions += row.conversions;
        self.reach += row.reach;
    }

    /// Click-through rate in percent.
    pub fn ctr(&self) -> f64 {
        if self.impressions > 0 {
            self.clicks as f64 / self.impressions as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Cost per click.
    pub fn cpc(&self) -> Decimal {
        per(self.cost, self.clicks)
    }

    /// Cost per result (conversion).
    pub fn cpr(&self) -> Decimal {
        per(self.cost, self.conversions)
    }
}

impl AddAssign<&ReportRow> for PeriodTotals {
    fn add_assign(&mut self, row: &ReportRow) {
        self.add_row(row);
    }
}

fn per(cost: Decimal, count: i64) -> Decimal {
    if count > 0 {
        cost / Decimal::from(count)
    } else {
        Decimal::ZERO
    }
}

/// Sum every metric across `rows`. The empty sequence sums to zero.
pub fn totals<'a, I>(rows: I) -> PeriodTotals
where
    I: IntoIterator<Item = &'a ReportRow>,
{
    rows.into_iter().fold(PeriodTotals::default(), |mut acc, r| {
        acc += r;
        acc
    })
}

/// Leading `[+-]digits[.digits]` of a trimmed value, normalised so it parses
/// (`"-.5 BRL"` gives `"-0.5"`). `None` when no digit leads the value.
fn numeric_prefix(raw: &str, allow_fraction: bool) -> Option<String> {
    let s = raw.trim();
    let bytes = s.as_bytes();
    let negative = bytes.first() == Some(&b'-');
    let mut pos = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_part = &s[int_start..pos];
    let mut frac_part = "";
    if allow_fraction && bytes.get(pos) == Some(&b'.') {
        let frac_start = pos + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        frac_part = &s[frac_start..frac_end];
    }
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    let mut out = String::with_capacity(int_part.len() + frac_part.len() + 3);
    if negative {
        out.push('-');
    }
    out.push_str(if int_part.is_empty() { "0" } else { int_part });
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    Some(out)
}

/// Parse a stored amount from its leading number (`"12.5 BRL"` is 12.5).
/// Anything without one is zero.
pub fn lenient_decimal(raw: Option<&str>) -> Decimal {
    raw.and_then(|s| numeric_prefix(s, true))
        .and_then(|s| s.parse::<Decimal>().ok())
        .unwrap_or(Decimal::ZERO)
}

/// Parse a stored counter from its leading integer, so fractions truncate
/// and `"12 clicks"` is 12. Garbage counts as zero.
pub fn lenient_count(raw: Option<&str>) -> i64 {
    raw.and_then(|s| numeric_prefix(s, false))
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(0)
}

/// Which direction of change is good news for a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Polarity {
    #[default]
    HigherIsBetter,
    LowerIsBetter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum VariationValue {
    Percent(f64),
    /// Growth from a zero baseline.
    Infinite,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Variation {
    pub value: VariationValue,
    pub tag: Tag,
}

/// Percentage change from `previous` to `current`.
///
/// Growth from zero is always tagged positive, even for lower-is-better
/// metrics.
pub fn variation(current: f64, previous: f64, polarity: Polarity) -> Variation {
    if previous == 0.0 {
        return if current > 0.0 {
            Variation {
                value: VariationValue::Infinite,
                tag: Tag::Positive,
            }
        } else {
            Variation {
                value: VariationValue::Percent(0.0),
                tag: Tag::Neutral,
            }
        };
    }
    let value = (current - previous) / previous * 100.0;
    let good = match polarity {
        Polarity::HigherIsBetter => value >= 0.0,
        Polarity::LowerIsBetter => value <= 0.0,
    };
    Variation {
        value: VariationValue::Percent(value),
        tag: if good { Tag::Positive } else { Tag::Negative },
    }
}

pub fn decimal_variation(current: Decimal, previous: Decimal, polarity: Polarity) -> Variation {
    variation(
        current.to_f64().unwrap_or(0.0),
        previous.to_f64().unwrap_or(0.0),
        polarity,
    )
}

impl fmt::Display for Variation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            VariationValue::Infinite => f.write_str("+∞%"),
            VariationValue::Percent(v) => {
                // avoid printing "-0.00%"
                let v = if v == 0.0 { 0.0 } else { v };
                write!(f, "{:+.2}%", v)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Variations {
    pub cost: Variation,
    pub impressions: Variation,
    pub clicks: Variation,
    pub conversions: Variation,
    pub reach: Variation,
    pub ctr: Variation,
    pub cpc: Variation,
}

/// A current/previous totals pair with every variation worked out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Comparison {
    pub current: PeriodTotals,
    pub previous: PeriodTotals,
    pub variations: Variations,
}

impl Comparison {
    pub fn new(current: PeriodTotals, previous: PeriodTotals) -> Self {
        let up = Polarity::HigherIsBetter;
        let count = |c: i64, p: i64| variation(c as f64, p as f64, up);
        let variations = Variations {
            cost: decimal_variation(current.cost, previous.cost, up),
            impressions: count(current.impressions, previous.impressions),
            clicks: count(current.clicks, previous.clicks),
            conversions: count(current.conversions, previous.conversions),
            reach: count(current.reach, previous.reach),
            ctr: variation(current.ctr(), previous.ctr(), up),
            cpc: decimal_variation(current.cpc(), previous.cpc(), Polarity::LowerIsBetter),
        };
        Self {
            current,
            previous,
            variations,
        }
    }
}
