// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod audiences;
pub mod budgets;
pub mod catalog;
pub mod doctor;
pub mod exporter;
pub mod leads;
pub mod performance;
pub mod plan;
pub mod reports;
pub mod settings;

use crate::models::AdAccount;
use crate::period::{DateRange, Preset, YearMonth};
use crate::store::DataStore;
use crate::utils::{find_account, parse_date, parse_month};
use anyhow::{Result, bail};
use chrono::NaiveDate;

/// Date range from `--preset` or `--from`/`--to`. Defaults to the last 7 days.
pub fn range_from_args(m: &clap::ArgMatches, today: NaiveDate) -> Result<DateRange> {
    if let Some(p) = m.get_one::<String>("preset") {
        return Ok(p.parse::<Preset>()?.resolve(today));
    }
    let to = match m.get_one::<String>("to") {
        Some(s) => parse_date(s)?,
        None => today,
    };
    match m.get_one::<String>("from") {
        Some(s) => Ok(DateRange::new(parse_date(s)?, to)?),
        None if m.get_one::<String>("to").is_some() => bail!("--to needs --from"),
        None => Ok(Preset::Last7Days.resolve(today)),
    }
}

/// Like [`range_from_args`], but `None` when no range argument was given.
pub fn optional_range_from_args(
    m: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<Option<DateRange>> {
    let given = ["preset", "from", "to"]
        .iter()
        .any(|id| m.get_one::<String>(id).is_some());
    if !given {
        return Ok(None);
    }
    range_from_args(m, today).map(Some)
}

pub fn month_from_args(m: &clap::ArgMatches) -> Result<YearMonth> {
    match m.get_one::<String>("month") {
        Some(s) => parse_month(s),
        None => Ok(YearMonth::current()),
    }
}

/// `--account` (with optional `--platform`) resolved to an ad account.
pub fn account_from_args(store: &dyn DataStore, m: &clap::ArgMatches) -> Result<Option<AdAccount>> {
    // not every subcommand takes --platform
    let platform = m
        .try_get_one::<String>("platform")
        .ok()
        .flatten()
        .map(String::as_str);
    match m.get_one::<String>("account") {
        Some(name) => Ok(Some(find_account(store, name, platform)?)),
        None => Ok(None),
    }
}

/// Services hand back warnings instead of failing; show them without
/// interrupting normal output.
pub fn print_warnings(warnings: &[String]) {
    for w in warnings {
        eprintln!("warning: {}", w);
    }
}

/// Route a parsed command line to its handler. `init` and `config` need the
/// backend itself and are handled by the binary.
pub fn dispatch(store: &dyn DataStore, ccy: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("brand", sub)) => catalog::brands(store, sub),
        Some(("platform", sub)) => catalog::platforms(store, sub),
        Some(("account", sub)) => catalog::accounts(store, sub),
        Some(("campaign", sub)) => catalog::campaigns(store, sub),
        Some(("model", sub)) => catalog::models(store, sub),
        Some(("perf", sub)) => performance::handle(store, ccy, sub),
        Some(("report", sub)) => reports::handle(store, ccy, sub),
        Some(("budget", sub)) => budgets::handle(store, ccy, sub),
        Some(("plan", sub)) => plan::handle(store, ccy, sub),
        Some(("lead", sub)) => leads::handle(store, sub),
        Some(("audience", sub)) => audiences::handle(store, sub),
        Some(("export", sub)) => exporter::handle(store, sub),
        Some(("doctor", _)) => doctor::handle(store),
        _ => {
            crate::cli::build_cli().print_help()?;
            println!();
            Ok(())
        }
    }
}
