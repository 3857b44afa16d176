// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn range_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("preset")
            .long("preset")
            .help("last7days, last15days, thisMonth, lastMonth or last6months")
            .conflicts_with_all(["from", "to"]),
    )
    .arg(Arg::new("from").long("from").help("Start date YYYY-MM-DD"))
    .arg(Arg::new("to").long("to").help("End date YYYY-MM-DD (default today)"))
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .help("YYYY-MM (default current month)")
}

fn id_arg() -> Arg {
    Arg::new("id")
        .required(true)
        .value_parser(clap::value_parser!(i64))
}

fn catalog(name: &'static str, about: &'static str, add: Command) -> Command {
    Command::new(name)
        .about(about)
        .subcommand(add.arg(Arg::new("name").required(true)))
        .subcommand(json_flags(Command::new("list")))
}

pub fn build_cli() -> Command {
    Command::new("campaigndesk")
        .about("Ad performance reporting and budget reconciliation")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(Command::new("init").about("Initialize the local database"))
        .subcommand(
            Command::new("config")
                .about("Settings")
                .subcommand(
                    Command::new("set-currency")
                        .about("Set the display currency")
                        .arg(Arg::new("code").required(true)),
                )
                .subcommand(Command::new("show").about("Show backend and currency")),
        )
        .subcommand(catalog("brand", "Manage brands", Command::new("add")))
        .subcommand(catalog(
            "platform",
            "Manage ad platforms",
            Command::new("add").arg(
                Arg::new("category")
                    .long("category")
                    .help("google or meta (guessed from the name when omitted)"),
            ),
        ))
        .subcommand(catalog(
            "account",
            "Manage ad accounts",
            Command::new("add")
                .arg(Arg::new("platform").long("platform").required(true))
                .arg(
                    Arg::new("brand")
                        .long("brand")
                        .action(ArgAction::Append)
                        .help("Brand advertised through this account (repeatable)"),
                ),
        ))
        .subcommand(catalog(
            "campaign",
            "Manage campaigns",
            Command::new("add")
                .arg(Arg::new("brand").long("brand"))
                .arg(Arg::new("account").long("account"))
                .arg(
                    Arg::new("platform")
                        .long("platform")
                        .help("Disambiguate the account by platform"),
                ),
        ))
        .subcommand(catalog(
            "model",
            "Manage product models",
            Command::new("add").arg(Arg::new("brand").long("brand")),
        ))
        .subcommand(
            Command::new("perf")
                .about("Daily performance rows")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("campaign").long("campaign").required(true))
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("cost").long("cost").default_value("0"))
                        .arg(Arg::new("impressions").long("impressions").default_value("0"))
                        .arg(Arg::new("clicks").long("clicks").default_value("0"))
                        .arg(Arg::new("conversions").long("conversions").default_value("0"))
                        .arg(Arg::new("reach").long("reach").default_value("0")),
                )
                .subcommand(json_flags(range_args(
                    Command::new("list").arg(Arg::new("account").long("account")),
                ))),
        )
        .subcommand(
            Command::new("report")
                .about("Performance reports")
                .subcommand(json_flags(range_args(
                    Command::new("performance")
                        .about("Current vs previous period by account, brand and campaign")
                        .arg(Arg::new("account").long("account"))
                        .arg(Arg::new("platform").long("platform")),
                )))
                .subcommand(json_flags(range_args(
                    Command::new("compare").about("Compare campaigns side by side").arg(
                        Arg::new("campaign")
                            .long("campaign")
                            .action(ArgAction::Append)
                            .help("Campaign id or name (repeatable)"),
                    ),
                ))),
        )
        .subcommand(
            Command::new("budget")
                .about("Monthly brand budgets")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("brand").long("brand").required(true))
                        .arg(month_arg())
                        .arg(Arg::new("google").long("google"))
                        .arg(Arg::new("meta").long("meta")),
                )
                .subcommand(json_flags(Command::new("list").arg(month_arg())))
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(json_flags(
                    Command::new("overview")
                        .about("Brand totals and planned vs target per account")
                        .arg(month_arg()),
                )),
        )
        .subcommand(
            Command::new("plan")
                .about("Detailed budgets per account and model")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("brand").long("brand").required(true))
                        .arg(Arg::new("platform").long("platform").required(true))
                        .arg(Arg::new("model").long("model").required(true))
                        .arg(Arg::new("daily").long("daily").required(true))
                        .arg(
                            Arg::new("results")
                                .long("results")
                                .value_parser(clap::value_parser!(i64))
                                .default_value("0"),
                        )
                        .arg(Arg::new("notes").long("notes"))
                        .arg(month_arg()),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("account").long("account"))
                        .arg(Arg::new("platform").long("platform")),
                ))
                .subcommand(
                    Command::new("set")
                        .arg(id_arg())
                        .arg(Arg::new("daily").long("daily").conflicts_with("total"))
                        .arg(Arg::new("total").long("total"))
                        .arg(
                            Arg::new("results")
                                .long("results")
                                .value_parser(clap::value_parser!(i64)),
                        )
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(Command::new("activate").arg(id_arg()))
                .subcommand(Command::new("deactivate").arg(id_arg()))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("lead")
                .about("Leads captured by ad forms")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("account").long("account"))
                        .arg(
                            Arg::new("platform")
                                .long("platform")
                                .help("Disambiguate the account by platform"),
                        )
                        .arg(Arg::new("email").long("email"))
                        .arg(Arg::new("phone").long("phone"))
                        .arg(Arg::new("source").long("source"))
                        .arg(Arg::new("form").long("form").help("Form the lead came from"))
                        .arg(
                            Arg::new("stage")
                                .long("stage")
                                .help("in-review, negotiating, converted or lost"),
                        )
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .help("Capture date YYYY-MM-DD (default today)"),
                        ),
                )
                .subcommand(json_flags(range_args(
                    Command::new("list")
                        .about("Leads, newest first; no range means all dates")
                        .arg(Arg::new("account").long("account"))
                        .arg(Arg::new("platform").long("platform"))
                        .arg(
                            Arg::new("brand")
                                .long("brand")
                                .conflicts_with("account")
                                .help("Leads from any account of this brand"),
                        )
                        .arg(Arg::new("stage").long("stage"))
                        .arg(
                            Arg::new("form")
                                .long("form")
                                .help("Form name contains (case-insensitive)"),
                        ),
                )))
                .subcommand(
                    Command::new("stage")
                        .about("Move a lead to another stage")
                        .arg(id_arg())
                        .arg(Arg::new("stage").required(true)),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("audience")
                .about("Target audience profiles per product model")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("model").long("model").required(true))
                        .arg(Arg::new("profile").long("profile").required(true))
                        .arg(
                            Arg::new("age")
                                .long("age")
                                .required(true)
                                .help("Age range, e.g. 25-45"),
                        )
                        .arg(
                            Arg::new("gender")
                                .long("gender")
                                .default_value("all")
                                .help("male, female or all"),
                        )
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("location").long("location"))
                        .arg(
                            Arg::new("interests")
                                .long("interests")
                                .help("Comma-separated"),
                        )
                        .arg(
                            Arg::new("behaviors")
                                .long("behaviors")
                                .help("Comma-separated"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(Arg::new("brand").long("brand")),
                ))
                .subcommand(
                    Command::new("set")
                        .arg(id_arg())
                        .arg(Arg::new("model").long("model"))
                        .arg(Arg::new("profile").long("profile"))
                        .arg(Arg::new("age").long("age"))
                        .arg(Arg::new("gender").long("gender"))
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .help("Empty string clears it"),
                        )
                        .arg(
                            Arg::new("location")
                                .long("location")
                                .help("Empty string clears it"),
                        )
                        .arg(Arg::new("interests").long("interests"))
                        .arg(Arg::new("behaviors").long("behaviors")),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(range_args(
                Command::new("report")
                    .about("Export the performance hierarchy")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .value_parser(["csv", "json"])
                            .default_value("csv"),
                    )
                    .arg(Arg::new("out").long("out").required(true))
                    .arg(Arg::new("account").long("account"))
                    .arg(Arg::new("platform").long("platform")),
            )),
        )
        .subcommand(Command::new("doctor").about("Check data consistency"))
}
