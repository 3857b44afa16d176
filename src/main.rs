// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use campaigndesk::config::{Backend, get_currency};
use campaigndesk::store::{RestStore, SqliteStore};
use campaigndesk::{cli, commands, db};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let matches = cli::build_cli().get_matches();
    let backend = Backend::from_env()?;

    match &backend {
        Backend::Sqlite { path } => {
            let conn = db::open_or_init(path)?;
            match matches.subcommand() {
                Some(("init", _)) => {
                    println!("Database initialized at {}", path.display());
                }
                Some(("config", sub)) => {
                    commands::settings::handle(Some(&conn), &backend, sub)?;
                }
                _ => {
                    let ccy = get_currency(Some(&conn))?;
                    let store = SqliteStore::new(conn);
                    commands::dispatch(&store, &ccy, &matches)?;
                }
            }
        }
        Backend::Rest { url, api_key } => {
            let store = RestStore::new(url, api_key).context("Failed to build HTTP client")?;
            match matches.subcommand() {
                Some(("init", _)) => {
                    println!("Using {}; nothing to initialize", backend.describe());
                }
                Some(("config", sub)) => commands::settings::handle(None, &backend, sub)?,
                _ => commands::dispatch(&store, &get_currency(None)?, &matches)?,
            }
        }
    }
    Ok(())
}
