// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{Backend, get_currency, set_currency};
use anyhow::{Result, bail};
use rusqlite::Connection;

/// `config` subcommands. Settings live in the local database, so a remote
/// backend can only be inspected.
pub fn handle(conn: Option<&Connection>, backend: &Backend, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-currency", sub)) => {
            let Some(conn) = conn else {
                bail!("Settings are stored locally; unset the remote data service to change them");
            };
            set_currency(conn, sub.get_one::<String>("code").unwrap())?;
            println!("Display currency set to {}", get_currency(Some(conn))?);
        }
        Some(("show", _)) => {
            println!("Backend:  {}", backend.describe());
            println!("Currency: {}", get_currency(conn)?);
        }
        _ => {}
    }
    Ok(())
}
