// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use anyhow::{Context, Result, bail};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::PathBuf;

pub const ENV_DB: &str = "CAMPAIGNDESK_DB";
pub const ENV_REST_URL: &str = "CAMPAIGNDESK_REST_URL";
pub const ENV_REST_KEY: &str = "CAMPAIGNDESK_REST_KEY";
pub const ENV_CURRENCY: &str = "CAMPAIGNDESK_CURRENCY";

pub const DEFAULT_CURRENCY: &str = "BRL";

/// Where tables live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Sqlite { path: PathBuf },
    Rest { url: String, api_key: String },
}

impl Backend {
    /// Resolve from a variable lookup. A REST url wins over a local path.
    pub fn resolve(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |k: &str| var(k).filter(|v| !v.trim().is_empty());
        if let Some(url) = non_empty(ENV_REST_URL) {
            let api_key = non_empty(ENV_REST_KEY)
                .with_context(|| format!("{} is set but {} is not", ENV_REST_URL, ENV_REST_KEY))?;
            return Ok(Backend::Rest { url, api_key });
        }
        let path = match non_empty(ENV_DB) {
            Some(p) => PathBuf::from(p),
            None => db::default_db_path()?,
        };
        Ok(Backend::Sqlite { path })
    }

    pub fn from_env() -> Result<Self> {
        Self::resolve(|k| std::env::var(k).ok())
    }

    pub fn describe(&self) -> String {
        match self {
            Backend::Sqlite { path } => format!("sqlite database at {}", path.display()),
            Backend::Rest { url, .. } => format!("data service at {}", url),
        }
    }
}

/// Display currency: the `settings` table first, then the environment.
pub fn get_currency(conn: Option<&Connection>) -> Result<String> {
    if let Some(conn) = conn {
        let v: Option<String> = conn
            .query_row(
                "SELECT value FROM settings WHERE key='currency'",
                [],
                |r| r.get(0),
            )
            .optional()?;
        if let Some(v) = v {
            return Ok(v);
        }
    }
    Ok(std::env::var(ENV_CURRENCY)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()))
}

pub fn set_currency(conn: &Connection, ccy: &str) -> Result<()> {
    let ccy = ccy.trim().to_uppercase();
    if ccy.len() != 3 || !ccy.chars().all(|c| c.is_ascii_alphabetic()) {
        bail!("Currency must be a 3-letter code, got '{}'", ccy);
    }
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('currency', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![ccy],
    )?;
    Ok(())
}
