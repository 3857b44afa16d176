// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Campaigndesk", "campaigndesk"));

pub fn default_db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("campaigndesk.sqlite"))
}

pub fn open_or_init(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    tracing::debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS brands(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS platforms(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        category TEXT NOT NULL CHECK(category IN ('google','meta'))
    );

    CREATE TABLE IF NOT EXISTS ad_accounts(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        platform_id INTEGER NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(name, platform_id),
        FOREIGN KEY(platform_id) REFERENCES platforms(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS account_brands(
        account_id INTEGER NOT NULL,
        brand_id INTEGER NOT NULL,
        PRIMARY KEY(account_id, brand_id),
        FOREIGN KEY(account_id) REFERENCES ad_accounts(id) ON DELETE CASCADE,
        FOREIGN KEY(brand_id) REFERENCES brands(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS campaigns(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        brand_id INTEGER,
        account_id INTEGER,
        FOREIGN KEY(brand_id) REFERENCES brands(id) ON DELETE SET NULL,
        FOREIGN KEY(account_id) REFERENCES ad_accounts(id) ON DELETE SET NULL
    );

    CREATE TABLE IF NOT EXISTS models(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        brand_id INTEGER,
        FOREIGN KEY(brand_id) REFERENCES brands(id) ON DELETE SET NULL
    );

    -- metrics are loosely typed on purpose: rows arrive from platform exports
    CREATE TABLE IF NOT EXISTS performance_reports(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        campaign_id INTEGER NOT NULL,
        report_date TEXT NOT NULL,
        cost TEXT,
        impressions,
        clicks,
        conversions,
        reach,
        FOREIGN KEY(campaign_id) REFERENCES campaigns(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_performance_date ON performance_reports(report_date);

    CREATE TABLE IF NOT EXISTS monthly_budgets(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        brand_id INTEGER NOT NULL,
        month INTEGER NOT NULL CHECK(month BETWEEN 1 AND 12),
        year INTEGER NOT NULL,
        target_google TEXT NOT NULL DEFAULT '0',
        target_meta TEXT NOT NULL DEFAULT '0',
        target_total TEXT NOT NULL DEFAULT '0',
        UNIQUE(brand_id, month, year),
        FOREIGN KEY(brand_id) REFERENCES brands(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS detailed_budgets(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        monthly_budget_id INTEGER,
        account_id INTEGER NOT NULL,
        model_id INTEGER NOT NULL,
        daily_planned TEXT NOT NULL,
        total_planned TEXT NOT NULL,
        planned_results INTEGER NOT NULL DEFAULT 0,
        active INTEGER NOT NULL DEFAULT 1,
        notes TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(monthly_budget_id) REFERENCES monthly_budgets(id) ON DELETE SET NULL,
        FOREIGN KEY(account_id) REFERENCES ad_accounts(id) ON DELETE CASCADE,
        FOREIGN KEY(model_id) REFERENCES models(id) ON DELETE CASCADE
    );

    -- stage is free text: older rows keep the previous funnel names
    CREATE TABLE IF NOT EXISTS leads(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        account_id INTEGER,
        name TEXT NOT NULL,
        email TEXT,
        phone TEXT,
        source TEXT,
        form_name TEXT,
        stage TEXT,
        created_on TEXT NOT NULL,
        FOREIGN KEY(account_id) REFERENCES ad_accounts(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_leads_created ON leads(created_on);

    -- interests and behaviors hold JSON arrays of strings
    CREATE TABLE IF NOT EXISTS audiences(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        model_id INTEGER NOT NULL,
        profile_name TEXT NOT NULL,
        description TEXT,
        age_range TEXT NOT NULL,
        gender TEXT NOT NULL,
        location TEXT,
        interests TEXT NOT NULL DEFAULT '[]',
        behaviors TEXT NOT NULL DEFAULT '[]',
        FOREIGN KEY(model_id) REFERENCES models(id) ON DELETE CASCADE
    );
    "#,
    )?;
    Ok(())
}
