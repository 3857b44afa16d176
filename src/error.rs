// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::period::YearMonth;
use chrono::NaiveDate;

/// Failures talking to the table store, local or remote.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("request to data service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("data service returned {status}: {body}")]
    Service { status: u16, body: String },

    #[error("malformed {table} row: {detail}")]
    Malformed { table: &'static str, detail: String },

    #[error("{table} row {id} not found")]
    NotFound { table: &'static str, id: i64 },

    #[error("data service returned no row for {0}")]
    EmptyResponse(&'static str),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// User input that blocks a report or a mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{0} must not be negative")]
    Negative(&'static str),

    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },

    #[error("select at least one campaign to compare")]
    NoCampaignsSelected,

    #[error("no ad account links brand {brand_id} to platform {platform_id}")]
    NoAccountForCombination { brand_id: i64, platform_id: i64 },

    #[error("no monthly budget defined for brand {brand_id} in {period}")]
    NoMonthlyBudget { brand_id: i64, period: YearMonth },

    #[error("unknown {kind} '{name}'")]
    Unknown { kind: &'static str, name: String },

    #[error("nothing to update")]
    EmptyUpdate,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type Result<T> = std::result::Result<T, Error>;
