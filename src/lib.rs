// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod audience;
pub mod budget;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod hierarchy;
pub mod leads;
pub mod metrics;
pub mod models;
pub mod period;
pub mod planning;
pub mod reporting;
pub mod store;
pub mod utils;
