// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Lead capture and funnel-stage tracking.

use crate::error::{Result, StoreError, ValidationError};
use crate::models::{AdAccount, Lead, LeadStage, NewLead};
use crate::store::DataStore;
use serde::Serialize;
use std::collections::HashSet;

/// Narrowing applied after the store fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadCriteria {
    pub stage: Option<LeadStage>,
    /// Case-insensitive substring of the form name.
    pub form: Option<String>,
    pub account_ids: Option<HashSet<i64>>,
}

impl LeadCriteria {
    pub fn matches(&self, lead: &Lead) -> bool {
        if let Some(stage) = self.stage {
            if lead.stage() != Some(stage) {
                return false;
            }
        }
        if let Some(form) = &self.form {
            let needle = form.trim().to_lowercase();
            let hit = lead
                .form_name
                .as_deref()
                .is_some_and(|f| f.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        if let Some(ids) = &self.account_ids {
            if !lead.account_id.is_some_and(|id| ids.contains(&id)) {
                return false;
            }
        }
        true
    }
}

pub fn filter_leads(leads: Vec<Lead>, criteria: &LeadCriteria) -> Vec<Lead> {
    leads.into_iter().filter(|l| criteria.matches(l)).collect()
}

/// Ids of the ad accounts advertising a brand.
pub fn brand_account_ids(accounts: &[AdAccount], brand_id: i64) -> HashSet<i64> {
    accounts
        .iter()
        .filter(|a| a.brand_ids.contains(&brand_id))
        .map(|a| a.id)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StageCounts {
    pub in_review: usize,
    pub negotiating: usize,
    pub converted: usize,
    pub lost: usize,
    /// No stage, or one no longer recognized.
    pub unstaged: usize,
}

impl StageCounts {
    pub fn total(&self) -> usize {
        self.in_review + self.negotiating + self.converted + self.lost + self.unstaged
    }

    pub fn get(&self, stage: LeadStage) -> usize {
        match stage {
            LeadStage::InReview => self.in_review,
            LeadStage::Negotiating => self.negotiating,
            LeadStage::Converted => self.converted,
            LeadStage::Lost => self.lost,
        }
    }

    /// Converted share of all leads, in percent. Zero with no leads.
    pub fn conversion_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            n => self.converted as f64 / n as f64 * 100.0,
        }
    }
}

pub fn stage_counts(leads: &[Lead]) -> StageCounts {
    let mut c = StageCounts::default();
    for lead in leads {
        match lead.stage() {
            Some(LeadStage::InReview) => c.in_review += 1,
            Some(LeadStage::Negotiating) => c.negotiating += 1,
            Some(LeadStage::Converted) => c.converted += 1,
            Some(LeadStage::Lost) => c.lost += 1,
            None => c.unstaged += 1,
        }
    }
    c
}

pub fn capture_lead(store: &dyn DataStore, mut new: NewLead) -> Result<Lead> {
    new.name = new.name.trim().to_string();
    if new.name.is_empty() {
        return Err(ValidationError::MissingField("lead name").into());
    }
    let saved = store.insert_lead(&new)?;
    tracing::info!(id = saved.id, account_id = ?saved.account_id, "lead captured");
    Ok(saved)
}

pub fn set_lead_stage(store: &dyn DataStore, id: i64, stage: LeadStage) -> Result<Lead> {
    let lead = store.update_lead_stage(id, stage)?;
    tracing::info!(id, %stage, "lead stage changed");
    Ok(lead)
}

pub fn delete_lead(store: &dyn DataStore, id: i64) -> Result<()> {
    if !store.delete_lead(id)? {
        return Err(StoreError::NotFound { table: "leads", id }.into());
    }
    Ok(())
}
