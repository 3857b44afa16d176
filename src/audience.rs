// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Audience profiles per product model, grouped by brand for display.

use crate::error::{Result, StoreError, ValidationError};
use crate::models::{Audience, Brand, Gender, NewAudience, ProductModel};
use crate::reporting::fetch_or_empty;
use crate::store::DataStore;
use serde::Serialize;
use std::collections::HashMap;

/// Comma-separated input to a list: items trimmed, blanks dropped.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudienceEntry {
    pub model: ProductModel,
    pub audience: Audience,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandAudiences {
    pub brand: Brand,
    pub entries: Vec<AudienceEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AudienceGroups {
    pub brands: Vec<BrandAudiences>,
    /// Audiences whose model, or the model's brand, could not be found.
    pub skipped: usize,
    pub warnings: Vec<String>,
}

/// Group audiences under the brand of their model. Brands keep the order
/// they are given in; audiences keep theirs within a brand.
pub fn group_by_brand(
    audiences: &[Audience],
    models: &[ProductModel],
    brands: &[Brand],
) -> AudienceGroups {
    let model_by_id: HashMap<i64, &ProductModel> = models.iter().map(|m| (m.id, m)).collect();
    let mut groups: Vec<BrandAudiences> = brands
        .iter()
        .map(|b| BrandAudiences {
            brand: b.clone(),
            entries: Vec::new(),
        })
        .collect();
    let index: HashMap<i64, usize> = brands.iter().enumerate().map(|(i, b)| (b.id, i)).collect();
    let mut skipped = 0;

    for a in audiences {
        let Some(model) = model_by_id.get(&a.model_id) else {
            skipped += 1;
            continue;
        };
        let Some(&i) = model.brand_id.and_then(|b| index.get(&b)) else {
            skipped += 1;
            continue;
        };
        groups[i].entries.push(AudienceEntry {
            model: (*model).clone(),
            audience: a.clone(),
        });
    }
    if skipped > 0 {
        tracing::debug!(skipped, "audiences without a model or brand left out");
    }

    groups.retain(|g| !g.entries.is_empty());
    AudienceGroups {
        brands: groups,
        skipped,
        warnings: Vec::new(),
    }
}

/// Audiences by brand, optionally narrowed to one brand.
pub fn load_audience_groups(store: &dyn DataStore, brand_id: Option<i64>) -> AudienceGroups {
    let mut warnings = Vec::new();
    let audiences = fetch_or_empty("audiences", store.audiences(), &mut warnings);
    let models = fetch_or_empty("models", store.product_models(), &mut warnings);
    let brands: Vec<Brand> = fetch_or_empty("brands", store.brands(), &mut warnings)
        .into_iter()
        .filter(|b| brand_id.is_none_or(|id| id == b.id))
        .collect();

    let mut groups = group_by_brand(&audiences, &models, &brands);
    if brand_id.is_some() {
        // audiences of other brands are not orphans
        groups.skipped = 0;
    }
    groups.warnings = warnings;
    groups
}

fn check_required(value: &str, field: &'static str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

fn check_model(store: &dyn DataStore, model_id: i64) -> Result<()> {
    if !store.product_models()?.iter().any(|m| m.id == model_id) {
        return Err(ValidationError::Unknown {
            kind: "model",
            name: model_id.to_string(),
        }
        .into());
    }
    Ok(())
}

pub fn create_audience(store: &dyn DataStore, new: NewAudience) -> Result<Audience> {
    check_required(&new.profile_name, "profile name")?;
    check_required(&new.age_range, "age range")?;
    check_model(store, new.model_id)?;
    let saved = store.insert_audience(&new)?;
    tracing::info!(id = saved.id, model_id = saved.model_id, "audience saved");
    Ok(saved)
}

/// Fields to change on an audience; `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudiencePatch {
    pub model_id: Option<i64>,
    pub profile_name: Option<String>,
    pub description: Option<String>,
    pub age_range: Option<String>,
    pub gender: Option<Gender>,
    pub location: Option<String>,
    pub interests: Option<Vec<String>>,
    pub behaviors: Option<Vec<String>>,
}

impl AudiencePatch {
    pub fn is_empty(&self) -> bool {
        *self == AudiencePatch::default()
    }
}

pub fn edit_audience(store: &dyn DataStore, id: i64, patch: AudiencePatch) -> Result<Audience> {
    if patch.is_empty() {
        return Err(ValidationError::EmptyUpdate.into());
    }
    let mut a = store
        .audiences()?
        .into_iter()
        .find(|a| a.id == id)
        .ok_or(StoreError::NotFound {
            table: "audiences",
            id,
        })?;

    if let Some(model_id) = patch.model_id {
        check_model(store, model_id)?;
        a.model_id = model_id;
    }
    if let Some(name) = patch.profile_name {
        check_required(&name, "profile name")?;
        a.profile_name = name;
    }
    if let Some(age) = patch.age_range {
        check_required(&age, "age range")?;
        a.age_range = age;
    }
    if let Some(g) = patch.gender {
        a.gender = g;
    }
    // an empty string clears an optional text field
    if let Some(d) = patch.description {
        a.description = Some(d).filter(|s| !s.trim().is_empty());
    }
    if let Some(l) = patch.location {
        a.location = Some(l).filter(|s| !s.trim().is_empty());
    }
    if let Some(i) = patch.interests {
        a.interests = i;
    }
    if let Some(b) = patch.behaviors {
        a.behaviors = b;
    }

    store.update_audience(&a)?;
    tracing::info!(id, "audience updated");
    Ok(a)
}

pub fn delete_audience(store: &dyn DataStore, id: i64) -> Result<()> {
    if !store.delete_audience(id)? {
        return Err(StoreError::NotFound {
            table: "audiences",
            id,
        }
        .into());
    }
    Ok(())
}
