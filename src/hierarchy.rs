// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Account → brand → campaign rollup of performance rows over two periods.

use crate::metrics::{Comparison, PeriodTotals};
use crate::models::PerformanceRecord;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Account,
    Brand,
    Campaign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Current,
    Previous,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyNode {
    pub key: String,
    pub level: Level,
    pub name: String,
    /// Only set on account nodes.
    pub platform: Option<String>,
    pub current: PeriodTotals,
    pub previous: PeriodTotals,
    pub children: Children,
}

impl HierarchyNode {
    fn new(key: String, level: Level, name: String, platform: Option<String>) -> Self {
        Self {
            key,
            level,
            name,
            platform,
            current: PeriodTotals::default(),
            previous: PeriodTotals::default(),
            children: Children::default(),
        }
    }

    pub fn totals(&self, period: Period) -> &PeriodTotals {
        match period {
            Period::Current => &self.current,
            Period::Previous => &self.previous,
        }
    }

    fn totals_mut(&mut self, period: Period) -> &mut PeriodTotals {
        match period {
            Period::Current => &mut self.current,
            Period::Previous => &mut self.previous,
        }
    }

    pub fn comparison(&self) -> Comparison {
        Comparison::new(self.current, self.previous)
    }

    /// Label used when rendering; accounts carry their platform.
    pub fn label(&self) -> String {
        match &self.platform {
            Some(p) => format!("{} ({})", self.name, p),
            None => self.name.clone(),
        }
    }
}

/// Child nodes keyed by natural key, iterated in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Children {
    nodes: Vec<HierarchyNode>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Children {
    fn get_or_insert_with(
        &mut self,
        key: &str,
        make: impl FnOnce() -> HierarchyNode,
    ) -> &mut HierarchyNode {
        let idx = match self.index.get(key) {
            Some(&i) => i,
            None => {
                self.nodes.push(make());
                let i = self.nodes.len() - 1;
                self.index.insert(key.to_string(), i);
                i
            }
        };
        &mut self.nodes[idx]
    }

    pub fn get(&self, key: &str) -> Option<&HierarchyNode> {
        self.index.get(key).map(|&i| &self.nodes[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HierarchyNode> {
        self.nodes.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<'a> IntoIterator for &'a Children {
    type Item = &'a HierarchyNode;
    type IntoIter = std::slice::Iter<'a, HierarchyNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Hierarchy {
    pub accounts: Children,
    /// Rows dropped because a campaign, account, platform or brand was missing.
    pub skipped: usize,
}

/// One line of a depth-first walk, ready for a flat table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatRow {
    pub level: Level,
    pub depth: usize,
    pub label: String,
    pub comparison: Comparison,
}

impl Hierarchy {
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn flatten(&self) -> Vec<FlatRow> {
        fn walk(node: &HierarchyNode, depth: usize, out: &mut Vec<FlatRow>) {
            out.push(FlatRow {
                level: node.level,
                depth,
                label: node.label(),
                comparison: node.comparison(),
            });
            for child in &node.children {
                walk(child, depth + 1, out);
            }
        }
        let mut out = Vec::new();
        for account in &self.accounts {
            walk(account, 0, &mut out);
        }
        out
    }
}

/// Group both periods' rows into a fresh hierarchy.
///
/// Current rows are processed first, so node order is first appearance in the
/// current period followed by nodes only seen in the previous one.
pub fn build_hierarchy(current: &[PerformanceRecord], previous: &[PerformanceRecord]) -> Hierarchy {
    let mut h = Hierarchy::default();
    accumulate(&mut h, current, Period::Current);
    accumulate(&mut h, previous, Period::Previous);
    if h.skipped > 0 {
        tracing::debug!(skipped = h.skipped, "rows without full campaign relations left out of hierarchy");
    }
    h
}

fn accumulate(h: &mut Hierarchy, records: &[PerformanceRecord], period: Period) {
    for rec in records {
        let Some(campaign) = rec.campaign.as_ref() else {
            h.skipped += 1;
            continue;
        };
        let (Some(account), Some(brand)) = (campaign.account.as_ref(), campaign.brand.as_ref())
        else {
            h.skipped += 1;
            continue;
        };
        let Some(platform) = account.platform.as_ref() else {
            h.skipped += 1;
            continue;
        };

        let account_key = format!("{} ({})", account.name, platform.name);
        let campaign_key = campaign.id.to_string();

        let account_node = h.accounts.get_or_insert_with(&account_key, || {
            HierarchyNode::new(
                account_key.clone(),
                Level::Account,
                account.name.clone(),
                Some(platform.name.clone()),
            )
        });
        account_node.totals_mut(period).add_row(&rec.row);

        let brand_node = account_node.children.get_or_insert_with(&brand.name, || {
            HierarchyNode::new(brand.name.clone(), Level::Brand, brand.name.clone(), None)
        });
        brand_node.totals_mut(period).add_row(&rec.row);

        let campaign_node = brand_node.children.get_or_insert_with(&campaign_key, || {
            HierarchyNode::new(
                campaign_key.clone(),
                Level::Campaign,
                campaign.name.clone(),
                None,
            )
        });
        campaign_node.totals_mut(period).add_row(&rec.row);
    }
}
