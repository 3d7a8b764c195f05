// src/process/reconcile.rs
//! Map as-found column headers onto the fixed target vocabulary.
//!
//! Matching is exact after [`norm_text`]. A spelling nobody listed is dropped rather
//! than guessed at, so a newly renamed category shows up as a missing column instead of
//! being merged into the wrong one.

use serde::Serialize;

use super::utils::{collapse_ws, norm_text};
use crate::schema::TargetColumn;

/// A real column claimed by one target category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappedColumn {
    pub column: usize,
    pub header: String,
    pub category: String,
}

/// One-to-one partial map from real columns to target categories, in target order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnMapping {
    pub columns: Vec<MappedColumn>,
    /// Non-empty headers that matched nothing.
    pub dropped: Vec<String>,
}

impl ColumnMapping {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_for(&self, category: &str) -> Option<usize> {
        self.columns
            .iter()
            .find(|m| m.category == category)
            .map(|m| m.column)
    }
}

/// Header row cells, whitespace collapsed the way headers are reported.
pub fn header_cells(row: &[String]) -> Vec<String> {
    row.iter().map(|c| collapse_ws(c)).collect()
}

/// First column whose normalized header contains every keyword.
pub fn find_label_column(headers: &[String], keywords: &[String]) -> Option<usize> {
    let keywords: Vec<String> = keywords.iter().map(|k| norm_text(k)).collect();
    headers.iter().position(|h| {
        let nh = norm_text(h);
        !nh.is_empty() && keywords.iter().all(|k| nh.contains(k.as_str()))
    })
}

/// Build the mapping. For each target in order, the first variant that equals an
/// unclaimed column's normalized header claims that column. `label_column` is never
/// a candidate.
pub fn reconcile(
    headers: &[String],
    targets: &[TargetColumn],
    label_column: Option<usize>,
) -> ColumnMapping {
    let normalized: Vec<String> = headers.iter().map(|h| norm_text(h)).collect();
    let mut claimed = vec![false; headers.len()];
    if let Some(label) = label_column {
        if let Some(slot) = claimed.get_mut(label) {
            *slot = true;
        }
    }

    let mut columns = Vec::new();
    for target in targets {
        let hit = target.variants.iter().find_map(|variant| {
            let variant = norm_text(variant);
            normalized
                .iter()
                .enumerate()
                .find(|(idx, nh)| !claimed[*idx] && **nh == variant)
                .map(|(idx, _)| idx)
        });
        if let Some(idx) = hit {
            claimed[idx] = true;
            columns.push(MappedColumn {
                column: idx,
                header: headers[idx].clone(),
                category: target.name.clone(),
            });
        }
    }

    let dropped = headers
        .iter()
        .enumerate()
        .filter(|(idx, h)| !claimed[*idx] && !h.trim().is_empty())
        .map(|(_, h)| h.clone())
        .collect();

    ColumnMapping { columns, dropped }
}
