// src/schema/types.rs

use serde::{Deserialize, Serialize};

pub const DEFAULT_SEARCH_LIMIT: usize = 60;

fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

fn default_category_name() -> String {
    "Entidad".to_string()
}

fn default_true() -> bool {
    true
}

/// One canonical category and the header spellings accepted for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetColumn {
    pub name: String,
    pub variants: Vec<String>,
}

/// Inclusive range of 1-based worksheet row numbers, as an operator reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowWindow {
    pub first: usize,
    pub last: usize,
}

impl RowWindow {
    /// Whether the zero-based grid row `row` falls inside the window.
    pub fn contains(&self, row: usize) -> bool {
        (self.first..=self.last).contains(&(row + 1))
    }
}

/// A way of establishing where the header row sits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderStrategy {
    /// First row, within `search_limit`, holding a cell equal to `label` after normalization.
    Anchor {
        label: String,
        #[serde(default = "default_search_limit")]
        search_limit: usize,
    },
    /// Declared header row (1-based) with data confined to `data_rows`.
    FixedRow { header_row: usize, data_rows: RowWindow },
}

/// Shape of the figures inside the located sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Layout {
    /// Header row, a label column and one column per target category.
    #[default]
    Wide,
    /// One figure per file: column `column` (0-based) of the first row whose
    /// `label_column` contains `row_label` after normalization. The single target
    /// names the category.
    SingleCell {
        row_label: String,
        #[serde(default)]
        label_column: usize,
        column: usize,
    },
}

/// Everything needed to extract one indicator from one family of reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportProfile {
    pub name: String,
    /// Logical worksheet name, e.g. "Créditos x SE".
    pub sheet: String,
    /// Fallback sheet match: each group needs one fragment inside the normalized name.
    #[serde(default)]
    pub sheet_keywords: Vec<Vec<String>>,
    /// Fall back to the first worksheet when no name matches.
    #[serde(default = "default_true")]
    pub first_sheet_fallback: bool,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub header: Vec<HeaderStrategy>,
    /// Fragments that must all occur in the label column's normalized header.
    #[serde(default)]
    pub label_keywords: Vec<String>,
    /// Output name of the label column.
    pub label_name: String,
    #[serde(default = "default_category_name")]
    pub category_name: String,
    /// Output name of the value column.
    pub value_name: String,
    /// Regex over normalized labels; the first matching row ends the sector breakdown.
    #[serde(default)]
    pub section_terminator: Option<String>,
    pub targets: Vec<TargetColumn>,
}

impl ReportProfile {
    /// Canonical category names in schema order.
    pub fn categories(&self) -> Vec<String> {
        self.targets.iter().map(|t| t.name.clone()).collect()
    }

    /// Human-readable anchor label for diagnostics.
    pub fn primary_anchor(&self) -> (String, usize) {
        self.header
            .iter()
            .find_map(|s| match s {
                HeaderStrategy::Anchor {
                    label,
                    search_limit,
                } => Some((label.clone(), *search_limit)),
                HeaderStrategy::FixedRow { .. } => None,
            })
            .unwrap_or_else(|| ("<fixed row>".to_string(), 0))
    }
}
