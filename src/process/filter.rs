use regex::Regex;

use super::raw_table::RawTable;
use super::utils::{collapse_ws, norm_text};
use crate::schema::RowWindow;

/// A row below the header, keyed by its absolute grid row.
#[derive(Debug, Clone, PartialEq)]
pub struct DataRow {
    pub row: usize,
    pub label: String,
    pub cells: Vec<String>,
}

/// All rows after `header_row`, with the label taken from `label_column`.
pub fn data_rows(table: &RawTable, header_row: usize, label_column: usize) -> Vec<DataRow> {
    table
        .rows()
        .skip(header_row + 1)
        .map(|(row, cells)| DataRow {
            row,
            label: collapse_ws(table.cell(row, label_column)),
            cells: cells.to_vec(),
        })
        .collect()
}

/// Drops everything in the data region that is not a sector row.
#[derive(Debug, Clone)]
pub struct RowFilter {
    terminator: Option<Regex>,
    /// `*`, `**`, `1/`, `2/`… at the start of a label.
    footnote: Regex,
    /// Source and page annotations, matched against normalized labels.
    annotation: Regex,
}

impl RowFilter {
    pub fn new(terminator: Option<&str>) -> Result<Self, regex::Error> {
        Ok(Self {
            terminator: terminator.map(Regex::new).transpose()?,
            footnote: Regex::new(r"^\s*(?:\*+|\d+/)")?,
            annotation: Regex::new(r"fuente|pagina")?,
        })
    }

    /// Window clamp, then truncation at the summary section, then label checks.
    /// Applying the filter to its own output changes nothing.
    pub fn apply(&self, rows: Vec<DataRow>, window: Option<RowWindow>) -> Vec<DataRow> {
        let mut rows: Vec<DataRow> = match window {
            Some(window) => rows.into_iter().filter(|r| window.contains(r.row)).collect(),
            None => rows,
        };

        if let Some(term) = &self.terminator {
            if let Some(end) = rows.iter().position(|r| term.is_match(&norm_text(&r.label))) {
                rows.truncate(end);
            }
        }

        rows.retain(|r| self.is_sector_label(&r.label));
        rows
    }

    pub fn is_sector_label(&self, label: &str) -> bool {
        let label = label.trim();
        !label.is_empty()
            && !self.footnote.is_match(label)
            && !self.annotation.is_match(&norm_text(label))
    }
}
