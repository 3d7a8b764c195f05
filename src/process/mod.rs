// src/process/mod.rs
pub mod filter;
pub mod header;
pub mod raw_table;
pub mod reconcile;
pub mod reshape;
pub mod utils;
pub mod values;

use serde::Serialize;
use std::path::Path;
use tracing::{debug, instrument};

use crate::error::ExtractError;
use crate::period::Period;
use crate::schema::{self, Layout, ReportProfile};
use crate::workbook::{self, Engine};

use filter::{data_rows, RowFilter};
use header::{locate_header, HeaderLocation};
use raw_table::RawTable;
use reconcile::{find_label_column, header_cells, reconcile, MappedColumn};
use reshape::{melt, TidyRecord};
use utils::{collapse_ws, norm_text};
use values::parse_number;

/// What happened inside one file, kept for operator review.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileAudit {
    pub engine: Option<Engine>,
    pub sheet: Option<String>,
    pub sheet_strategy: Option<&'static str>,
    pub header: Option<HeaderLocation>,
    pub label_column: Option<String>,
    pub mapped: Vec<MappedColumn>,
    pub dropped_columns: Vec<String>,
    pub dropped_rows: usize,
    pub missing_values: usize,
}

/// Records extracted from one file plus its audit trail.
#[derive(Debug, Clone)]
pub struct FileExtraction {
    pub records: Vec<TidyRecord>,
    pub audit: FileAudit,
}

/// Failure at some stage of one file, with whatever was learned before it.
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub error: ExtractError,
    pub audit: FileAudit,
}

/// Applies one [`ReportProfile`] to report files.
#[derive(Debug, Clone)]
pub struct Extractor {
    profile: ReportProfile,
    row_filter: RowFilter,
}

impl Extractor {
    pub fn new(profile: ReportProfile) -> anyhow::Result<Self> {
        schema::load::validate(&profile)?;
        let row_filter = RowFilter::new(profile.section_terminator.as_deref())?;
        Ok(Self {
            profile,
            row_filter,
        })
    }

    pub fn profile(&self) -> &ReportProfile {
        &self.profile
    }

    /// Locate, read and extract one report file.
    #[instrument(level = "info", skip(self, path, period), fields(file = %path.display(), period = %period))]
    pub fn extract_file(&self, path: &Path, period: &Period) -> Result<FileExtraction, FileFailure> {
        let located = workbook::locate_sheet(path, &self.profile).map_err(|error| FileFailure {
            error,
            audit: FileAudit::default(),
        })?;

        let mut audit = FileAudit {
            engine: Some(located.engine),
            sheet: Some(located.sheet.clone()),
            sheet_strategy: Some(located.strategy),
            ..FileAudit::default()
        };

        match self.extract_table(&located.table, period, &mut audit) {
            Ok(records) => Ok(FileExtraction { records, audit }),
            Err(error) => Err(FileFailure { error, audit }),
        }
    }

    /// Extract from an already-read grid, following the profile's layout.
    pub fn extract_table(
        &self,
        table: &RawTable,
        period: &Period,
        audit: &mut FileAudit,
    ) -> Result<Vec<TidyRecord>, ExtractError> {
        match &self.profile.layout {
            Layout::Wide => self.extract_wide(table, period, audit),
            Layout::SingleCell {
                row_label,
                label_column,
                column,
            } => extract_cell(
                table,
                period,
                audit,
                row_label,
                *label_column,
                *column,
                &self.profile.targets[0].name,
            ),
        }
    }

    /// Header → reconciliation → filtering → values → long format.
    fn extract_wide(
        &self,
        table: &RawTable,
        period: &Period,
        audit: &mut FileAudit,
    ) -> Result<Vec<TidyRecord>, ExtractError> {
        let profile = &self.profile;

        // 1) header row
        let location = locate_header(table, &profile.header).ok_or_else(|| {
            let (anchor, limit) = profile.primary_anchor();
            ExtractError::HeaderNotFound { anchor, limit }
        })?;
        audit.header = Some(location);
        debug!(row = location.row, strategy = location.strategy, "header located");

        // 2) label column + category mapping
        let headers = header_cells(table.row(location.row).unwrap_or_default());
        let label_col = find_label_column(&headers, &profile.label_keywords).ok_or_else(|| {
            ExtractError::NoLabelColumn {
                keywords: profile.label_keywords.clone(),
            }
        })?;
        audit.label_column = Some(headers[label_col].clone());

        let mapping = reconcile(&headers, &profile.targets, Some(label_col));
        audit.mapped = mapping.columns.clone();
        audit.dropped_columns = mapping.dropped.clone();
        if !mapping.dropped.is_empty() {
            debug!(dropped = ?mapping.dropped, "unmapped columns dropped");
        }
        if mapping.is_empty() {
            return Err(ExtractError::NoMappedColumns);
        }

        // 3) rows; the fixed window only applies when the header came from a fixed layout
        let candidates = data_rows(table, location.row, label_col);
        let total = candidates.len();
        let rows = self.row_filter.apply(candidates, location.window);
        audit.dropped_rows = total - rows.len();

        // 4) numbers + reshape
        let melted = melt(&rows, &mapping, &profile.targets, period);
        audit.missing_values = melted.missing;
        debug!(
            rows = rows.len(),
            dropped_rows = audit.dropped_rows,
            missing = melted.missing,
            records = melted.records.len(),
            "table reshaped"
        );
        Ok(melted.records)
    }
}

/// The figure in `column` of the first row whose label cell contains `row_label`.
fn extract_cell(
    table: &RawTable,
    period: &Period,
    audit: &mut FileAudit,
    row_label: &str,
    label_column: usize,
    column: usize,
    category: &str,
) -> Result<Vec<TidyRecord>, ExtractError> {
    let wanted = norm_text(row_label);
    let (row, _) = table
        .rows()
        .find(|(idx, _)| norm_text(table.cell(*idx, label_column)).contains(&wanted))
        .ok_or_else(|| ExtractError::RowNotFound {
            label: row_label.to_string(),
        })?;

    let label = collapse_ws(table.cell(row, label_column));
    audit.label_column = Some(collapse_ws(table.cell(0, label_column)));
    audit.mapped = vec![MappedColumn {
        column,
        header: collapse_ws(table.cell(0, column)),
        category: category.to_string(),
    }];
    debug!(row, column, label = %label, "value row located");

    match parse_number(table.cell(row, column)) {
        Some(value) => Ok(vec![TidyRecord {
            year: period.year,
            date: period.date,
            sector: label,
            category: category.to_string(),
            value,
        }]),
        None => {
            audit.missing_values = 1;
            Ok(Vec::new())
        }
    }
}
