// src/error.rs
use thiserror::Error;

/// Why a single report file produced no records, plus the one run-level failure.
///
/// Everything except `EmptyResult` is scoped to one file: the orchestrator logs it,
/// records it in the run report and moves on to the next file.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("unrecognized filename `{0}`")]
    UnrecognizedFilename(String),

    #[error("workbook could not be opened by any engine ({0})")]
    WorkbookUnreadable(String),

    #[error("no usable worksheet for `{wanted}`")]
    SheetNotFound { wanted: String },

    #[error("header anchor `{anchor}` not found within the first {limit} rows")]
    HeaderNotFound { anchor: String, limit: usize },

    #[error("no label column whose header contains {keywords:?}")]
    NoLabelColumn { keywords: Vec<String> },

    #[error("no row labelled `{label}`")]
    RowNotFound { label: String },

    #[error("no column matched the target schema")]
    NoMappedColumns,

    #[error("no records extracted from {scanned} file(s)")]
    EmptyResult { scanned: usize },
}

impl ExtractError {
    /// Short machine-friendly tag used in the JSON run report.
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractError::UnrecognizedFilename(_) => "unrecognized_filename",
            ExtractError::WorkbookUnreadable(_) => "workbook_unreadable",
            ExtractError::SheetNotFound { .. } => "sheet_not_found",
            ExtractError::HeaderNotFound { .. } => "header_not_found",
            ExtractError::NoLabelColumn { .. } => "no_label_column",
            ExtractError::RowNotFound { .. } => "row_not_found",
            ExtractError::NoMappedColumns => "no_mapped_columns",
            ExtractError::EmptyResult { .. } => "empty_result",
        }
    }
}
