// src/pipeline/mod.rs
pub mod dataset;

use anyhow::{bail, Context, Result};
use glob::glob;
use rayon::prelude::*;
use serde::Serialize;
use std::{
    fmt,
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::{info, instrument, warn};

use crate::error::ExtractError;
use crate::period::{Period, PeriodResolver};
use crate::process::{reshape::TidyRecord, Extractor, FileAudit};

pub use dataset::Dataset;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Extracted { records: usize },
    Skipped { kind: &'static str, reason: String },
}

/// Outcome of one input file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: String,
    pub period: Option<Period>,
    #[serde(flatten)]
    pub status: FileStatus,
    pub audit: FileAudit,
}

impl FileReport {
    fn skipped(file: String, period: Option<Period>, error: &ExtractError, audit: FileAudit) -> Self {
        Self {
            file,
            period,
            status: FileStatus::Skipped {
                kind: error.kind(),
                reason: error.to_string(),
            },
            audit,
        }
    }

    pub fn is_extracted(&self) -> bool {
        matches!(self.status, FileStatus::Extracted { .. })
    }
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            FileStatus::Extracted { records } => {
                write!(f, "[OK] {}: {} rows", self.file, records)?;
                if let Some(sheet) = &self.audit.sheet {
                    write!(f, " from sheet '{}'", sheet)?;
                }
                Ok(())
            }
            FileStatus::Skipped { kind, reason } => {
                write!(f, "[SKIP] {} ({}): {}", self.file, kind, reason)
            }
        }
    }
}

/// The sorted dataset plus one report per file seen.
#[derive(Debug)]
pub struct RunOutput {
    pub dataset: Dataset,
    pub reports: Vec<FileReport>,
}

/// Regular files directly inside `dir`, in path order.
pub fn candidate_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("input directory {:?} does not exist", dir);
    }
    let pattern = format!(
        "{}/*",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let mut files: Vec<PathBuf> = glob(&pattern)
        .with_context(|| format!("Failed to read glob pattern '{}'", pattern))?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    Ok(files)
}

fn process_one(
    path: &Path,
    resolver: &PeriodResolver,
    extractor: &Extractor,
) -> (FileReport, Vec<TidyRecord>) {
    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let period = match resolver.resolve(&file) {
        Ok(p) => p,
        Err(e) => {
            return (
                FileReport::skipped(file, None, &e, FileAudit::default()),
                Vec::new(),
            )
        }
    };

    match extractor.extract_file(path, &period) {
        Ok(extraction) => (
            FileReport {
                file,
                period: Some(period),
                status: FileStatus::Extracted {
                    records: extraction.records.len(),
                },
                audit: extraction.audit,
            },
            extraction.records,
        ),
        Err(failure) => (
            FileReport::skipped(file, Some(period), &failure.error, failure.audit),
            Vec::new(),
        ),
    }
}

/// Run every file in `dir` through the extractor and assemble the dataset.
///
/// Files are independent: each runs on the rayon pool the caller installed (or the
/// global one) and a failure only produces a `Skipped` report. The run itself fails
/// with [`ExtractError::EmptyResult`] when no file yields a record.
#[instrument(level = "info", skip(dir, resolver, extractor), fields(dir = %dir.display(), profile = %extractor.profile().name))]
pub fn build_dataset(
    dir: &Path,
    resolver: &PeriodResolver,
    extractor: &Extractor,
) -> Result<RunOutput> {
    let start = Instant::now();
    let files = candidate_files(dir)?;
    info!("{} candidate files", files.len());

    let results: Vec<(FileReport, Vec<TidyRecord>)> = files
        .par_iter()
        .map(|path| process_one(path, resolver, extractor))
        .collect();

    let mut reports = Vec::with_capacity(results.len());
    let mut records = Vec::new();
    for (report, recs) in results {
        if report.is_extracted() {
            info!("{}", report);
        } else {
            warn!("{}", report);
        }
        records.extend(recs);
        reports.push(report);
    }

    if records.is_empty() {
        return Err(ExtractError::EmptyResult {
            scanned: files.len(),
        }
        .into());
    }

    let dataset = Dataset::from_records(extractor.profile(), records);
    let ok = reports.iter().filter(|r| r.is_extracted()).count();
    info!(
        files = files.len(),
        extracted = ok,
        records = dataset.len(),
        elapsed = ?start.elapsed(),
        "dataset built"
    );
    Ok(RunOutput { dataset, reports })
}

#[cfg(test)]
pub(crate) mod fixtures;

#[cfg(test)]
mod tests {
    use super::fixtures::{self, init_test_logging, Sheet};
    use super::*;
    use crate::output;
    use crate::schema::builtin;
    use std::fs;
    use tempfile::tempdir;

    fn creditos() -> Extractor {
        Extractor::new(builtin::creditos()).unwrap()
    }

    fn skipped_kind<'a>(out: &'a RunOutput, file: &str) -> Option<&'a str> {
        out.reports
            .iter()
            .find(|r| r.file == file)
            .and_then(|r| match &r.status {
                FileStatus::Skipped { kind, .. } => Some(*kind),
                FileStatus::Extracted { .. } => None,
            })
    }

    #[test]
    fn skips_unrecognized_names() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        fixtures::write_workbook(
            &dir.path().join("SF-ma2024.xlsx"),
            &[fixtures::creditos_sheet(&[("Agricultura", 10.0), ("Pesca", 20.0)])],
        )?;
        fs::write(dir.path().join("notes.txt"), "not a report")?;

        let out = build_dataset(dir.path(), &PeriodResolver::default(), &creditos())?;

        assert!(!out.dataset.is_empty());
        assert!(out
            .dataset
            .records()
            .iter()
            .all(|r| r.year == 2024 && r.date.to_string() == "2024-03-31"));
        assert_eq!(skipped_kind(&out, "notes.txt"), Some("unrecognized_filename"));
        assert_eq!(out.reports.len(), 2);
        Ok(())
    }

    #[test]
    fn missing_anchor_skips_only_that_file() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        fixtures::write_workbook(
            &dir.path().join("SF-ab2024.xlsx"),
            &[fixtures::creditos_sheet(&[("Pesca", 20.0)])],
        )?;
        // anchor pushed below the 60-row scan limit
        let mut late = fixtures::creditos_sheet(&[("Pesca", 99.0)]);
        late.offset = 70;
        fixtures::write_workbook(&dir.path().join("SF-my2024.xlsx"), &[late])?;

        let out = build_dataset(dir.path(), &PeriodResolver::default(), &creditos())?;

        assert_eq!(skipped_kind(&out, "SF-my2024.xlsx"), Some("header_not_found"));
        assert!(out.dataset.records().iter().all(|r| r.date.to_string() == "2024-04-30"));
        assert!(out.dataset.records().iter().all(|r| r.value != 99.0));
        Ok(())
    }

    #[test]
    fn trailing_corporate_section_is_excluded() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let mut sheet = fixtures::creditos_sheet(&[("Agricultura", 10.0), ("Pesca", 20.0)]);
        sheet.rows.push(vec!["Créditos Corporativos".into(), "5".into(), "5".into()]);
        sheet.rows.push(vec!["Grandes Empresas".into(), "6".into(), "6".into()]);
        sheet.rows.push(vec!["Medianas Empresas".into(), "7".into(), "7".into()]);
        fixtures::write_workbook(&dir.path().join("SF-jn2024.xlsx"), &[sheet])?;

        let out = build_dataset(dir.path(), &PeriodResolver::default(), &creditos())?;

        let mut sectors: Vec<&str> = out.dataset.records().iter().map(|r| r.sector.as_str()).collect();
        sectors.dedup();
        assert_eq!(sectors, vec!["Agricultura", "Pesca"]);
        Ok(())
    }

    #[test]
    fn legacy_extension_with_modern_content_is_read() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        fixtures::write_workbook(
            &dir.path().join("SF-di2024.xls"),
            &[
                Sheet::titled("Indice", vec![vec!["contenido".into()]]),
                fixtures::creditos_sheet(&[("Comercio", 1.5)]),
            ],
        )?;

        let out = build_dataset(dir.path(), &PeriodResolver::default(), &creditos())?;
        let report = &out.reports[0];
        assert_eq!(report.audit.engine, Some(crate::workbook::Engine::Xlsx));
        assert_eq!(report.audit.sheet.as_deref(), Some("Créditos x SE"));
        assert_eq!(report.audit.sheet_strategy, Some("exact"));
        assert_eq!(out.dataset.records()[0].date.to_string(), "2024-12-31");
        Ok(())
    }

    #[test]
    fn unreadable_workbook_is_reported() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        fs::write(dir.path().join("SF-oc2024.xls"), b"garbage bytes")?;
        fixtures::write_workbook(
            &dir.path().join("SF-no2024.xlsx"),
            &[fixtures::creditos_sheet(&[("Pesca", 1.0)])],
        )?;

        let out = build_dataset(dir.path(), &PeriodResolver::default(), &creditos())?;
        assert_eq!(skipped_kind(&out, "SF-oc2024.xls"), Some("workbook_unreadable"));
        assert_eq!(out.dataset.len(), 2);
        Ok(())
    }

    #[test]
    fn empty_run_is_fatal() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        fs::write(dir.path().join("readme.md"), "nothing here")?;
        let err = build_dataset(dir.path(), &PeriodResolver::default(), &creditos()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ExtractError>(),
            Some(&ExtractError::EmptyResult { scanned: 1 })
        );
        assert!(build_dataset(&dir.path().join("missing"), &PeriodResolver::default(), &creditos()).is_err());
        Ok(())
    }

    #[test]
    fn repeated_runs_write_identical_bytes() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        for (name, base) in [("SF-en2024.xlsx", 1.0), ("SF-fe2024.xls", 2.0), ("SF-ma2024.xlsx", 3.0)] {
            fixtures::write_workbook(
                &dir.path().join(name),
                &[fixtures::creditos_sheet(&[("Pesca", base), ("Agricultura", base * 10.0)])],
            )?;
        }

        let out_dir = tempdir()?;
        let mut outputs = Vec::new();
        for i in 0..2 {
            let run = build_dataset(dir.path(), &PeriodResolver::default(), &creditos())?;
            let path = out_dir.path().join(format!("run{}.csv", i));
            output::write_dataset(&run.dataset, &path)?;
            outputs.push(fs::read(&path)?);
        }
        assert_eq!(outputs[0], outputs[1]);

        let text = String::from_utf8(outputs[0].clone())?;
        let first = text.lines().nth(1).unwrap_or_default();
        assert!(first.starts_with("2024,2024-01-31,Agricultura,Banca Múltiple,"), "{first}");
        Ok(())
    }

    #[test]
    fn deposits_yield_one_value_per_period() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        for (name, total) in [("SF-en2024.xlsx", "500"), ("SF-fe2024.xlsx", "650.5")] {
            let row = |label: &str, v: &str| -> Vec<String> {
                vec![label.into(), "".into(), "".into(), "".into(), "".into(), v.into()]
            };
            fixtures::write_workbook(
                &dir.path().join(name),
                &[Sheet::titled(
                    "Ctas BM",
                    vec![row("Concepto", "Monto"), row("Depósitos totales", total)],
                )],
            )?;
        }
        fixtures::write_workbook(
            &dir.path().join("SF-ma2024.xlsx"),
            &[Sheet::titled("Resumen", vec![vec!["Depósitos totales".into()]])],
        )?;

        let extractor = Extractor::new(builtin::depositos())?;
        let out = build_dataset(dir.path(), &PeriodResolver::default(), &extractor)?;

        let values: Vec<(String, f64)> = out
            .dataset
            .records()
            .iter()
            .map(|r| (r.date.to_string(), r.value))
            .collect();
        assert_eq!(
            values,
            vec![("2024-01-31".to_string(), 500.0), ("2024-02-29".to_string(), 650.5)]
        );
        assert_eq!(skipped_kind(&out, "SF-ma2024.xlsx"), Some("sheet_not_found"));
        assert_eq!(out.dataset.columns()[4], "depositos");
        Ok(())
    }
}
