// src/workbook/mod.rs
pub mod engine;
pub mod sheet;

use std::path::Path;
use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::process::raw_table::RawTable;
use crate::schema::ReportProfile;
use calamine::Reader;

pub use engine::Engine;
pub use sheet::{default_strategies, SheetStrategy};

/// The worksheet chosen for a file and how it was found.
#[derive(Debug)]
pub struct LocatedSheet {
    pub engine: Engine,
    pub sheet: String,
    /// Name of the sheet strategy that picked `sheet`.
    pub strategy: &'static str,
    pub table: RawTable,
}

/// Open `path` and read the worksheet that best matches the profile's logical sheet.
///
/// Engines are tried in the order [`Engine::candidates`] gives for the extension; the
/// first engine that both opens the workbook and yields the chosen sheet wins.
pub fn locate_sheet(path: &Path, profile: &ReportProfile) -> Result<LocatedSheet, ExtractError> {
    let strategies = default_strategies(profile);
    let mut open_errors = Vec::new();
    let mut opened_any = false;

    for &engine in Engine::candidates(path) {
        let mut workbook = match engine.open(path) {
            Ok(wb) => wb,
            Err(e) => {
                debug!(engine = engine.name(), error = %e, "engine could not open workbook");
                open_errors.push(format!("{}: {}", engine.name(), e));
                continue;
            }
        };
        opened_any = true;

        let names = workbook.sheet_names();
        let Some((sheet, strategy)) = sheet::pick(&strategies, &names) else {
            warn!(engine = engine.name(), sheets = ?names, "no worksheet matched");
            continue;
        };

        match workbook.worksheet_range(&sheet) {
            Ok(range) => {
                debug!(engine = engine.name(), sheet = %sheet, strategy, "sheet selected");
                return Ok(LocatedSheet {
                    engine,
                    sheet,
                    strategy,
                    table: RawTable::from_range(&range),
                });
            }
            Err(e) => {
                warn!(engine = engine.name(), sheet = %sheet, error = %e, "could not read sheet");
            }
        }
    }

    if opened_any {
        Err(ExtractError::SheetNotFound {
            wanted: profile.sheet.clone(),
        })
    } else {
        Err(ExtractError::WorkbookUnreadable(open_errors.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fixtures::{self, Sheet};
    use crate::schema::builtin;
    use tempfile::tempdir;

    #[test]
    fn opened_workbook_without_matching_sheet() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("SF-ab2024.xls");
        fixtures::write_workbook(
            &path,
            &[
                Sheet::titled("Hoja1", vec![vec!["Depósitos totales".into()]]),
                Sheet::titled("Ctas CM", vec![vec!["Depósitos totales".into()]]),
            ],
        )?;

        let err = locate_sheet(&path, &builtin::depositos()).unwrap_err();
        assert_eq!(
            err,
            ExtractError::SheetNotFound {
                wanted: "Ctas BM".into()
            }
        );
        Ok(())
    }

    #[test]
    fn first_sheet_fallback_reads_absolute_rows() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("SF-ab2024.xlsx");
        let mut sheet = Sheet::titled("Hoja1", vec![vec!["x".into(), "1".into()]]);
        sheet.offset = 3;
        fixtures::write_workbook(&path, &[sheet])?;

        let located = locate_sheet(&path, &builtin::creditos())?;
        assert_eq!(located.engine, Engine::Xlsx);
        assert_eq!(located.strategy, "first");
        assert_eq!(located.table.cell(3, 0), "x");
        assert_eq!(located.table.cell(3, 1), "1");
        Ok(())
    }
}
