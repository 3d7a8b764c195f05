//! Workbook builders for pipeline tests.

use anyhow::Result;
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

pub fn init_test_logging() {
    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sectoral_tidy=debug")),
        )
        .with_test_writer()
        .try_init();
}

/// One worksheet: an optional title in A1, then `rows` starting at row `offset`.
pub struct Sheet {
    pub name: String,
    pub title: Option<String>,
    pub offset: u32,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn titled(name: &str, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            title: None,
            offset: 0,
            rows,
        }
    }
}

/// A "Créditos x SE" sheet with the header on row 5 and one row per sector.
pub fn creditos_sheet(sectors: &[(&str, f64)]) -> Sheet {
    let mut rows = vec![vec![
        "Sector Económico".to_string(),
        "Banca Múltiple".to_string(),
        "Total".to_string(),
    ]];
    for (sector, value) in sectors {
        rows.push(vec![sector.to_string(), value.to_string(), value.to_string()]);
    }
    rows.push(vec!["Fuente: SBS".to_string()]);
    Sheet {
        name: "Créditos x SE".into(),
        title: Some("Créditos Directos por Sector Económico".into()),
        offset: 4,
        rows,
    }
}

/// Numeric-looking cells are written as numbers, everything else as text.
pub fn write_workbook(path: &Path, sheets: &[Sheet]) -> Result<()> {
    let mut workbook = Workbook::new();
    for sheet in sheets {
        let ws = workbook.add_worksheet();
        ws.set_name(&sheet.name)?;
        if let Some(title) = &sheet.title {
            ws.write_string(0, 0, title)?;
        }
        for (r, row) in sheet.rows.iter().enumerate() {
            let r = sheet.offset + r as u32;
            for (c, cell) in row.iter().enumerate() {
                let c = c as u16;
                if cell.is_empty() {
                    continue;
                }
                match cell.parse::<f64>() {
                    Ok(v) => {
                        ws.write_number(r, c, v)?;
                    }
                    Err(_) => {
                        ws.write_string(r, c, cell)?;
                    }
                }
            }
        }
    }
    workbook.save(path)?;
    Ok(())
}
