use chrono::NaiveDate;
use serde::Serialize;

use super::filter::DataRow;
use super::reconcile::ColumnMapping;
use super::values::normalize_column;
use crate::period::Period;
use crate::schema::TargetColumn;

/// One (period, sector, category) observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TidyRecord {
    pub year: i32,
    pub date: NaiveDate,
    pub sector: String,
    pub category: String,
    pub value: f64,
}

/// Result of reshaping one file's filtered rows.
#[derive(Debug, Default)]
pub struct Melted {
    pub records: Vec<TidyRecord>,
    /// Mapped cells that held no usable number.
    pub missing: usize,
}

/// Pivot wide rows into long records, one per present (row, category) cell.
/// Within a row, categories follow `targets` order regardless of source column order.
pub fn melt(
    rows: &[DataRow],
    mapping: &ColumnMapping,
    targets: &[TargetColumn],
    period: &Period,
) -> Melted {
    // each mapped column is normalized as a whole, then read back row by row
    let columns: Vec<(&str, Vec<Option<f64>>)> = targets
        .iter()
        .filter_map(|t| mapping.column_for(&t.name).map(|c| (t.name.as_str(), c)))
        .map(|(category, col)| {
            let cells: Vec<&str> = rows
                .iter()
                .map(|r| r.cells.get(col).map(String::as_str).unwrap_or(""))
                .collect();
            (category, normalize_column(&cells))
        })
        .collect();

    let mut out = Melted::default();
    for (i, row) in rows.iter().enumerate() {
        for (category, values) in &columns {
            match values[i] {
                Some(value) => out.records.push(TidyRecord {
                    year: period.year,
                    date: period.date,
                    sector: row.label.clone(),
                    category: category.to_string(),
                    value,
                }),
                None => out.missing += 1,
            }
        }
    }
    out
}
