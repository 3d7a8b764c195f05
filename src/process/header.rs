use serde::Serialize;

use super::raw_table::RawTable;
use super::utils::norm_text;
use crate::schema::{HeaderStrategy, RowWindow};

/// Where the header row is and which strategy established it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeaderLocation {
    /// Zero-based grid row.
    pub row: usize,
    /// Set when the header came from a fixed layout; data rows must stay inside it.
    pub window: Option<RowWindow>,
    pub strategy: &'static str,
}

/// Index of the first row, among the first `limit`, with a cell equal to `anchor`
/// after normalization. Substring hits do not count.
pub fn find_anchor_row(table: &RawTable, anchor: &str, limit: usize) -> Option<usize> {
    let anchor = norm_text(anchor);
    table
        .rows()
        .take(limit)
        .find(|(_, cells)| cells.iter().any(|c| norm_text(c) == anchor))
        .map(|(idx, _)| idx)
}

/// Try each strategy in order; `None` means the file cannot be parsed.
pub fn locate_header(table: &RawTable, strategies: &[HeaderStrategy]) -> Option<HeaderLocation> {
    strategies.iter().find_map(|strategy| match strategy {
        HeaderStrategy::Anchor {
            label,
            search_limit,
        } => find_anchor_row(table, label, *search_limit).map(|row| HeaderLocation {
            row,
            window: None,
            strategy: "anchor",
        }),
        HeaderStrategy::FixedRow {
            header_row,
            data_rows,
        } => {
            let row = header_row.checked_sub(1)?;
            (row < table.height()).then_some(HeaderLocation {
                row,
                window: Some(*data_rows),
                strategy: "fixed_row",
            })
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> RawTable {
        RawTable::from_rows(
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    fn anchor(limit: usize) -> HeaderStrategy {
        HeaderStrategy::Anchor {
            label: "sector economico".into(),
            search_limit: limit,
        }
    }

    #[test]
    fn finds_shifted_header() {
        let t = grid(&[
            &["Créditos directos por sector económico"],
            &[""],
            &["(En miles de soles)"],
            &["", " Sector\nEconómico ", "Banca Múltiple"],
            &["", "Agricultura", "10"],
        ]);
        assert_eq!(find_anchor_row(&t, "sector economico", 60), Some(3));
    }

    #[test]
    fn title_mentioning_anchor_is_not_a_match() {
        let t = grid(&[&["Créditos por Sector Económico 2024"], &["x"]]);
        assert_eq!(find_anchor_row(&t, "sector economico", 60), None);
    }

    #[test]
    fn respects_search_limit() {
        let mut rows: Vec<Vec<String>> = vec![vec!["nota".to_string()]; 70];
        rows[65] = vec!["Sector Económico".to_string()];
        let t = RawTable::from_rows(rows);
        assert_eq!(locate_header(&t, &[anchor(60)]), None);
        assert_eq!(locate_header(&t, &[anchor(66)]).map(|h| h.row), Some(65));
    }

    #[test]
    fn fixed_row_is_a_fallback() {
        let fixed = HeaderStrategy::FixedRow {
            header_row: 6,
            data_rows: RowWindow { first: 9, last: 24 },
        };
        let mut rows: Vec<Vec<String>> = vec![vec![String::new()]; 30];
        rows[5] = vec!["Sector".to_string(), "Banca Múltiple".to_string()];
        let t = RawTable::from_rows(rows);

        let loc = locate_header(&t, &[anchor(60), fixed.clone()]).unwrap();
        assert_eq!(loc.row, 5);
        assert_eq!(loc.strategy, "fixed_row");
        assert_eq!(loc.window, Some(RowWindow { first: 9, last: 24 }));

        let short = grid(&[&["a"], &["b"]]);
        assert_eq!(locate_header(&short, &[fixed]), None);
    }

    #[test]
    fn anchor_wins_over_fixed_row() {
        let t = grid(&[&["x"], &["Sector Económico", "Total"], &["y"]]);
        let fixed = HeaderStrategy::FixedRow {
            header_row: 1,
            data_rows: RowWindow { first: 2, last: 3 },
        };
        let loc = locate_header(&t, &[anchor(60), fixed]).unwrap();
        assert_eq!((loc.row, loc.strategy, loc.window), (1, "anchor", None));
    }
}
