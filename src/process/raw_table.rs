use calamine::{Data, Range};

/// The cell grid of one worksheet, as text, with no header assumed.
///
/// Rows and columns are absolute worksheet positions (zero-based): leading empty
/// rows/columns that the reader trims from its range are padded back in, so row 5
/// here is row 6 in a spreadsheet UI.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn from_range(range: &Range<Data>) -> Self {
        let Some((start_row, start_col)) = range.start() else {
            return Self::default();
        };
        let (start_row, start_col) = (start_row as usize, start_col as usize);

        let mut rows = Vec::with_capacity(start_row + range.height());
        rows.resize_with(start_row, Vec::new);
        for row in range.rows() {
            let mut cells = Vec::with_capacity(start_col + row.len());
            cells.resize(start_col, String::new());
            cells.extend(row.iter().map(cell_to_string));
            rows.push(cells);
        }
        Self { rows }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, idx: usize) -> Option<&[String]> {
        self.rows.get(idx).map(Vec::as_slice)
    }

    /// Cell text, or `""` outside the populated area.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn rows(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.rows.iter().map(Vec::as_slice).enumerate()
    }
}

/// Render a cell the way a text-typed spreadsheet read would: numbers keep their
/// value (`1234` rather than `1234.0`), errors and blanks become empty.
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}
