/// Text that means "no value" in the reports, compared after stripping whitespace.
const MISSING_MARKERS: &[&str] = &["", "-", "–", "—", "nan", "none"];

/// Parse one report cell into a number.
///
/// Percent signs, whitespace and thousands separators are removed first; dash glyphs
/// and textual nulls become `None`, as does anything still unparseable afterwards.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '%' && *c != ',' && !c.is_whitespace())
        .collect();

    if MISSING_MARKERS
        .iter()
        .any(|m| cleaned.eq_ignore_ascii_case(m))
    {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Normalize a whole column; one bad cell only affects itself.
pub fn normalize_column<S: AsRef<str>>(cells: &[S]) -> Vec<Option<f64>> {
    cells.iter().map(|c| parse_number(c.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_report_formats() {
        assert_eq!(parse_number("1,234"), Some(1234.0));
        assert_eq!(parse_number("12%"), Some(12.0));
        assert_eq!(parse_number("12.5"), Some(12.5));
        assert_eq!(parse_number(" 1,234,567.0 "), Some(1_234_567.0));
        assert_eq!(parse_number("-3.25"), Some(-3.25));
        assert_eq!(parse_number("4.1 %"), Some(4.1));
    }

    #[test]
    fn missing_markers() {
        for raw in ["-", "–", "—", "", "nan", "NaN", "None", "  -  ", "N/D", "n.d.", "inf", "abc"] {
            assert_eq!(parse_number(raw), None, "{raw:?} should be missing");
        }
    }

    #[test]
    fn column_failures_are_local() {
        let col = normalize_column(&["1", "x", "2,000", "—"]);
        assert_eq!(col, vec![Some(1.0), None, Some(2000.0), None]);
    }
}
