/// Canonical form used whenever a header, sheet name or label is compared:
/// lowercase, trimmed, whitespace runs (newlines included) collapsed to one space,
/// and the accented vowels of the report language folded to plain ASCII.
pub fn norm_text(raw: &str) -> String {
    let folded: String = raw
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' => 'u',
            other => other,
        })
        .collect();
    collapse_ws(&folded)
}

/// Trim and collapse internal whitespace runs without changing case.
pub fn collapse_ws(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
