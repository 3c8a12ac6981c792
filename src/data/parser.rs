use std::collections::HashSet;

use crate::state::device_record::REQUIRED_COLUMNS;

/// How many leading rows are searched for the header.
pub const HEADER_SCAN_ROWS: usize = 50;

/// Normalized header cell: trimmed and lower-cased.
pub fn normalize_header(cell: &str) -> String {
    cell.trim().to_lowercase()
}

/// Find the header row: the first row within `max_rows` whose cells contain
/// every required column. Title lines or notes above the table are skipped
/// this way. Falls back to row 0.
pub fn detect_header_row(rows: &[Vec<String>], max_rows: usize) -> usize {
    for (i, row) in rows.iter().take(max_rows).enumerate() {
        let cells: HashSet<String> = row.iter().map(|c| normalize_header(c)).collect();
        if REQUIRED_COLUMNS.iter().all(|col| cells.contains(*col)) {
            return i;
        }
    }
    0
}

/// Decode file bytes as UTF-8, falling back to latin1 where each byte maps
/// to the same code point.
pub fn decode_text(content: Vec<u8>) -> String {
    match String::from_utf8(content) {
        Ok(text) => text,
        Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
    }
}

/// A row with no content in any cell.
pub fn is_blank_row<S: AsRef<str>>(row: &[S]) -> bool {
    row.iter().all(|c| c.as_ref().trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn header_found_below_title_lines() {
        let rows = vec![
            row(&["Edge devices 2024"]),
            row(&[""]),
            row(&[" Name ", "PMIN", "pmax", "fmin", "fmax", "notes"]),
            row(&["A", "1", "2", "3", "4", ""]),
        ];
        assert_eq!(detect_header_row(&rows, HEADER_SCAN_ROWS), 2);
    }

    #[test]
    fn missing_header_falls_back_to_first_row() {
        let rows = vec![row(&["a", "b"]), row(&["1", "2"])];
        assert_eq!(detect_header_row(&rows, HEADER_SCAN_ROWS), 0);
    }

    #[test]
    fn latin1_bytes_are_decoded() {
        let text = decode_text(vec![b'W', 0xE4, b't', b't']);
        assert_eq!(text, "W\u{e4}tt");
    }

    #[test]
    fn blank_rows_are_detected() {
        assert!(is_blank_row(&row(&["", "  "])));
        assert!(!is_blank_row(&row(&["", "x"])));
    }
}
