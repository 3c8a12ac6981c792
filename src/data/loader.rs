use std::path::Path;

use crate::data::parser;
use crate::error::LoadError;

/// Result of loading a data file: column names and column data as strings
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedData {
    pub columns: Vec<String>,
    pub column_data: Vec<Vec<String>>, // column-major: column_data[col_idx][row_idx]
    pub row_count: usize,
}

impl LoadedData {
    /// Build the column-major table from row-major cells, using `header_row`
    /// for column names. Short rows are padded with empty strings.
    pub fn from_rows(all_rows: &[Vec<String>], header_row: usize) -> Result<Self, LoadError> {
        if all_rows.is_empty() || header_row >= all_rows.len() {
            return Err(LoadError::Empty);
        }

        let columns: Vec<String> = all_rows[header_row].iter().map(|s| s.trim().to_string()).collect();

        let data_rows = &all_rows[header_row + 1..];
        let num_cols = columns.len();

        let mut column_data: Vec<Vec<String>> = vec![Vec::with_capacity(data_rows.len()); num_cols];
        for row in data_rows {
            for (col_idx, col_data) in column_data.iter_mut().enumerate() {
                col_data.push(row.get(col_idx).cloned().unwrap_or_default());
            }
        }

        Ok(LoadedData {
            columns,
            column_data,
            row_count: data_rows.len(),
        })
    }

    /// Cells of one row, in column order.
    pub fn row(&self, row_idx: usize) -> Vec<&str> {
        self.column_data
            .iter()
            .map(|col| col.get(row_idx).map(String::as_str).unwrap_or(""))
            .collect()
    }
}

/// Load a CSV or Excel file and return the column names and raw string data.
pub fn load_file(path: &Path) -> Result<LoadedData, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let loaded = match ext.as_str() {
        "csv" => load_csv(path),
        "xls" | "xlsx" => load_excel(path),
        _ => Err(LoadError::UnsupportedFormat(ext)),
    }?;
    tracing::info!(
        path = %path.display(),
        rows = loaded.row_count,
        columns = loaded.columns.len(),
        "loaded table"
    );
    Ok(loaded)
}

fn load_csv(path: &Path) -> Result<LoadedData, LoadError> {
    let content = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_csv_text(&parser::decode_text(content))
}

/// Parse CSV text. Malformed records are skipped.
pub fn parse_csv_text(text: &str) -> Result<LoadedData, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut all_rows: Vec<Vec<String>> = Vec::new();
    for (i, result) in reader.records().enumerate() {
        match result {
            Ok(record) => all_rows.push(record.iter().map(|s| s.to_string()).collect()),
            Err(e) => tracing::debug!(line = i + 1, error = %e, "skipping malformed csv record"),
        }
    }

    let header_row = parser::detect_header_row(&all_rows, parser::HEADER_SCAN_ROWS);
    LoadedData::from_rows(&all_rows, header_row)
}

fn load_excel(path: &Path) -> Result<LoadedData, LoadError> {
    use calamine::{open_workbook_auto, Reader};

    let mut workbook = open_workbook_auto(path).map_err(|e| LoadError::Excel(e.to_string()))?;

    let sheet_name = workbook.sheet_names().first().ok_or(LoadError::NoSheets)?.clone();

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| LoadError::Excel(format!("cannot read sheet {sheet_name}: {e}")))?;

    let all_rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    let header_row = parser::detect_header_row(&all_rows, parser::HEADER_SCAN_ROWS);
    LoadedData::from_rows(&all_rows, header_row)
}

fn cell_to_string(cell: &calamine::Data) -> String {
    use calamine::Data;

    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
    }
}
