use crate::data::loader::LoadedData;
use crate::data::parser::{is_blank_row, normalize_header};
use crate::error::LoadError;
use crate::state::device_record::{DeviceRecord, REQUIRED_COLUMNS};

/// Positions of the required columns in a loaded table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub name: usize,
    pub pmin: usize,
    pub pmax: usize,
    pub fmin: usize,
    pub fmax: usize,
}

impl ColumnMap {
    /// Match required columns case-insensitively. All missing columns are
    /// reported at once.
    pub fn resolve(columns: &[String]) -> Result<Self, LoadError> {
        let normalized: Vec<String> = columns.iter().map(|c| normalize_header(c)).collect();
        let find = |wanted: &str| normalized.iter().position(|c| c == wanted);

        let mut missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| find(**col).is_none())
            .map(|col| col.to_string())
            .collect();
        if !missing.is_empty() {
            missing.sort();
            return Err(LoadError::MissingColumns(missing));
        }

        // every lookup succeeded above
        let idx = |wanted: &str| find(wanted).unwrap_or_default();
        Ok(Self {
            name: idx("name"),
            pmin: idx("pmin"),
            pmax: idx("pmax"),
            fmin: idx("fmin"),
            fmax: idx("fmax"),
        })
    }
}

/// Turn a loaded table into device records, keeping file order.
///
/// Blank rows are skipped. Range checks are left to the geometry engine so
/// a bad row can still be shown and fixed in the table.
pub fn records_from_table(data: &LoadedData) -> Result<Vec<DeviceRecord>, LoadError> {
    let map = ColumnMap::resolve(&data.columns)?;
    let mut records = Vec::with_capacity(data.row_count);

    for row_idx in 0..data.row_count {
        let row = data.row(row_idx);
        if is_blank_row(&row) {
            continue;
        }

        let number = |col: usize, label: &str| -> Result<f64, LoadError> {
            let raw = row[col].trim();
            raw.parse::<f64>().map_err(|_| LoadError::InvalidValue {
                row: row_idx + 1,
                column: label.to_string(),
                value: raw.to_string(),
            })
        };

        records.push(DeviceRecord {
            name: row[map.name].trim().to_string(),
            pmin: number(map.pmin, "pmin")?,
            pmax: number(map.pmax, "pmax")?,
            fmin: number(map.fmin, "fmin")?,
            fmax: number(map.fmax, "fmax")?,
        });
    }

    tracing::debug!(count = records.len(), "parsed device records");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv_text;

    #[test]
    fn columns_are_matched_in_any_order_and_case() {
        let data = parse_csv_text("FMAX,Name,pmin,PMax,fmin,vendor\n4,A,1,2,3,x\n").unwrap();
        let records = records_from_table(&data).unwrap();
        assert_eq!(records, vec![DeviceRecord::new("A", 1.0, 2.0, 3.0, 4.0)]);
    }

    #[test]
    fn missing_columns_are_listed_together() {
        let data = parse_csv_text("name,pmin,fmax\nA,1,2\n").unwrap();
        match records_from_table(&data) {
            Err(LoadError::MissingColumns(cols)) => assert_eq!(cols, vec!["fmin", "pmax"]),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn non_numeric_cell_reports_row_and_column() {
        let data = parse_csv_text("name,pmin,pmax,fmin,fmax\nA,1,2,3,4\nB,1,two,3,4\n").unwrap();
        match records_from_table(&data) {
            Err(LoadError::InvalidValue { row, column, value }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "pmax");
                assert_eq!(value, "two");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn blank_rows_are_skipped_and_order_kept() {
        let text = "name,pmin,pmax,fmin,fmax\nB,1,2,3,4\n,,,,\nA,5,6,7,8\n";
        let records = records_from_table(&parse_csv_text(text).unwrap()).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn reversed_ranges_are_loaded_for_later_reporting() {
        let text = "name,pmin,pmax,fmin,fmax\nR,10,5,1,2\n";
        let records = records_from_table(&parse_csv_text(text).unwrap()).unwrap();
        assert!(records[0].validate().is_err());
    }
}
