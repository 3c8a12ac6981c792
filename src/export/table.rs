use std::io::Write;
use std::path::Path;

use crate::error::ExportError;
use crate::state::device_record::DeviceRecord;

/// Write the records table with a `name,pmin,pmax,fmin,fmax` header.
pub fn write_records_csv<W: Write>(writer: W, records: &[DeviceRecord]) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    if records.is_empty() {
        wtr.write_record(crate::state::device_record::REQUIRED_COLUMNS)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_records_csv(path: &Path, records: &[DeviceRecord]) -> Result<(), ExportError> {
    let file = std::fs::File::create(path)?;
    write_records_csv(file, records)?;
    tracing::info!(path = %path.display(), rows = records.len(), "exported CSV");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv_text;
    use crate::data::records::records_from_table;
    use crate::state::device_record::sample_records;

    #[test]
    fn csv_has_expected_header_and_rows() {
        let mut buf = Vec::new();
        write_records_csv(&mut buf, &sample_records()[..1]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "name,pmin,pmax,fmin,fmax\nJetson Nano,5.0,10.0,0.2,0.5\n");
    }

    #[test]
    fn exported_table_loads_back() {
        let mut buf = Vec::new();
        write_records_csv(&mut buf, &sample_records()).unwrap();
        let loaded = parse_csv_text(&String::from_utf8(buf).unwrap()).unwrap();
        assert_eq!(records_from_table(&loaded).unwrap(), sample_records());
    }

    #[test]
    fn empty_table_still_has_header() {
        let mut buf = Vec::new();
        write_records_csv(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "name,pmin,pmax,fmin,fmax\n");
    }
}
