//! Flat CSV export of gathered records.

use crate::error::Result;
use kost_core::{ListingRecord, EXPORT_COLUMNS};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Write the header and one row per record to `writer`.
pub fn to_writer<W: Write>(writer: W, records: &[ListingRecord]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(EXPORT_COLUMNS)?;
    for record in records {
        csv.write_record(record.flatten())?;
    }

    csv.flush()?;
    Ok(())
}

/// Write `records` to a UTF-8 CSV file at `path`, creating parent directories.
///
/// An empty slice produces a header-only file. Returns the number of rows written.
pub fn write_csv(path: &Path, records: &[ListingRecord]) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    if records.is_empty() {
        warn!(path = %path.display(), "no data to save, writing header only");
    }

    let file = File::create(path)?;
    to_writer(file, records)?;

    info!(path = %path.display(), entries = records.len(), "data saved");
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kost_core::DetailUrl;

    #[test]
    fn test_header_only_when_empty() {
        let mut out = Vec::new();
        to_writer(&mut out, &[]).expect("write empty export");

        let text = String::from_utf8(out).expect("utf-8 output");
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("name,owner,phone,price,description,url,location.property_name"));
    }

    #[test]
    fn test_quotes_embedded_commas() {
        let url = DetailUrl::new("https://www.sewakost.com/kost/a.html").expect("valid url");
        let mut record = ListingRecord::empty(&url);
        record.facilities.room = vec!["AC".to_string(), "Kamar mandi dalam".to_string()];

        let mut out = Vec::new();
        to_writer(&mut out, &[record]).expect("write export");

        let text = String::from_utf8(out).expect("utf-8 output");
        assert!(text.contains("\"AC, Kamar mandi dalam\""));
    }
}
