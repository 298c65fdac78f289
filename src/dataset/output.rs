use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;
use tracing::info;

use crate::error::Result;
use crate::models::{EnrichedRecord, RECORD_COLUMNS};

/// Write records as CSV. The header is always written, even for an empty set.
pub fn write_records<W: Write>(writer: W, records: &[EnrichedRecord]) -> Result<()> {
    let mut csv_writer = WriterBuilder::new().has_headers(false).from_writer(writer);

    csv_writer.write_record(RECORD_COLUMNS)?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write records to `path`, creating the parent directory if needed.
pub fn save_records<P: AsRef<Path>>(path: P, records: &[EnrichedRecord]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    write_records(file, records)?;
    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}
