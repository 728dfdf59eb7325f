//! Task log CSV export

use std::io::Write;
use std::path::Path;

use dockcrew_domain::ExportRow;
use dockcrew_types::{Error, Result};

fn csv_error(e: csv::Error) -> Error {
    Error::Export(format!("CSV write failed: {}", e))
}

/// Write rows as a headered CSV document
pub fn write_task_log<W: Write>(rows: &[ExportRow], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    if rows.is_empty() {
        // serialize() only emits headers alongside the first record
        csv_writer.write_record(ExportRow::HEADERS).map_err(csv_error)?;
    }
    for row in rows {
        csv_writer.serialize(row).map_err(csv_error)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write rows to a CSV file
pub fn export_to_csv(rows: &[ExportRow], output_path: &Path) -> Result<()> {
    let file = std::fs::File::create(output_path)?;
    write_task_log(rows, file)?;
    tracing::info!(rows = rows.len(), path = %output_path.display(), "task log written");
    Ok(())
}

/// Render rows as a CSV string
pub fn task_log_string(rows: &[ExportRow]) -> Result<String> {
    let mut buffer = Vec::new();
    write_task_log(rows, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| Error::Export(e.to_string()))
}
