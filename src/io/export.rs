//! Export the stock table to CSV.
//!
//! The export is the dashboard's report artifact: a header row with the table's
//! column order, one row per record, no index column. It loads back through
//! `io::ingest` into an equivalent table.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::domain::StockTable;
use crate::error::AppError;

/// Serialize `table` as CSV into any writer.
pub fn export_csv<W: Write>(table: &StockTable, writer: W) -> Result<(), csv::Error> {
    let mut out = csv::WriterBuilder::new().from_writer(writer);

    out.write_record(table.columns())?;
    for row in table.rows() {
        out.write_record(table.fields(row))?;
    }

    out.flush()?;
    Ok(())
}

/// Serialize `table` as CSV bytes.
pub fn export_csv_bytes(table: &StockTable) -> Result<Vec<u8>, AppError> {
    let mut buf = Vec::new();
    export_csv(table, &mut buf).map_err(|e| AppError::new(2, format!("Failed to encode CSV report: {e}")))?;
    Ok(buf)
}

/// Write the CSV report to `path`, replacing any existing file.
///
/// The report is written to a temporary file in the same directory and renamed
/// over `path`, so a failed write leaves the previous report intact.
pub fn write_table_csv(path: &Path, table: &StockTable) -> Result<(), AppError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| AppError::new(2, format!("Failed to create report CSV '{}': {e}", path.display())))?;

    export_csv(table, tmp.as_file_mut())
        .map_err(|e| AppError::new(2, format!("Failed to write report CSV '{}': {e}", path.display())))?;

    tmp.persist(path)
        .map_err(|e| AppError::new(2, format!("Failed to save report CSV '{}': {}", path.display(), e.error)))?;

    tracing::info!(path = %path.display(), rows = table.len(), "wrote stock report");
    Ok(())
}
