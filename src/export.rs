//! CSV export of finalized tables.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::EspalierError;
use crate::flatten::types::Table;

/// Write one table as CSV: header row first, then data rows.
///
/// Rows are written as accumulated, so a table that was finalized without
/// declared headers may still carry rows of varying width.
pub fn write_table<W: Write>(table: &Table, writer: W) -> Result<(), EspalierError> {
    let mut csv_writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    csv_writer.write_record(&table.columns)?;
    for row in &table.rows {
        csv_writer.write_record(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write every table to `<out_dir>/<name>.csv`, creating the directory if
/// needed. Returns the paths written.
pub fn write_tables(
    tables: &BTreeMap<String, Table>,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, EspalierError> {
    std::fs::create_dir_all(out_dir)?;

    let mut written = Vec::with_capacity(tables.len());
    for (name, table) in tables {
        let path = out_dir.join(format!("{name}.csv"));
        let file = std::fs::File::create(&path)?;
        write_table(table, file)?;
        log::info!(
            "created CSV: {} ({} rows)",
            path.display(),
            table.row_count()
        );
        written.push(path);
    }
    Ok(written)
}
