//! CSV serialization of a [`LogTable`].

use std::io::Write;

use crate::error::{Result, SheetError};
use crate::timesheet::LogTable;

/// Writes the header and all rows of `table` to `writer`.
pub fn write_csv<W: Write>(table: &LogTable, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in table.records() {
        csv_writer.write_record(&record).map_err(csv_error)?;
    }
    csv_writer
        .flush()
        .map_err(|e| SheetError::io("<csv output>", e))?;
    Ok(())
}

/// Serializes `table` into an in-memory buffer.
pub fn to_csv_bytes(table: &LogTable) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_csv(table, &mut buffer)?;
    Ok(buffer)
}

fn csv_error(err: csv::Error) -> SheetError {
    let source = match err.into_kind() {
        csv::ErrorKind::Io(io) => io,
        other => std::io::Error::new(std::io::ErrorKind::InvalidData, format!("{other:?}")),
    };
    SheetError::io("<csv output>", source)
}
