use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use scylla::client::session::Session;
use tracing::info;

use super::CassandraError;
use super::keyspace::ColumnFamily;
use super::rows::{RowData, read_all_rows};

/// CSV export error
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Cassandra(#[from] CassandraError),
}

/// Write rows as CSV: a header of column names, then one record per row.
///
/// The header is the union of column names across all rows, ordered by
/// first appearance; cells for columns a row does not have are left empty.
pub fn write_rows_csv<W: Write>(rows: &[RowData], writer: W) -> Result<(), ExportError> {
    let header = column_header(rows);
    if header.is_empty() {
        return Ok(());
    }

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(&header)?;
    for row in rows {
        let record: Vec<&str> = header
            .iter()
            .map(|column| row.columns.get(*column).map(String::as_str).unwrap_or(""))
            .collect();
        csv_writer.write_record(&record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Dump an entire column family to a CSV file
pub async fn export_column_family(
    session: &Session,
    column_family: &ColumnFamily,
    path: impl AsRef<Path>,
) -> Result<(), ExportError> {
    let rows = read_all_rows(session, column_family).await?;
    let file = File::create(path.as_ref())?;
    write_rows_csv(&rows, BufWriter::new(file))?;

    info!(
        keyspace = column_family.keyspace(),
        column_family = column_family.name(),
        rows = rows.len(),
        path = %path.as_ref().display(),
        "Exported column family to CSV"
    );
    Ok(())
}

/// Union of column names across all rows, in order of first appearance
fn column_header(rows: &[RowData]) -> Vec<&String> {
    let mut header: Vec<&String> = Vec::new();
    for row in rows {
        for name in row.columns.keys() {
            if !header.contains(&name) {
                header.push(name);
            }
        }
    }
    header
}
