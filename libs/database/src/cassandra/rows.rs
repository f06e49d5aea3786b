use std::collections::{BTreeMap, HashMap, HashSet};

use scylla::client::session::Session;
use scylla::statement::batch::Batch;
use tracing::debug;

use super::CassandraError;
use super::keyspace::ColumnFamily;

/// One row of a column family: the row key plus its column/value pairs.
///
/// Columns are kept in a `BTreeMap`, which matches the lexicographic
/// clustering order of the UTF8 column names on the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowData {
    pub key: String,
    pub columns: BTreeMap<String, String>,
}

/// Read every column of a single row
///
/// Returns an empty map when the row does not exist; errors are reserved
/// for driver failures.
pub async fn read_row(
    session: &Session,
    column_family: &ColumnFamily,
    row_key: &str,
) -> Result<BTreeMap<String, String>, CassandraError> {
    let result = session
        .query_unpaged(select_row_cql(column_family), (row_key,))
        .await
        .map_err(CassandraError::from_execution)?;

    let rows_result = result.into_rows_result().map_err(CassandraError::decode)?;
    let mut columns = BTreeMap::new();
    for row in rows_result
        .rows::<(String, String)>()
        .map_err(CassandraError::decode)?
    {
        let (name, value) = row.map_err(CassandraError::decode)?;
        columns.insert(name, value);
    }
    Ok(columns)
}

/// Read a single column of a single row
///
/// `Ok(None)` when either the row or the column is absent.
pub async fn read_column(
    session: &Session,
    column_family: &ColumnFamily,
    row_key: &str,
    column: &str,
) -> Result<Option<String>, CassandraError> {
    let result = session
        .query_unpaged(select_column_cql(column_family), (row_key, column))
        .await
        .map_err(CassandraError::from_execution)?;

    let rows_result = result.into_rows_result().map_err(CassandraError::decode)?;
    let mut rows = rows_result
        .rows::<(String,)>()
        .map_err(CassandraError::decode)?;
    match rows.next() {
        None => Ok(None),
        Some(row) => {
            let (value,) = row.map_err(CassandraError::decode)?;
            Ok(Some(value))
        }
    }
}

/// Read every row of a column family, in first-seen row order
pub async fn read_all_rows(
    session: &Session,
    column_family: &ColumnFamily,
) -> Result<Vec<RowData>, CassandraError> {
    let result = session
        .query_unpaged(select_all_cql(column_family), &[])
        .await
        .map_err(CassandraError::from_execution)?;

    let rows_result = result.into_rows_result().map_err(CassandraError::decode)?;

    let mut rows: Vec<RowData> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for row in rows_result
        .rows::<(String, String, String)>()
        .map_err(CassandraError::decode)?
    {
        let (key, column, value) = row.map_err(CassandraError::decode)?;
        let position = *index.entry(key.clone()).or_insert_with(|| {
            rows.push(RowData {
                key,
                columns: BTreeMap::new(),
            });
            rows.len() - 1
        });
        rows[position].columns.insert(column, value);
    }
    Ok(rows)
}

/// Write a single column value
pub async fn insert_column(
    session: &Session,
    column_family: &ColumnFamily,
    row_key: &str,
    column: &str,
    value: &str,
) -> Result<(), CassandraError> {
    session
        .query_unpaged(insert_cql(column_family), (row_key, column, value))
        .await
        .map_err(CassandraError::from_execution)?;
    Ok(())
}

/// Write every column of one row as a single mutation batch
pub async fn insert_row(
    session: &Session,
    column_family: &ColumnFamily,
    row_key: &str,
    columns: &HashMap<String, String>,
) -> Result<(), CassandraError> {
    if columns.is_empty() {
        return Ok(());
    }

    let cql = insert_cql(column_family);
    let mut batch = Batch::default();
    let mut values = Vec::with_capacity(columns.len());
    for (column, value) in columns {
        batch.append_statement(cql.as_str());
        values.push((row_key, column.as_str(), value.as_str()));
    }

    execute_batch(session, &batch, values, columns.len()).await
}

/// Write multiple rows of one column family as a single mutation batch
///
/// `rows` maps row key to that row's column/value pairs.
pub async fn insert_rows(
    session: &Session,
    column_family: &ColumnFamily,
    rows: &HashMap<String, HashMap<String, String>>,
) -> Result<(), CassandraError> {
    let cql = insert_cql(column_family);
    let mut batch = Batch::default();
    let mut values = Vec::new();
    for (row_key, columns) in rows {
        for (column, value) in columns {
            batch.append_statement(cql.as_str());
            values.push((row_key.as_str(), column.as_str(), value.as_str()));
        }
    }

    let count = values.len();
    execute_batch(session, &batch, values, count).await
}

/// Write rows spanning several column families as one mutation batch
///
/// `writes` is keyed by (column family name, row key) within `keyspace`.
pub async fn insert_across(
    session: &Session,
    keyspace: &str,
    writes: &HashMap<(String, String), HashMap<String, String>>,
) -> Result<(), CassandraError> {
    let mut batch = Batch::default();
    let mut values = Vec::new();
    for ((family, row_key), columns) in writes {
        let cql = insert_cql(&ColumnFamily::new(keyspace, family));
        for (column, value) in columns {
            batch.append_statement(cql.as_str());
            values.push((row_key.as_str(), column.as_str(), value.as_str()));
        }
    }

    let count = values.len();
    execute_batch(session, &batch, values, count).await
}

/// Delete a single column of a single row
pub async fn delete_column(
    session: &Session,
    column_family: &ColumnFamily,
    row_key: &str,
    column: &str,
) -> Result<(), CassandraError> {
    session
        .query_unpaged(delete_column_cql(column_family), (row_key, column))
        .await
        .map_err(CassandraError::from_execution)?;
    Ok(())
}

/// Delete chosen columns across rows and column families as one batch
///
/// `deletes` is keyed by (column family name, row key) within `keyspace`;
/// each value is the set of column names to remove.
pub async fn delete_columns(
    session: &Session,
    keyspace: &str,
    deletes: &HashMap<(String, String), HashSet<String>>,
) -> Result<(), CassandraError> {
    let mut batch = Batch::default();
    let mut values = Vec::new();
    for ((family, row_key), columns) in deletes {
        let cql = delete_column_cql(&ColumnFamily::new(keyspace, family));
        for column in columns {
            batch.append_statement(cql.as_str());
            values.push((row_key.as_str(), column.as_str()));
        }
    }

    let count = values.len();
    execute_batch(session, &batch, values, count).await
}

/// Delete whole rows as one batch
///
/// `rows` maps column family name to the row keys to remove from it.
pub async fn delete_rows(
    session: &Session,
    keyspace: &str,
    rows: &HashMap<String, HashSet<String>>,
) -> Result<(), CassandraError> {
    let mut batch = Batch::default();
    let mut values = Vec::new();
    for (family, row_keys) in rows {
        let cql = delete_row_cql(&ColumnFamily::new(keyspace, family));
        for row_key in row_keys {
            batch.append_statement(cql.as_str());
            values.push((row_key.as_str(),));
        }
    }

    let count = values.len();
    execute_batch(session, &batch, values, count).await
}

async fn execute_batch(
    session: &Session,
    batch: &Batch,
    values: impl scylla::serialize::batch::BatchValues,
    statements: usize,
) -> Result<(), CassandraError> {
    if statements == 0 {
        return Ok(());
    }

    debug!(statements, "Executing mutation batch");
    session
        .batch(batch, values)
        .await
        .map_err(CassandraError::from_execution)?;
    Ok(())
}

fn select_row_cql(cf: &ColumnFamily) -> String {
    format!("SELECT column1, value FROM {} WHERE key = ?", cf.qualified())
}

fn select_column_cql(cf: &ColumnFamily) -> String {
    format!(
        "SELECT value FROM {} WHERE key = ? AND column1 = ?",
        cf.qualified()
    )
}

fn select_all_cql(cf: &ColumnFamily) -> String {
    format!("SELECT key, column1, value FROM {}", cf.qualified())
}

fn insert_cql(cf: &ColumnFamily) -> String {
    format!(
        "INSERT INTO {} (key, column1, value) VALUES (?, ?, ?)",
        cf.qualified()
    )
}

fn delete_column_cql(cf: &ColumnFamily) -> String {
    format!("DELETE FROM {} WHERE key = ? AND column1 = ?", cf.qualified())
}

fn delete_row_cql(cf: &ColumnFamily) -> String {
    format!("DELETE FROM {} WHERE key = ?", cf.qualified())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> ColumnFamily {
        ColumnFamily::new("metrics", "samples")
    }

    #[test]
    fn test_select_cql_shapes() {
        assert_eq!(
            select_row_cql(&samples()),
            "SELECT column1, value FROM \"metrics\".\"samples\" WHERE key = ?"
        );
        assert_eq!(
            select_column_cql(&samples()),
            "SELECT value FROM \"metrics\".\"samples\" WHERE key = ? AND column1 = ?"
        );
        assert_eq!(
            select_all_cql(&samples()),
            "SELECT key, column1, value FROM \"metrics\".\"samples\""
        );
    }

    #[test]
    fn test_mutation_cql_shapes() {
        assert_eq!(
            insert_cql(&samples()),
            "INSERT INTO \"metrics\".\"samples\" (key, column1, value) VALUES (?, ?, ?)"
        );
        assert_eq!(
            delete_column_cql(&samples()),
            "DELETE FROM \"metrics\".\"samples\" WHERE key = ? AND column1 = ?"
        );
        assert_eq!(
            delete_row_cql(&samples()),
            "DELETE FROM \"metrics\".\"samples\" WHERE key = ?"
        );
    }

    #[test]
    fn test_row_data_columns_sorted() {
        let mut columns = BTreeMap::new();
        columns.insert("b".to_string(), "2".to_string());
        columns.insert("a".to_string(), "1".to_string());
        let row = RowData {
            key: "k".to_string(),
            columns,
        };

        let names: Vec<_> = row.columns.keys().cloned().collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
