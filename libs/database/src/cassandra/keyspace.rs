use scylla::client::session::Session;
use tracing::info;

use super::CassandraError;

/// Options applied when creating a keyspace
///
/// Defaults mirror a development cluster: `SimpleStrategy` with a
/// replication factor of 1.
#[derive(Clone, Debug)]
pub struct KeyspaceOptions {
    pub strategy_class: String,
    pub replication_factor: u32,
}

impl Default for KeyspaceOptions {
    fn default() -> Self {
        Self {
            strategy_class: "SimpleStrategy".to_string(),
            replication_factor: 1,
        }
    }
}

impl KeyspaceOptions {
    pub fn with_replication_factor(mut self, factor: u32) -> Self {
        self.replication_factor = factor;
        self
    }
}

/// Handle to a column family (table) within a keyspace.
///
/// A lightweight value object constructed per call; holds only names, never
/// a connection. The schema this crate creates for a column family is the
/// CQL image of the classic wide row with UTF8 key, comparator, and value:
///
/// ```text
/// (key text, column1 text, value text, PRIMARY KEY (key, column1))
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnFamily {
    keyspace: String,
    name: String,
}

impl ColumnFamily {
    pub fn new(keyspace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            keyspace: keyspace.into(),
            name: name.into(),
        }
    }

    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fully qualified, quoted table reference for CQL statements
    pub fn qualified(&self) -> String {
        format!("{}.{}", quoted(&self.keyspace), quoted(&self.name))
    }
}

/// Quote an identifier for CQL, escaping embedded quotes
pub(crate) fn quoted(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

/// Create a keyspace if it does not already exist
///
/// # Example
/// ```ignore
/// use database::cassandra::{connect, create_keyspace_if_not_exists};
///
/// let session = connect(&["127.0.0.1:9042"]).await?;
/// create_keyspace_if_not_exists(&session, "metrics", &Default::default()).await?;
/// ```
pub async fn create_keyspace_if_not_exists(
    session: &Session,
    keyspace: &str,
    options: &KeyspaceOptions,
) -> Result<(), CassandraError> {
    session
        .query_unpaged(create_keyspace_cql(keyspace, options), &[])
        .await
        .map_err(|e| CassandraError::Keyspace(e.to_string()))?;

    info!(keyspace, "Keyspace ready");
    Ok(())
}

/// Drop a keyspace and everything in it
pub async fn drop_keyspace(session: &Session, keyspace: &str) -> Result<(), CassandraError> {
    info!(keyspace, "Dropping keyspace");
    session
        .query_unpaged(format!("DROP KEYSPACE IF EXISTS {}", quoted(keyspace)), &[])
        .await
        .map_err(|e| CassandraError::Keyspace(e.to_string()))?;
    Ok(())
}

/// Create a column family with the fixed wide-row schema
pub async fn create_column_family(
    session: &Session,
    column_family: &ColumnFamily,
) -> Result<(), CassandraError> {
    session
        .query_unpaged(create_column_family_cql(column_family), &[])
        .await
        .map_err(|e| CassandraError::Keyspace(e.to_string()))?;

    info!(
        keyspace = column_family.keyspace(),
        column_family = column_family.name(),
        "Column family ready"
    );
    Ok(())
}

/// Drop a column family
pub async fn drop_column_family(
    session: &Session,
    column_family: &ColumnFamily,
) -> Result<(), CassandraError> {
    session
        .query_unpaged(
            format!("DROP TABLE IF EXISTS {}", column_family.qualified()),
            &[],
        )
        .await
        .map_err(|e| CassandraError::Keyspace(e.to_string()))?;
    Ok(())
}

fn create_keyspace_cql(keyspace: &str, options: &KeyspaceOptions) -> String {
    format!(
        "CREATE KEYSPACE IF NOT EXISTS {} WITH replication = {{'class': '{}', 'replication_factor': {}}}",
        quoted(keyspace),
        options.strategy_class,
        options.replication_factor
    )
}

fn create_column_family_cql(column_family: &ColumnFamily) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (key text, column1 text, value text, PRIMARY KEY (key, column1))",
        column_family.qualified()
    )
}
