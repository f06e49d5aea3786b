//! Cassandra/ScyllaDB connector and utilities
//!
//! Built on the `scylla` driver, which speaks CQL to both Apache Cassandra
//! and ScyllaDB. The module provides:
//!
//! - [`CassandraConfig`]: settings from code, environment, or a
//!   `.properties` file
//! - [`SessionRegistry`]: one lazily-created session per keyspace name,
//!   safe under concurrent first access
//! - keyspace and column-family DDL with fixed development defaults
//! - string-keyed row reads, batched writes and deletes
//! - whole-column-family CSV export
//!
//! # Example
//!
//! ```ignore
//! use database::cassandra::{self, CassandraConfig, ColumnFamily, SessionRegistry};
//!
//! let registry = SessionRegistry::new(CassandraConfig::from_env()?);
//! let session = registry.session("metrics").await?;
//!
//! cassandra::create_keyspace_if_not_exists(&session, "metrics", &Default::default()).await?;
//! let cf = ColumnFamily::new("metrics", "samples");
//! cassandra::create_column_family(&session, &cf).await?;
//! cassandra::insert_column(&session, &cf, "host-1", "cpu", "0.93").await?;
//! ```

mod config;
mod connector;
mod export;
mod health;
mod keyspace;
mod registry;
mod rows;

pub use config::{
    CassandraConfig, DEFAULT_CASSANDRA_VERSION, DEFAULT_CLUSTER_NAME, DEFAULT_CQL_VERSION,
    DEFAULT_INITIAL_CONNECTIONS, DEFAULT_MAX_CONNECTIONS, DEFAULT_SEEDS,
};
pub use connector::{
    CassandraError, CassandraSession, connect, connect_from_config,
    connect_from_config_with_retry, connect_with_retry,
};
pub use export::{ExportError, export_column_family, write_rows_csv};
pub use health::{ClusterInfo, cluster_info, ping};
pub use keyspace::{
    ColumnFamily, KeyspaceOptions, create_column_family, create_keyspace_if_not_exists,
    drop_column_family, drop_keyspace,
};
pub use registry::SessionRegistry;
pub use rows::{
    RowData, delete_column, delete_columns, delete_rows, insert_across, insert_column, insert_row,
    insert_rows, read_all_rows, read_column, read_row,
};

// Re-export driver types callers commonly need alongside these helpers.
pub use scylla::client::session::Session;
pub use scylla::client::session_builder::SessionBuilder;
