//! Cassandra/ScyllaDB client utilities
//!
//! A thin layer over the `scylla` driver: per-keyspace session management
//! with a single-creation guarantee, keyspace and column-family DDL helpers,
//! string-keyed row operations batched through CQL mutation batches, and a
//! CSV export of whole column families.
//!
//! All of the heavy lifting (connection pooling, node discovery, retries
//! inside a request, consistency) belongs to the driver; this crate only
//! adds the session registry and map-to-batch translation on top.
//!
//! # Examples
//!
//! ```ignore
//! use database::cassandra::{self, CassandraConfig, SessionRegistry};
//!
//! let config = CassandraConfig::from_properties_file("cassandra.properties")?;
//! let registry = SessionRegistry::new(config);
//!
//! let session = registry.session("metrics").await?;
//! cassandra::create_keyspace_if_not_exists(&session, "metrics", &Default::default()).await?;
//!
//! let cf = cassandra::ColumnFamily::new("metrics", "samples");
//! cassandra::create_column_family(&session, &cf).await?;
//! cassandra::insert_column(&session, &cf, "host-1", "cpu", "0.93").await?;
//!
//! let row = cassandra::read_row(&session, &cf, "host-1").await?;
//! assert_eq!(row.get("cpu").map(String::as_str), Some("0.93"));
//!
//! registry.shutdown().await;
//! ```

pub mod cassandra;
pub mod common;

pub use cassandra::{CassandraConfig, CassandraError, SessionRegistry};
pub use common::{OnceMap, RetryConfig, retry, retry_with_backoff};
