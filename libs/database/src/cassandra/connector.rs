use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use scylla::client::PoolSize;
use scylla::client::execution_profile::ExecutionProfile;
use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use scylla::errors::{DbError, ExecutionError, NewSessionError, RequestAttemptError};
use tracing::{debug, info, warn};

use super::CassandraConfig;
use super::health::cluster_info;
use crate::common::{RetryConfig, retry, retry_with_backoff};

/// Error type for Cassandra operations
///
/// Driver failures are folded into a small taxonomy: session establishment,
/// statement execution, timeout, not-found, connection, keyspace/DDL, and
/// configuration errors. Timeouts are split out of the generic execution
/// error because callers commonly treat them differently.
#[derive(Debug, thiserror::Error)]
pub enum CassandraError {
    #[error("Session error: {0}")]
    Session(#[from] NewSessionError),

    #[error("Execution error: {0}")]
    Execution(#[source] ExecutionError),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Keyspace error: {0}")]
    Keyspace(String),

    #[error("Result decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(#[from] core_config::ConfigError),
}

impl CassandraError {
    /// Classify a driver execution error, separating server-side timeouts
    pub(crate) fn from_execution(err: ExecutionError) -> Self {
        match &err {
            ExecutionError::LastAttemptError(RequestAttemptError::DbError(db_error, _)) => {
                match db_error {
                    DbError::ReadTimeout { .. } | DbError::WriteTimeout { .. } => {
                        CassandraError::Timeout(err.to_string())
                    }
                    _ => CassandraError::Execution(err),
                }
            }
            _ => CassandraError::Execution(err),
        }
    }

    pub(crate) fn decode(err: impl std::fmt::Display) -> Self {
        CassandraError::Decode(err.to_string())
    }
}

/// Cassandra session handle shared between callers
pub type CassandraSession = Arc<Session>;

/// Connect to Cassandra/ScyllaDB with default settings
///
/// # Example
/// ```ignore
/// use database::cassandra::connect;
///
/// let session = connect(&["127.0.0.1:9042"]).await?;
/// session.query_unpaged("SELECT * FROM system.local", &[]).await?;
/// ```
pub async fn connect(
    contact_points: &[impl AsRef<str>],
) -> Result<CassandraSession, CassandraError> {
    let points: Vec<&str> = contact_points.iter().map(|s| s.as_ref()).collect();
    info!("Attempting to connect to Cassandra at {:?}", points);

    let session: Session = SessionBuilder::new()
        .known_nodes(&points)
        .connection_timeout(Duration::from_secs(10))
        .build()
        .await?;

    verify(&session).await?;

    info!("Successfully connected to Cassandra");
    Ok(Arc::new(session))
}

/// Connect using a [`CassandraConfig`]
///
/// Applies pool sizing, timeouts, and credentials from the config. The
/// session is deliberately not bound to any keyspace so the same
/// configuration can be used to create keyspaces that do not exist yet;
/// statements built by this crate qualify their table names instead.
pub async fn connect_from_config(
    config: &CassandraConfig,
) -> Result<CassandraSession, CassandraError> {
    info!(
        cluster = %config.cluster_name,
        "Attempting to connect to Cassandra at {:?}",
        config.contact_points
    );
    debug!(
        cql_version = %config.cql_version,
        cassandra_version = %config.cassandra_version,
        "Configured target versions"
    );

    let points: Vec<&str> = config.contact_points.iter().map(|s| s.as_str()).collect();

    let profile = ExecutionProfile::builder()
        .request_timeout(Some(Duration::from_secs(config.request_timeout_secs)))
        .build();

    let pool_connections = NonZeroUsize::new(config.initial_connections_per_host)
        .unwrap_or(NonZeroUsize::MIN);

    let mut builder = SessionBuilder::new()
        .known_nodes(&points)
        .connection_timeout(Duration::from_secs(config.connect_timeout_secs))
        .pool_size(PoolSize::PerHost(pool_connections))
        .default_execution_profile_handle(profile.into_handle());

    if let (Some(username), Some(password)) = (&config.username, &config.password) {
        builder = builder.user(username, password);
    }

    let session: Session = builder.build().await?;

    let info = cluster_info(&session).await?;
    match info.cluster_name.as_deref() {
        Some(name) if name != config.cluster_name => {
            warn!(
                configured = %config.cluster_name,
                actual = %name,
                "Connected cluster name differs from configuration"
            );
        }
        _ => {}
    }

    info!(
        cluster = info.cluster_name.as_deref().unwrap_or("unknown"),
        version = info.release_version.as_deref().unwrap_or("unknown"),
        "Successfully connected to Cassandra"
    );
    Ok(Arc::new(session))
}

/// Connect with automatic retry on failure
///
/// Uses exponential backoff with jitter; useful for transient network
/// issues during startup.
pub async fn connect_with_retry(
    contact_points: &[impl AsRef<str> + Clone],
    retry_config: Option<RetryConfig>,
) -> Result<CassandraSession, CassandraError> {
    let points: Vec<String> = contact_points
        .iter()
        .map(|s| s.as_ref().to_string())
        .collect();

    match retry_config {
        Some(config) => {
            retry_with_backoff(
                || {
                    let p = points.clone();
                    async move { connect(&p).await }
                },
                config,
            )
            .await
        }
        None => {
            retry(|| {
                let p = points.clone();
                async move { connect(&p).await }
            })
            .await
        }
    }
}

/// Connect from config with automatic retry on failure
pub async fn connect_from_config_with_retry(
    config: &CassandraConfig,
    retry_config: Option<RetryConfig>,
) -> Result<CassandraSession, CassandraError> {
    let config_clone = config.clone();

    match retry_config {
        Some(retry_cfg) => {
            retry_with_backoff(|| connect_from_config(&config_clone), retry_cfg).await
        }
        None => retry(|| connect_from_config(&config_clone)).await,
    }
}

async fn verify(session: &Session) -> Result<(), CassandraError> {
    session
        .query_unpaged("SELECT release_version FROM system.local", &[])
        .await
        .map_err(|e| CassandraError::ConnectionFailed(e.to_string()))?;
    Ok(())
}
