use tracing::info;

use super::connector::{CassandraSession, connect_from_config};
use super::{CassandraConfig, CassandraError};
use crate::common::OnceMap;

/// Lazily-initialized map from keyspace name to a live session.
///
/// Sessions are opened on first access per keyspace name and kept for the
/// registry's lifetime: at most one session ever exists per name, concurrent
/// first accesses resolve to the same session, and the map only grows until
/// [`SessionRegistry::shutdown`] sweeps it.
///
/// The registry is a plain value; applications that want a process-wide
/// instance can put one in a `std::sync::OnceLock`.
///
/// # Example
///
/// ```ignore
/// use database::cassandra::{CassandraConfig, SessionRegistry};
///
/// let registry = SessionRegistry::new(CassandraConfig::default());
/// let session = registry.session("metrics").await?;
/// ```
pub struct SessionRegistry {
    config: CassandraConfig,
    sessions: OnceMap<String, CassandraSession>,
}

impl SessionRegistry {
    /// Create a registry; no connections are opened until first use
    pub fn new(config: CassandraConfig) -> Self {
        Self {
            config,
            sessions: OnceMap::new(),
        }
    }

    pub fn config(&self) -> &CassandraConfig {
        &self.config
    }

    /// Fetch the session for a keyspace, connecting on first access.
    ///
    /// The session is not bound to the keyspace on the wire (statements
    /// qualify their table names), so this works for keyspaces that are
    /// about to be created through it.
    pub async fn session(&self, keyspace: &str) -> Result<CassandraSession, CassandraError> {
        self.sessions
            .get_or_try_init(&keyspace.to_string(), || async {
                info!(keyspace, "Opening session for keyspace");
                connect_from_config(&self.config).await
            })
            .await
    }

    /// Names of keyspaces with live sessions, sorted
    pub async fn keyspaces(&self) -> Vec<String> {
        let mut names = self.sessions.keys().await;
        names.sort();
        names
    }

    /// Drop every session.
    ///
    /// The registry stays usable; a later [`SessionRegistry::session`] call
    /// reconnects. Intended for process shutdown.
    pub async fn shutdown(&self) {
        let swept = self.sessions.clear().await;
        info!(sessions = swept.len(), "Shut down Cassandra session registry");
    }
}
