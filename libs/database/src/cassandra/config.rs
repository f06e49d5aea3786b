use std::path::Path;

use core_config::properties::Properties;
use core_config::{ConfigError, FromEnv};

// Property file keys.
pub const PROP_CLUSTER_NAME: &str = "ClusterName";
pub const PROP_SEEDS: &str = "Seeds";
pub const PROP_CQL_VERSION: &str = "CqlVersion";
pub const PROP_CASSANDRA_VERSION: &str = "CassandraVersion";
pub const PROP_INITIAL_CONNECTIONS: &str = "InitialConnectionsPerHost";
pub const PROP_MAX_CONNECTIONS: &str = "MaxConnectionsPerHost";
pub const PROP_USERNAME: &str = "Username";
pub const PROP_PASSWORD: &str = "Password";
pub const PROP_CONNECT_TIMEOUT_SECS: &str = "ConnectTimeoutSecs";
pub const PROP_REQUEST_TIMEOUT_SECS: &str = "RequestTimeoutSecs";

// Defaults, documented on the matching fields.
pub const DEFAULT_CLUSTER_NAME: &str = "Test Cluster";
pub const DEFAULT_SEEDS: &str = "localhost:9042";
pub const DEFAULT_CQL_VERSION: &str = "3.0.0";
pub const DEFAULT_CASSANDRA_VERSION: &str = "4.1";
pub const DEFAULT_INITIAL_CONNECTIONS: usize = 1;
pub const DEFAULT_MAX_CONNECTIONS: usize = 2;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Cassandra/ScyllaDB connection settings
///
/// Constructed manually, from environment variables ([`FromEnv`]), or from a
/// `.properties` file ([`CassandraConfig::from_properties_file`]). Every
/// setting has a documented default, so an empty file or environment yields
/// a config for a local single-node cluster.
///
/// # Example
///
/// ```ignore
/// use database::cassandra::CassandraConfig;
///
/// let config = CassandraConfig::new(vec!["127.0.0.1:9042"])
///     .with_cluster_name("metrics-cluster")
///     .with_credentials("user", "password");
/// ```
#[derive(Clone, Debug)]
pub struct CassandraConfig {
    /// Expected cluster name; compared against `system.local` after
    /// connecting and logged as a warning on mismatch. Default: `Test Cluster`.
    pub cluster_name: String,

    /// Seed nodes as host:port pairs. Default: `localhost:9042`.
    pub contact_points: Vec<String>,

    /// CQL version the deployment targets. Informational; the driver
    /// negotiates the protocol itself. Default: `3.0.0`.
    pub cql_version: String,

    /// Cassandra server version the deployment targets. Informational.
    /// Default: `4.1`.
    pub cassandra_version: String,

    /// Connections opened per host. The CQL protocol multiplexes requests,
    /// so this stays small. Default: 1.
    pub initial_connections_per_host: usize,

    /// Upper bound on connections per host. Default: 2.
    pub max_connections_per_host: usize,

    /// Optional username for authentication
    pub username: Option<String>,

    /// Optional password for authentication
    pub password: Option<String>,

    /// Connection timeout in seconds. Default: 10.
    pub connect_timeout_secs: u64,

    /// Request timeout in seconds. Default: 30.
    pub request_timeout_secs: u64,
}

impl CassandraConfig {
    /// Create a config for the given seed nodes, defaults everywhere else
    pub fn new<S: Into<String>>(contact_points: Vec<S>) -> Self {
        Self {
            contact_points: contact_points.into_iter().map(|s| s.into()).collect(),
            ..Self::default()
        }
    }

    pub fn with_cluster_name(mut self, name: impl Into<String>) -> Self {
        self.cluster_name = name.into();
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_connections_per_host(mut self, initial: usize, max: usize) -> Self {
        self.initial_connections_per_host = initial;
        self.max_connections_per_host = max;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    pub fn contact_points(&self) -> &[String] {
        &self.contact_points
    }

    /// Load settings from a `.properties` file
    ///
    /// Recognized keys (all optional): `ClusterName`, `Seeds` (comma
    /// separated), `CqlVersion`, `CassandraVersion`,
    /// `InitialConnectionsPerHost`, `MaxConnectionsPerHost`, `Username`,
    /// `Password`, `ConnectTimeoutSecs`, `RequestTimeoutSecs`.
    ///
    /// A missing or unreadable file is an error; the caller decides whether
    /// that is fatal.
    pub fn from_properties_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_properties(&Properties::load(path)?)
    }

    /// Build a config from already-parsed properties
    pub fn from_properties(props: &Properties) -> Result<Self, ConfigError> {
        let contact_points = split_points(props.get_or(PROP_SEEDS, DEFAULT_SEEDS));
        if contact_points.is_empty() {
            return Err(ConfigError::ParseError {
                key: PROP_SEEDS.to_string(),
                details: "no valid contact points provided".to_string(),
            });
        }

        Ok(Self {
            cluster_name: props.get_or(PROP_CLUSTER_NAME, DEFAULT_CLUSTER_NAME).to_string(),
            contact_points,
            cql_version: props.get_or(PROP_CQL_VERSION, DEFAULT_CQL_VERSION).to_string(),
            cassandra_version: props
                .get_or(PROP_CASSANDRA_VERSION, DEFAULT_CASSANDRA_VERSION)
                .to_string(),
            initial_connections_per_host: props
                .get_parsed_or(PROP_INITIAL_CONNECTIONS, DEFAULT_INITIAL_CONNECTIONS)?,
            max_connections_per_host: props
                .get_parsed_or(PROP_MAX_CONNECTIONS, DEFAULT_MAX_CONNECTIONS)?,
            username: props.get(PROP_USERNAME).map(str::to_string),
            password: props.get(PROP_PASSWORD).map(str::to_string),
            connect_timeout_secs: props
                .get_parsed_or(PROP_CONNECT_TIMEOUT_SECS, DEFAULT_CONNECT_TIMEOUT_SECS)?,
            request_timeout_secs: props
                .get_parsed_or(PROP_REQUEST_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS)?,
        })
    }
}

impl Default for CassandraConfig {
    fn default() -> Self {
        Self {
            cluster_name: DEFAULT_CLUSTER_NAME.to_string(),
            contact_points: vec![DEFAULT_SEEDS.to_string()],
            cql_version: DEFAULT_CQL_VERSION.to_string(),
            cassandra_version: DEFAULT_CASSANDRA_VERSION.to_string(),
            initial_connections_per_host: DEFAULT_INITIAL_CONNECTIONS,
            max_connections_per_host: DEFAULT_MAX_CONNECTIONS,
            username: None,
            password: None,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Load settings from environment variables
///
/// - `CASSANDRA_CONTACT_POINTS` (required) - comma-separated host:port list
/// - `CASSANDRA_CLUSTER_NAME` (optional)
/// - `CASSANDRA_USERNAME` / `CASSANDRA_PASSWORD` (optional)
/// - `CASSANDRA_CONNECT_TIMEOUT_SECS` (optional, default 10)
/// - `CASSANDRA_REQUEST_TIMEOUT_SECS` (optional, default 30)
impl FromEnv for CassandraConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let contact_points_str = core_config::env_required("CASSANDRA_CONTACT_POINTS")?;
        let contact_points = split_points(&contact_points_str);
        if contact_points.is_empty() {
            return Err(ConfigError::ParseError {
                key: "CASSANDRA_CONTACT_POINTS".to_string(),
                details: "no valid contact points provided".to_string(),
            });
        }

        let connect_timeout_secs = core_config::env_or_default(
            "CASSANDRA_CONNECT_TIMEOUT_SECS",
            &DEFAULT_CONNECT_TIMEOUT_SECS.to_string(),
        )
        .parse()
        .map_err(|e| ConfigError::ParseError {
            key: "CASSANDRA_CONNECT_TIMEOUT_SECS".to_string(),
            details: format!("{e}"),
        })?;

        let request_timeout_secs = core_config::env_or_default(
            "CASSANDRA_REQUEST_TIMEOUT_SECS",
            &DEFAULT_REQUEST_TIMEOUT_SECS.to_string(),
        )
        .parse()
        .map_err(|e| ConfigError::ParseError {
            key: "CASSANDRA_REQUEST_TIMEOUT_SECS".to_string(),
            details: format!("{e}"),
        })?;

        Ok(Self {
            cluster_name: core_config::env_or_default("CASSANDRA_CLUSTER_NAME", DEFAULT_CLUSTER_NAME),
            contact_points,
            username: std::env::var("CASSANDRA_USERNAME").ok(),
            password: std::env::var("CASSANDRA_PASSWORD").ok(),
            connect_timeout_secs,
            request_timeout_secs,
            ..Self::default()
        })
    }
}

fn split_points(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
