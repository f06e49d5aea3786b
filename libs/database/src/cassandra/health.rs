use scylla::client::session::Session;

use super::CassandraError;

/// Basic liveness probe: can the node answer a trivial query
pub async fn ping(session: &Session) -> bool {
    session
        .query_unpaged("SELECT release_version FROM system.local", &[])
        .await
        .is_ok()
}

/// Identity of the node answering `system.local`
#[derive(Debug, Clone)]
pub struct ClusterInfo {
    pub cluster_name: Option<String>,
    pub datacenter: Option<String>,
    pub rack: Option<String>,
    pub release_version: Option<String>,
}

/// Read cluster identity from `system.local`
///
/// Used after connecting to log the server-reported cluster name and to
/// warn when it does not match the configured one.
pub async fn cluster_info(session: &Session) -> Result<ClusterInfo, CassandraError> {
    let result = session
        .query_unpaged(
            "SELECT cluster_name, data_center, rack, release_version FROM system.local",
            &[],
        )
        .await
        .map_err(CassandraError::from_execution)?;

    let rows_result = result.into_rows_result().map_err(CassandraError::decode)?;
    let mut rows = rows_result
        .rows::<(Option<String>, Option<String>, Option<String>, Option<String>)>()
        .map_err(CassandraError::decode)?;

    match rows.next() {
        None => Err(CassandraError::NotFound(
            "system.local returned no rows".to_string(),
        )),
        Some(row) => {
            let (cluster_name, datacenter, rack, release_version) =
                row.map_err(CassandraError::decode)?;
            Ok(ClusterInfo {
                cluster_name,
                datacenter,
                rack,
                release_version,
            })
        }
    }
}
