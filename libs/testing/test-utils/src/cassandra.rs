//! Contact-point discovery for live-cluster tests
//!
//! Tests that talk to a real Cassandra/ScyllaDB node are marked `#[ignore]`
//! and read their contact points from `CASSANDRA_CONTACT_POINTS`
//! (comma-separated), defaulting to a local single node.

/// Contact points for the test cluster
pub fn contact_points() -> Vec<String> {
    std::env::var("CASSANDRA_CONTACT_POINTS")
        .unwrap_or_else(|_| "127.0.0.1:9042".to_string())
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
