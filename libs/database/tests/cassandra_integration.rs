//! Live-cluster integration tests
//!
//! Every test here needs a reachable Cassandra/ScyllaDB node and is marked
//! `#[ignore]`. Run them with:
//!
//! ```text
//! CASSANDRA_CONTACT_POINTS=127.0.0.1:9042 cargo test -p database -- --ignored
//! ```
//!
//! Keyspace and table names derive from the test name, so tests can run
//! concurrently against a shared node and clean up after themselves.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use core_config::Environment;
use database::cassandra::{
    self, CassandraConfig, ColumnFamily, KeyspaceOptions, SessionRegistry,
};
use test_utils::TestDataBuilder;
use test_utils::assertions::assert_some;

fn registry() -> SessionRegistry {
    core_config::tracing::init_tracing(&Environment::Development);
    SessionRegistry::new(CassandraConfig::new(test_utils::cassandra::contact_points()))
}

async fn fresh_column_family(
    registry: &SessionRegistry,
    builder: &TestDataBuilder,
) -> (Arc<cassandra::Session>, ColumnFamily) {
    let keyspace = builder.keyspace();
    let session = registry.session(&keyspace).await.unwrap();
    cassandra::create_keyspace_if_not_exists(&session, &keyspace, &KeyspaceOptions::default())
        .await
        .unwrap();

    let cf = ColumnFamily::new(&keyspace, builder.name("cf", "main"));
    cassandra::create_column_family(&session, &cf).await.unwrap();
    (session, cf)
}

async fn cleanup(registry: &SessionRegistry, keyspace: &str) {
    let session = registry.session(keyspace).await.unwrap();
    cassandra::drop_keyspace(&session, keyspace).await.unwrap();
    registry.shutdown().await;
}

#[tokio::test]
#[ignore] // Requires actual Cassandra
async fn row_lifecycle_roundtrip() {
    let builder = TestDataBuilder::from_test_name("row_lifecycle_roundtrip");
    let registry = registry();
    let (session, cf) = fresh_column_family(&registry, &builder).await;

    // Single column write and read.
    cassandra::insert_column(&session, &cf, "host-1", "cpu", "0.93")
        .await
        .unwrap();
    let value = cassandra::read_column(&session, &cf, "host-1", "cpu")
        .await
        .unwrap();
    assert_eq!(assert_some(value, "cpu column"), "0.93");

    // Whole-row write as one batch.
    let mut columns = HashMap::new();
    columns.insert("mem".to_string(), "2048".to_string());
    columns.insert("disk".to_string(), "80".to_string());
    cassandra::insert_row(&session, &cf, "host-1", &columns)
        .await
        .unwrap();

    let row = cassandra::read_row(&session, &cf, "host-1").await.unwrap();
    assert_eq!(row.len(), 3);
    assert_eq!(row.get("mem").map(String::as_str), Some("2048"));

    // Column delete, then whole-row delete.
    cassandra::delete_column(&session, &cf, "host-1", "cpu")
        .await
        .unwrap();
    let row = cassandra::read_row(&session, &cf, "host-1").await.unwrap();
    assert!(!row.contains_key("cpu"));
    assert_eq!(row.len(), 2);

    let mut deletions = HashMap::new();
    deletions.insert(
        cf.name().to_string(),
        HashSet::from(["host-1".to_string()]),
    );
    cassandra::delete_rows(&session, cf.keyspace(), &deletions)
        .await
        .unwrap();
    let row = cassandra::read_row(&session, &cf, "host-1").await.unwrap();
    assert!(row.is_empty());

    cleanup(&registry, cf.keyspace()).await;
}

#[tokio::test]
#[ignore] // Requires actual Cassandra
async fn multi_row_batches_and_export() {
    let builder = TestDataBuilder::from_test_name("multi_row_batches_and_export");
    let registry = registry();
    let (session, cf) = fresh_column_family(&registry, &builder).await;

    let mut rows = HashMap::new();
    for host in ["host-1", "host-2", "host-3"] {
        let mut columns = HashMap::new();
        columns.insert("cpu".to_string(), format!("load-{host}"));
        if host == "host-3" {
            columns.insert("gpu".to_string(), "1".to_string());
        }
        rows.insert(host.to_string(), columns);
    }
    cassandra::insert_rows(&session, &cf, &rows).await.unwrap();

    let all = cassandra::read_all_rows(&session, &cf).await.unwrap();
    assert_eq!(all.len(), 3);

    // Header union: cpu appears in all rows, gpu only in one.
    let path = std::env::temp_dir().join(format!("{}.csv", builder.keyspace()));
    cassandra::export_column_family(&session, &cf, &path)
        .await
        .unwrap();
    let exported = std::fs::read_to_string(&path).unwrap();
    let header = exported.lines().next().unwrap();
    assert!(header.contains("cpu"));
    assert!(header.contains("gpu"));
    assert_eq!(exported.lines().count(), 4);
    std::fs::remove_file(&path).ok();

    cleanup(&registry, cf.keyspace()).await;
}

#[tokio::test]
#[ignore] // Requires actual Cassandra
async fn batches_span_column_families() {
    let builder = TestDataBuilder::from_test_name("batches_span_column_families");
    let registry = registry();
    let (session, cf_one) = fresh_column_family(&registry, &builder).await;
    let cf_two = ColumnFamily::new(cf_one.keyspace(), builder.name("cf", "aux"));
    cassandra::create_column_family(&session, &cf_two)
        .await
        .unwrap();

    let mut writes = HashMap::new();
    let mut columns = HashMap::new();
    columns.insert("state".to_string(), "up".to_string());
    writes.insert(
        (cf_one.name().to_string(), "host-1".to_string()),
        columns.clone(),
    );
    writes.insert((cf_two.name().to_string(), "host-1".to_string()), columns);
    cassandra::insert_across(&session, cf_one.keyspace(), &writes)
        .await
        .unwrap();

    for cf in [&cf_one, &cf_two] {
        let value = cassandra::read_column(&session, cf, "host-1", "state")
            .await
            .unwrap();
        assert_eq!(assert_some(value, "state column"), "up");
    }

    // Targeted column deletes across both column families in one batch.
    let mut deletes = HashMap::new();
    for cf in [&cf_one, &cf_two] {
        deletes.insert(
            (cf.name().to_string(), "host-1".to_string()),
            HashSet::from(["state".to_string()]),
        );
    }
    cassandra::delete_columns(&session, cf_one.keyspace(), &deletes)
        .await
        .unwrap();
    for cf in [&cf_one, &cf_two] {
        let value = cassandra::read_column(&session, cf, "host-1", "state")
            .await
            .unwrap();
        assert!(value.is_none());
    }

    cleanup(&registry, cf_one.keyspace()).await;
}

#[tokio::test]
#[ignore] // Requires actual Cassandra
async fn unknown_column_family_is_an_error_not_a_panic() {
    let builder = TestDataBuilder::from_test_name("unknown_column_family_is_an_error");
    let registry = registry();
    let keyspace = builder.keyspace();
    let session = registry.session(&keyspace).await.unwrap();
    cassandra::create_keyspace_if_not_exists(&session, &keyspace, &KeyspaceOptions::default())
        .await
        .unwrap();

    let missing = ColumnFamily::new(&keyspace, "never_created");
    assert!(cassandra::read_row(&session, &missing, "k").await.is_err());
    assert!(
        cassandra::insert_column(&session, &missing, "k", "c", "v")
            .await
            .is_err()
    );

    cleanup(&registry, &keyspace).await;
}

#[tokio::test]
#[ignore] // Requires actual Cassandra
async fn concurrent_first_access_opens_one_session() {
    let builder = TestDataBuilder::from_test_name("concurrent_first_access");
    let registry = Arc::new(registry());
    let keyspace = builder.keyspace();

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let keyspace = keyspace.clone();
            tokio::spawn(async move { registry.session(&keyspace).await.unwrap() })
        })
        .collect();

    let sessions = futures::future::join_all(tasks).await;
    let first = sessions[0].as_ref().unwrap();
    for session in &sessions {
        assert!(Arc::ptr_eq(first, session.as_ref().unwrap()));
    }
    assert_eq!(registry.keyspaces().await, vec![keyspace]);

    registry.shutdown().await;
}
