//! Shared test utilities
//!
//! - [`TestDataBuilder`]: deterministic, test-name derived identifiers so
//!   runs are reproducible and tests do not collide on shared clusters
//! - [`cassandra`]: contact-point discovery for live-cluster tests
//! - [`assertions`]: small assertion helpers
//!
//! # Usage
//!
//! ```rust
//! use test_utils::TestDataBuilder;
//!
//! let builder = TestDataBuilder::from_test_name("my_test");
//! let keyspace = builder.keyspace();
//! let table = builder.name("cf", "main");
//! ```

use uuid::Uuid;

pub mod cassandra;

/// Builder for deterministic test data
///
/// Seeded from the test name so every run of a test generates the same
/// identifiers, while different tests stay disjoint.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with an explicit seed
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from a test name (seed is the name's hash)
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// A keyspace name unique to this test
    pub fn keyspace(&self) -> String {
        format!("test_ks_{}", self.seed)
    }

    /// A namespaced identifier, e.g. `name("cf", "main")` -> `test_cf_<seed>_main`
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test_{}_{}_{}", prefix, self.seed, suffix)
    }

    /// A deterministic UUID derived from the seed
    pub fn uuid(&self) -> Uuid {
        let bytes = self.seed.to_le_bytes();
        let mut uuid_bytes = [0u8; 16];
        uuid_bytes[..8].copy_from_slice(&bytes);
        uuid_bytes[8..16].copy_from_slice(&bytes);
        Uuid::from_bytes(uuid_bytes)
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that an optional value is Some, with context in the panic message
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}
