use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use tokio::sync::{Mutex, RwLock};

/// A concurrent map whose values are created at most once per key.
///
/// This is the lazily-initialized lookup table behind the session registry:
/// the first caller for a key runs the async initializer, every concurrent
/// caller for that key waits for it, and later callers take the fast read
/// path without ever touching the creation lock.
///
/// The creation lock is a single mutex rather than per-key, so concurrent
/// first accesses to *different* keys serialize. Initialization happens a
/// handful of times over a process lifetime; keeping one lock is simpler
/// than a striped scheme and the steady-state path never acquires it.
pub struct OnceMap<K, V> {
    entries: RwLock<HashMap<K, V>>,
    init: Mutex<()>,
}

impl<K, V> OnceMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            init: Mutex::new(()),
        }
    }

    /// Look up a value without initializing it
    pub async fn get(&self, key: &K) -> Option<V> {
        self.entries.read().await.get(key).cloned()
    }

    /// Fetch the value for `key`, running `init` to create it if absent.
    ///
    /// If `init` fails nothing is inserted and the error is returned; a
    /// later call may retry initialization.
    pub async fn get_or_try_init<F, Fut, E>(&self, key: &K, init: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key).await {
            return Ok(value);
        }

        let _guard = self.init.lock().await;

        // Re-check under the creation lock: another caller may have won.
        if let Some(value) = self.entries.read().await.get(key).cloned() {
            return Ok(value);
        }

        let value = init().await?;
        self.entries
            .write()
            .await
            .insert(key.clone(), value.clone());
        Ok(value)
    }

    /// Keys currently present, in no particular order
    pub async fn keys(&self) -> Vec<K> {
        self.entries.read().await.keys().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Remove and return every value
    pub async fn clear(&self) -> Vec<V> {
        self.entries.write().await.drain().map(|(_, v)| v).collect()
    }
}

impl<K, V> Default for OnceMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
