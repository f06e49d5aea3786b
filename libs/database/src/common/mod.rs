//! Utilities shared by the database connectors

pub mod once_map;
pub mod retry;

pub use once_map::OnceMap;
pub use retry::{RetryConfig, retry, retry_with_backoff};
