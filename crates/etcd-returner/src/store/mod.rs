//! Key/value store abstraction used by the returner.
//!
//! The returner only needs three capabilities from the store: write a value
//! with an optional TTL, read a single value, and list a directory
//! recursively. Connection management, authentication and TTL enforcement
//! belong to the implementation.

pub mod memory;

use async_trait::async_trait;

use crate::error::ReturnerResult;
use crate::keys::KeyPath;
use crate::tree::Tree;

pub use memory::MemoryStore;

/// The key/value capability the returner writes to and reads from.
///
/// # Errors
///
/// Reads of a key or directory that does not exist return
/// [`ReturnerError::KeyNotFound`](crate::ReturnerError::KeyNotFound).
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Write `value` at `key`, replacing any previous value.
    ///
    /// With `ttl` set, the key expires after that many seconds.
    async fn set(&self, key: &KeyPath, value: &str, ttl: Option<u64>) -> ReturnerResult<()>;

    /// Read the value stored at `key`.
    async fn get(&self, key: &KeyPath) -> ReturnerResult<String>;

    /// List everything below the directory `key`.
    async fn tree(&self, key: &KeyPath) -> ReturnerResult<Tree>;
}
