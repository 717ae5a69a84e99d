//! In-memory implementation of [`KvStore`].
//!
//! Mirrors the etcd v2 data model closely enough for tests and local use:
//! directories are implicit, a value cannot be written over a directory (or
//! beneath a value), and expired keys disappear on the next read.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::KvStore;
use crate::error::{ReturnerError, ReturnerResult};
use crate::keys::{KeyPath, SEPARATOR};
use crate::tree::Tree;

const NOT_A_FILE: u64 = 102;
const NOT_A_DIRECTORY: u64 = 104;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

/// Store backed by a shared in-process map. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<BTreeMap<KeyPath, Entry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live keys currently stored, in key order.
    pub async fn keys(&self) -> Vec<KeyPath> {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .iter()
            .filter(|(_, entry)| entry.is_live(now))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Remaining lifetime of a key, if it was written with a TTL.
    pub async fn ttl(&self, key: &KeyPath) -> Option<Duration> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        let entry = entries.get(key).filter(|entry| entry.is_live(now))?;
        entry.expires_at.map(|at| at.saturating_duration_since(now))
    }

    fn dir_prefix(key: &KeyPath) -> String {
        if key.is_root() {
            key.as_str().to_string()
        } else {
            format!("{}{}", key.as_str(), SEPARATOR)
        }
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn set(&self, key: &KeyPath, value: &str, ttl: Option<u64>) -> ReturnerResult<()> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        // Keys beneath `key` sort contiguously from `key/`.
        let prefix = Self::dir_prefix(key);
        let below: Vec<(KeyPath, bool)> = entries
            .range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded))
            .take_while(|(existing, _)| existing.as_str().starts_with(&prefix))
            .map(|(existing, entry)| (existing.clone(), entry.is_live(now)))
            .collect();
        if below.iter().any(|(_, live)| *live) {
            return Err(ReturnerError::Store {
                code: NOT_A_FILE,
                key: key.to_string(),
                message: "Not a file".to_string(),
            });
        }
        for (expired, _) in below {
            entries.remove(&expired);
        }

        let mut ancestor = KeyPath::new("/");
        let segments: Vec<&str> = key.segments().collect();
        for segment in segments.iter().take(segments.len().saturating_sub(1)) {
            ancestor = ancestor.join(segment);
            let Some(entry) = entries.get(&ancestor) else {
                continue;
            };
            if !entry.is_live(now) {
                entries.remove(&ancestor);
            } else {
                return Err(ReturnerError::Store {
                    code: NOT_A_DIRECTORY,
                    key: ancestor.to_string(),
                    message: "Not a directory".to_string(),
                });
            }
        }

        entries.insert(
            key.clone(),
            Entry {
                value: value.to_string(),
                expires_at: ttl.map(|secs| now + Duration::from_secs(secs)),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &KeyPath) -> ReturnerResult<String> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if entry.is_live(now) => Ok(entry.value.clone()),
            _ => Err(ReturnerError::KeyNotFound {
                key: key.to_string(),
            }),
        }
    }

    async fn tree(&self, key: &KeyPath) -> ReturnerResult<Tree> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        let mut tree = Tree::new();

        for (path, entry) in entries.iter().filter(|(_, entry)| entry.is_live(now)) {
            if let Some(segments) = path.relative_to(key) {
                if segments.is_empty() {
                    return Err(ReturnerError::Store {
                        code: NOT_A_DIRECTORY,
                        key: key.to_string(),
                        message: "Not a directory".to_string(),
                    });
                }
                tree.insert_path(&segments, entry.value.clone());
            }
        }

        if tree.is_empty() && !key.is_root() {
            return Err(ReturnerError::KeyNotFound {
                key: key.to_string(),
            });
        }
        Ok(tree)
    }
}
