//! Job returner that stores job results in etcd.
//!
//! This crate is the storage side of a job-execution framework: after a job
//! runs, the framework hands each minion's return to the returner, which
//! writes it into a hierarchical etcd key space. The same key space answers
//! questions about past jobs and minions.
//!
//! - Key layout under a configurable root (see [`keys`])
//! - etcd v2 keys API client with basic auth and TLS
//! - In-memory store with the same semantics for tests and local use
//! - Timestamp job id generation
//!
//! # Quick Start
//!
//! ```no_run
//! use etcd_returner::{EtcdReturner, JobReturn, Opts, Returner};
//! use serde_json::json;
//!
//! # async fn example() -> etcd_returner::ReturnerResult<()> {
//! let opts = Opts::from_path("/etc/salt/master")?;
//! let returner = EtcdReturner::load()?;
//!
//! let jid = returner.prep_jid(&opts, false, None);
//! let ret = JobReturn::new("web1", jid.clone(), json!(true))
//!     .with_field("fun", json!("test.ping"));
//! returner.returner(&opts, &ret).await?;
//!
//! let returns = returner.get_jid(&opts, &jid).await?;
//! assert_eq!(returns["web1"].ret, json!(true));
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Key | Description |
//! |-----|-------------|
//! | `etcd.host`, `etcd.port` | Endpoint (default `127.0.0.1:2379`), top level or per profile |
//! | `etcd.username`, `etcd.password` | Basic auth credentials, set together |
//! | `etcd.ca`, `etcd.client_cert`, `etcd.client_key` | TLS material (switches to https) |
//! | `etcd.ttl` | TTL in seconds for written keys, top level or per profile |
//! | `etcd.returner` | Default profile name |
//! | `etcd.returner_root` | Key space root (default `/salt/return`) |
//! | `etcd.returner_read_profile` | Profile used by `get_load` |
//! | `etcd.returner_write_profile` | Profile used by `returner` and `save_load` |
//! | `unique_jid`, `utc_jid` | Job id generation flags |

#[cfg(feature = "http")]
pub mod client;
pub mod config;
pub mod connector;
pub mod error;
pub mod jid;
pub mod keys;
pub mod opts;
pub mod record;
pub mod returner;
pub mod store;
pub mod tree;

/// Name the host framework selects this returner by.
pub const VIRTUAL_NAME: &str = "etcd";

// Re-export main types
#[cfg(feature = "http")]
pub use client::EtcdClient;
pub use config::EtcdConfig;
#[cfg(feature = "http")]
pub use connector::HttpConnector;
pub use connector::{resolve, Connector, StaticConnector};
pub use error::{ReturnerError, ReturnerResult};
pub use jid::{is_jid, jid_to_time, JidGenerator, TimestampJidGenerator};
pub use keys::{KeyPath, KeySpace, DEFAULT_ROOT, LOAD_KEY};
pub use opts::Opts;
pub use record::{FunMatches, JobReturn, JobReturns, MinionReturn};
pub use returner::{EtcdReturner, Returner};
pub use store::{KvStore, MemoryStore};
pub use tree::{Node, Tree};
