//! The returner call surface invoked by the job framework.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::connector::{resolve, Connector, StaticConnector};
use crate::error::{ReturnerError, ReturnerResult};
use crate::jid::{JidGenerator, TimestampJidGenerator};
use crate::keys::KeyPath;
use crate::opts::Opts;
use crate::record::{FunMatches, JobReturn, JobReturns, MinionReturn, FUN_FIELD, RETURN_FIELD};
use crate::store::{KvStore, MemoryStore};
use crate::tree::{Node, Tree};

/// Operations a job-result returner provides to the host framework.
///
/// Every operation receives the host configuration explicitly.
#[async_trait]
pub trait Returner: Send + Sync {
    /// Persist one minion's return for a job.
    async fn returner(&self, opts: &Opts, ret: &JobReturn) -> ReturnerResult<()>;

    /// Persist the load (the job request) for `jid`.
    async fn save_load(
        &self,
        opts: &Opts,
        jid: &str,
        load: &Value,
        minions: Option<&[String]>,
    ) -> ReturnerResult<()>;

    /// Record the minions targeted by a job.
    async fn save_minions(
        &self,
        opts: &Opts,
        jid: &str,
        minions: &[String],
        syndic_id: Option<&str>,
    ) -> ReturnerResult<()>;

    /// Remove expired jobs.
    async fn clean_old_jobs(&self, opts: &Opts) -> ReturnerResult<()>;

    /// The load saved for `jid`.
    async fn get_load(&self, opts: &Opts, jid: &str) -> ReturnerResult<Value>;

    /// Per-minion returns for `jid`.
    async fn get_jid(&self, opts: &Opts, jid: &str) -> ReturnerResult<JobReturns>;

    /// Minions whose latest job ran `fun`.
    async fn get_fun(&self, opts: &Opts, fun: &str) -> ReturnerResult<FunMatches>;

    /// All known job ids, unordered.
    async fn get_jids(&self, opts: &Opts) -> ReturnerResult<Vec<String>>;

    /// All minions that have returned at least once.
    async fn get_minions(&self, opts: &Opts) -> ReturnerResult<Vec<String>>;

    /// `passed_jid` unchanged, or a freshly generated jid.
    fn prep_jid(&self, opts: &Opts, nocache: bool, passed_jid: Option<&str>) -> String;
}

/// Returner storing jobs in an etcd key space.
#[derive(Clone)]
pub struct EtcdReturner {
    connector: Arc<dyn Connector>,
    jids: Arc<dyn JidGenerator>,
}

impl std::fmt::Debug for EtcdReturner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EtcdReturner").finish_non_exhaustive()
    }
}

impl EtcdReturner {
    /// Load the returner backed by the etcd HTTP client.
    ///
    /// Fails with [`ReturnerError::Unavailable`] when the client is not
    /// compiled in; the host should then treat the returner as inactive.
    pub fn load() -> ReturnerResult<Self> {
        #[cfg(feature = "http")]
        {
            Ok(Self::new(Arc::new(crate::connector::HttpConnector)))
        }
        #[cfg(not(feature = "http"))]
        {
            Err(ReturnerError::Unavailable {
                reason: "Could not import etcd returner; etcd client support is not built in"
                    .to_string(),
            })
        }
    }

    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self {
            connector,
            jids: Arc::new(TimestampJidGenerator::new()),
        }
    }

    /// Returner over an in-memory store, ignoring connection settings.
    pub fn memory(store: MemoryStore) -> Self {
        Self::new(Arc::new(StaticConnector::new(Arc::new(store))))
    }

    /// Replace the job id generator.
    pub fn with_jid_generator(mut self, jids: Arc<dyn JidGenerator>) -> Self {
        self.jids = jids;
        self
    }

    fn connect(
        &self,
        opts: &Opts,
        profile: Option<&str>,
    ) -> ReturnerResult<(Arc<dyn KvStore>, crate::keys::KeySpace)> {
        resolve(self.connector.as_ref(), opts, profile)
    }
}

/// Recursive listing where a directory that was never written is empty.
async fn list(store: &dyn KvStore, key: &KeyPath) -> ReturnerResult<Tree> {
    match store.tree(key).await {
        Ok(tree) => Ok(tree),
        Err(e) if e.is_not_found() => {
            debug!(key = %key, "directory not found, treating as empty");
            Ok(Tree::new())
        }
        Err(e) => Err(e),
    }
}

#[async_trait]
impl Returner for EtcdReturner {
    async fn returner(&self, opts: &Opts, ret: &JobReturn) -> ReturnerResult<()> {
        let (id, jid) = (ret.id(), ret.jid());
        if id.is_empty() || jid.is_empty() {
            return Err(ReturnerError::InvalidRecord {
                message: "job return requires non-empty 'id' and 'jid'".to_string(),
            });
        }

        let ttl = opts.write_ttl()?;
        let (store, keys) = self.connect(opts, opts.write_profile())?;
        debug!(jid = %jid, minion = %id, fields = ret.len(), ttl = ?ttl, "storing job return");

        // Pointer for the external job cache: latest jid per minion.
        store.set(&keys.minion_key(id), jid, ttl).await?;

        for (field, value) in ret.fields() {
            let encoded = serde_json::to_string(value)?;
            store
                .set(&keys.field_key(jid, id, field), &encoded, ttl)
                .await?;
        }
        Ok(())
    }

    async fn save_load(
        &self,
        opts: &Opts,
        jid: &str,
        load: &Value,
        _minions: Option<&[String]>,
    ) -> ReturnerResult<()> {
        debug!(jid = %jid, "save_load called");
        let ttl = opts.write_ttl()?;
        let (store, keys) = self.connect(opts, opts.write_profile())?;
        let encoded = serde_json::to_string(load)?;
        store.set(&keys.load_key(jid), &encoded, ttl).await
    }

    async fn save_minions(
        &self,
        _opts: &Opts,
        _jid: &str,
        _minions: &[String],
        _syndic_id: Option<&str>,
    ) -> ReturnerResult<()> {
        // Minions are tracked through per-minion pointers written by `returner`.
        Ok(())
    }

    async fn clean_old_jobs(&self, _opts: &Opts) -> ReturnerResult<()> {
        // Expiry is delegated to key TTLs.
        Ok(())
    }

    async fn get_load(&self, opts: &Opts, jid: &str) -> ReturnerResult<Value> {
        debug!(jid = %jid, "get_load called");
        let (store, keys) = self.connect(opts, opts.read_profile())?;
        let raw = store.get(&keys.load_key(jid)).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    async fn get_jid(&self, opts: &Opts, jid: &str) -> ReturnerResult<JobReturns> {
        debug!(jid = %jid, "get_jid called");
        let (store, keys) = self.connect(opts, None)?;
        let job = list(store.as_ref(), &keys.job_dir(jid)).await?;

        let mut ret = JobReturns::new();
        for (minion, node) in &job {
            if minion == crate::keys::LOAD_KEY {
                continue;
            }
            let Some(raw) = node.as_dir().and_then(|fields| fields.leaf(RETURN_FIELD)) else {
                warn!(jid = %jid, minion = %minion, "no return stored for minion, skipping");
                continue;
            };
            ret.insert(
                minion.clone(),
                MinionReturn {
                    ret: serde_json::from_str(raw)?,
                },
            );
        }
        Ok(ret)
    }

    async fn get_fun(&self, opts: &Opts, fun: &str) -> ReturnerResult<FunMatches> {
        debug!(fun = %fun, "get_fun called");
        let (store, keys) = self.connect(opts, None)?;
        let minions = list(store.as_ref(), &keys.minions_dir()).await?;

        let mut ret = FunMatches::new();
        for (minion, node) in &minions {
            let Node::Leaf(jid) = node else {
                warn!(minion = %minion, "minion pointer is a directory, skipping");
                continue;
            };
            let raw = store.get(&keys.field_key(jid, minion, FUN_FIELD)).await?;
            let last_fun: Value = serde_json::from_str(&raw)?;
            if last_fun.as_str() == Some(fun) {
                ret.insert(minion.clone(), fun.to_string());
            }
        }
        Ok(ret)
    }

    async fn get_jids(&self, opts: &Opts) -> ReturnerResult<Vec<String>> {
        debug!("get_jids called");
        let (store, keys) = self.connect(opts, None)?;
        let jobs = list(store.as_ref(), &keys.jobs_dir()).await?;
        Ok(jobs
            .iter()
            .filter(|(_, node)| node.is_dir())
            .map(|(jid, _)| jid.clone())
            .collect())
    }

    async fn get_minions(&self, opts: &Opts) -> ReturnerResult<Vec<String>> {
        debug!("get_minions called");
        let (store, keys) = self.connect(opts, None)?;
        let minions = list(store.as_ref(), &keys.minions_dir()).await?;
        Ok(minions.iter().map(|(minion, _)| minion.clone()).collect())
    }

    fn prep_jid(&self, opts: &Opts, _nocache: bool, passed_jid: Option<&str>) -> String {
        match passed_jid {
            Some(jid) => jid.to_string(),
            None => self.jids.gen_jid(opts),
        }
    }
}
