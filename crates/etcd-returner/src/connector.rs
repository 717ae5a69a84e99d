//! Connection resolution: configuration + profile to a store handle.

use std::sync::Arc;

use tracing::debug;

use crate::error::ReturnerResult;
use crate::keys::KeySpace;
use crate::opts::Opts;
use crate::store::KvStore;

/// Produces a store handle for a profile.
///
/// Called once per returner operation; the returner holds no connection of
/// its own.
pub trait Connector: Send + Sync {
    fn connect(&self, opts: &Opts, profile: Option<&str>) -> ReturnerResult<Arc<dyn KvStore>>;
}

/// Connects to etcd over HTTP using the profile's `etcd.*` settings.
#[cfg(feature = "http")]
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpConnector;

#[cfg(feature = "http")]
impl Connector for HttpConnector {
    fn connect(&self, opts: &Opts, profile: Option<&str>) -> ReturnerResult<Arc<dyn KvStore>> {
        let config = crate::config::EtcdConfig::from_opts(opts, profile)?;
        let client = crate::client::EtcdClient::new(&config)?;
        Ok(Arc::new(client))
    }
}

/// Hands out the same store for every profile.
#[derive(Clone)]
pub struct StaticConnector {
    store: Arc<dyn KvStore>,
}

impl StaticConnector {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }
}

impl std::fmt::Debug for StaticConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticConnector").finish_non_exhaustive()
    }
}

impl Connector for StaticConnector {
    fn connect(&self, _opts: &Opts, _profile: Option<&str>) -> ReturnerResult<Arc<dyn KvStore>> {
        Ok(Arc::clone(&self.store))
    }
}

/// Resolve a store handle and the namespace root.
///
/// Without an explicit profile the default `etcd.returner` profile is used;
/// without that, the top-level `etcd.*` settings.
pub fn resolve(
    connector: &dyn Connector,
    opts: &Opts,
    profile: Option<&str>,
) -> ReturnerResult<(Arc<dyn KvStore>, KeySpace)> {
    let profile = profile.or_else(|| opts.returner_profile());
    let keys = KeySpace::new(opts.returner_root());
    debug!(profile = ?profile, root = %keys.root(), "resolving etcd connection");
    let store = connector.connect(opts, profile)?;
    Ok((store, keys))
}
