//! Connection settings for an etcd endpoint.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ReturnerError, ReturnerResult};
use crate::opts::Opts;

pub const HOST: &str = "etcd.host";
pub const PORT: &str = "etcd.port";
pub const USERNAME: &str = "etcd.username";
pub const PASSWORD: &str = "etcd.password";
pub const CA: &str = "etcd.ca";
pub const CLIENT_CERT: &str = "etcd.client_cert";
pub const CLIENT_KEY: &str = "etcd.client_key";

/// etcd endpoint configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtcdConfig {
    /// Host name or address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Client port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Basic auth user; requires `password`.
    #[serde(default)]
    pub username: Option<String>,

    /// Basic auth password; requires `username`.
    #[serde(default)]
    pub password: Option<String>,

    /// PEM bundle of additional trusted roots. Enables https.
    #[serde(default)]
    pub ca: Option<PathBuf>,

    /// PEM client certificate. Enables https; requires `client_key`.
    #[serde(default)]
    pub client_cert: Option<PathBuf>,

    /// PEM client private key.
    #[serde(default)]
    pub client_key: Option<PathBuf>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Explicit base URL, used instead of host and port (tests, proxies).
    #[serde(default)]
    pub url: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    2379
}

fn default_timeout() -> u64 {
    30
}

impl Default for EtcdConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            username: None,
            password: None,
            ca: None,
            client_cert: None,
            client_key: None,
            timeout_secs: default_timeout(),
            url: None,
        }
    }
}

impl EtcdConfig {
    /// Read `etcd.*` connection settings from a named profile, or from the
    /// top level. `etcd.ttl` is not a connection setting; see
    /// [`Opts::write_ttl`].
    pub fn from_opts(opts: &Opts, profile: Option<&str>) -> ReturnerResult<Self> {
        let section = opts.section(profile)?;

        let port = match section.get_u64(PORT)? {
            Some(port) => u16::try_from(port)
                .map_err(|_| ReturnerError::config(format!("{} out of range: {}", PORT, port)))?,
            None => default_port(),
        };

        let config = Self {
            host: section.get_string(HOST).unwrap_or_else(default_host),
            port,
            username: section.get_string(USERNAME),
            password: section.get_string(PASSWORD),
            ca: section.get_string(CA).map(PathBuf::from),
            client_cert: section.get_string(CLIENT_CERT).map(PathBuf::from),
            client_key: section.get_string(CLIENT_KEY).map(PathBuf::from),
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that paired settings are set together.
    pub fn validate(&self) -> ReturnerResult<()> {
        if self.username.is_some() != self.password.is_some() {
            return Err(ReturnerError::config(format!(
                "{} and {} must be set together",
                USERNAME, PASSWORD
            )));
        }
        if self.client_cert.is_some() != self.client_key.is_some() {
            return Err(ReturnerError::config(format!(
                "{} and {} must be set together",
                CLIENT_CERT, CLIENT_KEY
            )));
        }
        Ok(())
    }

    /// Whether TLS material is configured.
    pub fn uses_tls(&self) -> bool {
        self.ca.is_some() || self.client_cert.is_some()
    }

    /// Base URL of the endpoint, without trailing slash.
    pub fn base_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.trim_end_matches('/').to_string();
        }
        let scheme = if self.uses_tls() { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }

    /// Set an explicit base URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set basic auth credentials.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}
