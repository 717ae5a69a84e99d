//! etcd v2 keys API client.
//!
//! Public API: no status code knowledge. All HTTP/status mapping in http.rs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Method;
use tracing::debug;
use url::Url;

use crate::config::EtcdConfig;
use crate::error::{ReturnerError, ReturnerResult};
use crate::keys::KeyPath;
use crate::store::KvStore;
use crate::tree::Tree;

mod http;
mod wire;

use http::HttpBackend;
use wire::KeysResponse;

const USER_AGENT_VALUE: &str = concat!("etcd-returner/", env!("CARGO_PKG_VERSION"));

/// Client for one etcd endpoint.
#[derive(Debug, Clone)]
pub struct EtcdClient {
    http: HttpBackend,
}

impl EtcdClient {
    pub fn new(config: &EtcdConfig) -> ReturnerResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers);

        if let Some(ca) = &config.ca {
            let pem = read_pem(ca)?;
            let cert = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                ReturnerError::config(format!("invalid CA certificate {}: {}", ca.display(), e))
            })?;
            builder = builder.add_root_certificate(cert);
        }

        if let (Some(cert), Some(key)) = (&config.client_cert, &config.client_key) {
            let mut pem = read_pem(cert)?;
            pem.extend_from_slice(b"\n");
            pem.extend_from_slice(&read_pem(key)?);
            let identity = reqwest::Identity::from_pem(&pem).map_err(|e| {
                ReturnerError::config(format!("invalid client certificate or key: {}", e))
            })?;
            builder = builder.identity(identity);
        }

        let client = builder.build().map_err(|e| ReturnerError::Network {
            message: format!("failed to create HTTP client: {}", e),
        })?;

        let base_url = config.base_url();
        let base_url = Url::parse(&base_url).map_err(|e| {
            ReturnerError::config(format!("invalid etcd URL {}: {}", base_url, e))
        })?;

        let credentials = config.username.clone().zip(config.password.clone());

        Ok(Self {
            http: HttpBackend {
                client,
                base_url,
                credentials,
            },
        })
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url.as_str()
    }

    pub fn is_authenticated(&self) -> bool {
        self.http.credentials.is_some()
    }

    async fn read_node(&self, key: &KeyPath, recursive: bool) -> ReturnerResult<KeysResponse> {
        let query: &[(&str, &str)] = if recursive {
            &[("recursive", "true")]
        } else {
            &[]
        };
        let response = self.http.request(Method::GET, key, query, None).await?;
        response
            .json()
            .await
            .map_err(|e| ReturnerError::InvalidResponse {
                message: format!("failed to parse response for {}: {}", key, e),
            })
    }
}

#[async_trait]
impl KvStore for EtcdClient {
    async fn set(&self, key: &KeyPath, value: &str, ttl: Option<u64>) -> ReturnerResult<()> {
        debug!(key = %key, ttl = ?ttl, "setting key");

        let mut form = vec![("value", value.to_string())];
        if let Some(ttl) = ttl {
            form.push(("ttl", ttl.to_string()));
        }
        self.http
            .request(Method::PUT, key, &[], Some(form.as_slice()))
            .await?;
        Ok(())
    }

    async fn get(&self, key: &KeyPath) -> ReturnerResult<String> {
        let response = self.read_node(key, false).await?;
        if response.node.dir {
            return Err(ReturnerError::InvalidResponse {
                message: format!("{} is a directory", key),
            });
        }
        Ok(response.node.value.unwrap_or_default())
    }

    async fn tree(&self, key: &KeyPath) -> ReturnerResult<Tree> {
        let response = self.read_node(key, true).await?;
        if !response.node.dir {
            return Err(ReturnerError::InvalidResponse {
                message: format!("{} is not a directory", key),
            });
        }
        Ok(response.node.into_tree())
    }
}

fn read_pem(path: &std::path::Path) -> ReturnerResult<Vec<u8>> {
    std::fs::read(path)
        .map_err(|e| ReturnerError::config(format!("failed to read {}: {}", path.display(), e)))
}
