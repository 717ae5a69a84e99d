//! HTTP layer: URL building and status mapping.
//!
//! This is the ONLY place for status code handling. client/mod.rs never
//! interprets status codes.

use reqwest::{Method, StatusCode};
use tracing::debug;
use url::Url;

use crate::error::{ReturnerError, ReturnerResult};
use crate::keys::KeyPath;

use super::wire::{ErrorBody, KEY_NOT_FOUND, UNAUTHORIZED};

/// HTTP backend for the keys API (holds reqwest client, base URL, credentials).
#[derive(Debug, Clone)]
pub(crate) struct HttpBackend {
    pub(crate) client: reqwest::Client,
    pub(crate) base_url: Url,
    pub(crate) credentials: Option<(String, String)>,
}

impl HttpBackend {
    /// `{base}/v2/keys/{key segments...}`
    pub(crate) fn keys_url(&self, key: &KeyPath) -> ReturnerResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ReturnerError::config(format!("invalid etcd base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["v2", "keys"])
            .extend(key.segments());
        Ok(url)
    }

    /// Make a single request; non-success statuses become errors.
    pub(crate) async fn request(
        &self,
        method: Method,
        key: &KeyPath,
        query: &[(&str, &str)],
        form: Option<&[(&str, String)]>,
    ) -> ReturnerResult<reqwest::Response> {
        let url = self.keys_url(key)?;
        debug!(method = %method, url = %url, "etcd request");

        let mut request = self.client.request(method, url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(form) = form {
            request = request.form(form);
        }
        if let Some((username, password)) = &self.credentials {
            request = request.basic_auth(username, Some(password));
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_error(status, key, &body))
    }
}

/// Map a non-success response to an error.
pub(crate) fn map_error(status: StatusCode, key: &KeyPath, body: &str) -> ReturnerError {
    let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|b| b.message.clone())
        .unwrap_or_else(|| {
            if body.is_empty() {
                status.to_string()
            } else {
                body.chars().take(200).collect()
            }
        });

    // etcd error codes take precedence: 102/104 arrive as 403 and are not auth failures.
    match (status.as_u16(), parsed.as_ref().and_then(|b| b.error_code)) {
        (_, Some(KEY_NOT_FOUND)) | (404, None) => ReturnerError::KeyNotFound {
            key: key.to_string(),
        },
        (_, Some(UNAUTHORIZED)) | (401 | 403, None) => ReturnerError::Unauthorized { message },
        (_, Some(code)) => ReturnerError::Store {
            code,
            key: parsed
                .and_then(|b| b.cause)
                .unwrap_or_else(|| key.to_string()),
            message,
        },
        (status, None) => ReturnerError::Network {
            message: format!("HTTP {}: {}", status, message),
        },
    }
}
