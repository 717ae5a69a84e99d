//! Host configuration as seen by the returner.
//!
//! The host hands every operation its configuration mapping. Keys are literal
//! dotted names (`etcd.host`), and named profiles are nested mappings:
//!
//! ```yaml
//! my_etcd_config:
//!   etcd.host: 127.0.0.1
//!   etcd.port: 2379
//!   etcd.ttl: 300
//!
//! etcd.returner: my_etcd_config
//! etcd.returner_root: /salt/return
//! ```

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{ReturnerError, ReturnerResult};
use crate::keys::DEFAULT_ROOT;

pub const RETURNER_PROFILE: &str = "etcd.returner";
pub const RETURNER_ROOT: &str = "etcd.returner_root";
pub const READ_PROFILE: &str = "etcd.returner_read_profile";
pub const WRITE_PROFILE: &str = "etcd.returner_write_profile";
pub const TTL: &str = "etcd.ttl";
pub const UNIQUE_JID: &str = "unique_jid";
pub const UTC_JID: &str = "utc_jid";

/// Host configuration mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Opts {
    values: Map<String, Value>,
}

impl Opts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON value. `null` is an empty configuration.
    pub fn from_value(value: Value) -> ReturnerResult<Self> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            Value::Null => Ok(Self::default()),
            other => Err(ReturnerError::config(format!(
                "configuration must be a mapping, got {}",
                type_name(&other)
            ))),
        }
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(yaml: &str) -> ReturnerResult<Self> {
        let value: Value = serde_yaml::from_str(yaml)
            .map_err(|e| ReturnerError::config(format!("invalid YAML configuration: {}", e)))?;
        Self::from_value(value)
    }

    /// Load a YAML configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> ReturnerResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            ReturnerError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Set a key, returning the updated configuration.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Truthiness of a flag; absent means `false`.
    pub fn get_bool(&self, key: &str) -> bool {
        match self.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_i64().is_some_and(|n| n != 0),
            Some(Value::String(s)) => matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
            _ => false,
        }
    }

    /// Settings for a named profile, or the top level when `profile` is `None`.
    pub fn section(&self, profile: Option<&str>) -> ReturnerResult<Section<'_>> {
        match profile {
            None => Ok(Section(&self.values)),
            Some(name) => match self.values.get(name) {
                Some(Value::Object(map)) => Ok(Section(map)),
                Some(other) => Err(ReturnerError::config(format!(
                    "profile '{}' must be a mapping, got {}",
                    name,
                    type_name(other)
                ))),
                None => Err(ReturnerError::config(format!(
                    "profile '{}' not found in configuration",
                    name
                ))),
            },
        }
    }

    /// Default profile for both reads and writes (`etcd.returner`).
    pub fn returner_profile(&self) -> Option<&str> {
        non_empty(self.get_str(RETURNER_PROFILE))
    }

    /// Profile for read operations (`etcd.returner_read_profile`).
    pub fn read_profile(&self) -> Option<&str> {
        non_empty(self.get_str(READ_PROFILE))
    }

    /// Profile for write operations (`etcd.returner_write_profile`).
    pub fn write_profile(&self) -> Option<&str> {
        non_empty(self.get_str(WRITE_PROFILE))
    }

    /// Namespace root (`etcd.returner_root`, default `/salt/return`).
    pub fn returner_root(&self) -> &str {
        non_empty(self.get_str(RETURNER_ROOT)).unwrap_or(DEFAULT_ROOT)
    }

    /// TTL applied to writes.
    ///
    /// With a write profile set, its `etcd.ttl` wins; otherwise (or when the
    /// profile sets none) the top-level `etcd.ttl` applies.
    pub fn write_ttl(&self) -> ReturnerResult<Option<u64>> {
        if let Some(profile) = self.write_profile() {
            if let Some(Value::Object(map)) = self.values.get(profile) {
                if let Some(ttl) = Section(map).get_u64(TTL)? {
                    return Ok(Some(ttl));
                }
            }
        }
        Section(&self.values).get_u64(TTL)
    }
}

/// A view over one level of configuration (top level or a profile).
#[derive(Debug, Clone, Copy)]
pub struct Section<'a>(&'a Map<String, Value>);

impl<'a> Section<'a> {
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.0.get(key)
    }

    /// String setting; numbers are rendered as text.
    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Non-negative integer setting; digit strings are accepted.
    pub fn get_u64(&self, key: &str) -> ReturnerResult<Option<u64>> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n.as_u64().map(Some).ok_or_else(|| {
                ReturnerError::config(format!("{} must be a non-negative integer, got {}", key, n))
            }),
            Some(Value::String(s)) => s.trim().parse().map(Some).map_err(|_| {
                ReturnerError::config(format!("{} must be a non-negative integer, got '{}'", key, s))
            }),
            Some(other) => Err(ReturnerError::config(format!(
                "{} must be a non-negative integer, got {}",
                key,
                type_name(other)
            ))),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
