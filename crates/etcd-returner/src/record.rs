//! Records exchanged with the host.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{ReturnerError, ReturnerResult};

/// Field holding the minion id.
pub const ID_FIELD: &str = "id";
/// Field holding the job id.
pub const JID_FIELD: &str = "jid";
/// Field holding the job output.
pub const RETURN_FIELD: &str = "return";
/// Field holding the executed function name.
pub const FUN_FIELD: &str = "fun";

/// One minion's return for one job.
///
/// Any JSON object with string `id` and `jid` fields. Every field, including
/// `id` and `jid`, is persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct JobReturn {
    fields: Map<String, Value>,
}

impl JobReturn {
    /// Build a minimal return with `id`, `jid` and `return`.
    pub fn new(minion_id: impl Into<String>, jid: impl Into<String>, ret: Value) -> Self {
        let mut fields = Map::new();
        fields.insert(ID_FIELD.to_string(), Value::String(minion_id.into()));
        fields.insert(JID_FIELD.to_string(), Value::String(jid.into()));
        fields.insert(RETURN_FIELD.to_string(), ret);
        Self { fields }
    }

    /// Validate a JSON value as a job return.
    pub fn from_value(value: Value) -> ReturnerResult<Self> {
        let Value::Object(fields) = value else {
            return Err(ReturnerError::InvalidRecord {
                message: "job return must be a JSON object".to_string(),
            });
        };
        for required in [ID_FIELD, JID_FIELD] {
            match fields.get(required) {
                Some(Value::String(s)) if !s.is_empty() => {}
                _ => {
                    return Err(ReturnerError::InvalidRecord {
                        message: format!("missing or non-string '{}' field", required),
                    })
                }
            }
        }
        Ok(Self { fields })
    }

    /// Set a field, returning the updated record.
    ///
    /// `id` and `jid` must stay strings: a non-string value for either is
    /// ignored (with a warning) and the record keeps its current id.
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        let name = name.into();
        if (name == ID_FIELD || name == JID_FIELD) && !value.is_string() {
            warn!(field = %name, value = %value, "ignoring non-string value for id field");
            return self;
        }
        self.fields.insert(name, value);
        self
    }

    /// Minion id.
    pub fn id(&self) -> &str {
        self.fields
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Job id.
    pub fn jid(&self) -> &str {
        self.fields
            .get(JID_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// All fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'de> Deserialize<'de> for JobReturn {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}

/// A minion's entry in a job lookup: only the `return` field is reconstructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinionReturn {
    #[serde(rename = "return")]
    pub ret: Value,
}

/// Minion id to that minion's return for one job.
pub type JobReturns = BTreeMap<String, MinionReturn>;

/// Minion id to the function name it last ran.
pub type FunMatches = BTreeMap<String, String>;
