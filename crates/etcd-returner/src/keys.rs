//! Key naming conventions for the returner key space.
//!
//! # Key Schema
//!
//! ```text
//! {root}/minions/{minion_id}            # Latest jid the minion returned for (raw string)
//! {root}/jobs/{jid}/.load.p             # Job load (JSON)
//! {root}/jobs/{jid}/{minion_id}/{field} # One key per field of the job return (JSON)
//! ```
//!
//! Keys are absolute, `/`-separated etcd paths. Segments are used verbatim so
//! that other readers of the same namespace see identical keys.

use std::fmt;

/// Path separator used by the store.
pub const SEPARATOR: char = '/';

/// Default namespace root.
pub const DEFAULT_ROOT: &str = "/salt/return";

/// Leaf name holding the serialized job load.
pub const LOAD_KEY: &str = ".load.p";

const MINIONS: &str = "minions";
const JOBS: &str = "jobs";

/// An absolute store path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPath(String);

impl KeyPath {
    /// Build a path, normalizing to a single leading separator and no
    /// trailing separator. An empty input is the store root `/`.
    pub fn new(path: impl AsRef<str>) -> Self {
        let trimmed = path.as_ref().trim_matches(SEPARATOR);
        Self(format!("{SEPARATOR}{trimmed}"))
    }

    /// Append one segment.
    pub fn join(&self, segment: &str) -> Self {
        if self.is_root() {
            Self(format!("{SEPARATOR}{segment}"))
        } else {
            Self(format!("{}{SEPARATOR}{}", self.0, segment))
        }
    }

    /// Last path segment (`minion` for `/salt/return/minions/minion`).
    pub fn last_segment(&self) -> &str {
        self.0.rsplit(SEPARATOR).next().unwrap_or_default()
    }

    /// Segments below `prefix`, or `None` if this path is not beneath it.
    pub fn relative_to(&self, prefix: &KeyPath) -> Option<Vec<&str>> {
        if prefix.is_root() {
            return Some(self.segments().collect());
        }
        let rest = self.0.strip_prefix(prefix.as_str())?;
        if rest.is_empty() {
            return Some(Vec::new());
        }
        let rest = rest.strip_prefix(SEPARATOR)?;
        Some(rest.split(SEPARATOR).collect())
    }

    /// Non-empty segments of the path.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR).filter(|s| !s.is_empty())
    }

    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for KeyPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Ordering is the derived `String` ordering, so map lookups by `&str` agree.
impl std::borrow::Borrow<str> for KeyPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Builder for returner keys under a namespace root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpace {
    root: KeyPath,
}

impl Default for KeySpace {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

impl KeySpace {
    /// Create a key space rooted at `root` (e.g. `/salt/return`).
    pub fn new(root: impl AsRef<str>) -> Self {
        Self {
            root: KeyPath::new(root),
        }
    }

    pub fn root(&self) -> &KeyPath {
        &self.root
    }

    /// Returns: `{root}/minions`
    pub fn minions_dir(&self) -> KeyPath {
        self.root.join(MINIONS)
    }

    /// Returns: `{root}/minions/{minion_id}`
    pub fn minion_key(&self, minion_id: &str) -> KeyPath {
        self.minions_dir().join(minion_id)
    }

    /// Returns: `{root}/jobs`
    pub fn jobs_dir(&self) -> KeyPath {
        self.root.join(JOBS)
    }

    /// Returns: `{root}/jobs/{jid}`
    pub fn job_dir(&self, jid: &str) -> KeyPath {
        self.jobs_dir().join(jid)
    }

    /// Returns: `{root}/jobs/{jid}/.load.p`
    pub fn load_key(&self, jid: &str) -> KeyPath {
        self.job_dir(jid).join(LOAD_KEY)
    }

    /// Returns: `{root}/jobs/{jid}/{minion_id}/{field}`
    pub fn field_key(&self, jid: &str, minion_id: &str, field: &str) -> KeyPath {
        self.job_dir(jid).join(minion_id).join(field)
    }
}
