//! etcd v2 keys API wire types.

use serde::Deserialize;

use crate::keys::KeyPath;
use crate::tree::{Node, Tree};

/// Body of a successful keys API response.
#[derive(Debug, Deserialize)]
pub(crate) struct KeysResponse {
    pub node: WireNode,
}

/// A node as returned by the keys API.
#[derive(Debug, Deserialize)]
pub(crate) struct WireNode {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub dir: bool,
    #[serde(default)]
    pub nodes: Vec<WireNode>,
}

impl WireNode {
    /// Convert the children of a directory node into a [`Tree`].
    pub(crate) fn into_tree(self) -> Tree {
        let mut tree = Tree::new();
        for child in self.nodes {
            let Some(key) = child.key.as_deref() else {
                continue;
            };
            let name = KeyPath::new(key).last_segment().to_string();
            let node = if child.dir {
                Node::Dir(child.into_tree())
            } else {
                Node::Leaf(child.value.unwrap_or_default())
            };
            tree.insert(name, node);
        }
        tree
    }
}

/// Error body returned by etcd.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(rename = "errorCode", default)]
    pub error_code: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub cause: Option<String>,
}

/// etcd error code for a missing key.
pub(crate) const KEY_NOT_FOUND: u64 = 100;

/// etcd error code for rejected credentials.
pub(crate) const UNAUTHORIZED: u64 = 110;
