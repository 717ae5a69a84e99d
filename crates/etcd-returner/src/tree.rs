//! Hierarchical view of a recursive store listing.
//!
//! The store reports every node as either a value (leaf) or a directory.
//! A [`Tree`] keeps that distinction explicit so readers never have to guess
//! structure from key shapes.

use std::collections::btree_map;
use std::collections::BTreeMap;

/// One node of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A value-bearing key.
    Leaf(String),
    /// An intermediate node holding children.
    Dir(Tree),
}

impl Node {
    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Dir(_))
    }

    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            Self::Leaf(value) => Some(value),
            Self::Dir(_) => None,
        }
    }

    pub fn as_dir(&self) -> Option<&Tree> {
        match self {
            Self::Dir(tree) => Some(tree),
            Self::Leaf(_) => None,
        }
    }
}

/// Children of a directory, keyed by their last path segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    children: BTreeMap<String, Node>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    /// Value of a direct leaf child.
    pub fn leaf(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Node::as_leaf)
    }

    pub fn insert(&mut self, name: impl Into<String>, node: Node) {
        self.children.insert(name.into(), node);
    }

    /// Insert a leaf at a relative path, creating directories on the way.
    ///
    /// A leaf found where a directory is needed is replaced by a directory.
    pub fn insert_path(&mut self, segments: &[&str], value: impl Into<String>) {
        let Some((last, parents)) = segments.split_last() else {
            return;
        };
        let mut current = self;
        for segment in parents {
            let entry = current
                .children
                .entry((*segment).to_string())
                .or_insert_with(|| Node::Dir(Tree::new()));
            if !entry.is_dir() {
                *entry = Node::Dir(Tree::new());
            }
            current = match entry {
                Node::Dir(tree) => tree,
                Node::Leaf(_) => unreachable!("entry was just made a directory"),
            };
        }
        current
            .children
            .insert((*last).to_string(), Node::Leaf(value.into()));
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Node> {
        self.children.iter()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = (&'a String, &'a Node);
    type IntoIter = btree_map::Iter<'a, String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
