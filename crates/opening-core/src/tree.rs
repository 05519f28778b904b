//! Saved-opening forest.
//!
//! Every node exclusively owns its variations. Nodes are addressed by
//! [`NodeRef`] (root index plus child-index path) and resolved from the
//! forest root on each access, so no reference outlives a mutation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::theory::CanonicalEntry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningNode {
    pub name: String,
    pub moves: Vec<String>,
    #[serde(default)]
    pub variations: Vec<OpeningNode>,
    #[serde(default)]
    pub is_from_database: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eco: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_text: Option<String>,
}

impl OpeningNode {
    /// A user-authored leaf.
    pub fn user(name: impl Into<String>, moves: Vec<String>) -> Self {
        Self {
            name: name.into(),
            moves,
            variations: Vec::new(),
            is_from_database: false,
            eco: None,
            move_count: None,
            search_text: None,
        }
    }

    /// A flat root seeded from the theory dataset.
    pub fn from_canonical(entry: &CanonicalEntry) -> Self {
        Self {
            name: entry.name.clone(),
            moves: entry.moves.clone(),
            variations: Vec::new(),
            is_from_database: true,
            eco: Some(entry.eco.clone()),
            move_count: Some(entry.move_count),
            search_text: Some(entry.search_text.clone()),
        }
    }

    /// Number of nodes below this one.
    pub fn descendant_count(&self) -> usize {
        self.variations
            .iter()
            .map(|v| 1 + v.descendant_count())
            .sum()
    }

    /// True when `moves` starts with this node's moves.
    pub fn is_prefix_of(&self, moves: &[String]) -> bool {
        moves.starts_with(&self.moves)
    }
}

/// Address of a node: index of its root plus child indices below it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRef {
    pub root_index: usize,
    #[serde(default)]
    pub path: Vec<usize>,
}

impl NodeRef {
    pub fn root(root_index: usize) -> Self {
        Self {
            root_index,
            path: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    pub fn child(&self, index: usize) -> Self {
        let mut path = self.path.clone();
        path.push(index);
        Self {
            root_index: self.root_index,
            path,
        }
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.path.split_last()?;
        Some(Self {
            root_index: self.root_index,
            path: rest.to_vec(),
        })
    }

    /// True when `self` is `other` or lies inside `other`'s subtree.
    pub fn is_within(&self, other: &NodeRef) -> bool {
        self.root_index == other.root_index && self.path.starts_with(&other.path)
    }

    /// Where this node lives after `removed` was deleted, or `None` if it
    /// was deleted with it. Later siblings of `removed` shift down by one.
    pub fn after_removal(&self, removed: &NodeRef) -> Option<NodeRef> {
        if self.is_within(removed) {
            return None;
        }
        let mut next = self.clone();
        match removed.path.split_last() {
            None => {
                if next.root_index > removed.root_index {
                    next.root_index -= 1;
                }
            }
            Some((&last, parent_path)) => {
                let depth = parent_path.len();
                if next.root_index == removed.root_index
                    && next.path.len() > depth
                    && next.path[..depth] == *parent_path
                    && next.path[depth] > last
                {
                    next.path[depth] -= 1;
                }
            }
        }
        Some(next)
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "opening-{}", self.root_index)?;
        for i in &self.path {
            write!(f, "-{i}")?;
        }
        Ok(())
    }
}

/// Ordered list of root openings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Forest {
    pub roots: Vec<OpeningNode>,
}

impl Forest {
    pub fn new(roots: Vec<OpeningNode>) -> Self {
        Self { roots }
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn get(&self, node: &NodeRef) -> Option<&OpeningNode> {
        let mut current = self.roots.get(node.root_index)?;
        for &i in &node.path {
            current = current.variations.get(i)?;
        }
        Some(current)
    }

    pub fn get_mut(&mut self, node: &NodeRef) -> Option<&mut OpeningNode> {
        let mut current = self.roots.get_mut(node.root_index)?;
        for &i in &node.path {
            current = current.variations.get_mut(i)?;
        }
        Some(current)
    }

    /// Detach a node and its subtree.
    pub fn remove(&mut self, node: &NodeRef) -> Option<OpeningNode> {
        match node.path.split_last() {
            None => {
                if node.root_index < self.roots.len() {
                    Some(self.roots.remove(node.root_index))
                } else {
                    None
                }
            }
            Some((&last, _)) => {
                let parent = self.get_mut(&node.parent()?)?;
                if last < parent.variations.len() {
                    Some(parent.variations.remove(last))
                } else {
                    None
                }
            }
        }
    }

    /// Total number of nodes in the forest.
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(|r| 1 + r.descendant_count()).sum()
    }

    /// Depth-first visit: each root in order, a node before its variations.
    pub fn walk<'a, F>(&'a self, mut visit: F)
    where
        F: FnMut(&NodeRef, &'a OpeningNode),
    {
        fn recurse<'a, F>(node: &'a OpeningNode, at: &mut NodeRef, visit: &mut F)
        where
            F: FnMut(&NodeRef, &'a OpeningNode),
        {
            visit(at, node);
            for (i, child) in node.variations.iter().enumerate() {
                at.path.push(i);
                recurse(child, at, visit);
                at.path.pop();
            }
        }

        for (root_index, root) in self.roots.iter().enumerate() {
            let mut at = NodeRef::root(root_index);
            recurse(root, &mut at, &mut visit);
        }
    }
}
