//! Longest-prefix search over the saved-opening forest.
//!
//! The same search answers both "which node should a new variation attach
//! to" and "which node is the board currently on".

use serde::Serialize;

use crate::tree::{Forest, NodeRef, OpeningNode};

/// A node located by [`match_tree`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeMatch {
    pub node: NodeRef,
    pub name: String,
    pub match_length: usize,
    pub is_main_opening: bool,
    pub is_from_database: bool,
}

impl TreeMatch {
    fn new(at: &NodeRef, node: &OpeningNode) -> Self {
        Self {
            node: at.clone(),
            name: node.name.clone(),
            match_length: node.moves.len(),
            is_main_opening: at.is_root(),
            is_from_database: node.is_from_database,
        }
    }

    pub fn root_index(&self) -> usize {
        self.node.root_index
    }

    pub fn path(&self) -> &[usize] {
        &self.node.path
    }
}

/// Find the node whose moves are the longest prefix of `moves`.
///
/// Nodes are visited depth-first in forest order; only a strictly longer
/// match replaces the current best, so ties go to the earlier node.
pub fn match_tree(forest: &Forest, moves: &[String]) -> Option<TreeMatch> {
    if moves.is_empty() {
        return None;
    }

    let mut best: Option<TreeMatch> = None;
    forest.walk(|at, node| {
        let longest = best.as_ref().map_or(0, |b| b.match_length);
        if node.moves.len() > longest && node.is_prefix_of(moves) {
            best = Some(TreeMatch::new(at, node));
        }
    });

    if let Some(m) = &best {
        tracing::debug!(node = %m.node, length = m.match_length, "tree match");
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    fn forest() -> Forest {
        let mut root = OpeningNode::user("Open Game", mv("e4 e5"));
        let mut italian = OpeningNode::user("Italian", mv("e4 e5 Nf3 Nc6 Bc4"));
        italian
            .variations
            .push(OpeningNode::user("Evans", mv("e4 e5 Nf3 Nc6 Bc4 Bc5 b4")));
        root.variations.push(italian);
        root.variations.push(OpeningNode::user("Ruy", mv("e4 e5 Nf3 Nc6 Bb5")));
        Forest::new(vec![
            root,
            OpeningNode::user("Duplicate Open Game", mv("e4 e5")),
            OpeningNode::user("Queen Pawn", mv("d4")),
        ])
    }

    #[test]
    fn test_nested_match() {
        let m = match_tree(&forest(), &mv("e4 e5 Nf3 Nc6 Bc4 Bc5 b4 Bxb4")).unwrap();
        assert_eq!(m.name, "Evans");
        assert_eq!(m.match_length, 7);
        assert_eq!(m.path(), &[0, 0]);
        assert_eq!(m.root_index(), 0);
        assert!(!m.is_main_opening);
    }

    #[test]
    fn test_falls_back_to_ancestor() {
        let m = match_tree(&forest(), &mv("e4 e5 Nf3 Nc6 Bc4 Nf6")).unwrap();
        assert_eq!(m.name, "Italian");
        let m = match_tree(&forest(), &mv("e4 e5 Nf3")).unwrap();
        assert_eq!(m.name, "Open Game");
    }

    #[test]
    fn test_tie_keeps_first() {
        let m = match_tree(&forest(), &mv("e4 e5")).unwrap();
        assert_eq!(m.name, "Open Game");
        assert!(m.is_main_opening);
    }

    #[test]
    fn test_no_match() {
        assert!(match_tree(&forest(), &[]).is_none());
        assert!(match_tree(&forest(), &mv("c4")).is_none());
        assert!(match_tree(&forest(), &mv("e4")).is_none());
    }
}
