//! Structural edits to the opening forest.
//!
//! Each operation validates, applies the edit to a copy of the forest and
//! persists the copy. The copy replaces the in-memory forest only once the
//! write succeeds, so a rejected or failed operation leaves both the forest
//! and the store untouched.

use crate::error::{Result, TrainerError};
use crate::store::{BlobStore, OpeningStore};
use crate::tree::{NodeRef, OpeningNode};

/// Check that `moves` is a strict continuation of `parent`.
pub fn validate_variation(parent: &OpeningNode, moves: &[String]) -> Result<()> {
    if moves.len() <= parent.moves.len() {
        return Err(TrainerError::NotExtending {
            parent: parent.name.clone(),
            parent_moves: parent.moves.len(),
            moves: moves.len(),
        });
    }
    if !parent.is_prefix_of(moves) {
        return Err(TrainerError::PrefixMismatch {
            parent: parent.name.clone(),
        });
    }
    Ok(())
}

impl<B: BlobStore> OpeningStore<B> {
    fn node(&self, at: &NodeRef) -> Result<&OpeningNode> {
        self.forest
            .get(at)
            .ok_or_else(|| TrainerError::NodeNotFound(at.clone()))
    }

    /// Append a user-authored root. Duplicate names and lines are allowed.
    pub fn add_main_opening(&mut self, name: &str, moves: &[String]) -> Result<NodeRef> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TrainerError::EmptyName);
        }
        if moves.is_empty() {
            return Err(TrainerError::EmptyMoves);
        }

        let mut next = self.forest.clone();
        next.roots.push(OpeningNode::user(name, moves.to_vec()));
        let at = NodeRef::root(next.roots.len() - 1);
        self.commit(next)?;

        tracing::info!(node = %at, "Saved opening \"{}\" ({} moves)", name, moves.len());
        Ok(at)
    }

    /// Append a user-authored variation under `parent`.
    pub fn add_variation(&mut self, parent: &NodeRef, name: &str, moves: &[String]) -> Result<NodeRef> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TrainerError::EmptyVariationName);
        }
        validate_variation(self.node(parent)?, moves)?;

        let mut next = self.forest.clone();
        let node = next
            .get_mut(parent)
            .ok_or_else(|| TrainerError::NodeNotFound(parent.clone()))?;
        node.variations.push(OpeningNode::user(name, moves.to_vec()));
        let at = parent.child(node.variations.len() - 1);
        self.commit(next)?;

        tracing::info!(node = %at, "Saved variation \"{}\" ({} moves)", name, moves.len());
        Ok(at)
    }

    /// Lengthen a user-authored line in place.
    pub fn extend_node(&mut self, at: &NodeRef, new_moves: &[String]) -> Result<()> {
        self.replace_moves(at, new_moves)
    }

    /// Replace a loaded user-authored line's moves.
    pub fn update_node(&mut self, at: &NodeRef, new_moves: &[String]) -> Result<()> {
        self.replace_moves(at, new_moves)
    }

    fn replace_moves(&mut self, at: &NodeRef, new_moves: &[String]) -> Result<()> {
        if new_moves.is_empty() {
            return Err(TrainerError::EmptyMoves);
        }
        let node = self.node(at)?;
        if node.is_from_database {
            return Err(TrainerError::Immutable {
                name: node.name.clone(),
            });
        }
        let before = node.moves.len();

        let mut next = self.forest.clone();
        let node = next
            .get_mut(at)
            .ok_or_else(|| TrainerError::NodeNotFound(at.clone()))?;
        node.moves = new_moves.to_vec();
        let name = node.name.clone();
        self.commit(next)?;

        tracing::info!(node = %at, "Updated \"{}\" from {} to {} moves", name, before, new_moves.len());
        Ok(())
    }

    /// Remove a node and everything below it.
    ///
    /// Canonical nodes are not protected here; callers decide whether to
    /// offer deletion for them.
    pub fn delete_node(&mut self, at: &NodeRef) -> Result<OpeningNode> {
        let mut next = self.forest.clone();
        let removed = next
            .remove(at)
            .ok_or_else(|| TrainerError::NodeNotFound(at.clone()))?;
        self.commit(next)?;

        tracing::info!(
            node = %at,
            "Deleted \"{}\" and {} sub-variation(s)",
            removed.name,
            removed.descendant_count()
        );
        Ok(removed)
    }
}
