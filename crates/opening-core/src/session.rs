//! Training session: board history, cursor, loaded line, and the
//! user-facing workflows built on the matcher and mutation engine.
//!
//! A `Session` is the only owner of this state. Callers hold it and pass
//! it to whatever drives user events; nothing here is global.

use std::sync::Arc;

use serde::Serialize;

use crate::engine::{MoveEngine, ShakmatyEngine};
use crate::error::{Result, TrainerError};
use crate::matcher::{match_tree, TreeMatch};
use crate::mutation::validate_variation;
use crate::pgn::format_movetext;
use crate::store::{BlobStore, OpeningStore};
use crate::theory::{CanonicalMatch, TheoryIndex};
use crate::tree::{NodeRef, OpeningNode};

/// Yes/no prompt shown before a destructive or overwriting edit.
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// Result of an operation gated by a [`Confirm`] prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Applied(T),
    /// The prompt was declined; nothing changed.
    Declined { message: String },
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }
}

fn ask<T>(confirm: &mut impl Confirm, message: String, apply: impl FnOnce() -> Result<T>) -> Result<Outcome<T>> {
    if confirm.confirm(&message) {
        apply().map(Outcome::Applied)
    } else {
        Ok(Outcome::Declined { message })
    }
}

fn kind_label(at: &NodeRef) -> &'static str {
    if at.is_root() {
        "opening"
    } else {
        "variation"
    }
}

/// Moves past a matched node and whether the node may be lengthened in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Continuation {
    pub parent: TreeMatch,
    pub new_moves: Vec<String>,
    /// False for canonical nodes: only a new sub-variation is offered.
    pub can_extend: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickAddOffer {
    pub parent: NodeRef,
    pub name: String,
    pub new_moves: Vec<String>,
}

/// Everything a front end needs to render the current state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub moves: Vec<String>,
    pub movetext: String,
    pub cursor: usize,
    pub history: Vec<String>,
    pub save_warning: Option<String>,
    pub position_key: String,
    pub detected: Option<CanonicalMatch>,
    pub highlight: Option<TreeMatch>,
    pub continuation: Option<Continuation>,
    pub quick_add: Option<QuickAddOffer>,
    pub loaded: Option<NodeRef>,
}

pub struct Session<B: BlobStore, E: MoveEngine = ShakmatyEngine> {
    store: OpeningStore<B>,
    theory: Arc<TheoryIndex>,
    engine: E,
    history: Vec<String>,
    /// Number of history moves currently on the board.
    cursor: usize,
    loaded: Option<NodeRef>,
}

impl<B: BlobStore, E: MoveEngine> Session<B, E> {
    pub fn new(store: OpeningStore<B>, theory: Arc<TheoryIndex>, mut engine: E) -> Self {
        engine.reset();
        Self {
            store,
            theory,
            engine,
            history: Vec::new(),
            cursor: 0,
            loaded: None,
        }
    }

    pub fn store(&self) -> &OpeningStore<B> {
        &self.store
    }

    pub fn theory(&self) -> &TheoryIndex {
        &self.theory
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn loaded(&self) -> Option<&NodeRef> {
        self.loaded.as_ref()
    }

    /// Moves up to the cursor; the only moves any save ever uses.
    pub fn current_moves(&self) -> &[String] {
        &self.history[..self.cursor]
    }

    fn loaded_node(&self) -> Result<(NodeRef, &OpeningNode)> {
        let at = self.loaded.clone().ok_or(TrainerError::NothingLoaded)?;
        let node = self
            .store
            .forest()
            .get(&at)
            .ok_or_else(|| TrainerError::NodeNotFound(at.clone()))?;
        Ok((at, node))
    }

    // ----- board -----

    /// Play a move at the cursor, discarding any moves after it.
    pub fn play_move(&mut self, san: &str) -> Result<String> {
        let played = self.engine.apply_move(san)?;
        self.history.truncate(self.cursor);
        self.history.push(played.clone());
        self.cursor = self.history.len();
        Ok(played)
    }

    /// Show the position after `ply` moves. Out of range is ignored.
    pub fn go_to_move(&mut self, ply: usize) -> bool {
        if ply > self.history.len() {
            return false;
        }
        self.engine.reset();
        let mut applied = 0;
        for san in &self.history[..ply] {
            if let Err(e) = self.engine.apply_move(san) {
                tracing::warn!("History replay stopped at move {}: {}", applied, e);
                break;
            }
            applied += 1;
        }
        if applied < ply {
            self.history.truncate(applied);
        }
        self.cursor = applied;
        true
    }

    pub fn next(&mut self) -> bool {
        self.cursor < self.history.len() && self.go_to_move(self.cursor + 1)
    }

    pub fn previous(&mut self) -> bool {
        self.cursor > 0 && self.go_to_move(self.cursor - 1)
    }

    pub fn start(&mut self) -> bool {
        self.go_to_move(0)
    }

    pub fn end(&mut self) -> bool {
        self.go_to_move(self.history.len())
    }

    /// Clear the board and forget the loaded line.
    pub fn reset(&mut self, confirm: &mut impl Confirm) -> Outcome<()> {
        if !self.history.is_empty()
            && !confirm.confirm("Are you sure you want to reset the board? This will clear all moves.")
        {
            return Outcome::Declined {
                message: "Reset cancelled".to_string(),
            };
        }
        self.clear_board();
        self.loaded = None;
        Outcome::Applied(())
    }

    fn clear_board(&mut self) {
        self.engine.reset();
        self.history.clear();
        self.cursor = 0;
    }

    /// Replay a saved line onto the board and remember it for updates.
    ///
    /// On a bad move the moves before it stay on the board, the node stays
    /// loaded, and the failure is returned.
    pub fn load_node(&mut self, at: &NodeRef) -> Result<usize> {
        let moves = self
            .store
            .forest()
            .get(at)
            .ok_or_else(|| TrainerError::NodeNotFound(at.clone()))?
            .moves
            .clone();

        self.clear_board();
        self.loaded = Some(at.clone());

        for (index, san) in moves.iter().enumerate() {
            match self.engine.apply_move(san) {
                Ok(played) => self.history.push(played),
                Err(_) => {
                    self.cursor = self.history.len();
                    tracing::warn!(node = %at, "Invalid move encountered: {} at position {}", san, index);
                    return Err(TrainerError::InvalidMoveReplay {
                        index,
                        san: san.clone(),
                    });
                }
            }
        }
        self.cursor = self.history.len();
        Ok(self.cursor)
    }

    // ----- saving -----

    pub fn save_main(&mut self, name: &str) -> Result<NodeRef> {
        if self.cursor == 0 {
            return Err(TrainerError::EmptyMoves);
        }
        let moves = self.current_moves().to_vec();
        self.store.add_main_opening(name, &moves)
    }

    /// Save the current moves under `parent`, or under the detected parent
    /// when none is given.
    pub fn save_variation(&mut self, name: &str, parent: Option<NodeRef>) -> Result<NodeRef> {
        if self.cursor == 0 {
            return Err(TrainerError::EmptyMoves);
        }
        if name.trim().is_empty() {
            return Err(TrainerError::EmptyVariationName);
        }
        let moves = self.current_moves().to_vec();
        let parent = match parent {
            Some(p) => p,
            None => match_tree(self.store.forest(), &moves)
                .map(|m| m.node)
                .ok_or(TrainerError::NoParentDetected)?,
        };
        self.store.add_variation(&parent, name, &moves)
    }

    /// Lengthen `target` (or the node matched at the current position) to
    /// the current moves.
    pub fn extend(&mut self, target: Option<NodeRef>, confirm: &mut impl Confirm) -> Result<Outcome<NodeRef>> {
        let moves = self.current_moves().to_vec();
        let at = match target {
            Some(at) => at,
            None => match_tree(self.store.forest(), &moves)
                .map(|m| m.node)
                .ok_or(TrainerError::NoParentDetected)?,
        };
        let node = self
            .store
            .forest()
            .get(&at)
            .ok_or_else(|| TrainerError::NodeNotFound(at.clone()))?;
        if node.is_from_database {
            return Err(TrainerError::Immutable {
                name: node.name.clone(),
            });
        }
        if moves.len() <= node.moves.len() {
            return Err(TrainerError::NoNewMoves {
                name: node.name.clone(),
            });
        }
        validate_variation(node, &moves)?;

        let message = format!(
            "Extend \"{}\" from {} to {} moves?\n\nThis will update the existing {}.",
            node.name,
            node.moves.len(),
            moves.len(),
            kind_label(&at)
        );
        let store = &mut self.store;
        ask(confirm, message, || {
            store.extend_node(&at, &moves)?;
            Ok(at.clone())
        })
    }

    /// Overwrite the loaded line with the current moves.
    pub fn update(&mut self, confirm: &mut impl Confirm) -> Result<Outcome<()>> {
        let (at, node) = self.loaded_node()?;
        if self.cursor == 0 {
            return Err(TrainerError::EmptyMoves);
        }
        if node.is_from_database {
            return Err(TrainerError::Immutable {
                name: node.name.clone(),
            });
        }

        let moves = self.current_moves().to_vec();
        let message = format!(
            "Update \"{}\" from {} to {} moves?\n\nThis will update the existing {}.",
            node.name,
            node.moves.len(),
            moves.len(),
            kind_label(&at)
        );
        let store = &mut self.store;
        ask(confirm, message, || store.update_node(&at, &moves))
    }

    /// Add the moves played past the loaded line as a sub-variation of it,
    /// named after the parent and the new moves.
    pub fn quick_add(&mut self, confirm: &mut impl Confirm) -> Result<Outcome<NodeRef>> {
        let (at, node) = self.loaded_node()?;
        let moves = self.current_moves().to_vec();
        if moves.len() <= node.moves.len() {
            return Err(TrainerError::NoNewMoves {
                name: node.name.clone(),
            });
        }
        validate_variation(node, &moves)?;

        let name = format!("{} ({})", node.name, moves[node.moves.len()..].join(" "));
        let message = format!(
            "Create new sub-variation:\n\"{}\"\n\nwith {} moves under \"{}\"?",
            name,
            moves.len(),
            node.name
        );
        let store = &mut self.store;
        ask(confirm, message, || store.add_variation(&at, &name, &moves))
    }

    /// Delete a node and its subtree.
    pub fn delete(&mut self, at: &NodeRef, confirm: &mut impl Confirm) -> Result<Outcome<OpeningNode>> {
        let node = self
            .store
            .forest()
            .get(at)
            .ok_or_else(|| TrainerError::NodeNotFound(at.clone()))?;

        let below = node.descendant_count();
        let message = if below > 0 {
            format!(
                "Are you sure you want to delete the {} \"{}\" and all {} sub-variation(s)?\n\nThis action cannot be undone.",
                kind_label(at),
                node.name,
                below
            )
        } else {
            format!(
                "Are you sure you want to delete the {} \"{}\"?\n\nThis action cannot be undone.",
                kind_label(at),
                node.name
            )
        };

        let outcome = ask(confirm, message, || self.store.delete_node(at))?;
        if outcome.is_applied() {
            self.loaded = self.loaded.take().and_then(|l| l.after_removal(at));
        }
        Ok(outcome)
    }

    // ----- derived state -----

    pub fn detect(&self) -> Option<CanonicalMatch> {
        self.theory.match_canonical(self.current_moves())
    }

    pub fn view(&self) -> SessionView {
        let moves = self.current_moves().to_vec();
        let highlight = match_tree(self.store.forest(), &moves);

        let continuation = highlight.as_ref().and_then(|m| {
            (moves.len() > m.match_length).then(|| Continuation {
                parent: m.clone(),
                new_moves: moves[m.match_length..].to_vec(),
                can_extend: !m.is_from_database,
            })
        });

        let quick_add = self.loaded_node().ok().and_then(|(at, node)| {
            (moves.len() > node.moves.len() && node.is_prefix_of(&moves)).then(|| {
                let new_moves = moves[node.moves.len()..].to_vec();
                QuickAddOffer {
                    parent: at,
                    name: format!("{} ({})", node.name, new_moves.join(" ")),
                    new_moves,
                }
            })
        });

        let save_warning = (self.cursor < self.history.len()).then(|| {
            if self.cursor == 0 {
                "At starting position - no moves to save".to_string()
            } else {
                format!(
                    "Saving will only include {} of {} moves",
                    self.cursor,
                    self.history.len()
                )
            }
        });

        SessionView {
            movetext: format_movetext(&moves),
            detected: self.detect(),
            cursor: self.cursor,
            history: self.history.clone(),
            save_warning,
            position_key: self.engine.position_key(),
            highlight,
            continuation,
            quick_add,
            loaded: self.loaded.clone(),
            moves,
        }
    }
}
