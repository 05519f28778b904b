//! Trainer error types

use thiserror::Error;

use crate::tree::NodeRef;

pub type Result<T> = std::result::Result<T, TrainerError>;

/// Coarse grouping of [`TrainerError`] used by callers that only care about
/// how to present a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Immutability,
    NoParentDetected,
    NotFound,
    InvalidMoveReplay,
    Storage,
}

#[derive(Error, Debug)]
pub enum TrainerError {
    #[error("Please enter an opening name.")]
    EmptyName,

    #[error("Please enter a variation name.")]
    EmptyVariationName,

    #[error("Please make some moves on the board first.")]
    EmptyMoves,

    #[error("This variation ({moves} moves) must extend beyond \"{parent}\" ({parent_moves} moves).")]
    NotExtending {
        parent: String,
        parent_moves: usize,
        moves: usize,
    },

    #[error("The moves don't match \"{parent}\". Please check your selection.")]
    PrefixMismatch { parent: String },

    #[error("No new moves to add beyond \"{name}\".")]
    NoNewMoves { name: String },

    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("Cannot modify database opening \"{name}\". Please create a variation instead.")]
    Immutable { name: String },

    #[error("Please select a parent opening. If no parent was auto-detected, save this as a main opening first.")]
    NoParentDetected,

    #[error("No opening loaded. Please load an opening first.")]
    NothingLoaded,

    #[error("No opening found at {0}")]
    NodeNotFound(NodeRef),

    #[error("Invalid move encountered: {san} (move {index})")]
    InvalidMoveReplay { index: usize, san: String },

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Dataset error: {0}")]
    Dataset(#[from] csv::Error),

    #[error("Invalid schema version: {0}")]
    BadVersion(String),
}

impl TrainerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TrainerError::EmptyName
            | TrainerError::EmptyVariationName
            | TrainerError::EmptyMoves
            | TrainerError::NotExtending { .. }
            | TrainerError::PrefixMismatch { .. }
            | TrainerError::NoNewMoves { .. }
            | TrainerError::IllegalMove(_) => ErrorKind::Validation,
            TrainerError::Immutable { .. } => ErrorKind::Immutability,
            TrainerError::NoParentDetected => ErrorKind::NoParentDetected,
            TrainerError::NothingLoaded | TrainerError::NodeNotFound(_) => ErrorKind::NotFound,
            TrainerError::InvalidMoveReplay { .. } => ErrorKind::InvalidMoveReplay,
            TrainerError::Io(_)
            | TrainerError::Json(_)
            | TrainerError::Dataset(_)
            | TrainerError::BadVersion(_) => ErrorKind::Storage,
        }
    }
}
