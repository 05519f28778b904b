//! Move engine seam and the shakmaty-backed implementation.

use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Position};

use crate::error::{Result, TrainerError};

/// Legality and notation are delegated to an engine; the trainer only
/// keeps the SAN it gets back.
pub trait MoveEngine {
    /// Play a move given in SAN and return its canonical SAN.
    fn apply_move(&mut self, san: &str) -> Result<String>;

    /// Back to the initial position.
    fn reset(&mut self);

    /// Encoding of the current position (FEN for the standard engine).
    fn position_key(&self) -> String;
}

#[derive(Debug, Clone, Default)]
pub struct ShakmatyEngine {
    pos: Chess,
}

impl ShakmatyEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MoveEngine for ShakmatyEngine {
    fn apply_move(&mut self, san: &str) -> Result<String> {
        let parsed: SanPlus = san
            .trim()
            .parse()
            .map_err(|_| TrainerError::IllegalMove(san.to_string()))?;
        let mv = parsed
            .san
            .to_move(&self.pos)
            .map_err(|_| TrainerError::IllegalMove(san.to_string()))?;
        let played = SanPlus::from_move_and_play_unchecked(&mut self.pos, mv);
        Ok(played.to_string())
    }

    fn reset(&mut self) {
        self.pos = Chess::default();
    }

    fn position_key(&self) -> String {
        Fen::from_position(&self.pos, EnPassantMode::Legal).to_string()
    }
}

/// Convert a SAN line from the initial position to UCI moves.
pub fn san_to_uci(moves: &[String]) -> Result<Vec<String>> {
    let mut pos = Chess::default();
    let mut out = Vec::with_capacity(moves.len());
    for san in moves {
        let parsed: SanPlus = san
            .parse()
            .map_err(|_| TrainerError::IllegalMove(san.clone()))?;
        let mv = parsed
            .san
            .to_move(&pos)
            .map_err(|_| TrainerError::IllegalMove(san.clone()))?;
        out.push(mv.to_uci(CastlingMode::Standard).to_string());
        pos.play_unchecked(mv);
    }
    Ok(out)
}
