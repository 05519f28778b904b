use std::sync::Arc;

use opening_core::{MemoryStore, OpeningStore, Session, ShakmatyEngine, TheoryIndex};

/// Split a space-separated SAN line.
pub fn mv(line: &str) -> Vec<String> {
    line.split_whitespace().map(String::from).collect()
}

/// Small theory table covering the king's pawn lines used across tests.
#[allow(dead_code)]
pub fn small_theory() -> TheoryIndex {
    TheoryIndex::from_entries(vec![
        ("B00", "King's Pawn Game", mv("e4")),
        ("C20", "King's Pawn Game", mv("e4 e5")),
        ("C40", "King's Knight Opening", mv("e4 e5 Nf3")),
        ("C44", "King's Knight Opening: Normal Variation", mv("e4 e5 Nf3 Nc6")),
        ("B20", "Sicilian Defense", mv("e4 c5")),
    ])
}

/// A session over an in-memory store seeded from `theory`.
#[allow(dead_code)]
pub fn session(theory: TheoryIndex) -> Session<MemoryStore> {
    let store = OpeningStore::open(MemoryStore::new(), &theory).expect("open store");
    Session::new(store, Arc::new(theory), ShakmatyEngine::new())
}

/// Play a space-separated SAN line on the session board.
#[allow(dead_code)]
pub fn play(session: &mut Session<MemoryStore>, line: &str) {
    for san in line.split_whitespace() {
        session
            .play_move(san)
            .unwrap_or_else(|e| panic!("could not play {san}: {e}"));
    }
}

#[allow(dead_code)]
pub fn accept(_: &str) -> bool {
    true
}

#[allow(dead_code)]
pub fn decline(_: &str) -> bool {
    false
}
