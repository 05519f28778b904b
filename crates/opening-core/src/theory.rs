//! Canonical opening theory index.
//!
//! The index is keyed by the exact space-joined SAN sequence of each named
//! opening. It is built once from a tab-separated dataset (`eco`, `name`,
//! `pgn` columns) and never changes afterwards.

use std::collections::HashMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pgn::parse_movetext;

/// Bundled sample of the Lichess chess-openings dataset covering the common
/// main lines. The full dataset (a.tsv to e.tsv, about 3,590 lines) is
/// loaded with [`TheoryIndex::from_tsv_parts`].
pub const BUNDLED_TSV: &str = include_str!("../data/openings.tsv");

/// One named opening from the reference dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalEntry {
    pub eco: String,
    pub name: String,
    pub moves: Vec<String>,
    pub move_count: usize,
    /// Lowercase `"{eco} {name}"`, used for substring search.
    pub search_text: String,
}

impl CanonicalEntry {
    fn new(eco: &str, name: &str, moves: Vec<String>) -> Self {
        Self {
            eco: eco.to_string(),
            name: name.to_string(),
            move_count: moves.len(),
            search_text: format!("{eco} {name}").to_lowercase(),
            moves,
        }
    }
}

/// Result of a canonical lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalMatch {
    pub eco: String,
    pub name: String,
    pub matched_moves: usize,
}

#[derive(Deserialize)]
struct TheoryRecord {
    eco: String,
    name: String,
    pgn: String,
}

/// Immutable map from move sequence to named opening.
#[derive(Debug, Default, Clone)]
pub struct TheoryIndex {
    entries: Vec<CanonicalEntry>,
    by_key: HashMap<String, usize>,
}

impl TheoryIndex {
    /// Build from `(eco, name, moves)` triples in dataset order.
    ///
    /// A repeated key overwrites the earlier value but keeps its position.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, S, Vec<String>)>,
        S: AsRef<str>,
    {
        let mut index = Self::default();
        for (eco, name, moves) in entries {
            if moves.is_empty() {
                continue;
            }
            let key = moves.join(" ");
            let entry = CanonicalEntry::new(eco.as_ref(), name.as_ref(), moves);
            match index.by_key.get(&key) {
                Some(&pos) => index.entries[pos] = entry,
                None => {
                    index.by_key.insert(key, index.entries.len());
                    index.entries.push(entry);
                }
            }
        }
        index
    }

    /// Parse a tab-separated dataset with an `eco\tname\tpgn` header.
    pub fn from_tsv<R: Read>(reader: R) -> Result<Self> {
        Self::from_tsv_parts([reader])
    }

    /// Parse a dataset split over several files (the Lichess `a.tsv` to
    /// `e.tsv` layout). Parts are merged in order; a later duplicate line
    /// replaces an earlier one.
    pub fn from_tsv_parts<I, R>(parts: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: Read,
    {
        let mut rows = Vec::new();
        for part in parts {
            let mut rdr = csv::ReaderBuilder::new()
                .delimiter(b'\t')
                .flexible(true)
                .from_reader(part);
            for record in rdr.deserialize::<TheoryRecord>() {
                let record = record?;
                rows.push((record.eco, record.name, parse_movetext(&record.pgn)));
            }
        }

        let index = Self::from_entries(rows);
        tracing::info!("Loaded opening theory: {} entries", index.len());
        Ok(index)
    }

    /// Index over the dataset compiled into the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_tsv(BUNDLED_TSV.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in dataset insertion order.
    pub fn entries(&self) -> &[CanonicalEntry] {
        &self.entries
    }

    pub fn get(&self, moves: &[String]) -> Option<&CanonicalEntry> {
        self.by_key.get(&moves.join(" ")).map(|&i| &self.entries[i])
    }

    /// Longest prefix of `moves` that names an opening.
    pub fn match_canonical(&self, moves: &[String]) -> Option<CanonicalMatch> {
        (1..=moves.len()).rev().find_map(|len| {
            self.get(&moves[..len]).map(|entry| CanonicalMatch {
                eco: entry.eco.clone(),
                name: entry.name.clone(),
                matched_moves: len,
            })
        })
    }
}
