//! Schema versioning for the persisted forest.
//!
//! Legacy nodes written before `variations`/`isFromDatabase` existed pick up
//! `[]`/`false` through serde defaults when parsed, at any depth. Any store
//! below [`CURRENT_VERSION`] is then reseeded: canonical roots are rebuilt
//! from the theory index and every user-authored root is carried over after
//! them.

use crate::error::Result;
use crate::store::{load_raw, BlobStore, OPENINGS_KEY, VERSION_KEY};
use crate::theory::TheoryIndex;
use crate::tree::{Forest, OpeningNode};

/// v7: flat canonical roots with eco/moveCount/searchText.
pub const CURRENT_VERSION: u32 = 7;

/// Obsolete flag from the pre-versioned seeding scheme.
pub const LEGACY_FLAG_KEY: &str = "openings_prepopulated";

/// One flat root per canonical entry, ordered by eco code then move count.
/// The sort is stable, so equal keys keep dataset order.
pub fn seed_roots(theory: &TheoryIndex) -> Vec<OpeningNode> {
    let mut roots: Vec<OpeningNode> = theory
        .entries()
        .iter()
        .map(OpeningNode::from_canonical)
        .collect();
    roots.sort_by(|a, b| {
        a.eco
            .cmp(&b.eco)
            .then_with(|| a.moves.len().cmp(&b.moves.len()))
    });
    roots
}

/// Fresh canonical roots followed by the user roots of `previous`.
pub fn reseed(previous: Forest, theory: &TheoryIndex) -> Forest {
    let mut roots = seed_roots(theory);
    let canonical = roots.len();
    roots.extend(
        previous
            .roots
            .into_iter()
            .filter(|root| !root.is_from_database),
    );
    tracing::info!(
        "Reseeded forest: {} canonical roots, {} user roots",
        canonical,
        roots.len() - canonical
    );
    Forest::new(roots)
}

/// Bring the stored forest to [`CURRENT_VERSION`] and return it.
///
/// At the current version nothing is written, so running this repeatedly
/// leaves the store byte-identical.
pub fn migrate<B: BlobStore>(blobs: &mut B, theory: &TheoryIndex) -> Result<(Forest, u32)> {
    let (forest, version) = load_raw(blobs)?;
    if version >= CURRENT_VERSION {
        return Ok((forest, version));
    }

    tracing::info!(
        "Migrating openings from schema v{} to v{}",
        version,
        CURRENT_VERSION
    );
    blobs.remove(LEGACY_FLAG_KEY)?;

    let forest = reseed(forest, theory);
    blobs.set(OPENINGS_KEY, &serde_json::to_string(&forest)?)?;
    blobs.set(VERSION_KEY, &CURRENT_VERSION.to_string())?;

    Ok((forest, CURRENT_VERSION))
}
