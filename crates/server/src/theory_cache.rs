//! Canonical theory loaded once per process.
//!
//! The dataset compiled into `opening-core` is a sample. The full Lichess
//! chess-openings dataset is supplied with `THEORY_TSV_PATH`, either as one
//! TSV file or as the directory holding `a.tsv` to `e.tsv`. The bundled
//! sample is the fallback.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use opening_core::TheoryIndex;

/// Index over the bundled dataset, parsed at first access.
pub static BUNDLED_THEORY: LazyLock<Arc<TheoryIndex>> = LazyLock::new(|| {
    match TheoryIndex::bundled() {
        Ok(index) => Arc::new(index),
        Err(e) => {
            tracing::warn!("Failed to parse bundled opening theory: {}", e);
            tracing::warn!("Opening detection will be unavailable");
            Arc::new(TheoryIndex::default())
        }
    }
});

/// Load the theory index from `path`, falling back to the bundled dataset.
pub fn load_theory(path: Option<&Path>) -> Arc<TheoryIndex> {
    let Some(path) = path else {
        return BUNDLED_THEORY.clone();
    };

    match load_tsv(path) {
        Ok(index) if !index.is_empty() => {
            tracing::info!("Loaded {} theory entries from {}", index.len(), path.display());
            Arc::new(index)
        }
        Ok(_) => {
            tracing::warn!("Theory file {} is empty, using bundled dataset", path.display());
            BUNDLED_THEORY.clone()
        }
        Err(e) => {
            tracing::warn!("Failed to load theory from {}: {}", path.display(), e);
            BUNDLED_THEORY.clone()
        }
    }
}

fn load_tsv(path: &Path) -> Result<TheoryIndex, Box<dyn std::error::Error>> {
    if !path.is_dir() {
        let file = File::open(path)?;
        return Ok(TheoryIndex::from_tsv(BufReader::new(file))?);
    }

    // Parts load in file name order: a.tsv, b.tsv, ...
    let mut parts: Vec<PathBuf> = fs::read_dir(path)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "tsv"))
        .collect();
    parts.sort();

    let readers = parts
        .iter()
        .map(|p| File::open(p).map(BufReader::new))
        .collect::<std::io::Result<Vec<_>>>()?;
    tracing::debug!("Loading theory from {} file(s) in {}", readers.len(), path.display());
    Ok(TheoryIndex::from_tsv_parts(readers)?)
}
