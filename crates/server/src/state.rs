use std::sync::Arc;

use anyhow::Context;
use opening_core::{FileStore, OpeningStore, Session, ShakmatyEngine};
use tokio::sync::Mutex;

use crate::clients::explorer::ExplorerClient;
use crate::config::Config;
use crate::stats::StatsTracker;
use crate::theory_cache;

/// The single training session served by this process.
pub type SharedSession = Arc<Mutex<Session<FileStore>>>;

pub fn open_session(config: &Config) -> anyhow::Result<SharedSession> {
    let theory = theory_cache::load_theory(config.theory_tsv_path.as_deref());
    let blobs = FileStore::open(&config.data_dir)
        .with_context(|| format!("Failed to open data dir {}", config.data_dir.display()))?;
    let store = OpeningStore::open(blobs, &theory).context("Failed to load saved openings")?;
    Ok(Arc::new(Mutex::new(Session::new(
        store,
        theory,
        ShakmatyEngine::new(),
    ))))
}

pub fn stats_tracker(config: &Config) -> anyhow::Result<Arc<StatsTracker>> {
    let client = match &config.lichess_api_token {
        Some(token) => Some(
            ExplorerClient::new(&config.explorer_url, token)
                .context("Failed to build explorer client")?,
        ),
        None => None,
    };
    Ok(Arc::new(StatsTracker::new(client)))
}
