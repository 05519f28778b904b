//! Latest-only crowd statistics for the board position.
//!
//! Every board change takes a new generation ticket and spawns a fetch. A
//! finished fetch is kept only if no newer ticket was taken meanwhile, so a
//! slow response can never overwrite a fresher one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::clients::explorer::{Database, ExplorerClient, ExplorerOptions, PositionData};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub database: Database,
    pub moves: Vec<String>,
    #[serde(flatten)]
    pub data: PositionData,
}

#[derive(Debug, Default)]
struct StatsState {
    database: Database,
    moves: Vec<String>,
    /// Ticket taken when `moves` and `database` were last recorded.
    ticket: u64,
    latest: Option<StatsSnapshot>,
    last_error: Option<String>,
}

pub struct StatsTracker {
    client: Option<ExplorerClient>,
    generation: AtomicU64,
    state: RwLock<StatsState>,
}

impl StatsTracker {
    pub fn new(client: Option<ExplorerClient>) -> Self {
        Self {
            client,
            generation: AtomicU64::new(0),
            state: RwLock::new(StatsState::default()),
        }
    }

    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub fn enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Take a new ticket; every older ticket becomes stale.
    ///
    /// Board changes take their ticket while holding the state lock, so the
    /// newest ticket always belongs to the moves and database on record.
    pub fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Store a finished fetch if `ticket` is still the newest.
    pub async fn apply(&self, ticket: u64, result: Result<StatsSnapshot, String>) -> bool {
        let mut state = self.state.write().await;
        if ticket != self.generation.load(Ordering::SeqCst) {
            tracing::debug!(ticket, "Discarding stale position stats");
            return false;
        }
        match result {
            Ok(snapshot) => {
                state.latest = Some(snapshot);
                state.last_error = None;
            }
            Err(e) => {
                state.latest = None;
                state.last_error = Some(e);
            }
        }
        true
    }

    /// Record the new board moves and spawn a fetch for them.
    pub async fn refresh(self: &Arc<Self>, moves: Vec<String>) {
        let (ticket, database) = {
            let mut state = self.state.write().await;
            state.moves = moves.clone();
            (self.restart(&mut state), state.database)
        };
        self.spawn_fetch(ticket, database, moves);
    }

    /// Switch database and refetch the current position if it changed.
    pub async fn select_database(self: &Arc<Self>, database: Database) {
        let (ticket, moves) = {
            let mut state = self.state.write().await;
            if state.database == database {
                return;
            }
            state.database = database;
            (self.restart(&mut state), state.moves.clone())
        };
        self.spawn_fetch(ticket, database, moves);
    }

    /// Invalidate pending fetches and clear the shown result. Called with
    /// the state lock held.
    fn restart(&self, state: &mut StatsState) -> u64 {
        let ticket = self.begin();
        state.ticket = ticket;
        state.latest = None;
        state.last_error = None;
        ticket
    }

    fn spawn_fetch(self: &Arc<Self>, ticket: u64, database: Database, moves: Vec<String>) {
        let Some(client) = self.client.clone() else {
            return;
        };
        if moves.is_empty() {
            return;
        }

        let tracker = Arc::clone(self);
        tokio::spawn(async move {
            let options = ExplorerOptions::for_database(database);
            let result = client
                .fetch_position_data(&moves, &options)
                .await
                .map(|data| StatsSnapshot {
                    database,
                    moves,
                    data,
                })
                .map_err(|e| {
                    tracing::warn!("Failed to fetch position stats: {}", e);
                    e.to_string()
                });
            tracker.apply(ticket, result).await;
        });
    }

    pub async fn database(&self) -> Database {
        self.state.read().await.database
    }

    pub async fn latest(&self) -> Option<StatsSnapshot> {
        self.state.read().await.latest.clone()
    }

    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.last_error.clone()
    }
}
