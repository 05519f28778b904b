//! Lichess opening explorer client.
//!
//! Crowd statistics for the board position: game results and the most
//! played continuations, from either the masters or the lichess database.

use std::time::Duration;

use opening_core::engine::san_to_uci;
use opening_core::TrainerError;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// Number of continuations kept from a response.
pub const TOP_MOVES: usize = 10;

pub const LICHESS_RATINGS: &str = "1600,1800,2000,2200,2500";
pub const LICHESS_SPEEDS: &str = "blitz,rapid,classical";

#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    #[error("Rate limited by the opening explorer. Please wait a moment.")]
    RateLimited,

    #[error("Explorer returned HTTP {0}")]
    Status(StatusCode),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error(transparent)]
    Moves(#[from] TrainerError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    #[default]
    Masters,
    Lichess,
}

impl Database {
    pub fn endpoint(self) -> &'static str {
        match self {
            Database::Masters => "masters",
            Database::Lichess => "lichess",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerOptions {
    pub database: Database,
    pub ratings: Option<String>,
    pub speeds: Option<String>,
}

impl ExplorerOptions {
    /// The lichess database needs rating and speed filters; masters takes none.
    pub fn for_database(database: Database) -> Self {
        match database {
            Database::Masters => Self {
                database,
                ratings: None,
                speeds: None,
            },
            Database::Lichess => Self {
                database,
                ratings: Some(LICHESS_RATINGS.to_string()),
                speeds: Some(LICHESS_SPEEDS.to_string()),
            },
        }
    }

    fn query(&self, play: String) -> Vec<(&'static str, String)> {
        let mut params = vec![("play", play)];
        if let Some(ratings) = &self.ratings {
            params.push(("ratings", ratings.clone()));
        }
        if let Some(speeds) = &self.speeds {
            params.push(("speeds", speeds.clone()));
        }
        params
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExplorerMove {
    uci: String,
    san: String,
    white: u64,
    draws: u64,
    black: u64,
    #[serde(default)]
    average_rating: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ExplorerResponse {
    white: u64,
    draws: u64,
    black: u64,
    #[serde(default)]
    moves: Vec<ExplorerMove>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionStats {
    pub white: u64,
    pub draws: u64,
    pub black: u64,
    pub total: u64,
    pub white_percent: u32,
    pub draws_percent: u32,
    pub black_percent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularMove {
    pub san: String,
    pub uci: String,
    pub total: u64,
    pub white: u64,
    pub draws: u64,
    pub black: u64,
    /// Share of the position's games that continued with this move.
    pub frequency: f64,
    pub average_rating: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionData {
    pub stats: PositionStats,
    pub moves: Vec<PopularMove>,
}

fn percent(part: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u32
}

impl From<ExplorerResponse> for PositionData {
    fn from(resp: ExplorerResponse) -> Self {
        let total = resp.white + resp.draws + resp.black;
        let stats = PositionStats {
            white: resp.white,
            draws: resp.draws,
            black: resp.black,
            total,
            white_percent: percent(resp.white, total),
            draws_percent: percent(resp.draws, total),
            black_percent: percent(resp.black, total),
        };

        let moves = resp
            .moves
            .into_iter()
            .take(TOP_MOVES)
            .map(|m| {
                let games = m.white + m.draws + m.black;
                let frequency = if total == 0 {
                    0.0
                } else {
                    (games as f64 / total as f64 * 1000.0).round() / 10.0
                };
                PopularMove {
                    san: m.san,
                    uci: m.uci,
                    total: games,
                    white: m.white,
                    draws: m.draws,
                    black: m.black,
                    frequency,
                    average_rating: m.average_rating,
                }
            })
            .collect();

        Self { stats, moves }
    }
}

#[derive(Debug, Clone)]
pub struct ExplorerClient {
    client: Client,
    base_url: String,
    token: String,
}

impl ExplorerClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self, ExplorerError> {
        let client = Client::builder()
            .user_agent("OpeningTrainer/1.0")
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Fetch statistics for the position after `moves` (SAN from the start).
    pub async fn fetch_position_data(
        &self,
        moves: &[String],
        options: &ExplorerOptions,
    ) -> Result<PositionData, ExplorerError> {
        let play = san_to_uci(moves)?.join(",");
        let url = format!("{}/{}", self.base_url, options.database.endpoint());

        let resp = self
            .client
            .get(&url)
            .query(&options.query(play))
            .bearer_auth(&self.token)
            .send()
            .await?;

        if resp.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(ExplorerError::RateLimited);
        }
        if !resp.status().is_success() {
            return Err(ExplorerError::Status(resp.status()));
        }

        let body: ExplorerResponse = resp.json().await?;
        tracing::debug!(
            database = options.database.endpoint(),
            "Explorer returned {} games, {} moves",
            body.white + body.draws + body.black,
            body.moves.len()
        );
        Ok(body.into())
    }
}
