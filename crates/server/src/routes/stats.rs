use std::sync::Arc;

use axum::{extract::Query, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use crate::clients::explorer::Database;
use crate::stats::StatsTracker;

#[derive(Deserialize)]
pub struct StatsParams {
    pub database: Option<Database>,
}

/// GET /api/stats?database=masters|lichess
/// Latest statistics for the board position. Switching database starts a
/// new fetch; poll again for its result.
pub async fn get_stats(
    Extension(stats): Extension<Arc<StatsTracker>>,
    Query(q): Query<StatsParams>,
) -> Json<JsonValue> {
    if !stats.enabled() {
        return Json(json!({ "enabled": false, "stats": null }));
    }

    if let Some(database) = q.database {
        stats.select_database(database).await;
    }

    Json(json!({
        "enabled": true,
        "database": stats.database().await,
        "stats": stats.latest().await,
        "error": stats.last_error().await,
    }))
}
