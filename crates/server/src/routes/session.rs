use std::sync::Arc;

use axum::{Extension, Json};
use opening_core::{FileStore, Session};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use crate::error::AppError;
use crate::routes::outcome_json;
use crate::state::SharedSession;
use crate::stats::StatsTracker;

/// Point the stats overlay at the position now on the board.
pub(crate) async fn board_changed(stats: &Arc<StatsTracker>, session: &Session<FileStore>) {
    stats.refresh(session.current_moves().to_vec()).await;
}

/// GET /api/session
pub async fn get_session(Extension(session): Extension<SharedSession>) -> Json<JsonValue> {
    let session = session.lock().await;
    Json(json!(session.view()))
}

#[derive(Deserialize)]
pub struct MoveBody {
    pub san: String,
}

/// POST /api/session/move
pub async fn play_move(
    Extension(session): Extension<SharedSession>,
    Extension(stats): Extension<Arc<StatsTracker>>,
    Json(body): Json<MoveBody>,
) -> Result<Json<JsonValue>, AppError> {
    let mut session = session.lock().await;
    let played = session.play_move(&body.san)?;
    board_changed(&stats, &session).await;
    Ok(Json(json!({ "played": played, "view": session.view() })))
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Start,
    End,
    Next,
    Previous,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum NavigateTo {
    Ply(usize),
    Step(Step),
}

#[derive(Deserialize)]
pub struct NavigateBody {
    pub to: NavigateTo,
}

/// POST /api/session/navigate
pub async fn navigate(
    Extension(session): Extension<SharedSession>,
    Extension(stats): Extension<Arc<StatsTracker>>,
    Json(body): Json<NavigateBody>,
) -> Json<JsonValue> {
    let mut session = session.lock().await;
    let moved = match body.to {
        NavigateTo::Ply(ply) => session.go_to_move(ply),
        NavigateTo::Step(Step::Start) => session.start(),
        NavigateTo::Step(Step::End) => session.end(),
        NavigateTo::Step(Step::Next) => session.next(),
        NavigateTo::Step(Step::Previous) => session.previous(),
    };
    if moved {
        board_changed(&stats, &session).await;
    }
    Json(json!({ "moved": moved, "view": session.view() }))
}

#[derive(Deserialize)]
pub struct ConfirmBody {
    #[serde(default)]
    pub confirm: bool,
}

/// POST /api/session/reset
pub async fn reset(
    Extension(session): Extension<SharedSession>,
    Extension(stats): Extension<Arc<StatsTracker>>,
    Json(body): Json<ConfirmBody>,
) -> Json<JsonValue> {
    let mut session = session.lock().await;
    let outcome = session.reset(&mut |_: &str| body.confirm);
    if outcome.is_applied() {
        board_changed(&stats, &session).await;
    }
    outcome_json(outcome, |()| json!({ "status": "ok", "view": session.view() }))
}
