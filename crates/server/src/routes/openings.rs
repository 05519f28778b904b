use std::sync::Arc;

use axum::{Extension, Json};
use opening_core::NodeRef;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use crate::error::AppError;
use crate::routes::outcome_json;
use crate::routes::session::{board_changed, ConfirmBody};
use crate::state::SharedSession;
use crate::stats::StatsTracker;

#[derive(Deserialize)]
pub struct MainBody {
    pub name: String,
}

/// POST /api/openings/main
/// Save the moves up to the cursor as a new root opening.
pub async fn save_main(
    Extension(session): Extension<SharedSession>,
    Json(body): Json<MainBody>,
) -> Result<Json<JsonValue>, AppError> {
    let mut session = session.lock().await;
    let node = session.save_main(&body.name)?;
    Ok(Json(json!({ "node": node, "view": session.view() })))
}

#[derive(Deserialize)]
pub struct VariationBody {
    pub name: String,
    /// Explicit parent; the detected one is used when absent.
    #[serde(default)]
    pub parent: Option<NodeRef>,
}

/// POST /api/openings/variation
pub async fn save_variation(
    Extension(session): Extension<SharedSession>,
    Json(body): Json<VariationBody>,
) -> Result<Json<JsonValue>, AppError> {
    let mut session = session.lock().await;
    let node = session.save_variation(&body.name, body.parent)?;
    Ok(Json(json!({ "node": node, "view": session.view() })))
}

#[derive(Deserialize)]
pub struct ExtendBody {
    #[serde(default)]
    pub node: Option<NodeRef>,
    #[serde(default)]
    pub confirm: bool,
}

/// POST /api/openings/extend
pub async fn extend(
    Extension(session): Extension<SharedSession>,
    Json(body): Json<ExtendBody>,
) -> Result<Json<JsonValue>, AppError> {
    let mut session = session.lock().await;
    let outcome = session.extend(body.node, &mut |_: &str| body.confirm)?;
    Ok(outcome_json(outcome, |node| {
        json!({ "status": "ok", "node": node, "view": session.view() })
    }))
}

/// POST /api/openings/update
/// Overwrite the loaded opening with the current moves.
pub async fn update(
    Extension(session): Extension<SharedSession>,
    Json(body): Json<ConfirmBody>,
) -> Result<Json<JsonValue>, AppError> {
    let mut session = session.lock().await;
    let outcome = session.update(&mut |_: &str| body.confirm)?;
    Ok(outcome_json(outcome, |()| {
        json!({ "status": "ok", "view": session.view() })
    }))
}

/// POST /api/openings/quick-add
pub async fn quick_add(
    Extension(session): Extension<SharedSession>,
    Json(body): Json<ConfirmBody>,
) -> Result<Json<JsonValue>, AppError> {
    let mut session = session.lock().await;
    let outcome = session.quick_add(&mut |_: &str| body.confirm)?;
    Ok(outcome_json(outcome, |node| {
        json!({ "status": "ok", "node": node, "view": session.view() })
    }))
}

#[derive(Deserialize)]
pub struct NodeBody {
    pub node: NodeRef,
    #[serde(default)]
    pub confirm: bool,
}

/// POST /api/openings/delete
pub async fn delete(
    Extension(session): Extension<SharedSession>,
    Json(body): Json<NodeBody>,
) -> Result<Json<JsonValue>, AppError> {
    let mut session = session.lock().await;
    let outcome = session.delete(&body.node, &mut |_: &str| body.confirm)?;
    Ok(outcome_json(outcome, |removed| {
        json!({
            "status": "ok",
            "deleted": removed.name,
            "subVariations": removed.descendant_count(),
            "view": session.view(),
        })
    }))
}

/// POST /api/openings/load
/// Replay a saved line onto the board.
pub async fn load(
    Extension(session): Extension<SharedSession>,
    Extension(stats): Extension<Arc<StatsTracker>>,
    Json(body): Json<NodeBody>,
) -> Result<Json<JsonValue>, AppError> {
    let mut session = session.lock().await;
    let result = session.load_node(&body.node);
    // A partial replay still changed the board
    board_changed(&stats, &session).await;
    let applied = result?;
    Ok(Json(json!({ "applied": applied, "view": session.view() })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::session::test_support::{fixture, mv};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn test_save_extend_delete_cycle() {
        let (_dir, session, _stats) = fixture();
        {
            let mut s = session.lock().await;
            for san in mv("e4 e5 Nf3") {
                s.play_move(&san).unwrap();
            }
        }

        let Json(resp) = save_variation(
            Extension(session.clone()),
            Json(VariationBody {
                name: "Knight".into(),
                parent: None,
            }),
        )
        .await
        .unwrap();
        // Seeded roots: B20 then C20
        assert_eq!(resp["node"], json!({"rootIndex": 1, "path": [0]}));

        session.lock().await.play_move("Nc6").unwrap();
        let Json(resp) = extend(
            Extension(session.clone()),
            Json(ExtendBody {
                node: None,
                confirm: false,
            }),
        )
        .await
        .unwrap();
        assert_eq!(resp["status"], "confirm");
        assert!(resp["message"].as_str().unwrap().starts_with("Extend \"Knight\" from 3 to 4 moves?"));

        let Json(resp) = extend(
            Extension(session.clone()),
            Json(ExtendBody {
                node: None,
                confirm: true,
            }),
        )
        .await
        .unwrap();
        assert_eq!(resp["status"], "ok");

        let body: NodeBody =
            serde_json::from_str(r#"{"node":{"rootIndex":1,"path":[0]},"confirm":true}"#).unwrap();
        let Json(resp) = delete(Extension(session.clone()), Json(body)).await.unwrap();
        assert_eq!(resp["deleted"], "Knight");
        assert_eq!(session.lock().await.store().forest().node_count(), 2);
    }

    #[tokio::test]
    async fn test_canonical_update_is_bad_request() {
        let (_dir, session, stats) = fixture();
        let body: NodeBody = serde_json::from_str(r#"{"node":{"rootIndex":0}}"#).unwrap();
        let Json(loaded) = load(Extension(session.clone()), Extension(stats), Json(body))
            .await
            .unwrap();
        assert_eq!(loaded["applied"], 2);
        session.lock().await.play_move("Nf3").unwrap();

        let err = update(Extension(session.clone()), Json(ConfirmBody { confirm: true }))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_load_missing_node_is_not_found() {
        let (_dir, session, stats) = fixture();
        let body: NodeBody = serde_json::from_str(r#"{"node":{"rootIndex":7}}"#).unwrap();
        let err = load(Extension(session), Extension(stats), Json(body))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
