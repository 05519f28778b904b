use axum::{extract::Query, Extension, Json};
use opening_core::library::{self, Category, LibraryQuery};
use opening_core::pgn::parse_movetext;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use crate::state::SharedSession;

#[derive(Deserialize)]
pub struct LibraryParams {
    pub category: Option<String>,
    pub search: Option<String>,
    /// Only list roots continuing the moves on the board.
    #[serde(default)]
    pub auto: bool,
}

/// GET /api/library?category=C&search=gambit&auto=false
pub async fn list_openings(
    Extension(session): Extension<SharedSession>,
    Query(q): Query<LibraryParams>,
) -> Json<JsonValue> {
    let session = session.lock().await;
    let current = session.current_moves();

    let query = LibraryQuery {
        category: q.category.as_deref().map(Category::parse).unwrap_or_default(),
        search: q.search.unwrap_or_default().trim().to_string(),
        position: if q.auto { current.to_vec() } else { Vec::new() },
    };
    let listing = library::list(session.store().forest(), &query, current);
    Json(json!(listing))
}

/// GET /api/library/parents
/// Every saved node, flattened for the parent picker.
pub async fn parent_choices(Extension(session): Extension<SharedSession>) -> Json<JsonValue> {
    let session = session.lock().await;
    Json(json!(library::parent_choices(session.store().forest())))
}

#[derive(Deserialize)]
pub struct DetectParams {
    #[serde(default)]
    pub moves: String,
}

/// GET /api/theory/detect?moves=1.%20e4%20e5
/// Accepts bare SAN or numbered movetext.
pub async fn detect(
    Extension(session): Extension<SharedSession>,
    Query(q): Query<DetectParams>,
) -> Json<JsonValue> {
    let moves = parse_movetext(&q.moves);
    let session = session.lock().await;
    let detected = session.theory().match_canonical(&moves);
    Json(json!({ "moves": moves, "detected": detected }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::session::test_support::fixture;

    #[tokio::test]
    async fn test_auto_filter_uses_board() {
        let (_dir, session, _stats) = fixture();
        session.lock().await.play_move("e4").unwrap();

        let Json(all) = list_openings(
            Extension(session.clone()),
            Query(LibraryParams {
                category: Some("C".into()),
                search: None,
                auto: false,
            }),
        )
        .await;
        assert_eq!(all["matched"], 1);

        let Json(auto) = list_openings(
            Extension(session.clone()),
            Query(LibraryParams {
                category: Some("C".into()),
                search: None,
                auto: true,
            }),
        )
        .await;
        assert_eq!(auto["matched"], 2);
        assert_eq!(auto["total"], 2);
    }

    #[tokio::test]
    async fn test_detect_accepts_movetext() {
        let (_dir, session, _stats) = fixture();
        let Json(resp) = detect(
            Extension(session),
            Query(DetectParams {
                moves: "1. e4 c5 2. Nf3".into(),
            }),
        )
        .await;
        assert_eq!(resp["detected"]["eco"], "B20");
        assert_eq!(resp["detected"]["matchedMoves"], 2);
    }
}
