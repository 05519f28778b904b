pub mod health;
pub mod library;
pub mod openings;
pub mod session;
pub mod stats;

use axum::Json;
use opening_core::Outcome;
use serde_json::{json, Value as JsonValue};

/// Body for a declined confirmation: nothing changed, and the client should
/// ask the user and repeat the request with `confirm: true`.
pub(crate) fn confirm_required(message: String) -> JsonValue {
    json!({ "status": "confirm", "message": message })
}

pub(crate) fn outcome_json<T>(
    outcome: Outcome<T>,
    applied: impl FnOnce(T) -> JsonValue,
) -> Json<JsonValue> {
    match outcome {
        Outcome::Applied(value) => Json(applied(value)),
        Outcome::Declined { message } => Json(confirm_required(message)),
    }
}
