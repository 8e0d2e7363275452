//! Request handlers, grouped by route family.

pub mod ai;
pub mod auth;
pub mod catalog;
pub mod planner;
pub mod practice;
pub mod progress;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct Ack {
    message: String,
}

/// Handler for `POST /api/init-demo-data`.
///
/// Loads the demo fixture set. Not idempotent: repeating the call duplicates
/// every seeded entity.
pub async fn init_demo_data(State(state): State<AppState>) -> Json<Ack> {
    let mut store = state.store.lock().await;
    store.initialize_demo_data();
    Json(Ack {
        message: "Demo data initialized successfully".to_string(),
    })
}
