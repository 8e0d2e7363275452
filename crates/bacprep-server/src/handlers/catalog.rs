//! Subject and topic lookups. All content is seeded and read-only.

use axum::extract::{Path, State};
use axum::Json;

use bacprep_core::model::{Subject, Topic};

use crate::error::ApiError;
use crate::AppState;

/// Handler for `GET /api/subjects`.
pub async fn list_subjects(State(state): State<AppState>) -> Json<Vec<Subject>> {
    let store = state.store.lock().await;
    Json(store.all_subjects())
}

/// Handler for `GET /api/subjects/:id`.
pub async fn get_subject(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<Subject>, ApiError> {
    let store = state.store.lock().await;
    store
        .get_subject(id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Subject not found".into()))
}

/// Handler for `GET /api/subjects/:id/topics`. Topics come back in lesson
/// order.
pub async fn list_topics(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Json<Vec<Topic>> {
    let store = state.store.lock().await;
    Json(store.topics_by_subject(id))
}
