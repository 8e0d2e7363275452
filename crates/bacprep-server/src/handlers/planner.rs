//! The daily study plan.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use bacprep_core::model::{NewTask, StudyPlanTask};

use crate::error::ApiError;
use crate::AppState;

/// Handler for `GET /api/users/:id/study-plan`.
///
/// Priority tasks first, then recommended ones; ties keep insertion order.
pub async fn list_plan(
    State(state): State<AppState>,
    Path(user_id): Path<u32>,
) -> Json<Vec<StudyPlanTask>> {
    let store = state.store.lock().await;
    Json(store.user_study_plan(user_id))
}

/// Handler for `POST /api/users/:id/study-plan`.
pub async fn add_task(
    State(state): State<AppState>,
    Path(user_id): Path<u32>,
    Json(mut payload): Json<NewTask>,
) -> Result<(StatusCode, Json<StudyPlanTask>), ApiError> {
    payload.user_id = user_id;
    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation("title must not be empty".into()));
    }
    if payload.duration == 0 {
        return Err(ApiError::Validation("duration must be at least 1".into()));
    }

    let mut store = state.store.lock().await;
    Ok((
        StatusCode::CREATED,
        Json(store.add_study_plan_task(payload)),
    ))
}

#[derive(Debug, Deserialize)]
pub struct CompletionUpdate {
    pub completed: bool,
}

/// Handler for `PATCH /api/users/:id/study-plan/:task_id`.
///
/// The one write that fails hard: a task that doesn't exist, or belongs to
/// another user, is a 404.
pub async fn set_task_completion(
    State(state): State<AppState>,
    Path((user_id, task_id)): Path<(u32, u32)>,
    Json(payload): Json<CompletionUpdate>,
) -> Result<Json<StudyPlanTask>, ApiError> {
    let mut store = state.store.lock().await;
    let task = store.set_task_completion(user_id, task_id, payload.completed)?;
    Ok(Json(task))
}
