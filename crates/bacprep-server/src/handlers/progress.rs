//! Progress rows, badges, and study streaks.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use bacprep_core::model::{
    BadgeAward, NewStreak, ProgressUpdate, StudyStreak, UserProgress,
};

use crate::error::ApiError;
use crate::AppState;

/// Handler for `GET /api/users/:id/progress`.
pub async fn list_progress(
    State(state): State<AppState>,
    Path(user_id): Path<u32>,
) -> Json<Vec<UserProgress>> {
    let store = state.store.lock().await;
    Json(store.user_progress(user_id))
}

/// Handler for `POST /api/users/:id/progress`.
///
/// Upsert keyed on (user, subject): fields missing from the body keep their
/// stored values, except `lastStudied`, which defaults to now.
pub async fn upsert_progress(
    State(state): State<AppState>,
    Path(user_id): Path<u32>,
    Json(mut payload): Json<ProgressUpdate>,
) -> Result<Json<UserProgress>, ApiError> {
    payload.user_id = user_id;
    if let Some(percent) = payload.percent_complete {
        if percent > 100 {
            return Err(ApiError::Validation(
                "percentComplete must be between 0 and 100".into(),
            ));
        }
    }

    let mut store = state.store.lock().await;
    Ok(Json(store.update_user_progress(payload)))
}

/// Handler for `GET /api/users/:id/badges`.
pub async fn list_badges(
    State(state): State<AppState>,
    Path(user_id): Path<u32>,
) -> Json<Vec<BadgeAward>> {
    let store = state.store.lock().await;
    Json(store.user_badges(user_id))
}

/// Handler for `GET /api/users/:id/study-streaks`. Newest first.
pub async fn list_streaks(
    State(state): State<AppState>,
    Path(user_id): Path<u32>,
) -> Json<Vec<StudyStreak>> {
    let store = state.store.lock().await;
    Json(store.user_study_streaks(user_id))
}

/// Handler for `POST /api/users/:id/study-streaks`.
///
/// Records one study session dated now. Sessions are never merged, two
/// posts on the same day create two entries.
pub async fn add_streak(
    State(state): State<AppState>,
    Path(user_id): Path<u32>,
    Json(mut payload): Json<NewStreak>,
) -> Result<(StatusCode, Json<StudyStreak>), ApiError> {
    payload.user_id = user_id;
    if payload.minutes_studied == 0 {
        return Err(ApiError::Validation(
            "minutesStudied must be at least 1".into(),
        ));
    }

    let mut store = state.store.lock().await;
    Ok((StatusCode::CREATED, Json(store.add_study_streak(payload))))
}
