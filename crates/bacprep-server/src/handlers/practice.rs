//! Practice tests and test results.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use bacprep_core::model::{NewTestResult, Test, TestResultView, UserTestResult};

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestsQuery {
    #[serde(default)]
    pub subject_id: Option<u32>,
}

/// Handler for `GET /api/tests`, optionally filtered by `subjectId`.
pub async fn list_tests(
    State(state): State<AppState>,
    Query(query): Query<TestsQuery>,
) -> Json<Vec<Test>> {
    let store = state.store.lock().await;
    let tests = match query.subject_id {
        Some(subject_id) => store.tests_by_subject(subject_id),
        None => store.all_tests(),
    };
    Json(tests)
}

/// Handler for `GET /api/users/:id/test-results`.
///
/// Newest first, each row joined with its test and subject names.
pub async fn list_results(
    State(state): State<AppState>,
    Path(user_id): Path<u32>,
) -> Json<Vec<TestResultView>> {
    let store = state.store.lock().await;
    Json(store.user_test_results(user_id))
}

/// Handler for `POST /api/users/:id/test-results`. Results are immutable
/// once recorded.
pub async fn save_result(
    State(state): State<AppState>,
    Path(user_id): Path<u32>,
    Json(mut payload): Json<NewTestResult>,
) -> Result<(StatusCode, Json<UserTestResult>), ApiError> {
    payload.user_id = user_id;
    if payload.percent_correct > 100 {
        return Err(ApiError::Validation(
            "percentCorrect must be between 0 and 100".into(),
        ));
    }
    for answer in &payload.answers {
        if answer.selected_option > 3 {
            return Err(ApiError::Validation(
                "selectedOption must be between 0 and 3".into(),
            ));
        }
    }

    let mut store = state.store.lock().await;
    Ok((StatusCode::CREATED, Json(store.save_test_result(payload))))
}
