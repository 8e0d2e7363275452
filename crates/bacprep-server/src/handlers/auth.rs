//! Registration, login, and user lookup.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use bacprep_core::model::{NewUser, UserProfile};

use crate::error::ApiError;
use crate::AppState;

/// Handler for `POST /api/auth/register`.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> Result<(StatusCode, Json<UserProfile>), ApiError> {
    if payload.username.trim().is_empty() {
        return Err(ApiError::Validation("username must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(ApiError::Validation("password must not be empty".into()));
    }
    if payload.display_name.trim().is_empty() {
        return Err(ApiError::Validation("displayName must not be empty".into()));
    }
    if !payload.email.contains('@') {
        return Err(ApiError::Validation("email is not valid".into()));
    }

    let mut store = state.store.lock().await;
    let user = store.create_user(payload)?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Handler for `POST /api/auth/login`.
///
/// Plain-text credential comparison; a mismatch is a 401, never a 500.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let store = state.store.lock().await;
    match store.authenticate_user(&payload.username, &payload.password) {
        Some(user) => Ok(Json(user.into())),
        None => Err(ApiError::Unauthorized("Invalid credentials".into())),
    }
}

/// Handler for `GET /api/users/:id`.
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<UserProfile>, ApiError> {
    let store = state.store.lock().await;
    store
        .get_user(id)
        .map(|user| Json(user.into()))
        .ok_or_else(|| ApiError::NotFound("User not found".into()))
}
