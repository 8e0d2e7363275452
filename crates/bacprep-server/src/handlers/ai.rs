//! AI-powered endpoints.
//!
//! These call the tutor gateway outside the store lock, so a slow model
//! request never blocks unrelated traffic. Only `POST /ai/chat` touches the
//! store, persisting the updated transcript as a side effect of answering.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use bacprep_core::model::{ChatHistory, ChatMessage, Difficulty, NewChatHistory};
use bacprep_core::tutor::{AnswerAnalysis, GeneratedQuestion, StudyPlanSuggestion};

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionsRequest {
    pub subject: String,
    pub topic: String,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub count: Option<u32>,
}

/// Handler for `POST /api/ai/generate-questions`.
///
/// The one AI route without a fallback: a service or parse failure comes
/// back as a 500.
pub async fn generate_questions(
    State(state): State<AppState>,
    Json(payload): Json<GenerateQuestionsRequest>,
) -> Result<Json<Vec<GeneratedQuestion>>, ApiError> {
    if payload.subject.trim().is_empty() || payload.topic.trim().is_empty() {
        return Err(ApiError::Validation(
            "subject and topic must not be empty".into(),
        ));
    }
    let difficulty = match payload.difficulty.as_deref() {
        Some(raw) => raw.parse::<Difficulty>().map_err(ApiError::Validation)?,
        None => Difficulty::Medium,
    };
    let count = payload.count.unwrap_or(5);
    if count == 0 || count > 20 {
        return Err(ApiError::Validation("count must be between 1 and 20".into()));
    }

    let questions = state
        .tutor
        .generate_questions(&payload.subject, &payload.topic, difficulty, count)
        .await?;
    Ok(Json(questions))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplanationRequest {
    pub subject: String,
    pub concept: String,
}

#[derive(Debug, Serialize)]
pub struct ExplanationResponse {
    pub explanation: String,
}

/// Handler for `POST /api/ai/generate-explanation`. Never a 500 for service
/// trouble: the gateway substitutes its fallback text.
pub async fn generate_explanation(
    State(state): State<AppState>,
    Json(payload): Json<ExplanationRequest>,
) -> Result<Json<ExplanationResponse>, ApiError> {
    if payload.subject.trim().is_empty() || payload.concept.trim().is_empty() {
        return Err(ApiError::Validation(
            "subject and concept must not be empty".into(),
        ));
    }

    let explanation = state
        .tutor
        .generate_explanation(&payload.subject, &payload.concept)
        .await;
    Ok(Json(ExplanationResponse { explanation }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeAnswerRequest {
    pub question: String,
    pub answer: String,
    pub subject: String,
}

/// Handler for `POST /api/ai/analyze-answer`. Service trouble yields a
/// zero-score analysis, not an error.
pub async fn analyze_answer(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeAnswerRequest>,
) -> Result<Json<AnswerAnalysis>, ApiError> {
    if payload.question.trim().is_empty() || payload.answer.trim().is_empty() {
        return Err(ApiError::Validation(
            "question and answer must not be empty".into(),
        ));
    }

    let analysis = state
        .tutor
        .analyze_answer(&payload.question, &payload.answer, &payload.subject)
        .await;
    Ok(Json(analysis))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlanRequest {
    pub user_id: u32,
    pub performance: serde_json::Value,
}

/// Handler for `POST /api/ai/generate-study-plan`. Falls back to a single
/// review task when the service is unavailable.
pub async fn generate_study_plan(
    State(state): State<AppState>,
    Json(payload): Json<StudyPlanRequest>,
) -> Result<Json<StudyPlanSuggestion>, ApiError> {
    let plan = state
        .tutor
        .generate_study_plan(payload.user_id, &payload.performance)
        .await;
    Ok(Json(plan))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequestBody {
    pub user_id: u32,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Handler for `POST /api/ai/chat`.
///
/// Answers the transcript and then persists the full updated message list
/// (including the generated reply) — responding and saving are two separate,
/// non-atomic steps.
pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequestBody>,
) -> Result<Json<ChatResponse>, ApiError> {
    if payload.messages.is_empty() {
        return Err(ApiError::Validation("messages must not be empty".into()));
    }

    let response = state.tutor.chat(&payload.messages).await;

    let mut messages = payload.messages;
    messages.push(ChatMessage {
        content: response.clone(),
        is_user: false,
    });

    let mut store = state.store.lock().await;
    store.save_chat_history(NewChatHistory {
        user_id: payload.user_id,
        messages,
    });

    Ok(Json(ChatResponse { response }))
}

/// Handler for `GET /api/users/:id/chat-history`. Returns `null` when the
/// user has no transcript yet.
pub async fn chat_history(
    State(state): State<AppState>,
    Path(user_id): Path<u32>,
) -> Json<Option<ChatHistory>> {
    let store = state.store.lock().await;
    Json(store.chat_history(user_id))
}
