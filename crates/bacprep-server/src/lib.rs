//! bacprep-server — the HTTP JSON API.
//!
//! Every route is a stateless mapping of one request to one store or tutor
//! interaction. State is injected: the binary constructs the store and the
//! chat backend once and hands them to [`create_router`]; tests do the same
//! with a fresh store and a mock backend.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use bacprep_core::store::StudyStore;
use bacprep_core::traits::ChatModel;
use bacprep_core::tutor::{Tutor, TutorConfig};

pub mod error;
pub mod handlers;

/// The store behind one lock. Handlers hold it only for the duration of a
/// store interaction; concurrent writes to the same entity serialize in
/// arbitrary order (last write wins).
pub type SharedStore = Arc<Mutex<Box<dyn StudyStore + Send>>>;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub tutor: Arc<Tutor>,
}

impl AppState {
    /// Creates the state from an owned store and a chat backend.
    pub fn new(store: Box<dyn StudyStore + Send>, model: Arc<dyn ChatModel>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            tutor: Arc::new(Tutor::new(model, TutorConfig::default())),
        }
    }
}

/// Creates the HTTP router with every API endpoint under `/api`, plus CORS
/// and request tracing middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/users/:id", get(handlers::auth::get_user))
        .route("/subjects", get(handlers::catalog::list_subjects))
        .route("/subjects/:id", get(handlers::catalog::get_subject))
        .route("/subjects/:id/topics", get(handlers::catalog::list_topics))
        .route(
            "/users/:id/progress",
            get(handlers::progress::list_progress).post(handlers::progress::upsert_progress),
        )
        .route("/tests", get(handlers::practice::list_tests))
        .route(
            "/users/:id/test-results",
            get(handlers::practice::list_results).post(handlers::practice::save_result),
        )
        .route("/users/:id/badges", get(handlers::progress::list_badges))
        .route(
            "/users/:id/study-streaks",
            get(handlers::progress::list_streaks).post(handlers::progress::add_streak),
        )
        .route(
            "/users/:id/study-plan",
            get(handlers::planner::list_plan).post(handlers::planner::add_task),
        )
        .route(
            "/users/:id/study-plan/:task_id",
            axum::routing::patch(handlers::planner::set_task_completion),
        )
        .route("/ai/generate-questions", post(handlers::ai::generate_questions))
        .route(
            "/ai/generate-explanation",
            post(handlers::ai::generate_explanation),
        )
        .route("/ai/analyze-answer", post(handlers::ai::analyze_answer))
        .route(
            "/ai/generate-study-plan",
            post(handlers::ai::generate_study_plan),
        )
        .route("/ai/chat", post(handlers::ai::chat))
        .route("/users/:id/chat-history", get(handlers::ai::chat_history))
        .route("/init-demo-data", post(handlers::init_demo_data));

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
