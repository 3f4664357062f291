use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;

pub mod error;
pub mod handlers;
pub mod state;

use state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/session/login", post(handlers::login))
        .route("/session/logout", post(handlers::logout))
        .route(
            "/profile",
            get(handlers::get_profile).put(handlers::save_profile),
        )
        .route(
            "/plan",
            get(handlers::get_plan).post(handlers::generate_plan),
        )
        .route(
            "/feedback",
            get(handlers::feedback_history).post(handlers::submit_feedback),
        )
        .route(
            "/plan/days/{day}/exercises/{exercise}/sets",
            post(handlers::log_set).delete(handlers::clear_exercise_log),
        )
        .route(
            "/plan/days/{day}/exercises/{exercise}/undo",
            post(handlers::undo_set),
        )
        .route("/logs", post(handlers::log_workout))
        .route("/progress", get(handlers::progress))
        .route("/progress/{exercise}", get(handlers::exercise_progress))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
