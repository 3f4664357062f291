use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::state::{AppState, ExerciseProgress};
use crate::models::feedback::WeeklyFeedback;
use crate::models::lenient;
use crate::models::log::ExerciseLogEntry;
use crate::models::plan::GeneratedPlan;
use crate::models::profile::{Profile, User};
use crate::services::progress::ProgressReport;
use crate::services::set_logger::LoggerStatus;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub name: Option<String>,
}

#[derive(Deserialize)]
pub struct SetInput {
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub reps: Option<u32>,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub weight: f64,
}

#[derive(Deserialize)]
pub struct WorkoutLogRequest {
    pub exercise_name: String,
    pub date: Option<NaiveDate>,
    pub sets: Vec<SetInput>,
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<User>, ApiError> {
    state.login(&body.email, body.name.as_deref()).map(Json)
}

pub async fn logout(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.logout()?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_profile(State(state): State<AppState>) -> Result<Json<Profile>, ApiError> {
    state.profile().map(Json)
}

pub async fn save_profile(
    State(state): State<AppState>,
    Json(profile): Json<Profile>,
) -> Result<Json<Profile>, ApiError> {
    state.save_profile(profile).map(Json)
}

pub async fn get_plan(State(state): State<AppState>) -> Result<Json<GeneratedPlan>, ApiError> {
    state.current_plan().map(Json)
}

pub async fn generate_plan(
    State(state): State<AppState>,
) -> Result<Json<GeneratedPlan>, ApiError> {
    state.generate_plan(None).await.map(Json)
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(feedback): Json<WeeklyFeedback>,
) -> Result<Json<GeneratedPlan>, ApiError> {
    state.submit_feedback(feedback).await.map(Json)
}

pub async fn feedback_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<WeeklyFeedback>>, ApiError> {
    state.feedback_history().map(Json)
}

pub async fn log_set(
    State(state): State<AppState>,
    Path((day, exercise)): Path<(usize, usize)>,
    Json(set): Json<SetInput>,
) -> Result<Json<LoggerStatus>, ApiError> {
    let reps = set
        .reps
        .ok_or_else(|| ApiError::InvalidInput("reps is required".to_string()))?;
    state.log_set(day, exercise, reps, set.weight).map(Json)
}

pub async fn undo_set(
    State(state): State<AppState>,
    Path((day, exercise)): Path<(usize, usize)>,
) -> Result<Json<LoggerStatus>, ApiError> {
    state.undo_set(day, exercise).map(Json)
}

pub async fn clear_exercise_log(
    State(state): State<AppState>,
    Path((day, exercise)): Path<(usize, usize)>,
) -> Result<Json<LoggerStatus>, ApiError> {
    state.clear_exercise_log(day, exercise).map(Json)
}

pub async fn log_workout(
    State(state): State<AppState>,
    Json(body): Json<WorkoutLogRequest>,
) -> Result<Json<ExerciseLogEntry>, ApiError> {
    let sets = body
        .sets
        .iter()
        .map(|set| set.reps.map(|reps| (reps, set.weight)))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| ApiError::InvalidInput("every set needs reps".to_string()))?;

    state
        .log_workout(&body.exercise_name, body.date, &sets)
        .map(Json)
}

pub async fn progress(State(state): State<AppState>) -> Result<Json<ProgressReport>, ApiError> {
    state.progress().map(Json)
}

pub async fn exercise_progress(
    State(state): State<AppState>,
    Path(exercise): Path<String>,
) -> Result<Json<ExerciseProgress>, ApiError> {
    state.exercise_progress(&exercise).map(Json)
}
