use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::clients::plan_service::PlanClientError;
use crate::storage::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not logged in")]
    NotLoggedIn,
    #[error("no profile saved yet")]
    ProfileMissing,
    #[error("no plan generated yet")]
    PlanMissing,
    #[error("no exercise {exercise} on day {day} of the current plan")]
    ExerciseNotFound { day: usize, exercise: usize },
    #[error("{0}")]
    InvalidInput(String),
    #[error("Failed to fetch plan")]
    PlanService(#[from] PlanClientError),
    #[error("Failed to save data")]
    Storage(#[from] StoreError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NotLoggedIn => StatusCode::UNAUTHORIZED,
            Self::ProfileMissing | Self::PlanMissing | Self::ExerciseNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::PlanService(_) => StatusCode::BAD_GATEWAY,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::PlanService(e) => tracing::error!(error = %e, "plan.fetch_failed"),
            Self::Storage(e) => tracing::error!(error = %e, "storage.write_failed"),
            other => tracing::debug!(error = %other, "request.rejected"),
        }

        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}
