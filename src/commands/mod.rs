//! HTTP command layer: thin handlers over the domain modules
//!
//! Each handler is one call deep; all business logic lives in the
//! progress/lifecycle/completion modules.

pub mod areas;
pub mod measurables;
pub mod readings;
pub mod results;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::completion::CompletionError;
use crate::db::AppState;

/// ---------------------------------------------------------------------------
/// API Error: domain errors rendered as HTTP responses
/// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ApiError {
  status: StatusCode,
  message: String,
}

impl ApiError {
  pub fn validation(message: impl Into<String>) -> Self {
    Self {
      status: StatusCode::UNPROCESSABLE_ENTITY,
      message: message.into(),
    }
  }

  pub fn not_found(message: impl Into<String>) -> Self {
    Self {
      status: StatusCode::NOT_FOUND,
      message: message.into(),
    }
  }
}

impl From<CompletionError> for ApiError {
  fn from(err: CompletionError) -> Self {
    let status = match &err {
      CompletionError::NotFound(_) => StatusCode::NOT_FOUND,
      CompletionError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
      CompletionError::Database(_) | CompletionError::Decode(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    Self {
      status,
      message: err.to_string(),
    }
  }
}

impl From<sqlx::Error> for ApiError {
  fn from(err: sqlx::Error) -> Self {
    Self {
      status: StatusCode::INTERNAL_SERVER_ERROR,
      message: format!("Database error: {}", err),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    if self.status.is_server_error() {
      tracing::error!("request failed: {}", self.message);
    }
    (self.status, Json(json!({ "error": self.message }))).into_response()
  }
}

/// ---------------------------------------------------------------------------
/// Router
/// ---------------------------------------------------------------------------

pub fn router(state: Arc<AppState>) -> Router {
  Router::new()
    .route("/areas", get(areas::list_areas).post(areas::create_area))
    .route(
      "/areas/{id}",
      axum::routing::put(areas::rename_area).delete(areas::delete_area),
    )
    .route(
      "/measurables",
      get(measurables::list_measurables).post(measurables::create_measurable),
    )
    .route(
      "/measurables/{id}",
      get(measurables::get_measurable)
        .put(measurables::update_measurable)
        .delete(measurables::delete_measurable),
    )
    .route(
      "/measurables/{id}/complete",
      axum::routing::post(measurables::complete_measurable),
    )
    .route(
      "/measurables/{id}/results",
      get(results::list_measurable_results),
    )
    .route("/results", get(results::list_results))
    .route("/weigh-ins", get(readings::list_weigh_ins))
    .route("/weigh-ins/latest", get(readings::latest_weigh_in))
    .route(
      "/blood-pressure-readings",
      get(readings::list_blood_pressure_readings),
    )
    .route(
      "/weight-goal",
      get(readings::get_weight_goal)
        .put(readings::set_weight_goal)
        .delete(readings::clear_weight_goal),
    )
    .with_state(state)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
