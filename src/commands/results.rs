//! Commands for listing completion results

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use sqlx::Row;

use crate::commands::ApiError;
use crate::completion::CompletionError;
use crate::db::{AppState, DEFAULT_OWNER_ID};
use crate::models::CompletionResult;

fn map_result_row(row: &sqlx::sqlite::SqliteRow) -> Result<CompletionResult, CompletionError> {
  let date: String = row.get("date");
  let date = DateTime::parse_from_rfc3339(&date)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|_| CompletionError::Decode(format!("Invalid result date: {}", date)))?;

  Ok(CompletionResult {
    id: row.get("id"),
    owner_id: row.get("owner_id"),
    measurable_id: row.get("measurable_id"),
    date,
    notes: row.get("notes"),
  })
}

/// List the most recent completion results across all measurables
pub async fn list_results(
  state: State<Arc<AppState>>,
) -> Result<Json<Vec<CompletionResult>>, ApiError> {
  let rows = sqlx::query(
    "SELECT * FROM results WHERE owner_id = ?1 ORDER BY date DESC, id DESC LIMIT 50",
  )
  .bind(DEFAULT_OWNER_ID)
  .fetch_all(&state.db)
  .await?;

  let results = rows.iter().map(map_result_row).collect::<Result<Vec<_>, _>>()?;
  Ok(Json(results))
}

/// List completion results for one measurable
pub async fn list_measurable_results(
  state: State<Arc<AppState>>,
  Path(measurable_id): Path<i64>,
) -> Result<Json<Vec<CompletionResult>>, ApiError> {
  // Scope through the measurable so an unknown id is a 404
  crate::completion::load_measurable(&state.db, DEFAULT_OWNER_ID, measurable_id).await?;

  let rows = sqlx::query(
    r#"
    SELECT * FROM results
    WHERE owner_id = ?1 AND measurable_id = ?2
    ORDER BY date DESC, id DESC
    "#,
  )
  .bind(DEFAULT_OWNER_ID)
  .bind(measurable_id)
  .fetch_all(&state.db)
  .await?;

  let results = rows.iter().map(map_result_row).collect::<Result<Vec<_>, _>>()?;
  Ok(Json(results))
}
