//! Commands for area CRUD

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use sqlx::Row;

use crate::commands::ApiError;
use crate::db::{AppState, DEFAULT_OWNER_ID};
use crate::models::{Area, NewArea};

fn map_area_row(row: &sqlx::sqlite::SqliteRow) -> Area {
  let created_at: Option<String> = row.get("created_at");
  Area {
    id: row.get("id"),
    owner_id: row.get("owner_id"),
    name: row.get("name"),
    created_at: created_at
      .as_deref()
      .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
      .map(|dt| dt.with_timezone(&Utc)),
  }
}

pub async fn list_areas(state: State<Arc<AppState>>) -> Result<Json<Vec<Area>>, ApiError> {
  let rows = sqlx::query("SELECT * FROM areas WHERE owner_id = ?1 ORDER BY name")
    .bind(DEFAULT_OWNER_ID)
    .fetch_all(&state.db)
    .await?;

  Ok(Json(rows.iter().map(map_area_row).collect()))
}

pub async fn create_area(
  state: State<Arc<AppState>>,
  Json(new): Json<NewArea>,
) -> Result<Json<Area>, ApiError> {
  if new.name.trim().is_empty() {
    return Err(ApiError::validation("Area name must not be empty"));
  }

  let inserted = sqlx::query("INSERT INTO areas (owner_id, name, created_at) VALUES (?1, ?2, ?3)")
    .bind(DEFAULT_OWNER_ID)
    .bind(new.name.trim())
    .bind(Utc::now().to_rfc3339())
    .execute(&state.db)
    .await?;

  let row = sqlx::query("SELECT * FROM areas WHERE id = ?1")
    .bind(inserted.last_insert_rowid())
    .fetch_one(&state.db)
    .await?;

  Ok(Json(map_area_row(&row)))
}

pub async fn rename_area(
  state: State<Arc<AppState>>,
  Path(id): Path<i64>,
  Json(new): Json<NewArea>,
) -> Result<Json<Area>, ApiError> {
  if new.name.trim().is_empty() {
    return Err(ApiError::validation("Area name must not be empty"));
  }

  let updated = sqlx::query("UPDATE areas SET name = ?1 WHERE id = ?2 AND owner_id = ?3")
    .bind(new.name.trim())
    .bind(id)
    .bind(DEFAULT_OWNER_ID)
    .execute(&state.db)
    .await?;

  if updated.rows_affected() == 0 {
    return Err(ApiError::not_found(format!("Area {}", id)));
  }

  let row = sqlx::query("SELECT * FROM areas WHERE id = ?1")
    .bind(id)
    .fetch_one(&state.db)
    .await?;

  Ok(Json(map_area_row(&row)))
}

/// Delete an area; its measurables are detached, not deleted
pub async fn delete_area(
  state: State<Arc<AppState>>,
  Path(id): Path<i64>,
) -> Result<(), ApiError> {
  let deleted = sqlx::query("DELETE FROM areas WHERE id = ?1 AND owner_id = ?2")
    .bind(id)
    .bind(DEFAULT_OWNER_ID)
    .execute(&state.db)
    .await?;

  if deleted.rows_affected() == 0 {
    return Err(ApiError::not_found(format!("Area {}", id)));
  }
  Ok(())
}
