//! Commands for health readings: weigh-ins, blood pressure, weight goal
//!
//! Readings are created only as a side effect of completing a measurable;
//! these commands are read-only over them. The weight goal is the one
//! directly mutable record here.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

use crate::commands::ApiError;
use crate::completion;
use crate::db::{AppState, DEFAULT_OWNER_ID};
use crate::models::{BloodPressureReading, WeighIn, WeightGoal};

/// List weigh-ins, newest first
pub async fn list_weigh_ins(
  state: State<Arc<AppState>>,
) -> Result<Json<Vec<WeighIn>>, ApiError> {
  let rows = sqlx::query(
    "SELECT * FROM weigh_ins WHERE owner_id = ?1 ORDER BY date DESC, id DESC LIMIT 100",
  )
  .bind(DEFAULT_OWNER_ID)
  .fetch_all(&state.db)
  .await?;

  let weigh_ins = rows
    .iter()
    .map(completion::map_weigh_in_row)
    .collect::<Result<Vec<_>, _>>()?;
  Ok(Json(weigh_ins))
}

/// The latest weigh-in with its trend against the previous one and the goal
#[derive(Debug, Clone, Serialize)]
pub struct LatestWeighIn {
  pub weigh_in: WeighIn,
  /// Weight change since the previous weigh-in, negative when losing
  pub delta_kg: Option<f64>,
  /// Distance to the target weight, negative when already below it
  pub to_goal_kg: Option<f64>,
}

pub async fn latest_weigh_in(
  state: State<Arc<AppState>>,
) -> Result<Json<Option<LatestWeighIn>>, ApiError> {
  let Some(weigh_in) = completion::most_recent_weigh_in(&state.db, DEFAULT_OWNER_ID).await? else {
    return Ok(Json(None));
  };

  let delta_kg = match weigh_in.previous_weigh_in_id {
    Some(prev_id) => {
      let row = sqlx::query("SELECT * FROM weigh_ins WHERE id = ?1")
        .bind(prev_id)
        .fetch_optional(&state.db)
        .await?;
      row
        .as_ref()
        .map(completion::map_weigh_in_row)
        .transpose()?
        .map(|prev| weigh_in.weight_kg - prev.weight_kg)
    }
    None => None,
  };

  let target: Option<f64> =
    sqlx::query_scalar("SELECT target_weight_kg FROM weight_goals WHERE owner_id = ?1")
      .bind(DEFAULT_OWNER_ID)
      .fetch_optional(&state.db)
      .await?
      .flatten();
  let to_goal_kg = target.map(|t| weigh_in.weight_kg - t);

  Ok(Json(Some(LatestWeighIn { weigh_in, delta_kg, to_goal_kg })))
}

/// List blood pressure readings, newest first
pub async fn list_blood_pressure_readings(
  state: State<Arc<AppState>>,
) -> Result<Json<Vec<BloodPressureReading>>, ApiError> {
  let rows = sqlx::query(
    "SELECT * FROM blood_pressure_readings WHERE owner_id = ?1 ORDER BY date DESC, id DESC LIMIT 100",
  )
  .bind(DEFAULT_OWNER_ID)
  .fetch_all(&state.db)
  .await?;

  let readings = rows
    .iter()
    .map(completion::map_reading_row)
    .collect::<Result<Vec<_>, _>>()?;
  Ok(Json(readings))
}

/// ---------------------------------------------------------------------------
/// Weight Goal
/// ---------------------------------------------------------------------------

fn map_goal_row(row: &sqlx::sqlite::SqliteRow) -> WeightGoal {
  let updated_at: Option<String> = row.get("updated_at");
  WeightGoal {
    owner_id: row.get("owner_id"),
    target_weight_kg: row.get("target_weight_kg"),
    updated_at: updated_at
      .as_deref()
      .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
      .map(|dt| dt.with_timezone(&Utc)),
  }
}

/// Get the weight goal; an unset goal is an empty record, not a 404
pub async fn get_weight_goal(state: State<Arc<AppState>>) -> Result<Json<WeightGoal>, ApiError> {
  let row = sqlx::query("SELECT * FROM weight_goals WHERE owner_id = ?1")
    .bind(DEFAULT_OWNER_ID)
    .fetch_optional(&state.db)
    .await?;

  Ok(Json(row.as_ref().map(map_goal_row).unwrap_or(WeightGoal {
    owner_id: DEFAULT_OWNER_ID,
    target_weight_kg: None,
    updated_at: None,
  })))
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetWeightGoal {
  pub target_weight_kg: f64,
}

pub async fn set_weight_goal(
  state: State<Arc<AppState>>,
  Json(goal): Json<SetWeightGoal>,
) -> Result<Json<WeightGoal>, ApiError> {
  if goal.target_weight_kg <= 0.0 {
    return Err(ApiError::validation("Target weight must be positive"));
  }

  sqlx::query(
    r#"
    INSERT INTO weight_goals (owner_id, target_weight_kg, updated_at)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(owner_id) DO UPDATE SET
      target_weight_kg = excluded.target_weight_kg,
      updated_at = excluded.updated_at
    "#,
  )
  .bind(DEFAULT_OWNER_ID)
  .bind(goal.target_weight_kg)
  .bind(Utc::now().to_rfc3339())
  .execute(&state.db)
  .await?;

  get_weight_goal(state).await
}

pub async fn clear_weight_goal(state: State<Arc<AppState>>) -> Result<Json<WeightGoal>, ApiError> {
  sqlx::query(
    r#"
    UPDATE weight_goals SET target_weight_kg = NULL, updated_at = ?1
    WHERE owner_id = ?2
    "#,
  )
  .bind(Utc::now().to_rfc3339())
  .bind(DEFAULT_OWNER_ID)
  .execute(&state.db)
  .await?;

  get_weight_goal(state).await
}
