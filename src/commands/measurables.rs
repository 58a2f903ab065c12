//! Commands for measurable CRUD and completion

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::commands::ApiError;
use crate::completion::{self, CompletionOutcome};
use crate::db::{AppState, DEFAULT_OWNER_ID};
use crate::models::{
    Measurable, MeasurableType, NewBloodPressureReading, NewMeasurable, NewWeighIn, OnComplete,
};
use crate::progress::{compute_progress, MeasurableProgress};

/// A measurable decorated with its live progress snapshot
#[derive(Debug, Clone, Serialize)]
pub struct MeasurableWithProgress {
    #[serde(flatten)]
    pub measurable: Measurable,
    pub progress: MeasurableProgress,
}

impl MeasurableWithProgress {
    fn at(measurable: Measurable, now: DateTime<Utc>) -> Self {
        let progress = compute_progress(measurable.set_date, measurable.due_date, now);
        Self { measurable, progress }
    }
}

fn validate(measurable_type: MeasurableType, due_date: Option<DateTime<Utc>>, interval_days: Option<i64>) -> Result<(), ApiError> {
    if measurable_type == MeasurableType::Countdown && due_date.is_none() {
        return Err(ApiError::validation("Countdown measurables require a due date"));
    }
    if matches!(interval_days, Some(d) if d <= 0) {
        return Err(ApiError::validation("Interval must be a positive number of days"));
    }
    Ok(())
}

/// List all measurables, each with computed progress
pub async fn list_measurables(
    state: State<Arc<AppState>>,
) -> Result<Json<Vec<MeasurableWithProgress>>, ApiError> {
    let measurables = completion::load_measurables(&state.db, DEFAULT_OWNER_ID).await?;
    let now = Utc::now();

    Ok(Json(
        measurables
            .into_iter()
            .map(|m| MeasurableWithProgress::at(m, now))
            .collect(),
    ))
}

/// Get a single measurable with computed progress
pub async fn get_measurable(
    state: State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<MeasurableWithProgress>, ApiError> {
    let measurable = completion::load_measurable(&state.db, DEFAULT_OWNER_ID, id).await?;
    Ok(Json(MeasurableWithProgress::at(measurable, Utc::now())))
}

/// Create a measurable
pub async fn create_measurable(
    state: State<Arc<AppState>>,
    Json(new): Json<NewMeasurable>,
) -> Result<Json<Measurable>, ApiError> {
    validate(new.measurable_type, new.due_date, new.interval_days)?;

    let now = Utc::now();
    let set_date = new.set_date.unwrap_or(now);

    let inserted = sqlx::query(
        r#"
        INSERT INTO measurables
            (owner_id, name, description, measurable_type, set_date, due_date,
             interval_days, on_complete, area_id, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
        "#,
    )
    .bind(DEFAULT_OWNER_ID)
    .bind(&new.name)
    .bind(&new.description)
    .bind(new.measurable_type.to_string())
    .bind(set_date.to_rfc3339())
    .bind(new.due_date.map(|d| d.to_rfc3339()))
    .bind(new.interval_days)
    .bind(new.on_complete.to_string())
    .bind(new.area_id)
    .bind(now.to_rfc3339())
    .execute(&state.db)
    .await?;

    let measurable =
        completion::load_measurable(&state.db, DEFAULT_OWNER_ID, inserted.last_insert_rowid())
            .await?;
    Ok(Json(measurable))
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMeasurable {
    pub name: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub interval_days: Option<i64>,
    pub on_complete: Option<OnComplete>,
    pub area_id: Option<i64>,
}

/// Update a measurable's editable fields; omitted fields are left alone
pub async fn update_measurable(
    state: State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(update): Json<UpdateMeasurable>,
) -> Result<Json<Measurable>, ApiError> {
    // Existence check first so a bad id is a 404, not a silent no-op
    let existing = completion::load_measurable(&state.db, DEFAULT_OWNER_ID, id).await?;
    validate(
        existing.measurable_type,
        update.due_date.or(existing.due_date),
        update.interval_days.or(existing.interval_days),
    )?;

    sqlx::query(
        r#"
        UPDATE measurables SET
            name = COALESCE(?1, name),
            description = COALESCE(?2, description),
            due_date = COALESCE(?3, due_date),
            interval_days = COALESCE(?4, interval_days),
            on_complete = COALESCE(?5, on_complete),
            area_id = COALESCE(?6, area_id),
            updated_at = ?7
        WHERE id = ?8 AND owner_id = ?9
        "#,
    )
    .bind(update.name)
    .bind(update.description)
    .bind(update.due_date.map(|d| d.to_rfc3339()))
    .bind(update.interval_days)
    .bind(update.on_complete.map(|o| o.to_string()))
    .bind(update.area_id)
    .bind(Utc::now().to_rfc3339())
    .bind(id)
    .bind(DEFAULT_OWNER_ID)
    .execute(&state.db)
    .await?;

    let measurable = completion::load_measurable(&state.db, DEFAULT_OWNER_ID, id).await?;
    Ok(Json(measurable))
}

/// Delete a measurable and its results
pub async fn delete_measurable(
    state: State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<(), ApiError> {
    let deleted = sqlx::query("DELETE FROM measurables WHERE id = ?1 AND owner_id = ?2")
        .bind(id)
        .bind(DEFAULT_OWNER_ID)
        .execute(&state.db)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(ApiError::not_found(format!("Measurable {}", id)));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompleteRequest {
    pub weigh_in: Option<NewWeighIn>,
    pub blood_pressure_reading: Option<NewBloodPressureReading>,
}

/// Complete a measurable, optionally attaching a health reading
pub async fn complete_measurable(
    state: State<Arc<AppState>>,
    Path(id): Path<i64>,
    body: Option<Json<CompleteRequest>>,
) -> Result<Json<CompletionOutcome>, ApiError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();

    let outcome = completion::complete_measurable(
        &state.db,
        DEFAULT_OWNER_ID,
        id,
        request.weigh_in,
        request.blood_pressure_reading,
        Utc::now(),
    )
    .await?;

    Ok(Json(outcome))
}
