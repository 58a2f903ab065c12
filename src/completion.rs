//! Completion orchestrator and storage interface
//!
//! Completing a measurable is the one multi-write operation in the system:
//! the lifecycle transition is persisted, an immutable result row is
//! inserted, and an optional weigh-in or blood pressure reading is linked
//! to it. All of that happens inside a single transaction; a failure at
//! any step leaves no partial state behind.
//!
//! Timestamps are stored as RFC 3339 TEXT and rows with enum columns are
//! mapped by hand.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{Row, SqliteExecutor, SqlitePool};

use crate::lifecycle::apply_completion;
use crate::models::{
    BloodPressureReading, BpCategory, CompletionResult, Measurable, NewBloodPressureReading,
    NewWeighIn, OnComplete, WeighIn,
};

// ---------------------------------------------------------------------------
/// Error Handling
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to decode row: {0}")]
    Decode(String),
}

impl Serialize for CompletionError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

// ---------------------------------------------------------------------------
// Row Mapping
// ---------------------------------------------------------------------------

fn parse_ts(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

fn required_ts(column: &str, s: &str) -> Result<DateTime<Utc>, CompletionError> {
    parse_ts(s).ok_or_else(|| CompletionError::Decode(format!("Invalid {}: {}", column, s)))
}

pub(crate) fn map_measurable_row(row: &sqlx::sqlite::SqliteRow) -> Result<Measurable, CompletionError> {
    let type_str: String = row.get("measurable_type");
    let measurable_type = type_str.parse().map_err(CompletionError::Decode)?;

    let on_complete_str: String = row.get("on_complete");
    let on_complete: OnComplete = on_complete_str.parse().unwrap_or_default();

    let set_date: String = row.get("set_date");
    let due_date: Option<String> = row.get("due_date");
    let created_at: Option<String> = row.get("created_at");
    let updated_at: Option<String> = row.get("updated_at");

    Ok(Measurable {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        name: row.get("name"),
        description: row.get("description"),
        measurable_type,
        set_date: required_ts("set_date", &set_date)?,
        due_date: due_date.as_deref().and_then(parse_ts),
        interval_days: row.get("interval_days"),
        on_complete,
        area_id: row.get("area_id"),
        created_at: created_at.as_deref().and_then(parse_ts),
        updated_at: updated_at.as_deref().and_then(parse_ts),
    })
}

pub(crate) fn map_weigh_in_row(row: &sqlx::sqlite::SqliteRow) -> Result<WeighIn, CompletionError> {
    let date: String = row.get("date");
    Ok(WeighIn {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        date: required_ts("date", &date)?,
        weight_kg: row.get("weight_kg"),
        body_fat_pct: row.get("body_fat_pct"),
        previous_weigh_in_id: row.get("previous_weigh_in_id"),
        result_id: row.get("result_id"),
    })
}

pub(crate) fn map_reading_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<BloodPressureReading, CompletionError> {
    let date: String = row.get("date");
    let category: String = row.get("category");
    Ok(BloodPressureReading {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        date: required_ts("date", &date)?,
        systolic: row.get("systolic"),
        diastolic: row.get("diastolic"),
        pulse: row.get("pulse"),
        category: category.parse().map_err(CompletionError::Decode)?,
        previous_reading_id: row.get("previous_reading_id"),
        result_id: row.get("result_id"),
    })
}

// ---------------------------------------------------------------------------
// Read Interface
// ---------------------------------------------------------------------------

/// Load a single measurable scoped to its owner.
pub async fn load_measurable(
    executor: impl SqliteExecutor<'_>,
    owner_id: i64,
    measurable_id: i64,
) -> Result<Measurable, CompletionError> {
    let row = sqlx::query("SELECT * FROM measurables WHERE id = ?1 AND owner_id = ?2")
        .bind(measurable_id)
        .bind(owner_id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| CompletionError::NotFound(format!("Measurable {}", measurable_id)))?;

    map_measurable_row(&row)
}

/// Load all measurables for an owner, newest first.
pub async fn load_measurables(
    pool: &SqlitePool,
    owner_id: i64,
) -> Result<Vec<Measurable>, CompletionError> {
    let rows = sqlx::query("SELECT * FROM measurables WHERE owner_id = ?1 ORDER BY id DESC")
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

    rows.iter().map(map_measurable_row).collect()
}

/// Most recent weigh-in for an owner, by date descending.
pub async fn most_recent_weigh_in(
    executor: impl SqliteExecutor<'_>,
    owner_id: i64,
) -> Result<Option<WeighIn>, CompletionError> {
    let row = sqlx::query(
        "SELECT * FROM weigh_ins WHERE owner_id = ?1 ORDER BY date DESC, id DESC LIMIT 1",
    )
    .bind(owner_id)
    .fetch_optional(executor)
    .await?;

    row.as_ref().map(map_weigh_in_row).transpose()
}

/// Most recent blood pressure reading strictly before `date`.
pub async fn most_recent_reading_before(
    executor: impl SqliteExecutor<'_>,
    owner_id: i64,
    date: DateTime<Utc>,
) -> Result<Option<BloodPressureReading>, CompletionError> {
    let row = sqlx::query(
        r#"
        SELECT * FROM blood_pressure_readings
        WHERE owner_id = ?1 AND date < ?2
        ORDER BY date DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(owner_id)
    .bind(date.to_rfc3339())
    .fetch_optional(executor)
    .await?;

    row.as_ref().map(map_reading_row).transpose()
}

// ---------------------------------------------------------------------------
/// Completion Orchestration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct CompletionOutcome {
    pub measurable: Measurable,
    pub result: CompletionResult,
}

fn completion_notes(
    name: &str,
    weigh_in: Option<&NewWeighIn>,
    reading: Option<&NewBloodPressureReading>,
) -> String {
    if let Some(w) = weigh_in {
        format!("Completed {} with a weigh in of {:.1} kg", name, w.weight_kg)
    } else if let Some(r) = reading {
        format!(
            "Completed {} with a blood pressure reading of {}/{}",
            name, r.systolic, r.diastolic
        )
    } else {
        format!("Completed {}", name)
    }
}

/// Complete a measurable: apply the lifecycle transition, record the
/// result, and link the accompanying reading if one was supplied.
///
/// Preconditions are checked before any write. Everything after that runs
/// in one transaction, so a failure while inserting a reading rolls the
/// measurable update and the result row back with it.
pub async fn complete_measurable(
    pool: &SqlitePool,
    owner_id: i64,
    measurable_id: i64,
    weigh_in: Option<NewWeighIn>,
    reading: Option<NewBloodPressureReading>,
    now: DateTime<Utc>,
) -> Result<CompletionOutcome, CompletionError> {
    let measurable = load_measurable(pool, owner_id, measurable_id).await?;

    match measurable.on_complete {
        OnComplete::WeighIn if weigh_in.is_none() => {
            return Err(CompletionError::Validation(
                "Weigh in data is required to complete this measurable".to_string(),
            ));
        }
        OnComplete::BloodPressureReading if reading.is_none() => {
            return Err(CompletionError::Validation(
                "Blood pressure data is required to complete this measurable".to_string(),
            ));
        }
        _ => {}
    }

    let transition = apply_completion(&measurable, now);

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE measurables
        SET measurable_type = ?1,
            set_date = ?2,
            due_date = ?3,
            interval_days = ?4,
            updated_at = ?5
        WHERE id = ?6 AND owner_id = ?7
        "#,
    )
    .bind(transition.next_type.to_string())
    .bind(transition.next_set_date.to_rfc3339())
    .bind(transition.next_due_date.map(|d| d.to_rfc3339()))
    .bind(transition.next_interval_days)
    .bind(now.to_rfc3339())
    .bind(measurable.id)
    .bind(owner_id)
    .execute(&mut *tx)
    .await?;

    let notes = completion_notes(&measurable.name, weigh_in.as_ref(), reading.as_ref());
    let inserted = sqlx::query(
        "INSERT INTO results (owner_id, measurable_id, date, notes) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(owner_id)
    .bind(measurable.id)
    .bind(now.to_rfc3339())
    .bind(&notes)
    .execute(&mut *tx)
    .await?;
    let result_id = inserted.last_insert_rowid();

    if let Some(w) = &weigh_in {
        let date = w.date.unwrap_or(now);
        let previous = most_recent_weigh_in(&mut *tx, owner_id).await?;

        sqlx::query(
            r#"
            INSERT INTO weigh_ins
                (owner_id, date, weight_kg, body_fat_pct, previous_weigh_in_id, result_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(owner_id)
        .bind(date.to_rfc3339())
        .bind(w.weight_kg)
        .bind(w.body_fat_pct)
        .bind(previous.map(|p| p.id))
        .bind(result_id)
        .execute(&mut *tx)
        .await?;
    }

    if let Some(r) = &reading {
        let date = r.date.unwrap_or(now);
        let category = BpCategory::from_reading(r.systolic, r.diastolic);
        let previous = most_recent_reading_before(&mut *tx, owner_id, date).await?;

        sqlx::query(
            r#"
            INSERT INTO blood_pressure_readings
                (owner_id, date, systolic, diastolic, pulse, category, previous_reading_id, result_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(owner_id)
        .bind(date.to_rfc3339())
        .bind(r.systolic)
        .bind(r.diastolic)
        .bind(r.pulse)
        .bind(category.to_string())
        .bind(previous.map(|p| p.id))
        .bind(result_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!(
        measurable_id = measurable.id,
        result_id,
        next_type = %transition.next_type,
        "completed measurable"
    );

    let updated = Measurable {
        measurable_type: transition.next_type,
        set_date: transition.next_set_date,
        due_date: transition.next_due_date,
        interval_days: transition.next_interval_days,
        updated_at: Some(now),
        ..measurable
    };

    Ok(CompletionOutcome {
        measurable: updated,
        result: CompletionResult {
            id: result_id,
            owner_id,
            measurable_id: measurable.id,
            date: now,
            notes,
        },
    })
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
