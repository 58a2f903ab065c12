//! Test utilities and helpers for integration and unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Seed helpers and mock data factories
//! - Datetime helpers

use chrono::{DateTime, TimeZone, Utc};
use sqlx::SqlitePool;

use crate::models::{Measurable, MeasurableType, OnComplete};

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  // Run migrations
  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Seed an area for owner 1, returning its id
pub async fn seed_area(pool: &SqlitePool, name: &str) -> i64 {
  let result = sqlx::query("INSERT INTO areas (owner_id, name) VALUES (1, ?1)")
    .bind(name)
    .execute(pool)
    .await
    .expect("Failed to seed area");

  result.last_insert_rowid()
}

/// Seed a measurable for owner 1, returning its id
pub async fn seed_measurable(
  pool: &SqlitePool,
  name: &str,
  measurable_type: MeasurableType,
  set_date: DateTime<Utc>,
  due_date: Option<DateTime<Utc>>,
  interval_days: Option<i64>,
  on_complete: OnComplete,
) -> i64 {
  let result = sqlx::query(
    r#"
    INSERT INTO measurables
      (owner_id, name, measurable_type, set_date, due_date, interval_days, on_complete)
    VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)
    "#,
  )
  .bind(name)
  .bind(measurable_type.to_string())
  .bind(set_date.to_rfc3339())
  .bind(due_date.map(|d| d.to_rfc3339()))
  .bind(interval_days)
  .bind(on_complete.to_string())
  .execute(pool)
  .await
  .expect("Failed to seed measurable");

  result.last_insert_rowid()
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Create a mock measurable without touching the database
pub fn mock_measurable(measurable_type: MeasurableType) -> Measurable {
  Measurable {
    id: 1,
    owner_id: 1,
    name: "morning run".to_string(),
    description: Some("3k around the park".to_string()),
    measurable_type,
    set_date: utc(2024, 1, 1),
    due_date: Some(utc(2024, 1, 10)),
    interval_days: None,
    on_complete: OnComplete::None,
    area_id: None,
    created_at: Some(utc(2024, 1, 1)),
    updated_at: Some(utc(2024, 1, 1)),
  }
}

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

/// Midnight UTC on the given calendar day
pub fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    // Verify key tables exist
    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('areas', 'measurables', 'results', 'weigh_ins', 'blood_pressure_readings', 'weight_goals')"
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 6, "Expected 6 tables, got {}", tables.len());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_measurable_roundtrip() {
    let pool = setup_test_db().await;

    let id = seed_measurable(
      &pool,
      "morning run",
      MeasurableType::Countdown,
      utc(2024, 1, 1),
      Some(utc(2024, 1, 10)),
      Some(7),
      OnComplete::None,
    )
    .await;

    let loaded = crate::completion::load_measurable(&pool, 1, id)
      .await
      .expect("Should load seeded measurable");

    assert_eq!(loaded.name, "morning run");
    assert_eq!(loaded.measurable_type, MeasurableType::Countdown);
    assert_eq!(loaded.set_date, utc(2024, 1, 1));
    assert_eq!(loaded.interval_days, Some(7));

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_factory_creates_valid_data() {
    let m = mock_measurable(MeasurableType::Seeking);
    assert_eq!(m.measurable_type, MeasurableType::Seeking);
    assert!(m.due_date.is_some());
  }
}
