use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A grouping bucket for measurables ("Health", "Work", ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Area {
  pub id: i64,
  pub owner_id: i64,
  pub name: String,
  pub created_at: Option<DateTime<Utc>>,
}

/// For inserting new areas (without id, created_at)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewArea {
  pub name: String,
}
