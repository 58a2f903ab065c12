use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable record of one completion event.
///
/// Created exactly once per completion and never mutated afterwards. A
/// weigh-in or blood pressure reading may reference it 1:1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResult {
  pub id: i64,
  pub owner_id: i64,
  pub measurable_id: i64,
  pub date: DateTime<Utc>,
  pub notes: String,
}
