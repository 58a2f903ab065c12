use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A body-weight reading captured while completing a measurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeighIn {
  pub id: i64,
  pub owner_id: i64,
  pub date: DateTime<Utc>,
  pub weight_kg: f64,
  pub body_fat_pct: Option<f64>,
  /// Most recent prior weigh-in for the same owner, captured at creation time
  pub previous_weigh_in_id: Option<i64>,
  pub result_id: i64,
}

/// For inserting new weigh-ins (without id, back-reference, result link)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWeighIn {
  pub weight_kg: f64,
  pub body_fat_pct: Option<f64>,
  /// Defaults to the completion timestamp when omitted
  pub date: Option<DateTime<Utc>>,
}

/// Singleton per owner: optional target weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightGoal {
  pub owner_id: i64,
  pub target_weight_kg: Option<f64>,
  pub updated_at: Option<DateTime<Utc>>,
}
