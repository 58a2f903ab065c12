use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Measurable Type: recurrence behavior of a trackable goal
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurableType {
  /// Counts down to a fixed due date, restarts on completion
  Countdown,
  /// Open-ended, only counts elapsed days, never due
  Tally,
  /// Interval unknown; first completion's elapsed time becomes the due date,
  /// after which the measurable behaves as Countdown
  Seeking,
}

impl std::fmt::Display for MeasurableType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Countdown => write!(f, "countdown"),
      Self::Tally => write!(f, "tally"),
      Self::Seeking => write!(f, "seeking"),
    }
  }
}

impl std::str::FromStr for MeasurableType {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "countdown" => Ok(Self::Countdown),
      "tally" => Ok(Self::Tally),
      "seeking" => Ok(Self::Seeking),
      _ => Err(format!("Unknown measurable type: {}", s)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// On-Complete Requirement: data that must accompany a completion
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OnComplete {
  #[default]
  None,
  WeighIn,
  BloodPressureReading,
}

impl std::fmt::Display for OnComplete {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::None => write!(f, "none"),
      Self::WeighIn => write!(f, "weigh_in"),
      Self::BloodPressureReading => write!(f, "blood_pressure_reading"),
    }
  }
}

impl std::str::FromStr for OnComplete {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "none" => Ok(Self::None),
      "weigh_in" => Ok(Self::WeighIn),
      "blood_pressure_reading" => Ok(Self::BloodPressureReading),
      _ => Err(format!("Unknown on-complete requirement: {}", s)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Measurable
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurable {
  pub id: i64,
  pub owner_id: i64,
  pub name: String,
  pub description: Option<String>,
  pub measurable_type: MeasurableType,
  /// Start of the current tracking interval
  pub set_date: DateTime<Utc>,
  pub due_date: Option<DateTime<Utc>>,
  /// Explicit cadence in days; sticky across completions when set
  pub interval_days: Option<i64>,
  pub on_complete: OnComplete,
  pub area_id: Option<i64>,
  pub created_at: Option<DateTime<Utc>>,
  pub updated_at: Option<DateTime<Utc>>,
}

/// For inserting new measurables (without id, created_at, updated_at)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMeasurable {
  pub name: String,
  pub description: Option<String>,
  pub measurable_type: MeasurableType,
  pub set_date: Option<DateTime<Utc>>,
  pub due_date: Option<DateTime<Utc>>,
  pub interval_days: Option<i64>,
  #[serde(default)]
  pub on_complete: OnComplete,
  pub area_id: Option<i64>,
}
