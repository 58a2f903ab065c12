use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Blood Pressure Category
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BpCategory {
  Low,
  Normal,
  Elevated,
  Hypertension1,
  Hypertension2,
  HypertensionCrisis,
}

impl BpCategory {
  /// Classify a reading. Ordered rule list, first match wins.
  ///
  /// Crisis requires strictly greater than 180/120; 180/120 exactly is
  /// still stage 2.
  pub fn from_reading(systolic: i64, diastolic: i64) -> Self {
    if systolic > 180 || diastolic > 120 {
      BpCategory::HypertensionCrisis
    } else if systolic >= 140 || diastolic >= 90 {
      BpCategory::Hypertension2
    } else if systolic >= 130 || diastolic >= 80 {
      BpCategory::Hypertension1
    } else if systolic >= 120 {
      BpCategory::Elevated
    } else if systolic >= 90 {
      BpCategory::Normal
    } else {
      BpCategory::Low
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      BpCategory::Low => "low",
      BpCategory::Normal => "normal",
      BpCategory::Elevated => "elevated",
      BpCategory::Hypertension1 => "hypertension_1",
      BpCategory::Hypertension2 => "hypertension_2",
      BpCategory::HypertensionCrisis => "hypertension_crisis",
    }
  }
}

impl std::fmt::Display for BpCategory {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl std::str::FromStr for BpCategory {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "low" => Ok(Self::Low),
      "normal" => Ok(Self::Normal),
      "elevated" => Ok(Self::Elevated),
      "hypertension_1" => Ok(Self::Hypertension1),
      "hypertension_2" => Ok(Self::Hypertension2),
      "hypertension_crisis" => Ok(Self::HypertensionCrisis),
      _ => Err(format!("Unknown blood pressure category: {}", s)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Blood Pressure Reading
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloodPressureReading {
  pub id: i64,
  pub owner_id: i64,
  pub date: DateTime<Utc>,
  pub systolic: i64,
  pub diastolic: i64,
  pub pulse: Option<i64>,
  pub category: BpCategory,
  /// Most recent reading strictly before `date`, captured at creation time
  pub previous_reading_id: Option<i64>,
  pub result_id: i64,
}

/// For inserting new readings (category is derived, not supplied)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBloodPressureReading {
  pub systolic: i64,
  pub diastolic: i64,
  pub pulse: Option<i64>,
  /// Defaults to the completion timestamp when omitted
  pub date: Option<DateTime<Utc>>,
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_crisis_is_strictly_above_180_120() {
    // 180/120 exactly stays stage 2
    assert_eq!(BpCategory::from_reading(180, 120), BpCategory::Hypertension2);
    assert_eq!(BpCategory::from_reading(181, 80), BpCategory::HypertensionCrisis);
    assert_eq!(BpCategory::from_reading(110, 121), BpCategory::HypertensionCrisis);
  }

  #[test]
  fn test_stage_2_thresholds() {
    assert_eq!(BpCategory::from_reading(140, 70), BpCategory::Hypertension2);
    assert_eq!(BpCategory::from_reading(110, 90), BpCategory::Hypertension2);
  }

  #[test]
  fn test_stage_1_from_either_bound() {
    assert_eq!(BpCategory::from_reading(130, 70), BpCategory::Hypertension1);
    assert_eq!(BpCategory::from_reading(110, 80), BpCategory::Hypertension1);
  }

  #[test]
  fn test_elevated_and_below() {
    assert_eq!(BpCategory::from_reading(120, 70), BpCategory::Elevated);
    assert_eq!(BpCategory::from_reading(119, 70), BpCategory::Normal);
    assert_eq!(BpCategory::from_reading(90, 60), BpCategory::Normal);
    assert_eq!(BpCategory::from_reading(85, 55), BpCategory::Low);
  }

  #[test]
  fn test_category_string_roundtrip() {
    for cat in [
      BpCategory::Low,
      BpCategory::Normal,
      BpCategory::Elevated,
      BpCategory::Hypertension1,
      BpCategory::Hypertension2,
      BpCategory::HypertensionCrisis,
    ] {
      let parsed: BpCategory = cat.as_str().parse().unwrap();
      assert_eq!(parsed, cat);
    }
  }
}
