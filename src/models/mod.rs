pub mod area;
pub mod blood_pressure;
pub mod measurable;
pub mod result;
pub mod weigh_in;

pub use area::{Area, NewArea};
pub use blood_pressure::{BloodPressureReading, BpCategory, NewBloodPressureReading};
pub use measurable::{Measurable, MeasurableType, NewMeasurable, OnComplete};
pub use result::CompletionResult;
pub use weigh_in::{NewWeighIn, WeighIn, WeightGoal};
