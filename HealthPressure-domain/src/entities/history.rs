use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use health_pressure_data::models::Reading;

/// Readings of one past calendar week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekGroup {
    /// Sunday at local midnight
    pub week_start: DateTime<Utc>,

    /// Six days after `week_start`
    pub week_end: DateTime<Utc>,

    /// Mean systolic of the week, rounded
    pub avg_systolic: u16,

    /// Mean diastolic of the week, rounded
    pub avg_diastolic: u16,

    /// Readings of the week, newest first
    pub readings: Vec<Reading>,
}
