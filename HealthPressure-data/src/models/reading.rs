use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Storage model for a blood pressure / heart rate reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Store-assigned identifier, never reused
    pub id: i64,

    /// Person this reading belongs to (not checked on insert)
    pub person_id: i64,

    /// Systolic blood pressure in mmHg (the higher number)
    pub systolic: u16,

    /// Diastolic blood pressure in mmHg (the lower number)
    pub diastolic: u16,

    /// Heart rate in beats per minute
    pub heart_rate: u16,

    /// When the reading was taken
    pub timestamp: DateTime<Utc>,

    /// Optional notes about the reading
    pub notes: Option<String>,
}

/// Input data for inserting a new reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReading {
    pub person_id: i64,
    pub systolic: u16,
    pub diastolic: u16,
    pub heart_rate: u16,

    /// Caller-supplied measurement time
    pub timestamp: DateTime<Utc>,

    pub notes: Option<String>,
}
