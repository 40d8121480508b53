use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Storage model for a tracked person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Store-assigned identifier, never reused
    pub id: i64,

    /// Display name, used for ordering
    pub name: String,

    /// Age in years
    pub age: u32,

    /// Body weight in kilograms
    pub weight_kg: f64,

    /// Height in centimeters
    pub height_cm: f64,

    /// When the row was inserted
    pub created_at: DateTime<Utc>,
}

/// Input data for inserting a new person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPerson {
    pub name: String,
    pub age: u32,
    pub weight_kg: f64,
    pub height_cm: f64,

    /// Defaults to the insert time if not provided
    pub created_at: Option<DateTime<Utc>>,
}

impl NewPerson {
    /// Build an insert request stamped at insert time
    pub fn new(name: impl Into<String>, age: u32, weight_kg: f64, height_cm: f64) -> Self {
        Self {
            name: name.into(),
            age,
            weight_kg,
            height_cm,
            created_at: None,
        }
    }
}
