use serde::{Deserialize, Serialize};

use super::classification::{BloodPressureCategory, BmiCategory};

/// Summary of a person's readings, computed on demand and never stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Mean systolic pressure, rounded to the nearest integer
    pub avg_systolic: u16,

    /// Mean diastolic pressure, rounded to the nearest integer
    pub avg_diastolic: u16,

    /// Mean heart rate, rounded to the nearest integer
    pub avg_heart_rate: u16,

    /// Category of the rounded mean pressure pair
    pub overall_classification: BloodPressureCategory,

    /// Body Mass Index rounded to one decimal place
    pub bmi: f64,

    /// Category of the unrounded Body Mass Index
    pub bmi_classification: BmiCategory,

    /// Number of readings that were averaged
    pub total_readings: usize,
}
