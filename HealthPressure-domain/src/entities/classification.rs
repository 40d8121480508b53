use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Color shown for any label that is not a known category
pub const FALLBACK_COLOR: &str = "#95a5a6";

/// Blood pressure category, ordered from lowest to most severe
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BloodPressureCategory {
    /// Systolic < 90 or diastolic < 60
    #[serde(rename = "Hypotension")]
    Hypotension,

    /// Systolic < 120 and diastolic < 80
    #[serde(rename = "Normal")]
    Normal,

    /// Systolic 120-129 or diastolic 80-84
    #[serde(rename = "Pre-Hypertension")]
    PreHypertension,

    /// Systolic 130-139 or diastolic 85-89
    #[serde(rename = "Hypertension Stage 1")]
    HypertensionStage1,

    /// Systolic 140-179 or diastolic 90-119
    #[serde(rename = "Hypertension Stage 2")]
    HypertensionStage2,

    /// Anything above the stage 2 ranges
    #[serde(rename = "Hypertensive Crisis")]
    HypertensiveCrisis,
}

impl BloodPressureCategory {
    /// All categories in severity order
    pub const ALL: [BloodPressureCategory; 6] = [
        BloodPressureCategory::Hypotension,
        BloodPressureCategory::Normal,
        BloodPressureCategory::PreHypertension,
        BloodPressureCategory::HypertensionStage1,
        BloodPressureCategory::HypertensionStage2,
        BloodPressureCategory::HypertensiveCrisis,
    ];

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            BloodPressureCategory::Hypotension => "Hypotension",
            BloodPressureCategory::Normal => "Normal",
            BloodPressureCategory::PreHypertension => "Pre-Hypertension",
            BloodPressureCategory::HypertensionStage1 => "Hypertension Stage 1",
            BloodPressureCategory::HypertensionStage2 => "Hypertension Stage 2",
            BloodPressureCategory::HypertensiveCrisis => "Hypertensive Crisis",
        }
    }

    /// Display color as a hex string
    pub fn color(&self) -> &'static str {
        match self {
            BloodPressureCategory::Hypotension => "#3498db",
            BloodPressureCategory::Normal => "#2ecc71",
            BloodPressureCategory::PreHypertension => "#f39c12",
            BloodPressureCategory::HypertensionStage1 => "#e67e22",
            BloodPressureCategory::HypertensionStage2 => "#e74c3c",
            BloodPressureCategory::HypertensiveCrisis => "#c0392b",
        }
    }
}

impl fmt::Display for BloodPressureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BloodPressureCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BloodPressureCategory::ALL
            .into_iter()
            .find(|category| category.label() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Body Mass Index category (WHO bins)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BmiCategory {
    #[serde(rename = "Underweight")]
    Underweight,

    #[serde(rename = "Normal weight")]
    NormalWeight,

    #[serde(rename = "Overweight")]
    Overweight,

    #[serde(rename = "Obesity Class I")]
    ObesityClass1,

    #[serde(rename = "Obesity Class II")]
    ObesityClass2,

    #[serde(rename = "Obesity Class III")]
    ObesityClass3,
}

impl BmiCategory {
    /// All categories in ascending BMI order
    pub const ALL: [BmiCategory; 6] = [
        BmiCategory::Underweight,
        BmiCategory::NormalWeight,
        BmiCategory::Overweight,
        BmiCategory::ObesityClass1,
        BmiCategory::ObesityClass2,
        BmiCategory::ObesityClass3,
    ];

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::NormalWeight => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::ObesityClass1 => "Obesity Class I",
            BmiCategory::ObesityClass2 => "Obesity Class II",
            BmiCategory::ObesityClass3 => "Obesity Class III",
        }
    }

    /// Display color as a hex string
    pub fn color(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "#3498db",
            BmiCategory::NormalWeight => "#2ecc71",
            BmiCategory::Overweight => "#f39c12",
            BmiCategory::ObesityClass1 => "#e67e22",
            BmiCategory::ObesityClass2 => "#e74c3c",
            BmiCategory::ObesityClass3 => "#c0392b",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BmiCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BmiCategory::ALL
            .into_iter()
            .find(|category| category.label() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Label that matches no known category
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown classification: {0}")]
pub struct UnknownCategory(pub String);
