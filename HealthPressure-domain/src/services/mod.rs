pub mod classification;
pub mod history;
pub mod statistics;

// Domain services
// This module contains business logic implementations.

// Re-export service traits, factory functions and pure helpers
pub use classification::{
    calculate_bmi, classify_blood_pressure, classify_bmi, classify_reading, color_for_classification,
    is_hypertensive_crisis,
};
pub use history::group_readings_by_week;
pub use statistics::{create_statistics_service, summarize, StatisticsService, StatisticsServiceError, StatisticsServiceTrait};
