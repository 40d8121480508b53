use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use thiserror::Error;
use tracing::{debug, error};

use health_pressure_data::repository::{HealthRecordRepositoryTrait, RepositoryError};

use crate::entities::{BloodPressureCategory, Person, Reading, Statistics, WeekGroup};
use crate::services::classification::{calculate_bmi, classify_blood_pressure, classify_bmi};
use crate::services::history::group_readings_by_week;

/// Statistics service errors
#[derive(Debug, Error)]
pub enum StatisticsServiceError {
    /// Store used before `init()` or after `close()`
    #[error("Record store is not initialized")]
    Uninitialized,

    /// Repository error
    #[error("Repository error: {0}")]
    Repository(#[source] RepositoryError),
}

impl From<RepositoryError> for StatisticsServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Uninitialized => StatisticsServiceError::Uninitialized,
            other => StatisticsServiceError::Repository(other),
        }
    }
}

/// Trait for statistics service operations
#[async_trait]
pub trait StatisticsServiceTrait {
    /// Summarize every reading of a person. `None` if the person does not exist.
    async fn compute_statistics(&self, person_id: i64) -> Result<Option<Statistics>, StatisticsServiceError>;

    /// Past weeks of a person's readings, newest week first
    async fn weekly_history(&self, person_id: i64) -> Result<Vec<WeekGroup>, StatisticsServiceError>;
}

/// Statistics service over a shared record repository
pub struct StatisticsService<R: HealthRecordRepositoryTrait> {
    repository: Arc<R>,
}

impl<R: HealthRecordRepositoryTrait> StatisticsService<R> {
    /// Create a new statistics service
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: HealthRecordRepositoryTrait> StatisticsServiceTrait for StatisticsService<R> {
    async fn compute_statistics(&self, person_id: i64) -> Result<Option<Statistics>, StatisticsServiceError> {
        let person = match self.repository.get_person(person_id).await? {
            Some(person) => person,
            None => {
                debug!("No person with ID {}, no statistics produced", person_id);
                return Ok(None);
            }
        };

        let readings = self
            .repository
            .get_readings_for_person(person_id, None)
            .await
            .map_err(|e| {
                error!("Failed to load readings for person {}: {}", person_id, e);
                e
            })?;

        Ok(Some(summarize(&person, &readings)))
    }

    async fn weekly_history(&self, person_id: i64) -> Result<Vec<WeekGroup>, StatisticsServiceError> {
        let readings = self.repository.get_readings_for_person(person_id, None).await?;
        Ok(group_readings_by_week(&readings, &Local::now()))
    }
}

/// Summarize `readings` for `person`.
///
/// Works on whatever set it is given, so callers wanting a time window
/// filter the readings first. With no readings the averages are zero and
/// the classification is Normal; BMI only needs the person.
pub fn summarize(person: &Person, readings: &[Reading]) -> Statistics {
    let bmi = calculate_bmi(person.weight_kg, person.height_cm);
    let bmi_classification = classify_bmi(bmi);

    if readings.is_empty() {
        return Statistics {
            avg_systolic: 0,
            avg_diastolic: 0,
            avg_heart_rate: 0,
            overall_classification: BloodPressureCategory::Normal,
            bmi: round_to_one_decimal(bmi),
            bmi_classification,
            total_readings: 0,
        };
    }

    let avg_systolic = rounded_mean(readings.iter().map(|r| r.systolic));
    let avg_diastolic = rounded_mean(readings.iter().map(|r| r.diastolic));
    let avg_heart_rate = rounded_mean(readings.iter().map(|r| r.heart_rate));

    Statistics {
        avg_systolic,
        avg_diastolic,
        avg_heart_rate,
        overall_classification: classify_blood_pressure(avg_systolic, avg_diastolic),
        bmi: round_to_one_decimal(bmi),
        bmi_classification,
        total_readings: readings.len(),
    }
}

/// Arithmetic mean rounded half away from zero
pub(crate) fn rounded_mean(values: impl ExactSizeIterator<Item = u16>) -> u16 {
    let count = values.len();
    if count == 0 {
        return 0;
    }
    let sum: u64 = values.map(u64::from).sum();
    // The mean of u16 values always fits in u16
    (sum as f64 / count as f64).round() as u16
}

fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Create a statistics service for a shared repository
pub fn create_statistics_service<R: HealthRecordRepositoryTrait>(repository: Arc<R>) -> impl StatisticsServiceTrait + Send + Sync {
    StatisticsService::new(repository)
}
