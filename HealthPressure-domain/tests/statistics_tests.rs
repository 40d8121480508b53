use std::sync::Arc;

use chrono::{Duration, Utc};
use health_pressure_domain::entities::{BloodPressureCategory, BmiCategory, NewPerson, NewReading};
use health_pressure_domain::repository::{HealthRecordRepositoryTrait, HealthRecordStore};
use health_pressure_domain::services::{
    classify_reading, color_for_classification, summarize, StatisticsService, StatisticsServiceError,
    StatisticsServiceTrait,
};
use tracing_subscriber::EnvFilter;

async fn setup() -> Arc<HealthRecordStore> {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();

    let store = Arc::new(HealthRecordStore::in_memory());
    store.init().await.expect("in-memory store should initialize");
    store
}

async fn add_reading(store: &HealthRecordStore, person_id: i64, systolic: u16, diastolic: u16, heart_rate: u16, days_ago: i64) -> i64 {
    store
        .add_reading(NewReading {
            person_id,
            systolic,
            diastolic,
            heart_rate,
            timestamp: Utc::now() - Duration::days(days_ago),
            notes: None,
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_statistics_for_two_readings() {
    let store = setup().await;
    let person_id = store.add_person(NewPerson::new("Maria", 60, 82.0, 165.0)).await.unwrap();
    add_reading(&store, person_id, 120, 80, 70, 1).await;
    add_reading(&store, person_id, 130, 85, 75, 0).await;

    let service = StatisticsService::new(store.clone());
    let stats = service.compute_statistics(person_id).await.unwrap().expect("person exists");

    assert_eq!(stats.avg_systolic, 125);
    assert_eq!(stats.avg_diastolic, 83);
    assert_eq!(stats.avg_heart_rate, 73);
    assert_eq!(stats.overall_classification, BloodPressureCategory::PreHypertension);
    assert_eq!(stats.total_readings, 2);

    // 82 / 1.65^2 = 30.119...
    assert_eq!(stats.bmi, 30.1);
    assert_eq!(stats.bmi_classification, BmiCategory::ObesityClass1);
}

#[tokio::test]
async fn test_statistics_without_readings_still_report_bmi() {
    let store = setup().await;
    let person_id = store.add_person(NewPerson::new("João", 28, 55.0, 178.0)).await.unwrap();

    let service = StatisticsService::new(store.clone());
    let stats = service.compute_statistics(person_id).await.unwrap().unwrap();

    assert_eq!(stats.total_readings, 0);
    assert_eq!(stats.overall_classification, BloodPressureCategory::Normal);
    assert_eq!(stats.avg_systolic, 0);
    // 55 / 1.78^2 = 17.358...
    assert_eq!(stats.bmi, 17.4);
    assert_eq!(stats.bmi_classification, BmiCategory::Underweight);
}

#[tokio::test]
async fn test_statistics_for_missing_person() {
    let store = setup().await;
    add_reading(&store, 77, 150, 95, 80, 0).await;

    let service = StatisticsService::new(store.clone());
    assert!(service.compute_statistics(77).await.unwrap().is_none());
}

#[tokio::test]
async fn test_statistics_reflect_latest_data() {
    let store = setup().await;
    let person_id = store.add_person(NewPerson::new("Ana", 40, 70.0, 170.0)).await.unwrap();
    let first = add_reading(&store, person_id, 150, 95, 80, 0).await;

    let service = StatisticsService::new(store.clone());
    let before = service.compute_statistics(person_id).await.unwrap().unwrap();
    assert_eq!(before.overall_classification, BloodPressureCategory::HypertensionStage2);

    store.delete_reading(first).await.unwrap();
    add_reading(&store, person_id, 110, 70, 65, 0).await;

    let mut person = store.get_person(person_id).await.unwrap().unwrap();
    person.weight_kg = 80.0;
    store.update_person(&person).await.unwrap();

    let after = service.compute_statistics(person_id).await.unwrap().unwrap();
    assert_eq!(after.overall_classification, BloodPressureCategory::Normal);
    assert_eq!(after.total_readings, 1);
    assert_eq!(after.bmi_classification, BmiCategory::Overweight);
}

#[tokio::test]
async fn test_statistics_after_cascade_delete() {
    let store = setup().await;
    let person_id = store.add_person(NewPerson::new("Ana", 40, 70.0, 170.0)).await.unwrap();
    for days_ago in 0..3 {
        add_reading(&store, person_id, 120, 80, 70, days_ago).await;
    }

    store.delete_person(person_id).await.unwrap();

    let service = StatisticsService::new(store.clone());
    assert!(service.compute_statistics(person_id).await.unwrap().is_none());
    assert!(store.get_readings_for_person(person_id, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_statistics_on_closed_store() {
    let store = setup().await;
    store.close().await.unwrap();

    let service = StatisticsService::new(store.clone());
    let err = service.compute_statistics(1).await.unwrap_err();
    assert!(matches!(err, StatisticsServiceError::Uninitialized));
}

#[tokio::test]
async fn test_current_week_summary_from_prefiltered_readings() {
    let store = setup().await;
    let person_id = store.add_person(NewPerson::new("Ana", 40, 70.0, 170.0)).await.unwrap();
    add_reading(&store, person_id, 160, 100, 90, 30).await;
    add_reading(&store, person_id, 118, 76, 64, 0).await;

    let person = store.get_person(person_id).await.unwrap().unwrap();
    let this_week = store.get_readings_for_person_in_current_week(person_id).await.unwrap();
    let weekly = summarize(&person, &this_week);

    assert_eq!(weekly.total_readings, 1);
    assert_eq!(weekly.overall_classification, BloodPressureCategory::Normal);

    let service = StatisticsService::new(store.clone());
    let overall = service.compute_statistics(person_id).await.unwrap().unwrap();
    assert_eq!(overall.total_readings, 2);
}

#[tokio::test]
async fn test_weekly_history_from_store() {
    let store = setup().await;
    let person_id = store.add_person(NewPerson::new("Ana", 40, 70.0, 170.0)).await.unwrap();
    add_reading(&store, person_id, 120, 80, 70, 0).await;
    add_reading(&store, person_id, 130, 85, 75, 14).await;
    add_reading(&store, person_id, 140, 90, 80, 35).await;

    let service = StatisticsService::new(store.clone());
    let history = service.weekly_history(person_id).await.unwrap();

    assert_eq!(history.len(), 2);
    assert!(history[0].week_start > history[1].week_start);
    assert_eq!(history[0].readings[0].systolic, 130);
    assert_eq!(history[0].avg_systolic, 130);
    assert_eq!(history[0].avg_diastolic, 85);
    assert_eq!(history[1].readings[0].systolic, 140);
}

#[tokio::test]
async fn test_single_reading_display_classification() {
    let store = setup().await;
    let id = add_reading(&store, 1, 182, 70, 88, 0).await;

    let reading = store.get_reading(id).await.unwrap().unwrap();
    let category = classify_reading(&reading);

    assert_eq!(category, BloodPressureCategory::HypertensiveCrisis);
    assert_eq!(color_for_classification(category.label()), "#c0392b");
}

#[tokio::test]
async fn test_statistics_serialize_with_labels() {
    let store = setup().await;
    let person_id = store.add_person(NewPerson::new("Ana", 40, 70.0, 170.0)).await.unwrap();
    add_reading(&store, person_id, 135, 80, 70, 0).await;

    let service = StatisticsService::new(store.clone());
    let stats = service.compute_statistics(person_id).await.unwrap().unwrap();
    let json = serde_json::to_value(&stats).unwrap();

    assert_eq!(json["overall_classification"], "Pre-Hypertension");
    assert_eq!(json["bmi_classification"], "Normal weight");
    assert_eq!(json["total_readings"], 1);
}
