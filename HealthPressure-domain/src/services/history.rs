use std::collections::BTreeMap;

use chrono::{DateTime, Duration, TimeZone, Utc};

use health_pressure_data::repository::week_start;

use crate::entities::{Reading, WeekGroup};
use crate::services::statistics::rounded_mean;

/// Group readings taken before the week containing `now` into past weeks.
///
/// Weeks start on Sunday at midnight in the time zone of `now`. Groups are
/// returned newest week first, and readings inside a group newest first.
/// Readings from the current week or later are left out. Each group carries
/// the rounded mean systolic and diastolic of its readings.
pub fn group_readings_by_week<Tz: TimeZone>(readings: &[Reading], now: &DateTime<Tz>) -> Vec<WeekGroup> {
    let tz = now.timezone();
    let current_week_start = week_start(now);

    let mut weeks: BTreeMap<DateTime<Utc>, Vec<Reading>> = BTreeMap::new();
    for reading in readings.iter().filter(|r| r.timestamp < current_week_start) {
        let start = week_start(&reading.timestamp.with_timezone(&tz));
        weeks.entry(start).or_default().push(reading.clone());
    }

    weeks
        .into_iter()
        .rev()
        .map(|(start, mut readings)| {
            readings.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
            WeekGroup {
                week_start: start,
                week_end: start + Duration::days(6),
                avg_systolic: rounded_mean(readings.iter().map(|r| r.systolic)),
                avg_diastolic: rounded_mean(readings.iter().map(|r| r.diastolic)),
                readings,
            }
        })
        .collect()
}
