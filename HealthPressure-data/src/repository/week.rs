//! Sunday-based calendar week windows.
//!
//! A week runs from Sunday at local midnight (inclusive) to the following
//! Sunday at local midnight (exclusive). Bounds are returned in UTC so they
//! can be compared directly with stored timestamps.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};

/// Sunday on or before `date`
pub fn week_start_date(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// Start of the week containing `now`, in the time zone of `now`
pub fn week_start<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    local_midnight(&now.timezone(), week_start_date(now.date_naive()))
}

/// Half-open `[start, end)` bounds of the week containing `now`
pub fn week_bounds<Tz: TimeZone>(now: &DateTime<Tz>) -> (DateTime<Utc>, DateTime<Utc>) {
    let tz = now.timezone();
    let sunday = week_start_date(now.date_naive());
    (local_midnight(&tz, sunday), local_midnight(&tz, sunday + Duration::days(7)))
}

/// Bounds of the current week in the system's local time zone
pub fn current_week_bounds() -> (DateTime<Utc>, DateTime<Utc>) {
    week_bounds(&Local::now())
}

fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);

    // A DST jump can skip midnight; the day then starts at the first valid hour.
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| {
            (1..=3).find_map(|hours| tz.from_local_datetime(&(midnight + Duration::hours(hours))).earliest())
        })
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}
