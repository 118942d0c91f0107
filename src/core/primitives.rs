use chrono::{DateTime, FixedOffset, NaiveTime, Offset, TimeDelta, Utc};

pub const HOURS_PER_DAY: f64 = 24.0;
const MILLIS_PER_HOUR: f64 = 3_600_000.0;
const MILLIS_PER_DAY: i64 = 86_400_000;

#[must_use]
pub fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// Adds fractional hours with millisecond precision, saturating at the
/// representable range instead of overflowing.
#[must_use]
pub fn add_hours(time: DateTime<Utc>, hours: f64) -> DateTime<Utc> {
    TimeDelta::try_milliseconds((hours * MILLIS_PER_HOUR).round() as i64)
        .and_then(|delta| time.checked_add_signed(delta))
        .unwrap_or(if hours > 0.0 {
            DateTime::<Utc>::MAX_UTC
        } else {
            DateTime::<Utc>::MIN_UTC
        })
}

#[must_use]
pub fn fixed_offset(utc_offset_seconds: i32) -> FixedOffset {
    FixedOffset::east_opt(utc_offset_seconds).unwrap_or_else(|| Utc.fix())
}

/// Returns the instant of local midnight for the calendar day containing `time`.
#[must_use]
pub fn day_start(time: DateTime<Utc>, offset: FixedOffset) -> DateTime<Utc> {
    let local_midnight = time
        .with_timezone(&offset)
        .naive_local()
        .date()
        .and_time(NaiveTime::MIN);
    let utc_midnight = local_midnight - TimeDelta::seconds(i64::from(offset.local_minus_utc()));
    DateTime::from_naive_utc_and_offset(utc_midnight, Utc)
}

/// Whole days from `from_day` to `to_day`; both are expected to be day starts.
#[must_use]
pub fn days_between(from_day: DateTime<Utc>, to_day: DateTime<Utc>) -> i64 {
    (to_day - from_day)
        .num_milliseconds()
        .div_euclid(MILLIS_PER_DAY)
}

#[must_use]
pub fn next_day(day: DateTime<Utc>) -> DateTime<Utc> {
    day.checked_add_signed(TimeDelta::days(1))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Formats hours as `16h`, `45m` or `4h 30m`, rounding to whole minutes.
#[must_use]
pub fn format_duration_label(hours: f64) -> String {
    let total_minutes = (hours.max(0.0) * 60.0).round() as i64;
    let whole_hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    match (whole_hours, minutes) {
        (h, 0) => format!("{h}h"),
        (0, m) => format!("{m}m"),
        (h, m) => format!("{h}h {m}m"),
    }
}
