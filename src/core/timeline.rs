use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::core::period::{CompletedCycle, Period};
use crate::core::primitives::{day_start, days_between, fixed_offset, hours_between};

/// Calendar frame of the chart: one row per local day starting at `start_day`.
///
/// `end` is the hard limit used by segmentation; nothing after it is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    start_day: DateTime<Utc>,
    end: DateTime<Utc>,
    day_count: usize,
    utc_offset_seconds: i32,
}

impl Timeline {
    /// Builds the frame spanning all periods, extended backward to a visible
    /// completed cycle. Returns `None` when there are no periods.
    #[must_use]
    pub fn from_periods(
        periods: &[Period],
        completed_cycle: Option<&CompletedCycle>,
        lookback_hours: f64,
        utc_offset_seconds: i32,
    ) -> Option<Self> {
        let first_start = periods.iter().map(|period| period.start_time).min()?;
        let last_end = periods.iter().map(Period::end_time).max()?;

        let earliest = match completed_cycle {
            Some(cycle) if cycle.is_visible_before(first_start, lookback_hours) => {
                cycle.start_time.min(first_start)
            }
            _ => first_start,
        };

        Some(Self::spanning(earliest, last_end, utc_offset_seconds))
    }

    #[must_use]
    pub fn spanning(start: DateTime<Utc>, end: DateTime<Utc>, utc_offset_seconds: i32) -> Self {
        let offset = fixed_offset(utc_offset_seconds);
        let start_day = day_start(start, offset);
        let end = end.max(start);
        // An end exactly at midnight does not open another row.
        let last_instant = (end - TimeDelta::milliseconds(1)).max(start);
        let last_day = day_start(last_instant, offset);
        let day_count = usize::try_from(days_between(start_day, last_day) + 1).unwrap_or(1);
        Self {
            start_day,
            end,
            day_count,
            utc_offset_seconds,
        }
    }

    #[must_use]
    pub fn start_day(&self) -> DateTime<Utc> {
        self.start_day
    }

    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    #[must_use]
    pub fn day_count(&self) -> usize {
        self.day_count
    }

    #[must_use]
    pub fn offset(&self) -> FixedOffset {
        fixed_offset(self.utc_offset_seconds)
    }

    /// Signed day index of the local day containing `time`.
    #[must_use]
    pub fn day_index_of(&self, time: DateTime<Utc>) -> i64 {
        days_between(self.start_day, day_start(time, self.offset()))
    }

    #[must_use]
    pub fn day_start_at(&self, day_index: usize) -> DateTime<Utc> {
        i64::try_from(day_index)
            .ok()
            .and_then(TimeDelta::try_days)
            .and_then(|delta| self.start_day.checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Returns `(day_index, hour)` when `time` falls inside a rendered row.
    #[must_use]
    pub fn locate(&self, time: DateTime<Utc>) -> Option<(usize, f64)> {
        let day_index = usize::try_from(self.day_index_of(time)).ok()?;
        if day_index >= self.day_count {
            return None;
        }
        let hour = hours_between(self.day_start_at(day_index), time);
        Some((day_index, hour))
    }
}
