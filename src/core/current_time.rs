use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::period::Period;
use crate::core::timeline::Timeline;

/// Where the "now" marker sits in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentTimePosition {
    pub day_index: usize,
    pub hour_position: f64,
    /// `Some` only when now falls inside a period.
    pub is_in_fasting: Option<bool>,
    /// `Some(true)` while the schedule has not started yet.
    pub is_waiting: Option<bool>,
}

/// Resolves the marker position, or `None` when now is outside the rendered rows.
#[must_use]
pub fn resolve_current_time_position(
    now: DateTime<Utc>,
    periods: &[Period],
    timeline: &Timeline,
) -> Option<CurrentTimePosition> {
    let (day_index, hour_position) = timeline.locate(now)?;
    let is_in_fasting = periods
        .iter()
        .find(|period| period.contains(now))
        .map(|period| now < period.fasting_end());
    let is_waiting = periods
        .iter()
        .map(|period| period.start_time)
        .min()
        .map(|first_start| now < first_start);

    Some(CurrentTimePosition {
        day_index,
        hour_position,
        is_in_fasting,
        is_waiting,
    })
}
