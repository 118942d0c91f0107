use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::bar_state::{BarState, classify_phase};
use crate::core::period::{CompletedCycle, Period, PhaseType};
use crate::core::primitives::{day_start, format_duration_label, hours_between, next_day};
use crate::core::timeline::Timeline;
use crate::core::types::ChartMode;

/// One day-bounded slice of a period phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub period_index: usize,
    pub day_index: usize,
    pub start_hour: f64,
    pub end_hour: f64,
    #[serde(rename = "type")]
    pub phase: PhaseType,
    pub state: BarState,
    pub duration_label: String,
}

impl Bar {
    #[must_use]
    pub fn span_hours(&self) -> f64 {
        self.end_hour - self.start_hour
    }
}

/// Slice of a finished prior cycle. Never draggable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedCycleBar {
    pub day_index: usize,
    pub start_hour: f64,
    pub end_hour: f64,
    pub duration_label: String,
}

/// Day-clipped piece of an arbitrary time range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DaySegment {
    pub day_index: usize,
    pub start_hour: f64,
    pub end_hour: f64,
}

/// Splits `[start, end)` into per-day segments of `timeline`.
///
/// A boundary instant belongs to the day it starts, so midnight-crossing
/// ranges produce `[.., 24)` followed by `[0, ..)` with no duplicate. Days
/// before the timeline start are dropped, and the walk stops at the
/// timeline end even if `end` lies beyond it.
#[must_use]
pub fn segment_range(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    timeline: &Timeline,
) -> Vec<DaySegment> {
    let offset = timeline.offset();
    let limit = timeline.end();
    let mut segments = Vec::new();
    let mut cursor = start;

    while cursor < end && cursor < limit {
        let day = day_start(cursor, offset);
        let clip_end = end.min(next_day(day));
        if clip_end <= cursor {
            break;
        }

        let day_index = timeline.day_index_of(day);
        if day_index >= 0 && hours_between(cursor, clip_end) > 0.0 {
            segments.push(DaySegment {
                day_index: day_index as usize,
                start_hour: hours_between(day, cursor),
                end_hour: hours_between(day, clip_end),
            });
        }
        cursor = clip_end;
    }

    segments
}

/// Converts periods into classified bars, fasting before eating per period.
#[must_use]
pub fn segment_periods(
    periods: &[Period],
    timeline: &Timeline,
    now: DateTime<Utc>,
    mode: ChartMode,
) -> Vec<Bar> {
    let mut bars = Vec::new();
    for (period_index, period) in periods.iter().enumerate() {
        for phase in [PhaseType::Fasting, PhaseType::Eating] {
            let Some((phase_start, phase_end)) = period.phase_range(phase) else {
                continue;
            };
            let state = classify_phase(phase, phase_start, phase_end, now, mode);
            let duration_label = format_duration_label(period.phase_duration(phase));
            bars.extend(
                segment_range(phase_start, phase_end, timeline)
                    .into_iter()
                    .map(|segment| Bar {
                        period_index,
                        day_index: segment.day_index,
                        start_hour: segment.start_hour,
                        end_hour: segment.end_hour,
                        phase,
                        state,
                        duration_label: duration_label.clone(),
                    }),
            );
        }
    }
    bars
}

#[must_use]
pub fn segment_completed_cycle(
    cycle: &CompletedCycle,
    timeline: &Timeline,
) -> Vec<CompletedCycleBar> {
    let duration_label = format_duration_label(cycle.duration_hours());
    segment_range(cycle.start_time, cycle.end_time, timeline)
        .into_iter()
        .map(|segment| CompletedCycleBar {
            day_index: segment.day_index,
            start_hour: segment.start_hour,
            end_hour: segment.end_hour,
            duration_label: duration_label.clone(),
        })
        .collect()
}
