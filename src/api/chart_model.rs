use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{
    Bar, ChartLayout, ChartMode, CompletedCycle, CompletedCycleBar, CurrentTimePosition, Period,
    SegmentPositionIndex, Timeline, build_segment_index, resolve_current_time_position,
    segment_completed_cycle, segment_periods,
};
use crate::interaction::{ResizeZone, build_resize_zones};

use super::ChartConfig;

/// Host-owned inputs, as last handed to the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartInputs {
    pub periods: Vec<Period>,
    pub now: DateTime<Utc>,
    pub viewport_width: f64,
    pub lower_bound: Option<DateTime<Utc>>,
    pub completed_cycle: Option<CompletedCycle>,
    pub mode: ChartMode,
    pub hovered_period: Option<usize>,
}

impl ChartInputs {
    #[must_use]
    pub fn new(now: DateTime<Utc>, viewport_width: f64, mode: ChartMode) -> Self {
        Self {
            periods: Vec::new(),
            now,
            viewport_width,
            lower_bound: None,
            completed_cycle: None,
            mode,
            hovered_period: None,
        }
    }
}

/// Everything derived from inputs. Recomputed as a whole on each change.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartModel {
    pub timeline: Option<Timeline>,
    pub bars: Vec<Bar>,
    pub completed_bars: Vec<CompletedCycleBar>,
    pub segment_index: SegmentPositionIndex,
    pub zones: Vec<ResizeZone>,
    pub current_time: Option<CurrentTimePosition>,
}

impl ChartModel {
    #[must_use]
    pub fn day_count(&self) -> usize {
        self.timeline.map_or(0, |timeline| timeline.day_count())
    }

    /// First row's day and the row count; the frame every row-based series
    /// is positioned in.
    #[must_use]
    pub fn day_rows(&self) -> Option<(DateTime<Utc>, usize)> {
        self.timeline
            .map(|timeline| (timeline.start_day(), timeline.day_count()))
    }

    /// Bar under a pixel position, used for hover tracking.
    #[must_use]
    pub fn bar_at(&self, layout: &ChartLayout, x: f64, y: f64) -> Option<&Bar> {
        let day_index = layout.y_to_day(y)?;
        let hour = layout.x_to_hour(x)?;
        let bar_top = layout.bar_top(day_index);
        if y < bar_top || y > bar_top + layout.bar_height() {
            return None;
        }
        self.bars.iter().find(|bar| {
            bar.day_index == day_index && hour >= bar.start_hour && hour < bar.end_hour
        })
    }
}

#[must_use]
pub fn chart_layout(config: &ChartConfig, viewport_width: f64) -> ChartLayout {
    ChartLayout {
        width: viewport_width,
        day_label_width: config.day_label_width_px,
        row_height: config.row_height_px,
        row_padding: config.row_padding_px,
        top_offset: config.top_offset_px,
        handle_width: config.handle_width_px,
    }
}

/// Runs the full derivation pipeline for `periods`.
///
/// `periods` is passed separately from `inputs` so a drag preview can be
/// derived without touching the host's list. Resize zones exist only in
/// edit mode.
#[must_use]
pub fn derive_chart_model(
    periods: &[Period],
    inputs: &ChartInputs,
    config: &ChartConfig,
    layout: &ChartLayout,
) -> ChartModel {
    let utc_offset_seconds = config.utc_offset_seconds();
    let Some(timeline) = Timeline::from_periods(
        periods,
        inputs.completed_cycle.as_ref(),
        config.completed_cycle_lookback_hours,
        utc_offset_seconds,
    ) else {
        return ChartModel::default();
    };

    let bars = segment_periods(periods, &timeline, inputs.now, inputs.mode);
    let segment_index = build_segment_index(&bars);
    let zones = match inputs.mode {
        ChartMode::Edit => build_resize_zones(&bars, &segment_index, layout),
        ChartMode::View => Vec::new(),
    };

    let first_start = periods.iter().map(|period| period.start_time).min();
    let completed_bars = match (inputs.completed_cycle.as_ref(), first_start) {
        (Some(cycle), Some(first_start))
            if cycle.is_visible_before(first_start, config.completed_cycle_lookback_hours) =>
        {
            segment_completed_cycle(cycle, &timeline)
        }
        _ => Vec::new(),
    };

    let current_time = resolve_current_time_position(inputs.now, periods, &timeline);

    ChartModel {
        timeline: Some(timeline),
        bars,
        completed_bars,
        segment_index,
        zones,
        current_time,
    }
}
