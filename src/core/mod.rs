pub mod bar_state;
pub mod current_time;
pub mod layout;
pub mod period;
pub mod primitives;
pub mod segment_index;
pub mod segmentation;
pub mod timeline;
pub mod types;

pub use bar_state::{BarState, classify_phase};
pub use current_time::{CurrentTimePosition, resolve_current_time_position};
pub use layout::ChartLayout;
pub use period::{
    CompletedCycle, Period, PeriodChanges, PeriodUpdate, PhaseType, apply_period_updates,
    validate_periods,
};
pub use segment_index::{SegmentPositionEntry, SegmentPositionIndex, build_segment_index};
pub use segmentation::{
    Bar, CompletedCycleBar, DaySegment, segment_completed_cycle, segment_periods, segment_range,
};
pub use timeline::Timeline;
pub use types::{ChartDimensions, ChartMode, Viewport};
