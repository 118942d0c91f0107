use serde::{Deserialize, Serialize};

mod drag;
mod resize_zones;

pub use drag::{
    DragActivity, DragCommit, DragController, DragLimits, DragPhase, DragPreview, DragSettings,
    DragStart, DragState, NextPeriodSnapshot, PeriodCoupling, PeriodSnapshot,
    PreviousPeriodSnapshot, drag_tooltip_text, resolve_drag_updates,
};
pub use resize_zones::{ResizeEdge, ResizeZone, build_resize_zones, hit_test_zones};

/// Identity of the device that produced a pointer event.
///
/// Touch points carry the platform identifier so concurrent fingers can be
/// told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerId {
    Mouse,
    Touch(u64),
}

/// One pointer/touch sample in chart pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerInput {
    pub id: PointerId,
    pub x: f64,
    pub y: f64,
}

impl PointerInput {
    #[must_use]
    pub fn mouse(x: f64, y: f64) -> Self {
        Self {
            id: PointerId::Mouse,
            x,
            y,
        }
    }

    #[must_use]
    pub fn touch(identifier: u64, x: f64, y: f64) -> Self {
        Self {
            id: PointerId::Touch(identifier),
            x,
            y,
        }
    }
}

/// Where move/end events are sourced from.
///
/// While a drag is active the whole input surface is captured so the drag
/// keeps tracking after the pointer leaves the chart element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CaptureScope {
    #[default]
    Element,
    Surface,
}
