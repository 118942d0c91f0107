use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::render::SeriesKind;

/// Input change classes that can require a repaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    /// Period list, completed cycle or lower bound changed.
    Data,
    /// Current time moved.
    Now,
    /// Hovered/highlighted period changed.
    Hover,
    Viewport,
    Mode,
    Config,
    /// Preview state of an active drag moved.
    DragPreview,
    DragStarted,
    DragEnded,
    /// The drag preview added, dropped or shifted day rows.
    TimelineShifted,
}

impl ChangeKind {
    const fn bit(self) -> u16 {
        match self {
            Self::Data => 1 << 0,
            Self::Now => 1 << 1,
            Self::Hover => 1 << 2,
            Self::Viewport => 1 << 3,
            Self::Mode => 1 << 4,
            Self::Config => 1 << 5,
            Self::DragPreview => 1 << 6,
            Self::DragStarted => 1 << 7,
            Self::DragEnded => 1 << 8,
            Self::TimelineShifted => 1 << 9,
        }
    }
}

/// Bitmask of pending changes coalesced between two render calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChangeSet {
    bits: u16,
}

impl ChangeSet {
    const STRUCTURAL_BITS: u16 = ChangeKind::Data.bit()
        | ChangeKind::Hover.bit()
        | ChangeKind::Viewport.bit()
        | ChangeKind::Mode.bit()
        | ChangeKind::Config.bit();

    #[must_use]
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    #[must_use]
    pub const fn from_kind(kind: ChangeKind) -> Self {
        Self { bits: kind.bit() }
    }

    #[must_use]
    pub const fn with(self, kind: ChangeKind) -> Self {
        Self {
            bits: self.bits | kind.bit(),
        }
    }

    pub fn insert(&mut self, kind: ChangeKind) {
        self.bits |= kind.bit();
    }

    #[must_use]
    pub const fn contains(self, kind: ChangeKind) -> bool {
        (self.bits & kind.bit()) != 0
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.bits == 0
    }

    /// Whether any change affects layout or styling of every bar.
    #[must_use]
    pub const fn has_structural_change(self) -> bool {
        (self.bits & Self::STRUCTURAL_BITS) != 0
    }
}

/// Rendering work selected for a pending change set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderAction {
    None,
    FullRebuild,
    /// Replace only `series` in the current scene. With
    /// `suppress_hit_testing`, interactive series stop reacting to the
    /// pointer until the next full rebuild.
    PatchSeries {
        series: Vec<SeriesKind>,
        suppress_hit_testing: bool,
    },
}

const DRAG_PATCH_SERIES: [SeriesKind; 4] = [
    SeriesKind::PeriodBars,
    SeriesKind::BarLabels,
    SeriesKind::ResizeHandles,
    SeriesKind::DragTooltip,
];

/// Series positioned by day row, stale once the preview timeline changes.
const TIMELINE_PATCH_SERIES: [SeriesKind; 4] = [
    SeriesKind::Grid,
    SeriesKind::DayLabels,
    SeriesKind::CompletedCycle,
    SeriesKind::NowMarker,
];

/// Read-only view of interaction state consulted by the decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SyncContext {
    pub drag_active: bool,
    pub hovering: bool,
}

/// Picks the cheapest render action that keeps the scene consistent.
///
/// | Condition                         | Action                               |
/// |-----------------------------------|--------------------------------------|
/// | drag active                       | patch drag series, no hit-testing    |
/// | drag active, day rows changed     | also patch the row-based series      |
/// | drag just ended                   | full rebuild                         |
/// | data/hover/viewport/mode/config   | full rebuild                         |
/// | now moved while hovering          | full rebuild                         |
/// | now moved, no hover               | patch the now-marker series          |
#[must_use]
pub fn resolve_render_action(changes: ChangeSet, context: SyncContext) -> RenderAction {
    if changes.is_none() {
        return RenderAction::None;
    }

    if context.drag_active {
        let mut series = DRAG_PATCH_SERIES.to_vec();
        if changes.contains(ChangeKind::TimelineShifted) {
            series.extend(TIMELINE_PATCH_SERIES);
        } else if changes.contains(ChangeKind::Now) {
            series.push(SeriesKind::NowMarker);
        }
        return RenderAction::PatchSeries {
            series,
            suppress_hit_testing: true,
        };
    }

    if changes.contains(ChangeKind::DragEnded) || changes.has_structural_change() {
        return RenderAction::FullRebuild;
    }

    if changes.contains(ChangeKind::Now) {
        if context.hovering {
            return RenderAction::FullRebuild;
        }
        return RenderAction::PatchSeries {
            series: vec![SeriesKind::NowMarker],
            suppress_hit_testing: false,
        };
    }

    // Drag start/preview bits left over after the drag already ended without
    // a `DragEnded` bit (cancel) still need the preview cleared.
    RenderAction::FullRebuild
}

/// Accumulates changes between render calls and resolves them on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderSynchronizer {
    pending: ChangeSet,
    has_rendered: bool,
}

impl RenderSynchronizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: ChangeKind) {
        trace!(?kind, "render change recorded");
        self.pending.insert(kind);
    }

    #[must_use]
    pub fn pending(&self) -> ChangeSet {
        self.pending
    }

    /// Resolves and clears the pending set. The first call always rebuilds
    /// since there is no scene to patch yet.
    pub fn take_action(&mut self, context: SyncContext) -> RenderAction {
        let changes = std::mem::take(&mut self.pending);
        if !self.has_rendered {
            self.has_rendered = true;
            return RenderAction::FullRebuild;
        }
        resolve_render_action(changes, context)
    }

    /// Forces the next `take_action` to rebuild.
    pub fn reset(&mut self) {
        self.pending = ChangeSet::none();
        self.has_rendered = false;
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ChangeKind, ChangeSet, RenderAction, RenderSynchronizer, SyncContext,
        resolve_render_action,
    };
    use crate::render::SeriesKind;

    const IDLE: SyncContext = SyncContext {
        drag_active: false,
        hovering: false,
    };

    #[test]
    fn empty_change_set_does_nothing() {
        assert_eq!(resolve_render_action(ChangeSet::none(), IDLE), RenderAction::None);
    }

    #[test]
    fn drag_active_patches_even_on_data_change() {
        let changes = ChangeSet::from_kind(ChangeKind::DragPreview).with(ChangeKind::Data);
        let action = resolve_render_action(
            changes,
            SyncContext {
                drag_active: true,
                hovering: true,
            },
        );
        match action {
            RenderAction::PatchSeries {
                series,
                suppress_hit_testing,
            } => {
                assert!(suppress_hit_testing);
                assert!(series.contains(&SeriesKind::PeriodBars));
                assert!(!series.contains(&SeriesKind::NowMarker));
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn drag_patch_grows_when_day_rows_shift() {
        let changes = ChangeSet::from_kind(ChangeKind::DragPreview)
            .with(ChangeKind::TimelineShifted)
            .with(ChangeKind::Now);
        let RenderAction::PatchSeries { series, .. } = resolve_render_action(
            changes,
            SyncContext {
                drag_active: true,
                hovering: false,
            },
        ) else {
            panic!("expected a patch while dragging");
        };
        for kind in [
            SeriesKind::PeriodBars,
            SeriesKind::Grid,
            SeriesKind::DayLabels,
            SeriesKind::CompletedCycle,
        ] {
            assert!(series.contains(&kind), "missing {kind:?}");
        }
        let markers = series
            .iter()
            .filter(|kind| **kind == SeriesKind::NowMarker)
            .count();
        assert_eq!(markers, 1);
    }

    #[test]
    fn timeline_shift_after_drag_rebuilds() {
        let changes =
            ChangeSet::from_kind(ChangeKind::TimelineShifted).with(ChangeKind::DragEnded);
        assert_eq!(resolve_render_action(changes, IDLE), RenderAction::FullRebuild);
    }

    #[test]
    fn now_only_patches_marker_unless_hovering() {
        let changes = ChangeSet::from_kind(ChangeKind::Now);
        assert_eq!(
            resolve_render_action(changes, IDLE),
            RenderAction::PatchSeries {
                series: vec![SeriesKind::NowMarker],
                suppress_hit_testing: false,
            }
        );
        assert_eq!(
            resolve_render_action(
                changes,
                SyncContext {
                    drag_active: false,
                    hovering: true,
                }
            ),
            RenderAction::FullRebuild
        );
    }

    #[test]
    fn drag_end_and_hover_rebuild() {
        assert_eq!(
            resolve_render_action(ChangeSet::from_kind(ChangeKind::DragEnded), IDLE),
            RenderAction::FullRebuild
        );
        assert_eq!(
            resolve_render_action(ChangeSet::from_kind(ChangeKind::Hover), IDLE),
            RenderAction::FullRebuild
        );
    }

    #[test]
    fn first_action_is_always_full_rebuild() {
        let mut synchronizer = RenderSynchronizer::new();
        synchronizer.record(ChangeKind::Now);
        assert_eq!(synchronizer.take_action(IDLE), RenderAction::FullRebuild);
        assert!(synchronizer.pending().is_none());
        assert_eq!(synchronizer.take_action(IDLE), RenderAction::None);
    }
}
