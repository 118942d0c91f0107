use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::primitives::{add_hours, fixed_offset, format_duration_label, hours_between};
use crate::core::{Period, PeriodChanges, PeriodUpdate, PhaseType};

use super::{CaptureScope, PointerId, PointerInput, ResizeEdge, ResizeZone, hit_test_zones};

/// Duration bounds enforced while dragging. Values are hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragLimits {
    pub min_fasting_hours: f64,
    pub max_fasting_hours: f64,
    pub min_eating_hours: f64,
    pub max_eating_hours: f64,
}

impl Default for DragLimits {
    fn default() -> Self {
        Self {
            min_fasting_hours: 1.0,
            max_fasting_hours: 168.0,
            min_eating_hours: 1.0,
            max_eating_hours: 24.0,
        }
    }
}

/// How a moved period boundary affects its neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodCoupling {
    /// Neighbours never move; drags are clamped at their boundaries.
    #[default]
    Independent,
    /// One period's end equals the next period's start; boundary moves cascade.
    Contiguous,
}

/// Parameters captured at drag start and held fixed for the session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragSettings {
    pub pixels_per_hour: f64,
    pub limits: DragLimits,
    pub coupling: PeriodCoupling,
    /// Earliest allowed period start, e.g. the end of the last completed cycle.
    pub lower_bound: Option<DateTime<Utc>>,
    pub snap_step_hours: Option<f64>,
    pub utc_offset_seconds: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodSnapshot {
    pub start_time: DateTime<Utc>,
    pub fasting_duration: f64,
    pub eating_window: f64,
}

impl PeriodSnapshot {
    #[must_use]
    pub fn of(period: &Period) -> Self {
        Self {
            start_time: period.start_time,
            fasting_duration: period.fasting_duration,
            eating_window: period.eating_window,
        }
    }

    #[must_use]
    pub fn end_time(&self) -> DateTime<Utc> {
        add_hours(self.start_time, self.fasting_duration + self.eating_window)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviousPeriodSnapshot {
    pub period_index: usize,
    pub fasting_duration: f64,
    pub eating_window: f64,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NextPeriodSnapshot {
    pub period_index: usize,
    pub start_time: DateTime<Utc>,
    pub fasting_duration: f64,
}

/// Session state of one drag. Every delta is measured from `start_x` and
/// applied to the snapshots, never to live period values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragState {
    pub edge: ResizeEdge,
    pub bar_type: PhaseType,
    pub period_index: usize,
    pub start_x: f64,
    pub hour_delta: f64,
    pub pointer: PointerId,
    pub original: PeriodSnapshot,
    pub previous: Option<PreviousPeriodSnapshot>,
    pub next: Option<NextPeriodSnapshot>,
    pub settings: DragSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragPhase {
    Idle,
    Dragging,
}

/// One conceptual "drag active" value with two read paths.
///
/// `immediate` flips synchronously inside the pointer handler; `published`
/// mirrors it once observers have been told. Readers go through
/// `is_active`, which consults the immediate flag first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DragActivity {
    immediate: bool,
    published: bool,
}

impl DragActivity {
    #[must_use]
    pub fn is_active(self) -> bool {
        if self.immediate {
            return true;
        }
        self.published
    }

    #[must_use]
    pub fn immediate(self) -> bool {
        self.immediate
    }

    #[must_use]
    pub fn published(self) -> bool {
        self.published
    }

    #[must_use]
    pub fn is_settled(self) -> bool {
        self.immediate == self.published
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragStart {
    pub edge: ResizeEdge,
    pub bar_type: PhaseType,
    pub period_index: usize,
    pub start_x: f64,
}

/// Ephemeral mid-drag result. Never committed to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragPreview {
    pub current_x: f64,
    pub hour_delta: f64,
    pub updates: Vec<PeriodUpdate>,
    pub tooltip: String,
}

/// Final update batch of a completed drag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragCommit {
    pub period_index: usize,
    pub hour_delta: f64,
    pub updates: Vec<PeriodUpdate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragTarget {
    Start,
    PhaseBoundary,
    End,
}

impl DragTarget {
    fn resolve(edge: ResizeEdge, bar_type: PhaseType) -> Self {
        match (bar_type, edge) {
            (PhaseType::Fasting, ResizeEdge::Left) => Self::Start,
            (PhaseType::Fasting, ResizeEdge::Right) | (PhaseType::Eating, ResizeEdge::Left) => {
                Self::PhaseBoundary
            }
            (PhaseType::Eating, ResizeEdge::Right) => Self::End,
        }
    }

    fn moves_period_end(self) -> bool {
        matches!(self, Self::PhaseBoundary | Self::End)
    }
}

#[derive(Debug, Clone, Copy)]
struct DeltaRange {
    min: f64,
    max: f64,
}

impl DeltaRange {
    fn unbounded() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        }
    }

    fn bound(&mut self, min: f64, max: f64) {
        self.min = self.min.max(min);
        self.max = self.max.min(max);
    }

    /// Clamps `delta` into the range widened to contain 0.
    ///
    /// A snapshot that already violates a bound leaves the range on one side
    /// of 0, or empty. With 0 always allowed, a motionless drag commits the
    /// snapshot unchanged and movement only heads toward the feasible side.
    fn clamp(self, delta: f64) -> f64 {
        if !delta.is_finite() {
            return 0.0;
        }
        delta.max(self.min.min(0.0)).min(self.max.max(0.0))
    }
}

fn allowed_delta_range(state: &DragState, target: DragTarget) -> DeltaRange {
    let limits = state.settings.limits;
    let coupling = state.settings.coupling;
    let original = state.original;
    let mut range = DeltaRange::unbounded();

    match target {
        DragTarget::Start => {
            // The fasting end stays put, so the fasting phase absorbs the shift.
            range.bound(
                original.fasting_duration - limits.max_fasting_hours,
                original.fasting_duration - limits.min_fasting_hours,
            );
            if let Some(lower_bound) = state.settings.lower_bound {
                range.bound(hours_between(original.start_time, lower_bound), f64::INFINITY);
            }
            if let Some(previous) = state.previous {
                match coupling {
                    PeriodCoupling::Contiguous => range.bound(
                        limits.min_eating_hours - previous.eating_window,
                        limits.max_eating_hours - previous.eating_window,
                    ),
                    PeriodCoupling::Independent => range.bound(
                        hours_between(original.start_time, previous.end_time),
                        f64::INFINITY,
                    ),
                }
            }
        }
        DragTarget::PhaseBoundary => range.bound(
            limits.min_fasting_hours - original.fasting_duration,
            limits.max_fasting_hours - original.fasting_duration,
        ),
        DragTarget::End => range.bound(
            limits.min_eating_hours - original.eating_window,
            limits.max_eating_hours - original.eating_window,
        ),
    }

    if target.moves_period_end()
        && let Some(next) = state.next
    {
        match coupling {
            PeriodCoupling::Contiguous => range.bound(
                next.fasting_duration - limits.max_fasting_hours,
                next.fasting_duration - limits.min_fasting_hours,
            ),
            PeriodCoupling::Independent => range.bound(
                f64::NEG_INFINITY,
                hours_between(original.end_time(), next.start_time),
            ),
        }
    }

    range
}

fn snap_delta(raw_delta: f64, snap_step_hours: Option<f64>) -> f64 {
    match snap_step_hours {
        Some(step) if step.is_finite() && step > 0.0 => (raw_delta / step).round() * step,
        _ => raw_delta,
    }
}

/// Maps a raw hour delta to the bounded delta and the ordered update batch.
///
/// Updates are ordered by period index: a coupled previous period first,
/// then the dragged period, then a coupled next period.
#[must_use]
pub fn resolve_drag_updates(state: &DragState, raw_hour_delta: f64) -> (f64, Vec<PeriodUpdate>) {
    let target = DragTarget::resolve(state.edge, state.bar_type);
    let delta = allowed_delta_range(state, target)
        .clamp(snap_delta(raw_hour_delta, state.settings.snap_step_hours));
    let original = state.original;
    let contiguous = state.settings.coupling == PeriodCoupling::Contiguous;
    let mut updates = Vec::with_capacity(2);

    match target {
        DragTarget::Start => {
            if let (Some(previous), true) = (state.previous, contiguous) {
                updates.push(PeriodUpdate::new(
                    previous.period_index,
                    PeriodChanges {
                        eating_window: Some(previous.eating_window + delta),
                        ..PeriodChanges::default()
                    },
                ));
            }
            updates.push(PeriodUpdate::new(
                state.period_index,
                PeriodChanges {
                    start_time: Some(add_hours(original.start_time, delta)),
                    fasting_duration: Some(original.fasting_duration - delta),
                    ..PeriodChanges::default()
                },
            ));
        }
        DragTarget::PhaseBoundary => updates.push(PeriodUpdate::new(
            state.period_index,
            PeriodChanges {
                fasting_duration: Some(original.fasting_duration + delta),
                ..PeriodChanges::default()
            },
        )),
        DragTarget::End => updates.push(PeriodUpdate::new(
            state.period_index,
            PeriodChanges {
                eating_window: Some(original.eating_window + delta),
                ..PeriodChanges::default()
            },
        )),
    }

    if target.moves_period_end()
        && contiguous
        && let Some(next) = state.next
    {
        updates.push(PeriodUpdate::new(
            next.period_index,
            PeriodChanges {
                start_time: Some(add_hours(next.start_time, delta)),
                fasting_duration: Some(next.fasting_duration - delta),
                ..PeriodChanges::default()
            },
        ));
    }

    (delta, updates)
}

/// Tooltip for the dragged phase, e.g. `Fasting 18h, Mon 20:00 - Tue 14:00`.
#[must_use]
pub fn drag_tooltip_text(state: &DragState, hour_delta: f64) -> String {
    let original = state.original;
    let (start, fasting, eating) = match DragTarget::resolve(state.edge, state.bar_type) {
        DragTarget::Start => (
            add_hours(original.start_time, hour_delta),
            original.fasting_duration - hour_delta,
            original.eating_window,
        ),
        DragTarget::PhaseBoundary => (
            original.start_time,
            original.fasting_duration + hour_delta,
            original.eating_window,
        ),
        DragTarget::End => (
            original.start_time,
            original.fasting_duration,
            original.eating_window + hour_delta,
        ),
    };

    let fasting_end = add_hours(start, fasting);
    let (label, phase_start, phase_end, hours) = match state.bar_type {
        PhaseType::Fasting => ("Fasting", start, fasting_end, fasting),
        PhaseType::Eating => ("Eating", fasting_end, add_hours(fasting_end, eating), eating),
    };
    let offset = fixed_offset(state.settings.utc_offset_seconds);
    format!(
        "{label} {}, {} - {}",
        format_duration_label(hours),
        phase_start.with_timezone(&offset).format("%a %H:%M"),
        phase_end.with_timezone(&offset).format("%a %H:%M"),
    )
}

/// Drag-to-resize state machine: `Idle` until a pointer-down hits a resize
/// zone, `Dragging` until the same pointer is released or the session is
/// cancelled.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: Option<DragState>,
    activity: DragActivity,
    capture: CaptureScope,
}

impl DragController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> DragPhase {
        if self.state.is_some() {
            DragPhase::Dragging
        } else {
            DragPhase::Idle
        }
    }

    #[must_use]
    pub fn state(&self) -> Option<&DragState> {
        self.state.as_ref()
    }

    #[must_use]
    pub fn activity(&self) -> DragActivity {
        self.activity
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.activity.is_active()
    }

    #[must_use]
    pub fn capture_scope(&self) -> CaptureScope {
        self.capture
    }

    /// Copies the immediate flag into the observer-visible mirror.
    ///
    /// Returns `true` when the mirror changed.
    pub fn publish_activity(&mut self) -> bool {
        let changed = !self.activity.is_settled();
        self.activity.published = self.activity.immediate;
        changed
    }

    /// Starts a drag when `pointer` hits a zone. Misses and pointer-downs
    /// during an active drag are ignored.
    pub fn pointer_down(
        &mut self,
        pointer: PointerInput,
        zones: &[ResizeZone],
        periods: &[Period],
        highlighted_period: Option<usize>,
        settings: DragSettings,
    ) -> Option<DragStart> {
        if let Some(state) = &self.state {
            trace!(
                active_pointer = ?state.pointer,
                pointer = ?pointer.id,
                "ignoring pointer down during active drag"
            );
            return None;
        }
        let zone = hit_test_zones(zones, pointer.x, pointer.y, highlighted_period)?;
        self.begin(pointer, zone, periods, settings)
    }

    /// Starts a drag on `zone` regardless of pointer position.
    pub fn begin(
        &mut self,
        pointer: PointerInput,
        zone: &ResizeZone,
        periods: &[Period],
        settings: DragSettings,
    ) -> Option<DragStart> {
        if self.state.is_some()
            || !settings.pixels_per_hour.is_finite()
            || settings.pixels_per_hour <= 0.0
        {
            return None;
        }
        let period = periods.get(zone.period_index)?;

        // Flip the immediate flag before anything else can observe the gesture.
        self.activity.immediate = true;
        self.capture = CaptureScope::Surface;

        let previous = zone
            .period_index
            .checked_sub(1)
            .and_then(|index| periods.get(index).map(|previous| (index, previous)))
            .map(|(index, previous)| PreviousPeriodSnapshot {
                period_index: index,
                fasting_duration: previous.fasting_duration,
                eating_window: previous.eating_window,
                end_time: previous.end_time(),
            });
        let next = periods
            .get(zone.period_index + 1)
            .map(|next| NextPeriodSnapshot {
                period_index: zone.period_index + 1,
                start_time: next.start_time,
                fasting_duration: next.fasting_duration,
            });

        let state = DragState {
            edge: zone.edge,
            bar_type: zone.bar_type,
            period_index: zone.period_index,
            start_x: pointer.x,
            hour_delta: 0.0,
            pointer: pointer.id,
            original: PeriodSnapshot::of(period),
            previous,
            next,
            settings,
        };
        debug!(
            edge = ?state.edge,
            bar_type = ?state.bar_type,
            period_index = state.period_index,
            start_x = state.start_x,
            "drag started"
        );
        self.state = Some(state);

        Some(DragStart {
            edge: zone.edge,
            bar_type: zone.bar_type,
            period_index: zone.period_index,
            start_x: pointer.x,
        })
    }

    /// Updates the session delta. Events from other pointers are ignored.
    pub fn pointer_move(&mut self, pointer: PointerInput) -> Option<DragPreview> {
        let state = self.state.as_mut()?;
        if pointer.id != state.pointer {
            trace!(pointer = ?pointer.id, "ignoring move from non-dragging pointer");
            return None;
        }

        let raw_delta = (pointer.x - state.start_x) / state.settings.pixels_per_hour;
        let (hour_delta, updates) = resolve_drag_updates(state, raw_delta);
        state.hour_delta = hour_delta;
        trace!(hour_delta, "drag moved");

        Some(DragPreview {
            current_x: pointer.x,
            hour_delta,
            updates,
            tooltip: drag_tooltip_text(state, hour_delta),
        })
    }

    /// Commits the drag at the release position of the dragging pointer.
    pub fn pointer_up(&mut self, pointer: PointerInput) -> Option<DragCommit> {
        let state = self.state.as_ref()?;
        if pointer.id != state.pointer {
            trace!(pointer = ?pointer.id, "ignoring release from non-dragging pointer");
            return None;
        }
        let raw_delta = (pointer.x - state.start_x) / state.settings.pixels_per_hour;
        self.finish(raw_delta)
    }

    /// Commits the drag at the last seen delta.
    pub fn end(&mut self) -> Option<DragCommit> {
        let raw_delta = self.state.as_ref()?.hour_delta;
        self.finish(raw_delta)
    }

    /// Drops the session without committing. `pointer` restricts the cancel
    /// to the dragging pointer; `None` cancels unconditionally.
    pub fn cancel(&mut self, pointer: Option<PointerId>) -> bool {
        let Some(state) = &self.state else {
            return false;
        };
        if pointer.is_some_and(|id| id != state.pointer) {
            return false;
        }
        debug!(period_index = state.period_index, "drag cancelled");
        self.reset();
        true
    }

    /// Cancels any session and releases the surface capture.
    pub fn teardown(&mut self) -> bool {
        let cancelled = self.cancel(None);
        self.reset();
        cancelled
    }

    fn finish(&mut self, raw_delta: f64) -> Option<DragCommit> {
        let state = self.state.take()?;
        self.reset();
        let (hour_delta, updates) = resolve_drag_updates(&state, raw_delta);
        debug!(
            period_index = state.period_index,
            hour_delta,
            update_count = updates.len(),
            "drag committed"
        );
        Some(DragCommit {
            period_index: state.period_index,
            hour_delta,
            updates,
        })
    }

    fn reset(&mut self) {
        self.state = None;
        self.activity.immediate = false;
        self.capture = CaptureScope::Element;
    }
}
