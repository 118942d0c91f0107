use tracing::trace;

use crate::core::ChartMode;
use crate::interaction::{
    CaptureScope, DragCommit, DragPreview, DragStart, PointerId, PointerInput,
};
use crate::render::Renderer;

use super::ScheduleChart;
use super::render_synchronizer::ChangeKind;
use super::scene_builder::TooltipOverlay;

impl<R: Renderer> ScheduleChart<R> {
    /// Handles pointer/touch down. Starts a drag when a resize zone is hit
    /// in edit mode.
    pub fn pointer_down(&mut self, pointer: PointerInput) -> Option<DragStart> {
        if self.inputs.mode != ChartMode::Edit {
            return None;
        }
        let settings = self.drag_settings();
        let start = self.drag.pointer_down(
            pointer,
            &self.model.zones,
            &self.inputs.periods,
            self.inputs.hovered_period,
            settings,
        )?;

        // The immediate flag is already set here, so hover updates triggered
        // by observers below are ignored.
        self.inputs.hovered_period = Some(start.period_index);
        self.synchronizer.record(ChangeKind::DragStarted);
        self.notify_observers(|observer| {
            observer.on_drag_start(start.edge, start.bar_type, start.period_index, start.start_x);
        });
        self.notify_observers(|observer| {
            observer.on_pointer_capture_changed(CaptureScope::Surface);
        });
        self.drag.publish_activity();
        Some(start)
    }

    /// Handles pointer/touch move.
    ///
    /// While dragging this updates the preview and tooltip; otherwise it
    /// tracks the hovered period.
    pub fn pointer_move(&mut self, pointer: PointerInput) -> Option<DragPreview> {
        if self.drag.state().is_none() {
            let hovered = self
                .model
                .bar_at(&self.layout, pointer.x, pointer.y)
                .map(|bar| bar.period_index);
            self.set_hovered_period(hovered);
            return None;
        }

        let preview = self.drag.pointer_move(pointer)?;
        let state = *self.drag.state()?;
        self.preview_updates = preview.updates.clone();
        let rows_before = self.model.day_rows();
        self.recompute();
        if self.model.day_rows() != rows_before {
            self.synchronizer.record(ChangeKind::TimelineShifted);
        }
        self.tooltip = Some(TooltipOverlay {
            text: preview.tooltip.clone(),
            anchor_x: preview.current_x,
            anchor_y: self.tooltip_anchor_y(state.period_index, state.bar_type, state.edge),
        });
        self.synchronizer.record(ChangeKind::DragPreview);
        self.notify_observers(|observer| observer.on_drag_move(preview.current_x));
        Some(preview)
    }

    /// Handles pointer/touch up. Commits the drag when the releasing pointer
    /// is the one that started it.
    pub fn pointer_up(&mut self, pointer: PointerInput) -> Option<DragCommit> {
        let commit = self.drag.pointer_up(pointer)?;
        self.after_drag_committed(&commit);
        Some(commit)
    }

    /// Commits an active drag at its last previewed delta.
    pub fn end_drag(&mut self) -> Option<DragCommit> {
        let commit = self.drag.end()?;
        self.after_drag_committed(&commit);
        Some(commit)
    }

    /// Handles pointer/touch cancel. Only the dragging pointer can cancel.
    pub fn pointer_cancel(&mut self, pointer: PointerId) -> bool {
        if !self.drag.cancel(Some(pointer)) {
            trace!(?pointer, "ignoring cancel from non-dragging pointer");
            return false;
        }
        self.after_drag_aborted();
        true
    }

    /// Pointer left the chart element. Clears hover when idle; an active
    /// drag keeps tracking through the captured surface.
    pub fn pointer_leave(&mut self) {
        self.set_hovered_period(None);
    }

    fn after_drag_committed(&mut self, commit: &DragCommit) {
        self.clear_drag_preview();
        let updates = commit.updates.as_slice();
        self.notify_observers(|observer| observer.on_periods_changed(updates));
        self.notify_observers(|observer| observer.on_drag_end());
        self.notify_observers(|observer| {
            observer.on_pointer_capture_changed(CaptureScope::Element);
        });
        self.drag.publish_activity();
    }
}
