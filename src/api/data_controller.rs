use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::core::{BarState, ChartMode, CompletedCycle, Period};
use crate::error::ChartResult;
use crate::render::Renderer;

use super::ScheduleChart;
use super::chart::validate_viewport_width;
use super::chart_layout;
use super::render_synchronizer::ChangeKind;

impl<R: Renderer> ScheduleChart<R> {
    /// Replaces the host period list.
    ///
    /// During a drag the preview keeps applying to the new list; the drag
    /// snapshot itself stays fixed.
    pub fn set_periods(&mut self, periods: Vec<Period>) {
        debug!(period_count = periods.len(), "set periods");
        self.inputs.periods = periods;
        if let Some(hovered) = self.inputs.hovered_period
            && hovered >= self.inputs.periods.len()
        {
            self.inputs.hovered_period = None;
        }
        self.synchronizer.record(ChangeKind::Data);
        self.recompute();
    }

    /// Moves the current time.
    ///
    /// Only the marker is affected unless a bar changes state, in which case
    /// the change counts as a data change.
    pub fn set_now(&mut self, now: DateTime<Utc>) {
        if self.inputs.now == now {
            return;
        }
        let states_before: Vec<BarState> = self.model.bars.iter().map(|bar| bar.state).collect();
        self.inputs.now = now;
        self.recompute();

        let states_changed = self
            .model
            .bars
            .iter()
            .map(|bar| bar.state)
            .ne(states_before.into_iter());
        if states_changed {
            trace!("bar states changed with current time");
            self.synchronizer.record(ChangeKind::Data);
        }
        self.synchronizer.record(ChangeKind::Now);
    }

    pub fn set_viewport_width(&mut self, width: f64) -> ChartResult<()> {
        validate_viewport_width(&chart_layout(&self.config, width))?;
        if self.inputs.viewport_width == width {
            return Ok(());
        }
        debug!(width, "set viewport width");
        self.inputs.viewport_width = width;
        self.synchronizer.record(ChangeKind::Viewport);
        self.recompute();
        self.emit_dimensions_if_changed();
        Ok(())
    }

    /// Sets the earliest instant a period start may be dragged to. Read at
    /// drag start only.
    pub fn set_lower_bound(&mut self, lower_bound: Option<DateTime<Utc>>) {
        self.inputs.lower_bound = lower_bound;
    }

    pub fn set_completed_cycle(&mut self, cycle: Option<CompletedCycle>) {
        self.inputs.completed_cycle = cycle;
        self.synchronizer.record(ChangeKind::Data);
        self.recompute();
    }

    /// Switches between view and edit. Leaving edit mode cancels a drag.
    pub fn set_mode(&mut self, mode: ChartMode) {
        if self.inputs.mode == mode {
            return;
        }
        if mode == ChartMode::View && self.drag.is_active() {
            self.cancel_drag();
        }
        debug!(?mode, "set chart mode");
        self.inputs.mode = mode;
        self.config.mode = mode;
        self.synchronizer.record(ChangeKind::Mode);
        self.recompute();
    }

    /// Highlights a period. Ignored while a drag is active so the dragged
    /// period stays highlighted.
    pub fn set_hovered_period(&mut self, period_index: Option<usize>) {
        if self.drag.is_active() {
            trace!(?period_index, "ignoring hover change during drag");
            return;
        }
        let period_index = period_index.filter(|&index| index < self.inputs.periods.len());
        if self.inputs.hovered_period == period_index {
            return;
        }
        self.inputs.hovered_period = period_index;
        self.synchronizer.record(ChangeKind::Hover);
    }
}
