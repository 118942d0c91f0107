use crate::core::{ChartDimensions, PeriodUpdate, PhaseType};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{CaptureScope, ResizeEdge};
use crate::render::Renderer;

use super::ScheduleChart;

/// Host hook interface for chart outputs.
///
/// Every method has a no-op default so observers implement only what they
/// need. Observers never mutate chart internals; period changes leave the
/// chart only through `on_periods_changed`.
pub trait ChartObserver {
    fn id(&self) -> &str;

    /// Ordered update batch committed at the end of a drag.
    ///
    /// The chart drops its drag preview before this fires and goes back to
    /// drawing its own period list. The committed geometry shows up only
    /// once the host applies the batch (see
    /// [`apply_period_updates`](crate::core::apply_period_updates)) and
    /// calls [`ScheduleChart::set_periods`]; a host that renders before
    /// that shows the pre-drag bars for one frame.
    fn on_periods_changed(&mut self, _updates: &[PeriodUpdate]) {}

    fn on_drag_start(
        &mut self,
        _edge: ResizeEdge,
        _bar_type: PhaseType,
        _period_index: usize,
        _start_x: f64,
    ) {
    }

    fn on_drag_move(&mut self, _current_x: f64) {}

    fn on_drag_end(&mut self) {}

    fn on_chart_dimensions_change(&mut self, _dimensions: ChartDimensions) {}

    /// Capture is `Surface` for the whole drag session and back to
    /// `Element` on every exit path.
    fn on_pointer_capture_changed(&mut self, _scope: CaptureScope) {}
}

impl<R: Renderer> ScheduleChart<R> {
    /// Registers an observer with unique identifier.
    pub fn register_observer(&mut self, observer: Box<dyn ChartObserver>) -> ChartResult<()> {
        let observer_id = observer.id().to_owned();
        if observer_id.is_empty() {
            return Err(ChartError::InvalidData(
                "observer id must not be empty".to_owned(),
            ));
        }
        if self.has_observer(&observer_id) {
            return Err(ChartError::InvalidData(format!(
                "observer with id `{observer_id}` is already registered"
            )));
        }
        self.observers.push(observer);
        Ok(())
    }

    /// Unregisters an observer by id. Returns `true` when removed.
    pub fn unregister_observer(&mut self, observer_id: &str) -> bool {
        if let Some(position) = self
            .observers
            .iter()
            .position(|entry| entry.id() == observer_id)
        {
            self.observers.remove(position);
            return true;
        }
        false
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn has_observer(&self, observer_id: &str) -> bool {
        self.observers
            .iter()
            .any(|observer| observer.id() == observer_id)
    }

    pub(super) fn notify_observers(&mut self, mut notify: impl FnMut(&mut dyn ChartObserver)) {
        for observer in &mut self.observers {
            notify(observer.as_mut());
        }
    }
}
