use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::core::{
    ChartDimensions, ChartLayout, ChartMode, Period, PeriodUpdate, PhaseType,
    apply_period_updates,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{
    CaptureScope, DragActivity, DragController, DragPhase, DragSettings, ResizeEdge,
};
use crate::render::Renderer;

use super::render_synchronizer::{ChangeKind, RenderAction, RenderSynchronizer, SyncContext};
use super::scene_builder::{SceneInput, TooltipOverlay, build_patch, build_scene};
use super::validation::{validate_chart_config, validate_render_style};
use super::{
    ChartConfig, ChartInputs, ChartModel, ChartObserver, RenderStyle, chart_layout,
    derive_chart_model,
};

/// Main orchestration facade consumed by host applications.
///
/// `ScheduleChart` owns the host inputs, recomputes every derivation when an
/// input changes, runs the drag state machine and decides how each pending
/// change reaches the renderer. Period edits never mutate the host list;
/// they leave through `ChartObserver::on_periods_changed`.
pub struct ScheduleChart<R: Renderer> {
    pub(super) renderer: R,
    pub(super) config: ChartConfig,
    pub(super) style: RenderStyle,
    pub(super) inputs: ChartInputs,
    pub(super) layout: ChartLayout,
    pub(super) model: ChartModel,
    pub(super) preview_updates: Vec<PeriodUpdate>,
    pub(super) tooltip: Option<TooltipOverlay>,
    pub(super) drag: DragController,
    pub(super) synchronizer: RenderSynchronizer,
    pub(super) observers: Vec<Box<dyn ChartObserver>>,
    pub(super) last_dimensions: Option<ChartDimensions>,
}

impl<R: Renderer> ScheduleChart<R> {
    pub fn new(
        renderer: R,
        config: ChartConfig,
        now: DateTime<Utc>,
        viewport_width: f64,
    ) -> ChartResult<Self> {
        let config = validate_chart_config(config)?;
        let layout = chart_layout(&config, viewport_width);
        validate_viewport_width(&layout)?;

        let inputs = ChartInputs::new(now, viewport_width, config.mode);
        let model = derive_chart_model(&inputs.periods, &inputs, &config, &layout);
        debug!(viewport_width, mode = ?config.mode, "schedule chart created");

        Ok(Self {
            renderer,
            config,
            style: RenderStyle::default(),
            inputs,
            layout,
            model,
            preview_updates: Vec::new(),
            tooltip: None,
            drag: DragController::new(),
            synchronizer: RenderSynchronizer::new(),
            observers: Vec::new(),
            last_dimensions: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> ChartConfig {
        self.config
    }

    /// Replaces the configuration. An active drag is cancelled first since
    /// its snapshot was taken under the old geometry and limits.
    pub fn set_config(&mut self, config: ChartConfig) -> ChartResult<()> {
        let config = validate_chart_config(config)?;
        validate_viewport_width(&chart_layout(&config, self.inputs.viewport_width))?;
        if self.drag.is_active() {
            self.cancel_drag();
        }
        self.config = config;
        self.inputs.mode = config.mode;
        self.synchronizer.record(ChangeKind::Config);
        self.recompute();
        self.emit_dimensions_if_changed();
        Ok(())
    }

    #[must_use]
    pub fn render_style(&self) -> RenderStyle {
        self.style
    }

    pub fn set_render_style(&mut self, style: RenderStyle) -> ChartResult<()> {
        self.style = validate_render_style(style)?;
        self.synchronizer.record(ChangeKind::Config);
        Ok(())
    }

    #[must_use]
    pub fn inputs(&self) -> &ChartInputs {
        &self.inputs
    }

    /// Host periods as last handed in, without drag preview.
    #[must_use]
    pub fn periods(&self) -> &[Period] {
        &self.inputs.periods
    }

    /// Periods as currently displayed: host periods with the drag preview
    /// applied.
    #[must_use]
    pub fn display_periods(&self) -> Vec<Period> {
        apply_period_updates(&self.inputs.periods, &self.preview_updates)
    }

    #[must_use]
    pub fn model(&self) -> &ChartModel {
        &self.model
    }

    #[must_use]
    pub fn layout(&self) -> ChartLayout {
        self.layout
    }

    #[must_use]
    pub fn dimensions(&self) -> ChartDimensions {
        self.layout.dimensions()
    }

    #[must_use]
    pub fn mode(&self) -> ChartMode {
        self.inputs.mode
    }

    #[must_use]
    pub fn hovered_period(&self) -> Option<usize> {
        self.inputs.hovered_period
    }

    #[must_use]
    pub fn drag_phase(&self) -> DragPhase {
        self.drag.phase()
    }

    #[must_use]
    pub fn drag_activity(&self) -> DragActivity {
        self.drag.activity()
    }

    /// Consults the immediate drag flag before the published mirror.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    #[must_use]
    pub fn capture_scope(&self) -> CaptureScope {
        self.drag.capture_scope()
    }

    #[must_use]
    pub fn tooltip_text(&self) -> Option<&str> {
        self.tooltip.as_ref().map(|tooltip| tooltip.text.as_str())
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Flushes pending changes to the renderer and returns the action taken.
    ///
    /// On renderer failure the next call falls back to a full rebuild.
    pub fn render(&mut self) -> ChartResult<RenderAction> {
        let action = self.synchronizer.take_action(self.sync_context());
        let result = match &action {
            RenderAction::None => Ok(()),
            RenderAction::FullRebuild => {
                let frame = build_scene(self.scene_input());
                self.renderer.render(&frame)
            }
            RenderAction::PatchSeries {
                series,
                suppress_hit_testing,
            } => {
                let patch = build_patch(self.scene_input(), series, *suppress_hit_testing);
                self.renderer.patch(&patch)
            }
        };
        if let Err(err) = result {
            warn!(error = %err, ?action, "render failed; forcing full rebuild on next render");
            self.synchronizer.reset();
            return Err(err);
        }
        debug!(?action, "render flushed");
        Ok(action)
    }

    /// Cancels any drag session and releases pointer capture. Safe to call
    /// repeatedly; also runs on drop.
    pub fn teardown(&mut self) -> bool {
        if !self.drag.teardown() {
            return false;
        }
        self.after_drag_aborted();
        true
    }

    pub(super) fn sync_context(&self) -> SyncContext {
        SyncContext {
            drag_active: self.drag.is_active(),
            hovering: self.inputs.hovered_period.is_some(),
        }
    }

    pub(super) fn scene_input(&self) -> SceneInput<'_> {
        SceneInput {
            layout: &self.layout,
            model: &self.model,
            style: &self.style,
            highlighted_period: self.inputs.hovered_period,
            tooltip: self.tooltip.as_ref(),
        }
    }

    pub(super) fn drag_settings(&self) -> DragSettings {
        DragSettings {
            pixels_per_hour: self.layout.pixels_per_hour(),
            limits: self.config.drag_limits,
            coupling: self.config.period_coupling,
            lower_bound: self.inputs.lower_bound,
            snap_step_hours: self.config.snap_step_hours,
            utc_offset_seconds: self.config.utc_offset_seconds(),
        }
    }

    /// Re-derives the model from inputs plus any drag preview.
    pub(super) fn recompute(&mut self) {
        self.layout = chart_layout(&self.config, self.inputs.viewport_width);
        let periods = self.display_periods();
        self.model = derive_chart_model(&periods, &self.inputs, &self.config, &self.layout);
    }

    pub(super) fn emit_dimensions_if_changed(&mut self) {
        let dimensions = self.layout.dimensions();
        if self.last_dimensions == Some(dimensions) {
            return;
        }
        self.last_dimensions = Some(dimensions);
        self.notify_observers(|observer| observer.on_chart_dimensions_change(dimensions));
    }

    /// Pixel y above which the drag tooltip is placed: top of the segment
    /// carrying the dragged edge.
    pub(super) fn tooltip_anchor_y(
        &self,
        period_index: usize,
        bar_type: PhaseType,
        edge: ResizeEdge,
    ) -> f64 {
        let mut segments = self
            .model
            .bars
            .iter()
            .filter(|bar| bar.period_index == period_index && bar.phase == bar_type);
        let bar = match edge {
            ResizeEdge::Left => segments.next(),
            ResizeEdge::Right => segments.last(),
        };
        bar.map_or(self.layout.top_offset, |bar| self.layout.bar_top(bar.day_index))
    }

    pub(super) fn cancel_drag(&mut self) {
        if self.drag.cancel(None) {
            self.after_drag_aborted();
        }
    }

    /// Shared exit path of cancel and teardown: clears preview state and
    /// notifies observers without committing.
    pub(super) fn after_drag_aborted(&mut self) {
        self.clear_drag_preview();
        self.notify_observers(|observer| observer.on_drag_end());
        self.notify_observers(|observer| {
            observer.on_pointer_capture_changed(CaptureScope::Element);
        });
        self.drag.publish_activity();
    }

    pub(super) fn clear_drag_preview(&mut self) {
        self.preview_updates.clear();
        self.tooltip = None;
        self.synchronizer.record(ChangeKind::DragEnded);
        self.recompute();
    }
}

impl<R: Renderer> Drop for ScheduleChart<R> {
    fn drop(&mut self) {
        self.teardown();
    }
}

pub(super) fn validate_viewport_width(layout: &ChartLayout) -> ChartResult<()> {
    if !layout.width.is_finite() || layout.width <= 0.0 {
        return Err(ChartError::InvalidViewport {
            width: layout.width,
            height: layout.content_height(1),
        });
    }
    Ok(())
}
