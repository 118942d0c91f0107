use chrono::{TimeZone, Utc};
use period_chart::ChartError;
use period_chart::api::{ChartConfig, RenderAction, ScheduleChart};
use period_chart::core::{ChartMode, Period, PhaseType};
use period_chart::error::ChartResult;
use period_chart::interaction::{PointerInput, ResizeEdge};
use period_chart::render::{NullRenderer, RenderFrame, RenderPatch, Renderer, SeriesKind};

const VIEWPORT_WIDTH: f64 = 48.0 + 480.0;

fn at(day: u32, hour: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0)
        .single()
        .expect("valid instant")
}

fn edit_chart() -> ScheduleChart<NullRenderer> {
    let mut chart = ScheduleChart::new(
        NullRenderer::default(),
        ChartConfig::new(ChartMode::Edit),
        at(1, 0),
        VIEWPORT_WIDTH,
    )
    .expect("chart init");
    chart.set_periods(vec![Period::new("p0", at(1, 20), 16.0, 8.0)]);
    chart
}

fn eating_right_edge(chart: &ScheduleChart<NullRenderer>) -> PointerInput {
    let zone = chart
        .model()
        .zones
        .iter()
        .find(|zone| zone.bar_type == PhaseType::Eating && zone.edge == ResizeEdge::Right)
        .expect("eating right zone");
    PointerInput::mouse(zone.edge_x(), zone.y + zone.height / 2.0)
}

#[test]
fn first_render_is_full_and_idle_render_is_noop() {
    let mut chart = edit_chart();

    assert_eq!(chart.render().expect("render"), RenderAction::FullRebuild);
    assert_eq!(chart.render().expect("render"), RenderAction::None);
    assert_eq!(chart.renderer().full_render_count, 1);
    assert_eq!(chart.renderer().patch_count, 0);
}

#[test]
fn now_tick_without_hover_patches_only_now_marker() {
    let mut chart = edit_chart();
    chart.render().expect("initial render");

    // Still before the period starts, so no bar changes state.
    chart.set_now(at(1, 1));
    let action = chart.render().expect("render");

    assert_eq!(
        action,
        RenderAction::PatchSeries {
            series: vec![SeriesKind::NowMarker],
            suppress_hit_testing: false,
        }
    );
    assert_eq!(chart.renderer().last_patched_series, vec![SeriesKind::NowMarker]);
}

#[test]
fn now_tick_while_hovering_rebuilds() {
    let mut chart = edit_chart();
    chart.set_hovered_period(Some(0));
    chart.render().expect("initial render");

    chart.set_now(at(1, 1));
    assert_eq!(chart.render().expect("render"), RenderAction::FullRebuild);
    assert_eq!(chart.renderer().full_render_count, 2);
}

#[test]
fn now_tick_that_changes_bar_state_rebuilds() {
    let mut chart = edit_chart();
    chart.render().expect("initial render");

    chart.set_now(at(1, 21));
    assert_eq!(chart.render().expect("render"), RenderAction::FullRebuild);
}

#[test]
fn hover_change_rebuilds() {
    let mut chart = edit_chart();
    chart.render().expect("initial render");

    chart.set_hovered_period(Some(0));
    assert_eq!(chart.render().expect("render"), RenderAction::FullRebuild);

    // Same value again records nothing.
    chart.set_hovered_period(Some(0));
    assert_eq!(chart.render().expect("render"), RenderAction::None);
}

#[test]
fn drag_patches_with_hit_testing_suppressed_and_rebuilds_on_end() {
    let mut chart = edit_chart();
    chart.render().expect("initial render");

    let origin = eating_right_edge(&chart);
    chart.pointer_down(origin).expect("drag start");
    chart
        .pointer_move(PointerInput::mouse(origin.x + 40.0, origin.y))
        .expect("preview");

    match chart.render().expect("render") {
        RenderAction::PatchSeries {
            series,
            suppress_hit_testing,
        } => {
            assert!(suppress_hit_testing);
            assert!(series.contains(&SeriesKind::PeriodBars));
            assert!(series.contains(&SeriesKind::DragTooltip));
            assert!(!series.contains(&SeriesKind::NowMarker));
        }
        other => panic!("expected patch during drag, got {other:?}"),
    }
    let frame = chart.renderer().last_frame.as_ref().expect("frame");
    let bars = frame.series(SeriesKind::PeriodBars).expect("bars series");
    assert!(!bars.hit_testing);
    let tooltip = frame.series(SeriesKind::DragTooltip).expect("tooltip series");
    assert!(!tooltip.instructions.is_empty());

    chart
        .pointer_up(PointerInput::mouse(origin.x + 40.0, origin.y))
        .expect("commit");
    assert_eq!(chart.render().expect("render"), RenderAction::FullRebuild);

    let frame = chart.renderer().last_frame.as_ref().expect("frame");
    assert!(frame.series(SeriesKind::PeriodBars).expect("bars").hit_testing);
    assert!(
        frame
            .series(SeriesKind::DragTooltip)
            .is_none_or(|layer| layer.instructions.is_empty())
    );
}

#[test]
fn now_tick_during_drag_adds_now_marker_to_patch() {
    let mut chart = edit_chart();
    chart.render().expect("initial render");

    chart.pointer_down(eating_right_edge(&chart)).expect("drag start");
    chart.set_now(at(1, 1));

    match chart.render().expect("render") {
        RenderAction::PatchSeries { series, .. } => {
            assert!(series.contains(&SeriesKind::NowMarker));
        }
        other => panic!("expected patch during drag, got {other:?}"),
    }
}

#[test]
fn drag_that_adds_a_day_row_patches_row_series() {
    let mut chart = ScheduleChart::new(
        NullRenderer::default(),
        ChartConfig::new(ChartMode::Edit),
        at(1, 0),
        VIEWPORT_WIDTH,
    )
    .expect("chart init");
    chart.set_periods(vec![Period::new("p0", at(1, 2), 16.0, 8.0)]);
    chart.render().expect("initial render");
    assert_eq!(chart.model().day_count(), 2);

    let zone = chart
        .model()
        .zones
        .iter()
        .find(|zone| zone.bar_type == PhaseType::Fasting && zone.edge == ResizeEdge::Left)
        .expect("fasting left zone")
        .clone();
    let origin = PointerInput::mouse(zone.edge_x(), zone.y + zone.height / 2.0);
    chart.pointer_down(origin).expect("drag start");
    // Four hours earlier pushes the start back into Dec 31.
    let moved = PointerInput::mouse(origin.x - 4.0 * chart.layout().pixels_per_hour(), origin.y);
    chart.pointer_move(moved).expect("preview");
    assert_eq!(chart.model().day_count(), 3);

    match chart.render().expect("render") {
        RenderAction::PatchSeries { series, .. } => {
            for kind in [
                SeriesKind::PeriodBars,
                SeriesKind::Grid,
                SeriesKind::DayLabels,
                SeriesKind::CompletedCycle,
                SeriesKind::NowMarker,
            ] {
                assert!(series.contains(&kind), "missing {kind:?}");
            }
        }
        other => panic!("expected patch during drag, got {other:?}"),
    }
    let frame = chart.renderer().last_frame.as_ref().expect("frame");
    let labels = frame.series(SeriesKind::DayLabels).expect("day labels");
    assert_eq!(labels.instructions.len(), 3);
    assert_eq!(frame.viewport, chart.layout().viewport(3));

    // Moving within the same rows goes back to the narrow drag patch.
    chart
        .pointer_move(PointerInput::mouse(moved.x - 20.0, moved.y))
        .expect("preview");
    match chart.render().expect("render") {
        RenderAction::PatchSeries { series, .. } => {
            assert!(!series.contains(&SeriesKind::DayLabels));
        }
        other => panic!("expected patch during drag, got {other:?}"),
    }
}

#[derive(Default)]
struct FlakyRenderer {
    fail_next: bool,
    full_render_count: usize,
}

impl Renderer for FlakyRenderer {
    fn render(&mut self, _frame: &RenderFrame) -> ChartResult<()> {
        if self.fail_next {
            self.fail_next = false;
            return Err(ChartError::InvalidData("backend lost".to_owned()));
        }
        self.full_render_count += 1;
        Ok(())
    }

    fn patch(&mut self, _patch: &RenderPatch) -> ChartResult<()> {
        if self.fail_next {
            self.fail_next = false;
            return Err(ChartError::InvalidData("backend lost".to_owned()));
        }
        Ok(())
    }
}

#[test]
fn renderer_failure_forces_full_rebuild_next_time() {
    let mut chart = ScheduleChart::new(
        FlakyRenderer::default(),
        ChartConfig::new(ChartMode::View),
        at(1, 0),
        VIEWPORT_WIDTH,
    )
    .expect("chart init");
    chart.set_periods(vec![Period::new("p0", at(1, 20), 16.0, 8.0)]);
    chart.render().expect("initial render");

    chart.set_now(at(1, 1));
    chart.renderer_mut().fail_next = true;
    assert!(chart.render().is_err());

    chart.set_now(at(1, 2));
    assert_eq!(chart.render().expect("render"), RenderAction::FullRebuild);
    assert_eq!(chart.renderer().full_render_count, 2);
}
