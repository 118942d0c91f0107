use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{ChartLayout, PhaseType};
use crate::render::{
    CornerRadii, DrawInstruction, GroupPrimitive, LinePrimitive, RectPrimitive, RenderFrame,
    RenderPatch, SeriesKind, SeriesLayer, TextHAlign, TextPrimitive,
};

use super::{ChartModel, RenderStyle};

const GRID_HOUR_STEP: usize = 6;
const DAY_LABEL_INSET_PX: f64 = 6.0;
const HANDLE_GRIP_WIDTH_PX: f64 = 4.0;
const TOOLTIP_PADDING_PX: f64 = 6.0;
const TOOLTIP_GAP_PX: f64 = 4.0;
// Rough advance of one glyph relative to font size.
const GLYPH_WIDTH_RATIO: f64 = 0.6;

/// Drag tooltip text anchored at a pixel position (pointer x, bar top y).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipOverlay {
    pub text: String,
    pub anchor_x: f64,
    pub anchor_y: f64,
}

/// Borrowed state needed to turn a derived model into draw instructions.
#[derive(Debug, Clone, Copy)]
pub struct SceneInput<'a> {
    pub layout: &'a ChartLayout,
    pub model: &'a ChartModel,
    pub style: &'a RenderStyle,
    pub highlighted_period: Option<usize>,
    pub tooltip: Option<&'a TooltipOverlay>,
}

/// Builds every series in paint order.
#[must_use]
pub fn build_scene(input: SceneInput<'_>) -> RenderFrame {
    let viewport = input.layout.viewport(input.model.day_count());
    SeriesKind::PAINT_ORDER
        .into_iter()
        .fold(RenderFrame::new(viewport), |frame, kind| {
            frame.with_series(build_series(kind, input))
        })
}

/// Builds a patch replacing `kinds`. With `suppress_hit_testing`, every
/// patched series is marked non-interactive.
#[must_use]
pub fn build_patch(
    input: SceneInput<'_>,
    kinds: &[SeriesKind],
    suppress_hit_testing: bool,
) -> RenderPatch {
    let series = kinds
        .iter()
        .map(|&kind| {
            let mut layer = build_series(kind, input);
            if suppress_hit_testing {
                layer.hit_testing = false;
            }
            layer
        })
        .collect();
    RenderPatch {
        viewport: input.layout.viewport(input.model.day_count()),
        series,
    }
}

#[must_use]
pub fn build_series(kind: SeriesKind, input: SceneInput<'_>) -> SeriesLayer {
    let mut layer = SeriesLayer::new(kind);
    if input.layout.grid_width() <= 0.0 {
        return layer;
    }
    match kind {
        SeriesKind::Grid => push_grid(&mut layer, input),
        SeriesKind::DayLabels => push_day_labels(&mut layer, input),
        SeriesKind::CompletedCycle => push_completed_cycle(&mut layer, input),
        SeriesKind::PeriodBars => push_period_bars(&mut layer, input),
        SeriesKind::BarLabels => push_bar_labels(&mut layer, input),
        SeriesKind::ResizeHandles => push_resize_handles(&mut layer, input),
        SeriesKind::NowMarker => push_now_marker(&mut layer, input),
        SeriesKind::DragTooltip => push_drag_tooltip(&mut layer, input),
    }
    layer
}

fn push_grid(layer: &mut SeriesLayer, input: SceneInput<'_>) {
    let layout = input.layout;
    let style = input.style;
    let day_count = input.model.day_count();
    if day_count == 0 {
        return;
    }

    let left = layout.day_label_width;
    let right = layout.hour_to_x(24.0);
    for row in 0..=day_count {
        let y = layout.row_top(row);
        layer.push(DrawInstruction::Line(LinePrimitive::new(
            left,
            y,
            right,
            y,
            style.grid_line_width,
            style.grid_line_color,
        )));
    }

    let top = layout.row_top(0);
    let bottom = layout.row_top(day_count);
    for hour in (0..=24).step_by(GRID_HOUR_STEP) {
        let x = layout.hour_to_x(hour as f64);
        layer.push(DrawInstruction::Line(LinePrimitive::new(
            x,
            top,
            x,
            bottom,
            style.grid_line_width,
            style.grid_line_color,
        )));
    }
}

fn push_day_labels(layer: &mut SeriesLayer, input: SceneInput<'_>) {
    let Some(timeline) = input.model.timeline else {
        return;
    };
    let layout = input.layout;
    let offset = timeline.offset();
    let x = (layout.day_label_width - DAY_LABEL_INSET_PX).max(0.0);
    for day_index in 0..timeline.day_count() {
        let label = timeline
            .day_start_at(day_index)
            .with_timezone(&offset)
            .format("%a %d")
            .to_string();
        layer.push(DrawInstruction::Text(TextPrimitive::new(
            label,
            x,
            layout.row_top(day_index) + layout.row_height / 2.0,
            input.style.day_label_font_size_px,
            input.style.day_label_color,
            TextHAlign::Right,
        )));
    }
}

fn bar_rect(
    layout: &ChartLayout,
    day_index: usize,
    start_hour: f64,
    end_hour: f64,
) -> (f64, f64, f64, f64) {
    let x = layout.hour_to_x(start_hour);
    let width = (end_hour - start_hour).max(0.0) * layout.pixels_per_hour();
    (x, layout.bar_top(day_index), width, layout.bar_height())
}

fn push_completed_cycle(layer: &mut SeriesLayer, input: SceneInput<'_>) {
    for bar in &input.model.completed_bars {
        let (x, y, width, height) =
            bar_rect(input.layout, bar.day_index, bar.start_hour, bar.end_hour);
        layer.push(DrawInstruction::Rect(RectPrimitive::new(
            x,
            y,
            width,
            height,
            input.style.completed_cycle_color,
        )));
    }
}

fn push_period_bars(layer: &mut SeriesLayer, input: SceneInput<'_>) {
    let style = input.style;
    let radius = style.bar_corner_radius_px;
    for (bar_index, bar) in input.model.bars.iter().enumerate() {
        let (x, y, width, height) =
            bar_rect(input.layout, bar.day_index, bar.start_hour, bar.end_hour);
        let mut color = style.palette(bar.phase).color_for(bar.state);
        if input
            .highlighted_period
            .is_some_and(|highlighted| highlighted != bar.period_index)
        {
            color = color.with_alpha(color.alpha * style.dimmed_alpha);
        }

        // Only the ends that open or close the phase are rounded.
        let position = input.model.segment_index.get(bar_index);
        let max_radius = radius.min(width / 2.0).min(height / 2.0);
        let corner_radii = CornerRadii {
            left: if position.is_first_segment { max_radius } else { 0.0 },
            right: if position.is_last_segment { max_radius } else { 0.0 },
        };
        layer.push(DrawInstruction::Rect(
            RectPrimitive::new(x, y, width, height, color).with_corner_radii(corner_radii),
        ));
    }
}

fn push_bar_labels(layer: &mut SeriesLayer, input: SceneInput<'_>) {
    let layout = input.layout;
    let style = input.style;

    // One label per phase, on its widest segment.
    let mut widest: IndexMap<(usize, PhaseType), usize> = IndexMap::new();
    for (bar_index, bar) in input.model.bars.iter().enumerate() {
        widest
            .entry((bar.period_index, bar.phase))
            .and_modify(|current| {
                if bar.span_hours() > input.model.bars[*current].span_hours() {
                    *current = bar_index;
                }
            })
            .or_insert(bar_index);
    }

    for bar_index in widest.into_values() {
        let bar = &input.model.bars[bar_index];
        let (x, y, width, height) = bar_rect(layout, bar.day_index, bar.start_hour, bar.end_hour);
        if width < style.min_labeled_bar_width_px || bar.duration_label.is_empty() {
            continue;
        }
        layer.push(DrawInstruction::Text(TextPrimitive::new(
            bar.duration_label.clone(),
            x + width / 2.0,
            y + height / 2.0,
            style.bar_label_font_size_px,
            style.bar_label_color,
            TextHAlign::Center,
        )));
    }
}

fn push_resize_handles(layer: &mut SeriesLayer, input: SceneInput<'_>) {
    for zone in &input.model.zones {
        let grip_height = zone.height / 2.0;
        layer.push(DrawInstruction::Rect(
            RectPrimitive::new(
                zone.edge_x() - HANDLE_GRIP_WIDTH_PX / 2.0,
                zone.y + (zone.height - grip_height) / 2.0,
                HANDLE_GRIP_WIDTH_PX,
                grip_height,
                input.style.handle_color,
            )
            .with_corner_radii(CornerRadii::uniform(HANDLE_GRIP_WIDTH_PX / 2.0)),
        ));
    }
}

fn push_now_marker(layer: &mut SeriesLayer, input: SceneInput<'_>) {
    let Some(position) = input.model.current_time else {
        return;
    };
    let layout = input.layout;
    let x = layout.hour_to_x(position.hour_position);
    let top = layout.row_top(position.day_index);
    layer.push(DrawInstruction::Line(LinePrimitive::new(
        x,
        top,
        x,
        top + layout.row_height,
        input.style.now_marker_width,
        input.style.now_marker_color,
    )));
}

fn push_drag_tooltip(layer: &mut SeriesLayer, input: SceneInput<'_>) {
    let Some(tooltip) = input.tooltip else {
        return;
    };
    if tooltip.text.is_empty() {
        return;
    }
    let style = input.style;
    let font_size = style.tooltip_font_size_px;
    let width = tooltip.text.chars().count() as f64 * font_size * GLYPH_WIDTH_RATIO
        + 2.0 * TOOLTIP_PADDING_PX;
    let height = font_size + 2.0 * TOOLTIP_PADDING_PX;

    let max_x = (input.layout.width - width).max(0.0);
    let x = (tooltip.anchor_x - width / 2.0).clamp(0.0, max_x);
    let y = (tooltip.anchor_y - height - TOOLTIP_GAP_PX).max(0.0);

    let group = GroupPrimitive::new(x, y)
        .with_child(DrawInstruction::Rect(
            RectPrimitive::new(0.0, 0.0, width, height, style.tooltip_background_color)
                .with_corner_radii(CornerRadii::uniform(4.0)),
        ))
        .with_child(DrawInstruction::Text(TextPrimitive::new(
            tooltip.text.clone(),
            width / 2.0,
            height / 2.0,
            font_size,
            style.tooltip_text_color,
            TextHAlign::Center,
        )));
    layer.push(DrawInstruction::Group(group));
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{SceneInput, TooltipOverlay, build_patch, build_scene};
    use crate::api::{ChartConfig, ChartInputs, RenderStyle, chart_layout, derive_chart_model};
    use crate::core::{ChartMode, Period};
    use crate::render::{DrawInstruction, SeriesKind};

    fn model_and_layout(mode: ChartMode) -> (crate::api::ChartModel, crate::core::ChartLayout) {
        let config = ChartConfig::default();
        let layout = chart_layout(&config, 48.0 + 480.0);
        let periods = vec![Period::new(
            "p0",
            Utc.with_ymd_and_hms(2024, 1, 1, 18, 0, 0).unwrap(),
            20.0,
            4.0,
        )];
        let inputs = ChartInputs::new(
            Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap(),
            528.0,
            mode,
        );
        (derive_chart_model(&periods, &inputs, &config, &layout), layout)
    }

    #[test]
    fn scene_contains_all_series_in_paint_order() {
        let (model, layout) = model_and_layout(ChartMode::Edit);
        let style = RenderStyle::default();
        let frame = build_scene(SceneInput {
            layout: &layout,
            model: &model,
            style: &style,
            highlighted_period: None,
            tooltip: None,
        });

        let kinds: Vec<_> = frame.series.iter().map(|layer| layer.kind).collect();
        assert_eq!(kinds, SeriesKind::PAINT_ORDER.to_vec());
        assert!(frame.validate().is_ok());
        assert_eq!(frame.series(SeriesKind::PeriodBars).unwrap().instructions.len(), 3);
        assert_eq!(frame.series(SeriesKind::ResizeHandles).unwrap().instructions.len(), 4);
        assert_eq!(frame.series(SeriesKind::NowMarker).unwrap().instructions.len(), 1);
        assert!(frame.series(SeriesKind::DragTooltip).unwrap().instructions.is_empty());
    }

    #[test]
    fn split_bar_rounds_only_outer_ends() {
        let (model, layout) = model_and_layout(ChartMode::View);
        let style = RenderStyle::default();
        let frame = build_scene(SceneInput {
            layout: &layout,
            model: &model,
            style: &style,
            highlighted_period: None,
            tooltip: None,
        });

        let bars = &frame.series(SeriesKind::PeriodBars).unwrap().instructions;
        let DrawInstruction::Rect(evening) = &bars[0] else {
            panic!("expected rect");
        };
        let DrawInstruction::Rect(morning) = &bars[1] else {
            panic!("expected rect");
        };
        assert!(evening.corner_radii.left > 0.0);
        assert_eq!(evening.corner_radii.right, 0.0);
        assert_eq!(morning.corner_radii.left, 0.0);
        assert!(morning.corner_radii.right > 0.0);
    }

    #[test]
    fn fasting_label_sits_on_widest_segment() {
        let (model, layout) = model_and_layout(ChartMode::View);
        let style = RenderStyle::default();
        let frame = build_scene(SceneInput {
            layout: &layout,
            model: &model,
            style: &style,
            highlighted_period: None,
            tooltip: None,
        });

        let labels = &frame.series(SeriesKind::BarLabels).unwrap().instructions;
        let texts: Vec<_> = labels
            .iter()
            .filter_map(|instruction| match instruction {
                DrawInstruction::Text(text) => Some((text.text.as_str(), text.y)),
                _ => None,
            })
            .collect();
        // Fasting 20h is labeled on day 1 ([0, 14) beats [18, 24)); eating 4h is 80px wide.
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[0].0, "20h");
        assert_eq!(texts[0].1, 40.0 + 20.0);
        assert_eq!(texts[1].0, "4h");
    }

    #[test]
    fn patch_suppresses_hit_testing_and_renders_tooltip() {
        let (model, layout) = model_and_layout(ChartMode::Edit);
        let style = RenderStyle::default();
        let tooltip = TooltipOverlay {
            text: "Fasting 18h, Mon 18:00 - Tue 12:00".to_owned(),
            anchor_x: 300.0,
            anchor_y: 46.0,
        };
        let patch = build_patch(
            SceneInput {
                layout: &layout,
                model: &model,
                style: &style,
                highlighted_period: Some(0),
                tooltip: Some(&tooltip),
            },
            &[SeriesKind::PeriodBars, SeriesKind::DragTooltip],
            true,
        );

        assert!(patch.validate().is_ok());
        assert!(patch.series.iter().all(|layer| !layer.hit_testing));
        assert_eq!(patch.series[1].primitive_count(), 2);
    }
}
