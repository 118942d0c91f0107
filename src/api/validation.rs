use crate::error::{ChartError, ChartResult};
use crate::interaction::DragLimits;

use super::{ChartConfig, RenderStyle};

const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

fn ensure_finite_non_negative(name: &str, value: f64) -> ChartResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ChartError::InvalidConfig(format!(
            "{name} must be finite and >= 0"
        )));
    }
    Ok(())
}

fn ensure_finite_positive(name: &str, value: f64) -> ChartResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ChartError::InvalidConfig(format!(
            "{name} must be finite and > 0"
        )));
    }
    Ok(())
}

pub(super) fn validate_drag_limits(limits: DragLimits) -> ChartResult<DragLimits> {
    ensure_finite_positive("min_fasting_hours", limits.min_fasting_hours)?;
    ensure_finite_positive("max_fasting_hours", limits.max_fasting_hours)?;
    ensure_finite_non_negative("min_eating_hours", limits.min_eating_hours)?;
    ensure_finite_non_negative("max_eating_hours", limits.max_eating_hours)?;
    if limits.min_fasting_hours > limits.max_fasting_hours {
        return Err(ChartError::InvalidConfig(
            "fasting limits are inverted: min > max".to_owned(),
        ));
    }
    if limits.min_eating_hours > limits.max_eating_hours {
        return Err(ChartError::InvalidConfig(
            "eating limits are inverted: min > max".to_owned(),
        ));
    }
    Ok(limits)
}

pub(super) fn validate_chart_config(config: ChartConfig) -> ChartResult<ChartConfig> {
    ensure_finite_positive("row_height_px", config.row_height_px)?;
    ensure_finite_non_negative("row_padding_px", config.row_padding_px)?;
    if config.row_padding_px * 2.0 >= config.row_height_px {
        return Err(ChartError::InvalidConfig(
            "row_padding_px must leave room for bars inside a row".to_owned(),
        ));
    }
    ensure_finite_non_negative("day_label_width_px", config.day_label_width_px)?;
    ensure_finite_non_negative("top_offset_px", config.top_offset_px)?;
    ensure_finite_positive("handle_width_px", config.handle_width_px)?;
    ensure_finite_non_negative(
        "completed_cycle_lookback_hours",
        config.completed_cycle_lookback_hours,
    )?;
    if let Some(step) = config.snap_step_hours {
        ensure_finite_positive("snap_step_hours", step)?;
    }
    if !(-MAX_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&config.utc_offset_minutes) {
        return Err(ChartError::InvalidConfig(
            "utc offset must be between -840 and 840 minutes".to_owned(),
        ));
    }
    validate_drag_limits(config.drag_limits)?;
    Ok(config)
}

pub(super) fn validate_render_style(style: RenderStyle) -> ChartResult<RenderStyle> {
    for palette in [style.fasting, style.eating] {
        palette.scheduled.validate()?;
        palette.in_progress.validate()?;
        palette.completed.validate()?;
    }
    style.completed_cycle_color.validate()?;
    style.grid_line_color.validate()?;
    style.day_label_color.validate()?;
    style.bar_label_color.validate()?;
    style.handle_color.validate()?;
    style.now_marker_color.validate()?;
    style.tooltip_background_color.validate()?;
    style.tooltip_text_color.validate()?;

    if !style.dimmed_alpha.is_finite() || !(0.0..=1.0).contains(&style.dimmed_alpha) {
        return Err(ChartError::InvalidConfig(
            "dimmed_alpha must be finite and in [0, 1]".to_owned(),
        ));
    }
    ensure_finite_positive("grid_line_width", style.grid_line_width)?;
    ensure_finite_positive("now_marker_width", style.now_marker_width)?;
    ensure_finite_non_negative("bar_corner_radius_px", style.bar_corner_radius_px)?;
    ensure_finite_positive("day_label_font_size_px", style.day_label_font_size_px)?;
    ensure_finite_positive("bar_label_font_size_px", style.bar_label_font_size_px)?;
    ensure_finite_positive("tooltip_font_size_px", style.tooltip_font_size_px)?;
    ensure_finite_non_negative("min_labeled_bar_width_px", style.min_labeled_bar_width_px)?;
    Ok(style)
}

#[cfg(test)]
mod tests {
    use super::{validate_chart_config, validate_drag_limits, validate_render_style};
    use crate::api::{ChartConfig, RenderStyle};
    use crate::interaction::DragLimits;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_chart_config(ChartConfig::default()).is_ok());
        assert!(validate_render_style(RenderStyle::default()).is_ok());
    }

    #[test]
    fn inverted_limits_are_rejected() {
        let limits = DragLimits {
            min_eating_hours: 10.0,
            max_eating_hours: 4.0,
            ..DragLimits::default()
        };
        assert!(validate_drag_limits(limits).is_err());
    }

    #[test]
    fn non_finite_geometry_is_rejected() {
        let config = ChartConfig::default().with_handle_width_px(f64::NAN);
        assert!(validate_chart_config(config).is_err());

        let config = ChartConfig::default().with_row_geometry(20.0, 10.0);
        assert!(validate_chart_config(config).is_err());
    }

    #[test]
    fn zero_snap_step_is_rejected() {
        let config = ChartConfig::default().with_snap_step_hours(Some(0.0));
        assert!(validate_chart_config(config).is_err());
    }

    #[test]
    fn out_of_range_offset_is_rejected() {
        let config = ChartConfig::default().with_utc_offset_minutes(15 * 60);
        assert!(validate_chart_config(config).is_err());
    }
}
