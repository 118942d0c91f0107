use serde::{Deserialize, Serialize};

use crate::core::{BarState, PhaseType};
use crate::render::Color;

/// Fill colors of one phase across its three states.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhasePalette {
    pub scheduled: Color,
    pub in_progress: Color,
    pub completed: Color,
}

impl PhasePalette {
    #[must_use]
    pub fn color_for(self, state: BarState) -> Color {
        match state {
            BarState::Scheduled => self.scheduled,
            BarState::InProgress => self.in_progress,
            BarState::Completed => self.completed,
        }
    }
}

/// Style contract for the current render frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    pub fasting: PhasePalette,
    pub eating: PhasePalette,
    pub completed_cycle_color: Color,
    pub grid_line_color: Color,
    pub day_label_color: Color,
    pub bar_label_color: Color,
    pub handle_color: Color,
    pub now_marker_color: Color,
    pub tooltip_background_color: Color,
    pub tooltip_text_color: Color,
    /// Alpha multiplier for bars of non-hovered periods while a period is hovered.
    pub dimmed_alpha: f64,
    pub grid_line_width: f64,
    pub now_marker_width: f64,
    pub bar_corner_radius_px: f64,
    pub day_label_font_size_px: f64,
    pub bar_label_font_size_px: f64,
    pub tooltip_font_size_px: f64,
    /// Bars narrower than this do not get a duration label.
    pub min_labeled_bar_width_px: f64,
}

impl RenderStyle {
    #[must_use]
    pub fn palette(&self, phase: PhaseType) -> PhasePalette {
        match phase {
            PhaseType::Fasting => self.fasting,
            PhaseType::Eating => self.eating,
        }
    }
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            fasting: PhasePalette {
                scheduled: Color::rgb(0.64, 0.71, 0.93),
                in_progress: Color::rgb(0.25, 0.40, 0.88),
                completed: Color::rgb(0.45, 0.50, 0.62),
            },
            eating: PhasePalette {
                scheduled: Color::rgb(0.98, 0.80, 0.55),
                in_progress: Color::rgb(0.96, 0.60, 0.20),
                completed: Color::rgb(0.70, 0.62, 0.52),
            },
            completed_cycle_color: Color::rgba(0.55, 0.55, 0.55, 0.6),
            grid_line_color: Color::rgba(0.80, 0.82, 0.86, 1.0),
            day_label_color: Color::rgb(0.30, 0.33, 0.38),
            bar_label_color: Color::rgb(1.0, 1.0, 1.0),
            handle_color: Color::rgba(1.0, 1.0, 1.0, 0.9),
            now_marker_color: Color::rgb(0.90, 0.20, 0.25),
            tooltip_background_color: Color::rgba(0.10, 0.12, 0.16, 0.92),
            tooltip_text_color: Color::rgb(1.0, 1.0, 1.0),
            dimmed_alpha: 0.4,
            grid_line_width: 1.0,
            now_marker_width: 2.0,
            bar_corner_radius_px: 6.0,
            day_label_font_size_px: 11.0,
            bar_label_font_size_px: 11.0,
            tooltip_font_size_px: 12.0,
            min_labeled_bar_width_px: 36.0,
        }
    }
}
