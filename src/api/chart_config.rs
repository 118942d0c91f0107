use serde::{Deserialize, Serialize};

use crate::core::ChartMode;
use crate::error::{ChartError, ChartResult};
use crate::interaction::{DragLimits, PeriodCoupling};

/// Public chart bootstrap configuration.
///
/// This type is serializable so host applications can persist/load chart setup
/// without inventing their own ad-hoc format. Every field has a serde default,
/// so `{}` is a valid config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_row_height_px")]
    pub row_height_px: f64,
    #[serde(default = "default_row_padding_px")]
    pub row_padding_px: f64,
    #[serde(default = "default_day_label_width_px")]
    pub day_label_width_px: f64,
    #[serde(default)]
    pub top_offset_px: f64,
    #[serde(default = "default_handle_width_px")]
    pub handle_width_px: f64,
    #[serde(default)]
    pub drag_limits: DragLimits,
    #[serde(default)]
    pub period_coupling: PeriodCoupling,
    #[serde(default)]
    pub snap_step_hours: Option<f64>,
    #[serde(default = "default_completed_cycle_lookback_hours")]
    pub completed_cycle_lookback_hours: f64,
    #[serde(default)]
    pub utc_offset_minutes: i32,
    #[serde(default)]
    pub mode: ChartMode,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            row_height_px: default_row_height_px(),
            row_padding_px: default_row_padding_px(),
            day_label_width_px: default_day_label_width_px(),
            top_offset_px: 0.0,
            handle_width_px: default_handle_width_px(),
            drag_limits: DragLimits::default(),
            period_coupling: PeriodCoupling::default(),
            snap_step_hours: None,
            completed_cycle_lookback_hours: default_completed_cycle_lookback_hours(),
            utc_offset_minutes: 0,
            mode: ChartMode::default(),
        }
    }
}

impl ChartConfig {
    #[must_use]
    pub fn new(mode: ChartMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Sets row height and the vertical inset of bars inside a row.
    #[must_use]
    pub fn with_row_geometry(mut self, row_height_px: f64, row_padding_px: f64) -> Self {
        self.row_height_px = row_height_px;
        self.row_padding_px = row_padding_px;
        self
    }

    #[must_use]
    pub fn with_day_label_width_px(mut self, width: f64) -> Self {
        self.day_label_width_px = width;
        self
    }

    #[must_use]
    pub fn with_top_offset_px(mut self, offset: f64) -> Self {
        self.top_offset_px = offset;
        self
    }

    /// Sets the fixed pixel width of resize handles.
    #[must_use]
    pub fn with_handle_width_px(mut self, width: f64) -> Self {
        self.handle_width_px = width;
        self
    }

    #[must_use]
    pub fn with_drag_limits(mut self, limits: DragLimits) -> Self {
        self.drag_limits = limits;
        self
    }

    #[must_use]
    pub fn with_period_coupling(mut self, coupling: PeriodCoupling) -> Self {
        self.period_coupling = coupling;
        self
    }

    /// Rounds drag deltas to multiples of `step_hours`; `None` disables snapping.
    #[must_use]
    pub fn with_snap_step_hours(mut self, step_hours: Option<f64>) -> Self {
        self.snap_step_hours = step_hours;
        self
    }

    #[must_use]
    pub fn with_completed_cycle_lookback_hours(mut self, hours: f64) -> Self {
        self.completed_cycle_lookback_hours = hours;
        self
    }

    /// Sets the fixed offset used for day boundaries and tooltip times.
    #[must_use]
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: ChartMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn utc_offset_seconds(&self) -> i32 {
        self.utc_offset_minutes.saturating_mul(60)
    }

    /// Serializes config to pretty JSON.
    pub fn to_json_pretty(self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse config: {e}")))
    }
}

fn default_row_height_px() -> f64 {
    40.0
}

fn default_row_padding_px() -> f64 {
    6.0
}

fn default_day_label_width_px() -> f64 {
    48.0
}

fn default_handle_width_px() -> f64 {
    16.0
}

fn default_completed_cycle_lookback_hours() -> f64 {
    48.0
}

#[cfg(test)]
mod tests {
    use super::ChartConfig;
    use crate::core::ChartMode;
    use crate::interaction::PeriodCoupling;

    #[test]
    fn empty_json_yields_defaults() {
        let config = ChartConfig::from_json_str("{}").expect("parse");
        assert_eq!(config, ChartConfig::default());
        assert_eq!(config.completed_cycle_lookback_hours, 48.0);
        assert_eq!(config.period_coupling, PeriodCoupling::Independent);
    }

    #[test]
    fn json_roundtrip_keeps_builder_values() {
        let config = ChartConfig::new(ChartMode::Edit)
            .with_period_coupling(PeriodCoupling::Contiguous)
            .with_snap_step_hours(Some(0.25))
            .with_utc_offset_minutes(120);
        let json = config.to_json_pretty().expect("serialize");
        assert!(json.contains("\"contiguous\""));
        let restored = ChartConfig::from_json_str(&json).expect("parse");
        assert_eq!(restored, config);
        assert_eq!(restored.utc_offset_seconds(), 7200);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = ChartConfig::from_json_str("{\"row_height_px\": \"tall\"}").unwrap_err();
        assert!(matches!(err, crate::error::ChartError::InvalidConfig(_)));
    }
}
