use serde::{Deserialize, Serialize};

use crate::core::primitives::HOURS_PER_DAY;
use crate::core::types::{ChartDimensions, Viewport};

/// Pixel geometry of the day-row grid.
///
/// X runs left to right over the 24 hours of a day after the day-label
/// column; each day occupies one row of `row_height` starting at `top_offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub width: f64,
    pub day_label_width: f64,
    pub row_height: f64,
    pub row_padding: f64,
    pub top_offset: f64,
    pub handle_width: f64,
}

impl ChartLayout {
    #[must_use]
    pub fn grid_width(&self) -> f64 {
        (self.width - self.day_label_width).max(0.0)
    }

    #[must_use]
    pub fn dimensions(&self) -> ChartDimensions {
        ChartDimensions {
            width: self.width,
            day_label_width: self.day_label_width,
            grid_width: self.grid_width(),
        }
    }

    #[must_use]
    pub fn pixels_per_hour(&self) -> f64 {
        self.grid_width() / HOURS_PER_DAY
    }

    #[must_use]
    pub fn hour_to_x(&self, hour: f64) -> f64 {
        self.day_label_width + hour * self.pixels_per_hour()
    }

    /// Inverse of `hour_to_x`; `None` while the grid has no width.
    #[must_use]
    pub fn x_to_hour(&self, x: f64) -> Option<f64> {
        let pixels_per_hour = self.pixels_per_hour();
        (pixels_per_hour > 0.0).then(|| (x - self.day_label_width) / pixels_per_hour)
    }

    #[must_use]
    pub fn row_top(&self, day_index: usize) -> f64 {
        self.top_offset + day_index as f64 * self.row_height
    }

    #[must_use]
    pub fn bar_top(&self, day_index: usize) -> f64 {
        self.row_top(day_index) + self.row_padding
    }

    #[must_use]
    pub fn bar_height(&self) -> f64 {
        (self.row_height - 2.0 * self.row_padding).max(0.0)
    }

    /// Row under a pixel `y`, if any.
    #[must_use]
    pub fn y_to_day(&self, y: f64) -> Option<usize> {
        if self.row_height <= 0.0 || y < self.top_offset {
            return None;
        }
        Some(((y - self.top_offset) / self.row_height).floor() as usize)
    }

    #[must_use]
    pub fn content_height(&self, day_count: usize) -> f64 {
        self.top_offset + day_count as f64 * self.row_height
    }

    #[must_use]
    pub fn viewport(&self, day_count: usize) -> Viewport {
        Viewport::new(self.width, self.content_height(day_count.max(1)))
    }
}
