use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};

use super::DrawInstruction;

/// Named visual series of the chart, listed in paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeriesKind {
    Grid,
    DayLabels,
    CompletedCycle,
    PeriodBars,
    BarLabels,
    ResizeHandles,
    NowMarker,
    DragTooltip,
}

impl SeriesKind {
    pub const PAINT_ORDER: [SeriesKind; 8] = [
        SeriesKind::Grid,
        SeriesKind::DayLabels,
        SeriesKind::CompletedCycle,
        SeriesKind::PeriodBars,
        SeriesKind::BarLabels,
        SeriesKind::ResizeHandles,
        SeriesKind::NowMarker,
        SeriesKind::DragTooltip,
    ];

    /// Series that react to pointer hover and hit-testing.
    #[must_use]
    pub const fn is_interactive(self) -> bool {
        matches!(self, SeriesKind::PeriodBars | SeriesKind::ResizeHandles)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesLayer {
    pub kind: SeriesKind,
    pub hit_testing: bool,
    pub instructions: Vec<DrawInstruction>,
}

impl SeriesLayer {
    #[must_use]
    pub fn new(kind: SeriesKind) -> Self {
        Self {
            kind,
            hit_testing: kind.is_interactive(),
            instructions: Vec::new(),
        }
    }

    pub fn push(&mut self, instruction: DrawInstruction) {
        self.instructions.push(instruction);
    }

    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.instructions
            .iter()
            .map(DrawInstruction::primitive_count)
            .sum()
    }
}

/// Backend-agnostic scene for one full draw pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub series: Vec<SeriesLayer>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            series: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_series(mut self, layer: SeriesLayer) -> Self {
        self.series.push(layer);
        self
    }

    #[must_use]
    pub fn series(&self, kind: SeriesKind) -> Option<&SeriesLayer> {
        self.series.iter().find(|layer| layer.kind == kind)
    }

    /// Replaces the matching series in place, or appends it when absent.
    /// The patch viewport wins since row count can change mid-drag.
    pub fn apply_patch(&mut self, patch: &RenderPatch) {
        self.viewport = patch.viewport;
        for layer in &patch.series {
            match self.series.iter_mut().find(|current| current.kind == layer.kind) {
                Some(current) => *current = layer.clone(),
                None => self.series.push(layer.clone()),
            }
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        for layer in &self.series {
            for instruction in &layer.instructions {
                instruction.validate()?;
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|layer| layer.instructions.is_empty())
    }
}

/// Incremental update replacing a subset of series of the last frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPatch {
    pub viewport: Viewport,
    pub series: Vec<SeriesLayer>,
}

impl RenderPatch {
    pub fn validate(&self) -> ChartResult<()> {
        for layer in &self.series {
            for instruction in &layer.instructions {
                instruction.validate()?;
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn kinds(&self) -> Vec<SeriesKind> {
        self.series.iter().map(|layer| layer.kind).collect()
    }
}
