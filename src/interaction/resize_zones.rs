use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Bar, ChartLayout, PhaseType, SegmentPositionIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeEdge {
    Left,
    Right,
}

/// Hit-test rectangle for one draggable bar edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResizeZone {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub edge: ResizeEdge,
    pub bar_type: PhaseType,
    pub period_index: usize,
    pub bar: Bar,
}

impl ResizeZone {
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    /// Pixel x of the edge the zone is centered on.
    #[must_use]
    pub fn edge_x(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

/// Emits a left zone for every first segment and a right zone for every last
/// segment. Zone width is the fixed handle width regardless of viewport size.
#[must_use]
pub fn build_resize_zones(
    bars: &[Bar],
    index: &SegmentPositionIndex,
    layout: &ChartLayout,
) -> Vec<ResizeZone> {
    if layout.grid_width() <= 0.0 {
        return Vec::new();
    }

    let half_handle = layout.handle_width / 2.0;
    let height = layout.bar_height();
    let mut zones = Vec::new();

    for (bar_index, bar) in bars.iter().enumerate() {
        let position = index.get(bar_index);
        let y = layout.bar_top(bar.day_index);
        let mut push_zone = |edge: ResizeEdge, edge_x: f64| {
            zones.push(ResizeZone {
                x: edge_x - half_handle,
                y,
                width: layout.handle_width,
                height,
                edge,
                bar_type: bar.phase,
                period_index: bar.period_index,
                bar: bar.clone(),
            });
        };
        if position.is_first_segment {
            push_zone(ResizeEdge::Left, layout.hour_to_x(bar.start_hour));
        }
        if position.is_last_segment {
            push_zone(ResizeEdge::Right, layout.hour_to_x(bar.end_hour));
        }
    }

    zones
}

/// Finds the zone under `(x, y)`.
///
/// Overlapping zones are resolved by: the highlighted period first, then
/// eating edges over fasting edges, then collection order.
#[must_use]
pub fn hit_test_zones(
    zones: &[ResizeZone],
    x: f64,
    y: f64,
    highlighted_period: Option<usize>,
) -> Option<&ResizeZone> {
    let hits: SmallVec<[&ResizeZone; 4]> =
        zones.iter().filter(|zone| zone.contains(x, y)).collect();

    match hits.len() {
        0 => None,
        1 => Some(hits[0]),
        _ => highlighted_period
            .and_then(|period_index| {
                hits.iter()
                    .copied()
                    .find(|zone| zone.period_index == period_index)
            })
            .or_else(|| {
                hits.iter()
                    .copied()
                    .find(|zone| zone.bar_type == PhaseType::Eating)
            })
            .or_else(|| hits.first().copied()),
    }
}
