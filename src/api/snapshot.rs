use serde::{Deserialize, Serialize};

use crate::core::{
    Bar, ChartDimensions, ChartMode, CompletedCycleBar, CurrentTimePosition,
    SegmentPositionIndex, Timeline,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{DragActivity, DragPhase, ResizeZone};
use crate::render::Renderer;

use super::ScheduleChart;

pub const CHART_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

/// Deterministic view of the derived chart state, for debugging and
/// regression fixtures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshot {
    pub mode: ChartMode,
    pub dimensions: ChartDimensions,
    pub timeline: Option<Timeline>,
    pub bars: Vec<Bar>,
    pub completed_bars: Vec<CompletedCycleBar>,
    pub segment_index: SegmentPositionIndex,
    pub zones: Vec<ResizeZone>,
    pub current_time: Option<CurrentTimePosition>,
    pub hovered_period: Option<usize>,
    pub drag_phase: DragPhase,
    pub drag_activity: DragActivity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: ChartSnapshot,
}

impl ChartSnapshot {
    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = ChartSnapshotJsonContractV1 {
            schema_version: CHART_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    /// Accepts both a bare snapshot and a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<ChartSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: ChartSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != CHART_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}

impl<R: Renderer> ScheduleChart<R> {
    #[must_use]
    pub fn snapshot(&self) -> ChartSnapshot {
        ChartSnapshot {
            mode: self.inputs.mode,
            dimensions: self.layout.dimensions(),
            timeline: self.model.timeline,
            bars: self.model.bars.clone(),
            completed_bars: self.model.completed_bars.clone(),
            segment_index: self.model.segment_index.clone(),
            zones: self.model.zones.clone(),
            current_time: self.model.current_time,
            hovered_period: self.inputs.hovered_period,
            drag_phase: self.drag.phase(),
            drag_activity: self.drag.activity(),
        }
    }

    pub fn snapshot_json_contract_v1_pretty(&self) -> ChartResult<String> {
        self.snapshot().to_json_contract_v1_pretty()
    }
}
