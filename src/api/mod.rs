mod chart;
mod chart_config;
mod chart_model;
mod data_controller;
mod input_controller;
mod observer;
mod render_style;
mod render_synchronizer;
mod scene_builder;
mod snapshot;
mod validation;

pub use chart::ScheduleChart;
pub use chart_config::ChartConfig;
pub use chart_model::{ChartInputs, ChartModel, chart_layout, derive_chart_model};
pub use observer::ChartObserver;
pub use render_style::{PhasePalette, RenderStyle};
pub use render_synchronizer::{
    ChangeKind, ChangeSet, RenderAction, RenderSynchronizer, SyncContext, resolve_render_action,
};
pub use scene_builder::{SceneInput, TooltipOverlay, build_patch, build_scene, build_series};
pub use snapshot::{CHART_SNAPSHOT_JSON_SCHEMA_V1, ChartSnapshot, ChartSnapshotJsonContractV1};
