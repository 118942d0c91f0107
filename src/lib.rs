//! period-chart-rs: day-row bar chart engine for fasting/eating schedules.
//!
//! Periods are split into per-day bars, classified against the current time
//! and laid out on a 24-hour grid. In edit mode bar edges can be dragged to
//! resize periods; the chart emits ordered update batches and never mutates
//! the host's period list. Rendering goes through backend-agnostic draw
//! instructions and the `render::Renderer` trait.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartConfig, ChartObserver, ScheduleChart};
pub use error::{ChartError, ChartResult};
