mod frame;
mod null_renderer;
mod primitives;

pub use frame::{RenderFrame, RenderPatch, SeriesKind, SeriesLayer};
pub use null_renderer::NullRenderer;
pub use primitives::{
    Color, CornerRadii, DrawInstruction, GroupPrimitive, LinePrimitive, RectPrimitive, TextHAlign,
    TextPrimitive,
};

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive fully materialized draw instructions so drawing code
/// stays isolated from schedule geometry and interaction logic.
pub trait Renderer {
    /// Rebuilds the whole scene.
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;

    /// Replaces the listed series of the current scene in place.
    fn patch(&mut self, patch: &RenderPatch) -> ChartResult<()>;
}
