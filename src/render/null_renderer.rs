use crate::error::ChartResult;
use crate::render::{RenderFrame, RenderPatch, Renderer, SeriesKind};

/// No-op renderer used by tests and headless usage.
///
/// It still validates content so tests catch invalid geometry, and it keeps
/// the last full frame with patches applied so assertions can inspect it.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub full_render_count: usize,
    pub patch_count: usize,
    pub last_patched_series: Vec<SeriesKind>,
    pub last_frame: Option<RenderFrame>,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.full_render_count += 1;
        self.last_patched_series.clear();
        self.last_frame = Some(frame.clone());
        Ok(())
    }

    fn patch(&mut self, patch: &RenderPatch) -> ChartResult<()> {
        patch.validate()?;
        self.patch_count += 1;
        self.last_patched_series = patch.kinds();
        if let Some(frame) = &mut self.last_frame {
            frame.apply_patch(patch);
        }
        Ok(())
    }
}
