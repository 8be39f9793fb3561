use roundcut_engine::core::{App, AppControl, FrameCtx};
use roundcut_engine::render::{RenderCtx, RendererConfig, RoundedCornerRenderer};

/// Binds the rounded-corner renderer to the host surface callbacks.
pub struct DemoApp {
    renderer: RoundedCornerRenderer,
}

impl DemoApp {
    pub fn new(config: RendererConfig) -> Self {
        Self {
            renderer: RoundedCornerRenderer::new(config),
        }
    }
}

impl App for DemoApp {
    fn on_surface_created(&mut self, ctx: &RenderCtx<'_>) {
        self.renderer.setup(ctx);
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        self.renderer.resize(width, height);
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.frame_index % 600 == 0 {
            log::trace!("frame {}", ctx.frame_index);
        }
        let renderer = &mut self.renderer;
        ctx.render(|rctx, target| renderer.draw_frame(rctx, target))
    }

    fn on_surface_lost(&mut self) {
        self.renderer.release();
    }
}
