use winit::event::WindowEvent;

use crate::render::RenderCtx;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// All callbacks run on the event-loop thread and never overlap.
pub trait App {
    /// Called once per GPU context, before any resize or frame.
    ///
    /// Called again after `on_surface_lost` when the context is recreated.
    fn on_surface_created(&mut self, ctx: &RenderCtx<'_>);

    /// Called with the new drawable size in physical pixels (never zero).
    fn on_resize(&mut self, width: u32, height: u32) {
        let _ = (width, height);
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called right before the GPU context is dropped. Release GPU resources here.
    fn on_surface_lost(&mut self) {}

    /// Called for raw window events before the runtime handles them.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }
}
