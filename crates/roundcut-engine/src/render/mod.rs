//! GPU rendering subsystem.
//!
//! The frame is a fixed two-pass protocol (see `passes`): a stencil mask pass
//! over the corner cutouts, then a fill pass over the full rectangle that only
//! survives where the mask was not written.
//!
//! `RoundedCornerRenderer` executes the protocol on wgpu; `reference` executes
//! the same pass descriptors on a CPU framebuffer.

mod config;
mod ctx;
pub mod passes;
pub mod reference;
mod rounded_corner;

pub use config::RendererConfig;
pub use ctx::{RenderCtx, RenderTarget};
pub use rounded_corner::{RendererState, RoundedCornerRenderer};
