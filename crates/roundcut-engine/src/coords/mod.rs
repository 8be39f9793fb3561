//! Pixel-space types shared by the renderer and the host runtime.
//!
//! Two origins are in play:
//! - `ViewportRect` is stated bottom-left, +Y up (the GL convention the
//!   geometry is authored in).
//! - wgpu viewports and framebuffer rows are top-left, +Y down.

mod viewport;

pub use viewport::ViewportRect;
