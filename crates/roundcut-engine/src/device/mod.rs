//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - keeping a depth-stencil attachment at surface size
//! - acquiring frames and providing encoders/views for rendering
//!
//! `HeadlessGpu` provides the same pieces without a window.

mod depth_stencil;
mod error;
mod frame;
mod gpu;
mod headless;
mod init;
mod surface;

pub use depth_stencil::DepthStencilTarget;
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use headless::{HeadlessGpu, Pixels};
pub use init::GpuInit;
