//! Core engine-facing contracts.
//!
//! Defines the interface between the runtime (platform loop) and the
//! application, following the host surface contract: one surface-created
//! call, then resizes and frames interleaved on the same thread, and a
//! surface-lost call before the GPU goes away.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
