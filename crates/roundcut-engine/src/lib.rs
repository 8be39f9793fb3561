//! Roundcut engine crate.
//!
//! Renders a rectangle with rounded corners by exclusion: the four corner
//! cutouts are written into the stencil buffer first, then the full
//! rectangle is filled everywhere the stencil was left untouched.
//!
//! The crate owns the CPU geometry, the two-pass draw protocol, and the
//! platform + GPU runtime pieces the demo binary drives.

pub mod geometry;
pub mod coords;
pub mod paint;
pub mod render;

pub mod device;
pub mod window;
pub mod core;

pub mod logging;
