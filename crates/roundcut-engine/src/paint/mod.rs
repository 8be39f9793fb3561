//! Colors used by the draw passes.

mod color;

pub use color::Color;
