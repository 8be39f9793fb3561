use crate::geometry::CutoutParams;
use crate::paint::Color;

/// Construction-time renderer configuration. Not mutable after `new`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RendererConfig {
    pub geometry: CutoutParams,

    /// Color left visible outside the rounded rectangle and in the cutouts.
    pub clear_color: Color,

    /// Color bound during the mask pass. Never reaches the color target.
    pub mask_color: Color,

    /// Color of the rounded rectangle.
    pub fill_color: Color,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            geometry: CutoutParams::default(),
            clear_color: Color::WHITE,
            mask_color: Color::RED,
            fill_color: Color::YELLOW,
        }
    }
}
