/// Active drawing rectangle in physical pixels, bottom-left origin.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct ViewportRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ViewportRect {
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Whole surface.
    #[inline]
    pub const fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// The middle half of a `width` x `height` surface.
    ///
    /// The normalized [-1, 1] geometry therefore covers half of each surface
    /// dimension whatever the surface size is.
    #[inline]
    pub const fn centered_half(width: u32, height: u32) -> Self {
        Self::new(width / 4, height / 4, width / 2, height / 2)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns `(x, y_from_top, width, height)` for a surface `surface_height` tall.
    ///
    /// Saturates when the viewport extends past the surface.
    #[inline]
    pub fn to_top_left(self, surface_height: u32) -> (u32, u32, u32, u32) {
        let top = surface_height.saturating_sub(self.y.saturating_add(self.height));
        (self.x, top, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_half_800x600() {
        let vp = ViewportRect::centered_half(800, 600);
        assert_eq!(vp, ViewportRect::new(200, 150, 400, 300));
    }

    #[test]
    fn centered_half_rounds_down() {
        let vp = ViewportRect::centered_half(7, 5);
        assert_eq!(vp, ViewportRect::new(1, 1, 3, 2));
    }

    #[test]
    fn centered_half_of_tiny_surface_is_empty() {
        assert!(ViewportRect::centered_half(1, 1).is_empty());
        assert!(!ViewportRect::centered_half(2, 2).is_empty());
    }

    #[test]
    fn top_left_flip_is_symmetric_for_even_sizes() {
        let vp = ViewportRect::centered_half(800, 600);
        assert_eq!(vp.to_top_left(600), (200, 150, 400, 300));
    }

    #[test]
    fn top_left_flip_for_odd_height() {
        // 601 / 4 = 150 from the bottom, 601 - 150 - 300 = 151 from the top.
        let vp = ViewportRect::centered_half(800, 601);
        assert_eq!(vp.to_top_left(601), (200, 151, 400, 300));
    }
}
