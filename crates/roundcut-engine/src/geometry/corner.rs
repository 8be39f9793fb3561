use super::Vertex;

/// Depth shared by the four rectangle anchors.
pub const RECT_DEPTH: f32 = 0.5;

/// One of the four fixed rectangle corners.
///
/// `Corner::ALL` is the generation order; it decides buffer layout only.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Corner {
    LeftBottom,
    RightBottom,
    RightTop,
    LeftTop,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::LeftBottom,
        Corner::RightBottom,
        Corner::RightTop,
        Corner::LeftTop,
    ];

    /// Original, unrounded corner coordinate.
    #[inline]
    pub const fn anchor(self) -> Vertex {
        match self {
            Corner::LeftBottom => Vertex::new(-1.0, -1.0, RECT_DEPTH),
            Corner::RightBottom => Vertex::new(1.0, -1.0, RECT_DEPTH),
            Corner::RightTop => Vertex::new(1.0, 1.0, RECT_DEPTH),
            Corner::LeftTop => Vertex::new(-1.0, 1.0, RECT_DEPTH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_span_the_unit_square() {
        let xs: Vec<f32> = Corner::ALL.iter().map(|c| c.anchor().x()).collect();
        let ys: Vec<f32> = Corner::ALL.iter().map(|c| c.anchor().y()).collect();
        assert_eq!(xs, vec![-1.0, 1.0, 1.0, -1.0]);
        assert_eq!(ys, vec![-1.0, -1.0, 1.0, 1.0]);
        assert!(Corner::ALL.iter().all(|c| c.anchor().z() == RECT_DEPTH));
    }
}
