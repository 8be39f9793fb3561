use std::f32::consts::FRAC_PI_2;

use super::{Corner, Mesh, MeshBuilder, Vertex};

/// Construction-time parameters of the corner cutouts.
///
/// Neither field is validated. A radius above 1 produces overlapping arcs and a
/// precision of 0 produces no triangles; both render incorrectly but never panic.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CutoutParams {
    /// Arc radius as a fraction of the rectangle's half-extent.
    pub radius: f32,
    /// Number of arc points per corner.
    pub precision: u32,
}

impl Default for CutoutParams {
    fn default() -> Self {
        Self {
            radius: 0.5,
            precision: 256,
        }
    }
}

impl CutoutParams {
    /// Vertices per corner fan: the anchor plus every arc point.
    #[inline]
    pub fn fan_vertex_count(self) -> usize {
        self.precision as usize + 1
    }

    /// Triangles per corner fan.
    ///
    /// One per adjacent pair of arc points, so `precision - 1`. There is no
    /// degenerate leading triangle and no zero padding at the end of the index
    /// buffer, which a `4 * precision * 3` index count would imply.
    #[inline]
    pub fn fan_triangle_count(self) -> usize {
        (self.precision as usize).saturating_sub(1)
    }
}

/// Location of one corner fan inside the combined cutout buffers.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CutoutFan {
    pub corner: Corner,
    pub base_vertex: u32,
    pub vertex_count: u32,
    pub first_index: u32,
    pub index_count: u32,
}

// ── arc arithmetic ────────────────────────────────────────────────────────

/// Sign pointing from the anchor towards the rectangle's interior on one axis.
#[inline]
fn inward(coord: f32) -> f32 {
    if coord > 0.0 { -1.0 } else { 1.0 }
}

/// Center of the quarter circle carved out of `anchor`'s corner.
#[inline]
pub fn arc_origin(anchor: Vertex, radius: f32) -> [f32; 2] {
    [
        anchor.x() + radius * inward(anchor.x()),
        anchor.y() + radius * inward(anchor.y()),
    ]
}

/// Arc point `step` of `precision`, swept from angle 0 towards (never reaching) π/2.
///
/// Step 0 lies on the vertical rectangle edge through the anchor.
pub fn arc_point(anchor: Vertex, radius: f32, precision: u32, step: u32) -> Vertex {
    let angle = FRAC_PI_2 / precision as f32 * step as f32;
    let [ox, oy] = arc_origin(anchor, radius);
    Vertex::new(
        ox - angle.cos() * radius * inward(anchor.x()),
        oy - angle.sin() * radius * inward(anchor.y()),
        0.0,
    )
}

impl MeshBuilder {
    /// Appends one corner's fan: the anchor first, then `precision` arc points.
    ///
    /// The anchor-first order makes it the fan root; triangles are
    /// `(root, root + i, root + i + 1)` for `i` in `1..precision`.
    pub fn push_cutout_fan(&mut self, corner: Corner, params: CutoutParams) -> CutoutFan {
        let anchor = corner.anchor();
        let first_index = self.index_len() as u32;
        let root = self.push_vertex(anchor);

        for step in 0..params.precision {
            self.push_vertex(arc_point(anchor, params.radius, params.precision, step));
        }
        for i in 1..params.precision {
            self.push_triangle(root, root + i, root + i + 1);
        }

        CutoutFan {
            corner,
            base_vertex: root,
            vertex_count: self.next_index() - root,
            first_index,
            index_count: self.index_len() as u32 - first_index,
        }
    }
}

fn build_cutout(params: CutoutParams) -> (Mesh, [CutoutFan; 4]) {
    let mut builder = MeshBuilder::with_capacity(
        4 * params.fan_vertex_count(),
        4 * params.fan_triangle_count() * 3,
    );
    let fans = Corner::ALL.map(|corner| builder.push_cutout_fan(corner, params));
    (builder.finish(), fans)
}

/// Quad covering the whole rectangle: 4 anchors, 2 counter-clockwise triangles.
pub fn rect_mesh() -> Mesh {
    let mut builder = MeshBuilder::with_capacity(4, 6);
    for corner in Corner::ALL {
        builder.push_vertex(corner.anchor());
    }
    builder.push_triangle(0, 1, 2);
    builder.push_triangle(0, 2, 3);
    builder.finish()
}

/// Both meshes the renderer uploads, generated once.
#[derive(Debug, Clone)]
pub struct RoundedCornerGeometry {
    pub params: CutoutParams,
    pub cutout: Mesh,
    pub rect: Mesh,
    pub fans: [CutoutFan; 4],
}

impl RoundedCornerGeometry {
    pub fn new(params: CutoutParams) -> Self {
        let (cutout, fans) = build_cutout(params);
        log::debug!(
            "cutout geometry: radius={} precision={} vertices={} indices={}",
            params.radius,
            params.precision,
            cutout.vertex_count(),
            cutout.index_count()
        );
        Self {
            params,
            cutout,
            rect: rect_mesh(),
            fans,
        }
    }

    pub fn fan(&self, corner: Corner) -> &CutoutFan {
        // `fans` follows `Corner::ALL`.
        let slot = Corner::ALL.iter().position(|c| *c == corner).unwrap_or(0);
        &self.fans[slot]
    }
}
