//! CPU-side mesh generation.
//!
//! Everything here is pure arithmetic and runs once, before any GPU
//! interaction. The resulting meshes are immutable and owned by the renderer.
//!
//! Convention:
//! - Positions are normalized device coordinates, +Y up.
//! - The rectangle spans [-1, 1] x [-1, 1] at depth `RECT_DEPTH`.

mod corner;
mod cutout;
mod mesh;
mod vertex;

pub use corner::{Corner, RECT_DEPTH};
pub use cutout::{
    arc_origin, arc_point, rect_mesh, CutoutFan, CutoutParams,
    RoundedCornerGeometry,
};
pub use mesh::{Mesh, MeshBuilder};
pub use vertex::Vertex;
