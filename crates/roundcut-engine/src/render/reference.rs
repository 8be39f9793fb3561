//! CPU reference executor for the frame protocol.
//!
//! Rasterizes the same `PassDesc` list the GPU renderer records, at pixel
//! centers, with WebGPU stencil/depth semantics. Used to check the protocol's
//! end result without a GPU and by the demo's `--ascii` mode.

use crate::coords::ViewportRect;
use crate::geometry::{Mesh, RoundedCornerGeometry, Vertex};
use crate::paint::Color;

use super::passes::{frame_passes, MeshSlot, PassDesc, DEPTH_COMPARE, DEPTH_WRITE};
use super::RendererConfig;

/// Color, depth and stencil planes; row 0 is the top row.
#[derive(Debug, Clone)]
pub struct SoftFramebuffer {
    width: u32,
    height: u32,
    color: Vec<Color>,
    depth: Vec<f32>,
    stencil: Vec<u8>,
}

impl SoftFramebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            color: vec![Color::BLACK; len],
            depth: vec![1.0; len],
            stencil: vec![0; len],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Clears color to `color`, depth to 1.0 and stencil to 0.
    pub fn clear(&mut self, color: Color) {
        self.color.fill(color);
        self.depth.fill(1.0);
        self.stencil.fill(0);
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn color_at(&self, x: u32, y: u32) -> Option<Color> {
        self.offset(x, y).map(|i| self.color[i])
    }

    pub fn stencil_at(&self, x: u32, y: u32) -> Option<u8> {
        self.offset(x, y).map(|i| self.stencil[i])
    }

    pub fn depth_at(&self, x: u32, y: u32) -> Option<f32> {
        self.offset(x, y).map(|i| self.depth[i])
    }

    /// Runs `passes` in order against `geometry`, clipped to `viewport`.
    pub fn execute(
        &mut self,
        passes: &[PassDesc],
        geometry: &RoundedCornerGeometry,
        viewport: ViewportRect,
    ) {
        if viewport.is_empty() {
            return;
        }
        for pass in passes {
            let mesh = match pass.mesh {
                MeshSlot::Cutout => &geometry.cutout,
                MeshSlot::Rect => &geometry.rect,
            };
            self.draw_mesh(pass, mesh, viewport);
        }
    }

    fn draw_mesh(&mut self, pass: &PassDesc, mesh: &Mesh, viewport: ViewportRect) {
        let (vx, vy, vw, vh) = viewport.to_top_left(self.height);
        let clip_x1 = vx.saturating_add(vw).min(self.width);
        let clip_y1 = vy.saturating_add(vh).min(self.height);

        let to_screen = |v: Vertex| -> [f32; 3] {
            [
                vx as f32 + (v.x() + 1.0) * 0.5 * vw as f32,
                vy as f32 + (1.0 - v.y()) * 0.5 * vh as f32,
                v.z(),
            ]
        };

        for [a, b, c] in mesh.triangles() {
            // Facing is decided in NDC (+Y up) where counter-clockwise is front.
            let ndc_area = edge([a.x(), a.y()], [b.x(), b.y()], [c.x(), c.y()]);
            if ndc_area == 0.0 {
                continue;
            }
            let face = if ndc_area > 0.0 {
                pass.stencil.front
            } else {
                pass.stencil.back
            };

            let (a, b, c) = (to_screen(a), to_screen(b), to_screen(c));
            let area = edge([a[0], a[1]], [b[0], b[1]], [c[0], c[1]]);

            let min_x = a[0].min(b[0]).min(c[0]).floor().max(vx as f32) as u32;
            let min_y = a[1].min(b[1]).min(c[1]).floor().max(vy as f32) as u32;
            let max_x = (a[0].max(b[0]).max(c[0]).ceil() as u32).min(clip_x1);
            let max_y = (a[1].max(b[1]).max(c[1]).ceil() as u32).min(clip_y1);

            for py in min_y..max_y {
                for px in min_x..max_x {
                    let p = [px as f32 + 0.5, py as f32 + 0.5];
                    let w0 = edge([b[0], b[1]], [c[0], c[1]], p) / area;
                    let w1 = edge([c[0], c[1]], [a[0], a[1]], p) / area;
                    let w2 = edge([a[0], a[1]], [b[0], b[1]], p) / area;
                    if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                        continue;
                    }
                    let z = w0 * a[2] + w1 * b[2] + w2 * c[2];
                    self.shade(pass, face, px, py, z);
                }
            }
        }
    }

    fn shade(&mut self, pass: &PassDesc, face: wgpu::StencilFaceState, x: u32, y: u32, z: f32) {
        let Some(i) = self.offset(x, y) else { return; };
        let read_mask = pass.stencil.read_mask;
        let current = self.stencil[i] as u32;

        let stencil_ok = compare(face.compare, pass.reference & read_mask, current & read_mask);
        if !stencil_ok {
            self.write_stencil(i, pass, face.fail_op);
            return;
        }

        if !compare(DEPTH_COMPARE, z, self.depth[i]) {
            self.write_stencil(i, pass, face.depth_fail_op);
            return;
        }

        self.write_stencil(i, pass, face.pass_op);
        if DEPTH_WRITE {
            self.depth[i] = z;
        }
        self.write_color(i, pass);
    }

    fn write_stencil(&mut self, i: usize, pass: &PassDesc, op: wgpu::StencilOperation) {
        let current = self.stencil[i];
        let value = apply_op(op, current, pass.reference as u8);
        let write_mask = pass.stencil.write_mask as u8;
        self.stencil[i] = (current & !write_mask) | (value & write_mask);
    }

    fn write_color(&mut self, i: usize, pass: &PassDesc) {
        let writes = pass.color_writes;
        let dst = &mut self.color[i];
        if writes.contains(wgpu::ColorWrites::RED) {
            dst.r = pass.color.r;
        }
        if writes.contains(wgpu::ColorWrites::GREEN) {
            dst.g = pass.color.g;
        }
        if writes.contains(wgpu::ColorWrites::BLUE) {
            dst.b = pass.color.b;
        }
        if writes.contains(wgpu::ColorWrites::ALPHA) {
            dst.a = pass.color.a;
        }
    }

    /// One character per pixel: `#` for `fill`, `+` for marked stencil, `.` otherwise.
    pub fn to_ascii(&self, fill: Color) -> String {
        let mut out = String::with_capacity((self.width as usize + 1) * self.height as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                let i = y as usize * self.width as usize + x as usize;
                let ch = if self.color[i] == fill {
                    '#'
                } else if self.stencil[i] != 0 {
                    '+'
                } else {
                    '.'
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

/// Renders one complete frame of `config` on a `width` x `height` surface.
pub fn render_reference(config: &RendererConfig, width: u32, height: u32) -> SoftFramebuffer {
    let geometry = RoundedCornerGeometry::new(config.geometry);
    let mut fb = SoftFramebuffer::new(width, height);
    fb.clear(config.clear_color);
    fb.execute(
        &frame_passes(config),
        &geometry,
        ViewportRect::centered_half(width, height),
    );
    fb
}

#[inline]
fn edge(a: [f32; 2], b: [f32; 2], p: [f32; 2]) -> f32 {
    (b[0] - a[0]) * (p[1] - a[1]) - (b[1] - a[1]) * (p[0] - a[0])
}

/// `lhs OP rhs`: reference vs stored for stencil, fragment vs stored for depth.
fn compare<T: PartialOrd>(func: wgpu::CompareFunction, lhs: T, rhs: T) -> bool {
    use wgpu::CompareFunction as F;
    match func {
        F::Never => false,
        F::Less => lhs < rhs,
        F::Equal => lhs == rhs,
        F::LessEqual => lhs <= rhs,
        F::Greater => lhs > rhs,
        F::NotEqual => lhs != rhs,
        F::GreaterEqual => lhs >= rhs,
        F::Always => true,
    }
}

fn apply_op(op: wgpu::StencilOperation, current: u8, reference: u8) -> u8 {
    use wgpu::StencilOperation as Op;
    match op {
        Op::Keep => current,
        Op::Zero => 0,
        Op::Replace => reference,
        Op::Invert => !current,
        Op::IncrementClamp => current.saturating_add(1),
        Op::DecrementClamp => current.saturating_sub(1),
        Op::IncrementWrap => current.wrapping_add(1),
        Op::DecrementWrap => current.wrapping_sub(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CutoutParams;
    use crate::render::passes::{fill_pass, mask_pass};

    const W: u32 = 200;
    const H: u32 = 160;

    /// Pixel center of `(px, py)` in NDC, for a viewport in top-left coordinates.
    fn ndc(px: u32, py: u32, vp: (u32, u32, u32, u32)) -> (f32, f32) {
        let (vx, vy, vw, vh) = vp;
        let x = (px as f32 + 0.5 - vx as f32) / vw as f32 * 2.0 - 1.0;
        let y = 1.0 - (py as f32 + 0.5 - vy as f32) / vh as f32 * 2.0;
        (x, y)
    }

    /// Distance past the arc into a corner cutout; positive means cut away.
    fn cut_depth(x: f32, y: f32, radius: f32) -> Option<f32> {
        let inner = 1.0 - radius;
        let (ax, ay) = (x.abs(), y.abs());
        if ax <= inner || ay <= inner {
            return None;
        }
        Some(((ax - inner).powi(2) + (ay - inner).powi(2)).sqrt() - radius)
    }

    #[test]
    fn default_frame_matches_rounded_rectangle() {
        let config = RendererConfig::default();
        let fb = render_reference(&config, W, H);
        let vp = ViewportRect::centered_half(W, H).to_top_left(H);
        let (vx, vy, vw, vh) = vp;

        for py in 0..H {
            for px in 0..W {
                let color = fb.color_at(px, py).unwrap();
                let stencil = fb.stencil_at(px, py).unwrap();

                let inside = px >= vx && px < vx + vw && py >= vy && py < vy + vh;
                if !inside {
                    assert_eq!(color, Color::WHITE, "outside viewport at ({px},{py})");
                    assert_eq!(stencil, 0, "outside viewport at ({px},{py})");
                    continue;
                }

                let (x, y) = ndc(px, py, vp);
                match cut_depth(x, y, config.geometry.radius) {
                    // Pixels straddling the arc depend on the polygon approximation.
                    Some(d) if d.abs() < 0.02 => {}
                    Some(d) if d > 0.0 => {
                        assert_eq!(stencil, 1, "cutout at ({px},{py})");
                        assert_eq!(color, Color::WHITE, "cutout at ({px},{py})");
                    }
                    _ => {
                        assert_eq!(stencil, 0, "body at ({px},{py})");
                        assert_eq!(color, Color::YELLOW, "body at ({px},{py})");
                    }
                }
            }
        }
    }

    #[test]
    fn viewport_corners_are_cut_and_center_is_filled() {
        let fb = render_reference(&RendererConfig::default(), W, H);
        let (vx, vy, vw, vh) = ViewportRect::centered_half(W, H).to_top_left(H);

        for (x, y) in [(vx, vy), (vx + vw - 1, vy), (vx, vy + vh - 1), (vx + vw - 1, vy + vh - 1)] {
            assert_eq!(fb.stencil_at(x, y), Some(1));
            assert_eq!(fb.color_at(x, y), Some(Color::WHITE));
        }
        assert_eq!(fb.color_at(W / 2, H / 2), Some(Color::YELLOW));
        assert_eq!(fb.stencil_at(W / 2, H / 2), Some(0));
        let depth = fb.depth_at(W / 2, H / 2).unwrap();
        assert!((depth - 0.5).abs() < 1e-6);
    }

    #[test]
    fn mask_pass_alone_leaves_color_and_depth_untouched() {
        let geometry = RoundedCornerGeometry::new(CutoutParams::default());
        let mut fb = SoftFramebuffer::new(W, H);
        fb.clear(Color::WHITE);
        fb.execute(&[mask_pass(Color::RED)], &geometry, ViewportRect::full(W, H));

        let marked = (0..H)
            .flat_map(|y| (0..W).map(move |x| (x, y)))
            .filter(|&(x, y)| fb.stencil_at(x, y) == Some(1))
            .count();
        assert!(marked > 0);
        assert!((0..H).all(|y| (0..W).all(|x| fb.color_at(x, y) == Some(Color::WHITE))));
        assert!((0..H).all(|y| (0..W).all(|x| fb.depth_at(x, y) == Some(1.0))));
    }

    #[test]
    fn fill_without_mask_covers_the_whole_viewport() {
        let geometry = RoundedCornerGeometry::new(CutoutParams::default());
        let mut fb = SoftFramebuffer::new(40, 40);
        fb.clear(Color::WHITE);
        fb.execute(&[fill_pass(Color::YELLOW)], &geometry, ViewportRect::full(40, 40));
        assert!((0..40).all(|y| (0..40).all(|x| fb.color_at(x, y) == Some(Color::YELLOW))));
    }

    #[test]
    fn zero_precision_draws_a_plain_rectangle() {
        let config = RendererConfig {
            geometry: CutoutParams { radius: 0.5, precision: 0 },
            ..RendererConfig::default()
        };
        let fb = render_reference(&config, 40, 40);
        let (vx, vy, _, _) = ViewportRect::centered_half(40, 40).to_top_left(40);
        assert_eq!(fb.color_at(vx, vy), Some(Color::YELLOW));
    }

    #[test]
    fn empty_viewport_draws_nothing() {
        let fb = render_reference(&RendererConfig::default(), 1, 1);
        assert_eq!(fb.color_at(0, 0), Some(Color::WHITE));
        assert_eq!(fb.stencil_at(0, 0), Some(0));
    }

    #[test]
    fn ascii_marks_fill_and_cutouts() {
        let fb = render_reference(&RendererConfig::default(), 16, 16);
        let art = fb.to_ascii(Color::YELLOW);
        let rows: Vec<&str> = art.lines().collect();
        assert_eq!(rows.len(), 16);
        assert!(rows.iter().all(|r| r.len() == 16));
        // Viewport is x,y in 4..12; its corner pixel is cut, its center is filled.
        assert_eq!(rows[4].as_bytes()[4], b'+');
        assert_eq!(rows[8].as_bytes()[8], b'#');
        assert_eq!(rows[0].as_bytes()[0], b'.');
    }

    #[test]
    fn stencil_ops_respect_write_mask() {
        let mut pass = mask_pass(Color::RED);
        pass.stencil.write_mask = 0x0F;
        pass.reference = 0xF3;

        let mut fb = SoftFramebuffer::new(1, 1);
        fb.stencil[0] = 0xA0;
        fb.write_stencil(0, &pass, wgpu::StencilOperation::Replace);
        assert_eq!(fb.stencil_at(0, 0), Some(0xA3));
    }
}
