use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::ViewportRect;
use crate::geometry::{Mesh, RoundedCornerGeometry, Vertex};

use super::passes::{frame_passes, MeshSlot, PassDesc};
use super::{RenderCtx, RenderTarget, RendererConfig};

/// Lifecycle of the GPU side of a `RoundedCornerRenderer`.
///
/// `Destroyed` is not modeled: losing the context means `release` (or drop)
/// and the renderer is `Uninitialized` again until the next `setup`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RendererState {
    Uninitialized,
    Ready,
}

/// Draws a rectangle with rounded corners by stencil exclusion.
///
/// Geometry is generated once in `new`. `setup` uploads it and builds one
/// pipeline per pass; `draw_frame` replays `passes::frame_passes` in order.
pub struct RoundedCornerRenderer {
    config: RendererConfig,
    geometry: RoundedCornerGeometry,
    passes: [PassDesc; 2],

    viewport: Option<ViewportRect>,
    gpu: Option<GpuResources>,
    generation: u64,

    warned_not_ready: bool,
}

impl RoundedCornerRenderer {
    pub fn new(config: RendererConfig) -> Self {
        Self {
            geometry: RoundedCornerGeometry::new(config.geometry),
            passes: frame_passes(&config),
            config,
            viewport: None,
            gpu: None,
            generation: 0,
            warned_not_ready: false,
        }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn geometry(&self) -> &RoundedCornerGeometry {
        &self.geometry
    }

    pub fn passes(&self) -> &[PassDesc; 2] {
        &self.passes
    }

    pub fn state(&self) -> RendererState {
        if self.gpu.is_some() {
            RendererState::Ready
        } else {
            RendererState::Uninitialized
        }
    }

    /// Number of completed `setup` calls; each one owns fresh GPU resources.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn viewport(&self) -> Option<ViewportRect> {
        self.viewport
    }

    /// Uploads geometry and builds pipelines. Replaces anything from a previous setup.
    ///
    /// Shader or pipeline errors are reported through wgpu's error handler.
    pub fn setup(&mut self, ctx: &RenderCtx<'_>) {
        self.release();
        self.gpu = Some(GpuResources::new(ctx, &self.geometry, &self.passes));
        self.generation += 1;
        self.warned_not_ready = false;

        log::info!(
            "rounded corner renderer ready (generation {}, {} cutout triangles)",
            self.generation,
            self.geometry.cutout.triangle_count()
        );
    }

    /// Centers the drawing area on the middle half of the new surface.
    pub fn resize(&mut self, width: u32, height: u32) -> ViewportRect {
        let viewport = ViewportRect::centered_half(width, height);
        log::debug!("resize {width}x{height} -> viewport {viewport:?}");
        self.viewport = Some(viewport);
        viewport
    }

    /// Records one frame: clear, mask pass, fill pass.
    ///
    /// Every piece of pipeline state the frame needs is set here; nothing is
    /// assumed from the previous frame.
    pub fn draw_frame(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        let Some(gpu) = self.gpu.as_ref() else {
            if !self.warned_not_ready {
                log::warn!("draw_frame called before setup; skipping");
                self.warned_not_ready = true;
            }
            return;
        };

        let (surface_w, surface_h) = ctx.surface_size;
        let viewport = self
            .viewport
            .unwrap_or_else(|| ViewportRect::centered_half(surface_w, surface_h));

        for (pass, res) in self.passes.iter().zip(&gpu.passes) {
            ctx.queue.write_buffer(
                &res.color_ubo,
                0,
                bytemuck::bytes_of(&ColorUniform { in_color: pass.color.to_array() }),
            );
        }

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("roundcut frame pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.config.clear_color.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth_stencil_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(0),
                    store: wgpu::StoreOp::Store,
                }),
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        if viewport.is_empty() {
            return;
        }
        let (x, y, w, h) = viewport.to_top_left(surface_h);
        rpass.set_viewport(x as f32, y as f32, w as f32, h as f32, 0.0, 1.0);

        for (pass, res) in self.passes.iter().zip(&gpu.passes) {
            let mesh = &gpu.meshes[pass.mesh.index()];
            let Some((vbo, ibo)) = mesh.buffers.as_ref() else { continue; };

            rpass.set_pipeline(&res.pipeline);
            rpass.set_stencil_reference(pass.reference);
            rpass.set_bind_group(0, &res.bind_group, &[]);
            rpass.set_vertex_buffer(0, vbo.slice(..));
            rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }

    /// Destroys all GPU resources. Safe to call in any state.
    pub fn release(&mut self) {
        if self.gpu.take().is_some() {
            log::debug!("rounded corner renderer released (generation {})", self.generation);
        }
    }
}

// ── GPU resources ─────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ColorUniform {
    in_color: [f32; 4],
}

struct GpuMesh {
    /// `None` for meshes without triangles.
    buffers: Option<(wgpu::Buffer, wgpu::Buffer)>,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, mesh: &Mesh, label: &str) -> Self {
        if mesh.is_empty() {
            return Self {
                buffers: None,
                index_count: 0,
            };
        }

        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("roundcut {label} vbo")),
            contents: mesh.vertex_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("roundcut {label} ibo")),
            contents: mesh.index_bytes(),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            buffers: Some((vbo, ibo)),
            index_count: mesh.index_count() as u32,
        }
    }
}

struct PassResources {
    pipeline: wgpu::RenderPipeline,
    color_ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Everything `setup` allocates. Buffers are destroyed on drop.
struct GpuResources {
    /// Indexed by `MeshSlot::index`.
    meshes: [GpuMesh; 2],
    /// Parallel to the renderer's pass list.
    passes: Vec<PassResources>,
}

impl GpuResources {
    fn new(ctx: &RenderCtx<'_>, geometry: &RoundedCornerGeometry, passes: &[PassDesc]) -> Self {
        let device = ctx.device;

        let meshes = [MeshSlot::Cutout, MeshSlot::Rect].map(|slot| match slot {
            MeshSlot::Cutout => GpuMesh::upload(device, &geometry.cutout, "cutout"),
            MeshSlot::Rect => GpuMesh::upload(device, &geometry.rect, "rect"),
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("roundcut solid shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/solid.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("roundcut color bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ColorUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("roundcut pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let passes = passes
            .iter()
            .map(|pass| {
                let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some(pass.label),
                    layout: Some(&pipeline_layout),
                    vertex: wgpu::VertexState {
                        module: &shader,
                        entry_point: Some("vs_main"),
                        compilation_options: Default::default(),
                        buffers: &[Vertex::layout()],
                    },
                    fragment: Some(wgpu::FragmentState {
                        module: &shader,
                        entry_point: Some("fs_main"),
                        compilation_options: Default::default(),
                        targets: &[Some(wgpu::ColorTargetState {
                            format: ctx.color_format,
                            blend: None,
                            write_mask: pass.color_writes,
                        })],
                    }),
                    primitive: wgpu::PrimitiveState {
                        topology: wgpu::PrimitiveTopology::TriangleList,
                        strip_index_format: None,
                        front_face: wgpu::FrontFace::Ccw,
                        // Mirrored corner fans wind both ways.
                        cull_mode: None,
                        polygon_mode: wgpu::PolygonMode::Fill,
                        unclipped_depth: false,
                        conservative: false,
                    },
                    depth_stencil: Some(pass.depth_stencil_state(ctx.depth_stencil_format)),
                    multisample: wgpu::MultisampleState::default(),
                    multiview_mask: None,
                    cache: None,
                });

                let color_ubo = device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("roundcut color ubo"),
                    size: std::mem::size_of::<ColorUniform>() as u64,
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });

                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("roundcut color bind group"),
                    layout: &bind_group_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: color_ubo.as_entire_binding(),
                    }],
                });

                PassResources {
                    pipeline,
                    color_ubo,
                    bind_group,
                }
            })
            .collect();

        Self { meshes, passes }
    }
}

impl Drop for GpuResources {
    fn drop(&mut self) {
        for mesh in &self.meshes {
            if let Some((vbo, ibo)) = &mesh.buffers {
                vbo.destroy();
                ibo.destroy();
            }
        }
        for pass in &self.passes {
            pass.color_ubo.destroy();
        }
    }
}

impl Drop for RoundedCornerRenderer {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{GpuInit, HeadlessGpu};
    use crate::geometry::CutoutParams;

    fn headless(width: u32, height: u32) -> Option<HeadlessGpu> {
        match pollster::block_on(HeadlessGpu::new(width, height, GpuInit::default())) {
            Ok(gpu) => Some(gpu),
            Err(e) => {
                eprintln!("no GPU adapter, skipping: {e:#}");
                None
            }
        }
    }

    // ── CPU-only ──────────────────────────────────────────────────────────

    #[test]
    fn new_renderer_is_uninitialized_with_geometry() {
        let r = RoundedCornerRenderer::new(RendererConfig::default());
        assert_eq!(r.state(), RendererState::Uninitialized);
        assert_eq!(r.generation(), 0);
        assert_eq!(r.geometry().cutout.vertex_count(), 4 * 257);
        assert_eq!(r.geometry().rect.index_count(), 6);
        assert!(r.viewport().is_none());
    }

    #[test]
    fn resize_centers_the_viewport() {
        let mut r = RoundedCornerRenderer::new(RendererConfig::default());
        let vp = r.resize(800, 600);
        assert_eq!(vp, ViewportRect::new(200, 150, 400, 300));
        assert_eq!(r.viewport(), Some(vp));
    }

    #[test]
    fn release_without_setup_is_a_no_op() {
        let mut r = RoundedCornerRenderer::new(RendererConfig::default());
        r.release();
        r.release();
        assert_eq!(r.state(), RendererState::Uninitialized);
    }

    #[test]
    fn pass_list_is_fixed_at_construction() {
        let r = RoundedCornerRenderer::new(RendererConfig::default());
        assert_eq!(r.passes(), &frame_passes(r.config()));
    }

    // ── GPU (skipped without an adapter) ─────────────────────────────────

    const YELLOW: [u8; 4] = [255, 255, 0, 255];
    const WHITE: [u8; 4] = [255, 255, 255, 255];

    /// Reads back a 64x64 frame and checks it against the rounded rectangle
    /// drawn into the centered viewport (16..48 on both axes).
    fn assert_rounded_rect_frame(gpu: &HeadlessGpu) {
        let px = gpu.read_pixels().expect("readback");
        assert_eq!((px.width(), px.height()), (64, 64));

        let expect = |x: u32, y: u32, want: [u8; 4]| {
            assert_eq!(px.at(x, y), Some(want), "pixel ({x}, {y})");
        };

        // Inside the rectangle.
        expect(32, 32, YELLOW);
        expect(16, 32, YELLOW);
        expect(47, 32, YELLOW);
        expect(32, 16, YELLOW);
        expect(32, 47, YELLOW);
        // Just inside each arc.
        expect(20, 20, YELLOW);
        expect(43, 20, YELLOW);
        expect(20, 43, YELLOW);
        expect(43, 43, YELLOW);

        // Cut out of each corner.
        for (x, y) in [(16, 16), (47, 16), (16, 47), (47, 47), (17, 17), (46, 46)] {
            expect(x, y, WHITE);
        }

        // Outside the viewport.
        for (x, y) in [(0, 0), (63, 63), (15, 32), (48, 32), (32, 15), (32, 48)] {
            expect(x, y, WHITE);
        }
    }

    fn draw(gpu: &HeadlessGpu, r: &mut RoundedCornerRenderer) {
        gpu.render(|ctx, target| r.draw_frame(ctx, target));
    }

    #[test]
    fn frame_shows_rounded_rectangle_in_centered_viewport() {
        let Some(gpu) = headless(64, 64) else { return; };
        let mut r = RoundedCornerRenderer::new(RendererConfig::default());

        r.setup(&gpu.render_ctx());
        r.resize(64, 64);
        draw(&gpu, &mut r);
        assert_rounded_rect_frame(&gpu);
    }

    #[test]
    fn setup_twice_yields_a_fresh_ready_renderer() {
        let Some(gpu) = headless(64, 64) else { return; };
        let mut r = RoundedCornerRenderer::new(RendererConfig::default());

        r.setup(&gpu.render_ctx());
        assert_eq!(r.state(), RendererState::Ready);
        assert_eq!(r.generation(), 1);

        r.setup(&gpu.render_ctx());
        assert_eq!(r.state(), RendererState::Ready);
        assert_eq!(r.generation(), 2);

        r.resize(64, 64);
        draw(&gpu, &mut r);
        assert_rounded_rect_frame(&gpu);
    }

    #[test]
    fn release_returns_to_uninitialized_and_setup_recovers() {
        let Some(gpu) = headless(64, 64) else { return; };
        let mut r = RoundedCornerRenderer::new(RendererConfig::default());
        r.resize(64, 64);

        r.setup(&gpu.render_ctx());
        r.release();
        assert_eq!(r.state(), RendererState::Uninitialized);

        // Drawing now records nothing instead of touching destroyed buffers,
        // so the target keeps its zero-initialized contents.
        draw(&gpu, &mut r);
        let px = gpu.read_pixels().expect("readback");
        assert_eq!(px.at(32, 32), Some([0, 0, 0, 0]));

        r.setup(&gpu.render_ctx());
        assert_eq!(r.state(), RendererState::Ready);
        draw(&gpu, &mut r);
        assert_rounded_rect_frame(&gpu);
    }

    #[test]
    fn degenerate_precision_fills_the_whole_viewport() {
        let Some(gpu) = headless(64, 64) else { return; };
        let config = RendererConfig {
            geometry: CutoutParams { radius: 0.5, precision: 0 },
            ..RendererConfig::default()
        };
        let mut r = RoundedCornerRenderer::new(config);
        r.setup(&gpu.render_ctx());
        r.resize(64, 64);
        draw(&gpu, &mut r);
        assert_eq!(r.state(), RendererState::Ready);

        // No cutout triangles, so nothing is masked.
        let px = gpu.read_pixels().expect("readback");
        assert_eq!(px.at(16, 16), Some(YELLOW));
        assert_eq!(px.at(32, 32), Some(YELLOW));
        assert_eq!(px.at(0, 0), Some(WHITE));
    }
}
