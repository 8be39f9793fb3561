use std::sync::mpsc;

use anyhow::{Context, Result};

use crate::render::{RenderCtx, RenderTarget};

use super::{DepthStencilTarget, GpuInit};

/// Window-less GPU context rendering into an offscreen color texture.
///
/// Construction fails when the machine exposes no adapter at all.
pub struct HeadlessGpu {
    device: wgpu::Device,
    queue: wgpu::Queue,
    color: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth_stencil: DepthStencilTarget,
    size: (u32, u32),
}

impl HeadlessGpu {
    pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    pub async fn new(width: u32, height: u32, init: GpuInit) -> Result<Self> {
        anyhow::ensure!(width > 0 && height > 0, "offscreen target has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a GPU adapter for offscreen rendering")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("roundcut headless device"),
                required_features: init.required_features,
                required_limits: init.required_limits.using_resolution(adapter.limits()),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create headless wgpu device/queue")?;

        let color = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("roundcut offscreen color"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::COLOR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());
        let depth_stencil = DepthStencilTarget::new(&device, width, height);

        Ok(Self {
            device,
            queue,
            color,
            color_view,
            depth_stencil,
            size: (width, height),
        })
    }

    pub fn render_ctx(&self) -> RenderCtx<'_> {
        RenderCtx::new(
            &self.device,
            &self.queue,
            Self::COLOR_FORMAT,
            DepthStencilTarget::FORMAT,
            self.size,
        )
    }

    /// Records `draw` into a fresh encoder targeting the offscreen attachments and submits it.
    pub fn render<F>(&self, draw: F)
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("roundcut offscreen encoder"),
            });

        {
            let ctx = self.render_ctx();
            let mut target =
                RenderTarget::new(&mut encoder, &self.color_view, self.depth_stencil.view());
            draw(&ctx, &mut target);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Copies the color target back to the CPU, blocking until the GPU is done.
    pub fn read_pixels(&self) -> Result<Pixels> {
        let (width, height) = self.size;

        // Rows of a texture copy must be padded to the copy alignment.
        let row_bytes = 4 * width;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_row_bytes = row_bytes.div_ceil(align) * align;

        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("roundcut readback buffer"),
            size: padded_row_bytes as u64 * height as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("roundcut readback encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.color,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row_bytes),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let (tx, rx) = mpsc::channel();
        let slice = buffer.slice(..);
        slice.map_async(wgpu::MapMode::Read, move |res| {
            let _ = tx.send(res);
        });
        self.device
            .poll(wgpu::PollType::wait_indefinitely())
            .context("failed to wait for the readback copy")?;
        rx.recv()
            .context("readback map callback never ran")?
            .context("failed to map the readback buffer")?;

        let rgba = {
            let mapped = slice.get_mapped_range();
            let mut rgba = Vec::with_capacity((row_bytes * height) as usize);
            for row in mapped.chunks_exact(padded_row_bytes as usize) {
                rgba.extend_from_slice(&row[..row_bytes as usize]);
            }
            rgba
        };
        buffer.unmap();
        buffer.destroy();

        Ok(Pixels { width, height, rgba })
    }
}

/// RGBA8 copy of an offscreen frame, rows top to bottom.
#[derive(Debug, Clone)]
pub struct Pixels {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Pixels {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at column `x`, row `y` counted from the top.
    pub fn at(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = 4 * (y as usize * self.width as usize + x as usize);
        let px = self.rgba.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixels_index_rows_from_the_top() {
        let px = Pixels {
            width: 2,
            height: 2,
            rgba: vec![
                1, 1, 1, 1, 2, 2, 2, 2, //
                3, 3, 3, 3, 4, 4, 4, 4,
            ],
        };
        assert_eq!(px.at(1, 0), Some([2; 4]));
        assert_eq!(px.at(0, 1), Some([3; 4]));
        assert_eq!(px.at(2, 0), None);
        assert_eq!(px.at(0, 2), None);
    }
}
