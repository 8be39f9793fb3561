//! The two-pass frame protocol as data.
//!
//! Each `PassDesc` pairs one pipeline-state transition (stencil rule, color
//! writes, uniform color) with one indexed draw. `frame_passes` is the only
//! place that decides their order: mask first, fill second. Both the wgpu
//! renderer and the CPU reference consume these descriptors unchanged.

use crate::paint::Color;

use super::RendererConfig;

/// Stencil value the mask pass writes and the fill pass tests against.
pub const MASK_REFERENCE: u32 = 0x1;

pub const DEPTH_COMPARE: wgpu::CompareFunction = wgpu::CompareFunction::Less;
pub const DEPTH_WRITE: bool = true;

/// Which uploaded mesh a pass draws.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MeshSlot {
    Cutout,
    Rect,
}

impl MeshSlot {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            MeshSlot::Cutout => 0,
            MeshSlot::Rect => 1,
        }
    }
}

/// One pipeline-state transition followed by one indexed draw.
#[derive(Debug, Clone, PartialEq)]
pub struct PassDesc {
    pub label: &'static str,
    pub mesh: MeshSlot,
    pub color: Color,
    pub stencil: wgpu::StencilState,
    pub reference: u32,
    pub color_writes: wgpu::ColorWrites,
}

impl PassDesc {
    /// Depth-stencil state for a pipeline built from this pass.
    pub fn depth_stencil_state(&self, format: wgpu::TextureFormat) -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format,
            depth_write_enabled: DEPTH_WRITE,
            depth_compare: DEPTH_COMPARE,
            stencil: self.stencil.clone(),
            bias: wgpu::DepthBiasState::default(),
        }
    }
}

fn both_faces(
    face: wgpu::StencilFaceState,
    read_mask: u32,
    write_mask: u32,
) -> wgpu::StencilState {
    wgpu::StencilState {
        front: face,
        back: face,
        read_mask,
        write_mask,
    }
}

/// Marks every rasterized cutout fragment with `MASK_REFERENCE`.
///
/// The compare never passes, so the fail op does the writing and no fragment
/// reaches depth or color.
pub fn mask_pass(color: Color) -> PassDesc {
    PassDesc {
        label: "roundcut mask pass",
        mesh: MeshSlot::Cutout,
        color,
        stencil: both_faces(
            wgpu::StencilFaceState {
                compare: wgpu::CompareFunction::Never,
                fail_op: wgpu::StencilOperation::Replace,
                depth_fail_op: wgpu::StencilOperation::Keep,
                pass_op: wgpu::StencilOperation::Keep,
            },
            0xFF,
            0xFF,
        ),
        reference: MASK_REFERENCE,
        color_writes: wgpu::ColorWrites::empty(),
    }
}

/// Fills the rectangle wherever the stencil is not `MASK_REFERENCE`.
pub fn fill_pass(color: Color) -> PassDesc {
    PassDesc {
        label: "roundcut fill pass",
        mesh: MeshSlot::Rect,
        color,
        stencil: both_faces(
            wgpu::StencilFaceState {
                compare: wgpu::CompareFunction::NotEqual,
                fail_op: wgpu::StencilOperation::Keep,
                depth_fail_op: wgpu::StencilOperation::Keep,
                pass_op: wgpu::StencilOperation::Keep,
            },
            0xFF,
            0x00,
        ),
        reference: MASK_REFERENCE,
        color_writes: wgpu::ColorWrites::ALL,
    }
}

/// The per-frame protocol, in execution order.
pub fn frame_passes(config: &RendererConfig) -> [PassDesc; 2] {
    [mask_pass(config.mask_color), fill_pass(config.fill_color)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_precedes_fill() {
        let [first, second] = frame_passes(&RendererConfig::default());
        assert_eq!(first.mesh, MeshSlot::Cutout);
        assert_eq!(second.mesh, MeshSlot::Rect);
    }

    #[test]
    fn mask_pass_writes_reference_on_every_fragment() {
        let pass = mask_pass(Color::RED);
        assert_eq!(pass.stencil.write_mask, 0xFF);
        assert_eq!(pass.reference, 0x1);
        assert_eq!(pass.stencil.front.compare, wgpu::CompareFunction::Never);
        assert_eq!(pass.stencil.front.fail_op, wgpu::StencilOperation::Replace);
        assert_eq!(pass.stencil.front, pass.stencil.back);
        assert!(pass.color_writes.is_empty());
    }

    #[test]
    fn fill_pass_only_reads_the_stencil() {
        let pass = fill_pass(Color::YELLOW);
        assert_eq!(pass.stencil.write_mask, 0x00);
        assert_eq!(pass.stencil.front.compare, wgpu::CompareFunction::NotEqual);
        assert_eq!(pass.stencil.front.fail_op, wgpu::StencilOperation::Keep);
        assert_eq!(pass.stencil.front.depth_fail_op, wgpu::StencilOperation::Keep);
        assert_eq!(pass.stencil.front.pass_op, wgpu::StencilOperation::Keep);
        assert_eq!(pass.color_writes, wgpu::ColorWrites::ALL);
    }

    #[test]
    fn pass_colors_come_from_config() {
        let config = RendererConfig::default();
        let [mask, fill] = frame_passes(&config);
        assert_eq!(mask.color, Color::RED);
        assert_eq!(fill.color, Color::YELLOW);
    }

    #[test]
    fn depth_state_carries_pass_stencil() {
        let pass = fill_pass(Color::YELLOW);
        let ds = pass.depth_stencil_state(wgpu::TextureFormat::Depth24PlusStencil8);
        assert_eq!(ds.stencil, pass.stencil);
        assert_eq!(ds.depth_compare, wgpu::CompareFunction::Less);
    }
}
