//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position (pixels, y down) and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// `0xRRGGBB` plus alpha to RGBA floats
pub const fn hex(rgb: u32, alpha: f32) -> [f32; 4] {
    [
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
        alpha,
    ]
}

/// Colors for wheel elements
pub mod colors {
    use super::hex;

    /// Sector fills, cycled by item index
    pub const PALETTE: [[f32; 4]; 12] = [
        hex(0xFF6B6B, 1.0),
        hex(0x4ECDC4, 1.0),
        hex(0x45B7D1, 1.0),
        hex(0xFFA07A, 1.0),
        hex(0x98D8C8, 1.0),
        hex(0xFDCB6E, 1.0),
        hex(0x6C5CE7, 1.0),
        hex(0xFF85A2, 1.0),
        hex(0x2ECC71, 1.0),
        hex(0x3498DB, 1.0),
        hex(0xE67E22, 1.0),
        hex(0xF1C40F, 1.0),
    ];

    pub const SECTOR_BORDER: [f32; 4] = hex(0xFFFFFF, 0.4);
    pub const EMPTY_RING: [f32; 4] = hex(0xE2E8F0, 1.0);
    pub const OUTER_RING: [f32; 4] = hex(0x2D3436, 1.0);
    pub const INNER_RING: [f32; 4] = hex(0xFFFFFF, 0.2);
    pub const HUB_CENTER: [f32; 4] = hex(0x2D3436, 1.0);
    pub const HUB_EDGE: [f32; 4] = hex(0x000000, 1.0);
    pub const HUB_STROKE: [f32; 4] = hex(0xFFFFFF, 1.0);
    pub const HUB_HIGHLIGHT: [f32; 4] = hex(0xFFFFFF, 0.3);
    pub const POINTER: [f32; 4] = hex(0x000000, 1.0);
    pub const POINTER_OUTLINE: [f32; 4] = hex(0xFFFFFF, 1.0);
    pub const LABEL: [f32; 4] = hex(0xFFFFFF, 1.0);
    pub const BACKGROUND: [f32; 4] = hex(0xFFFFFF, 1.0);
}

/// Sector fill for item `index`
#[inline]
pub fn sector_color(index: usize) -> [f32; 4] {
    colors::PALETTE[index % colors::PALETTE.len()]
}

/// Float RGBA to 8-bit
pub fn to_rgba8(color: [f32; 4]) -> [u8; 4] {
    color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        assert_eq!(to_rgba8(hex(0xFF6B6B, 1.0)), [0xFF, 0x6B, 0x6B, 0xFF]);
        assert_eq!(to_rgba8(colors::INNER_RING)[3], 51);
    }

    #[test]
    fn test_palette_cycles() {
        assert_eq!(sector_color(0), sector_color(12));
        assert_ne!(sector_color(0), sector_color(1));
        // Palette colors are pairwise distinct
        for i in 0..colors::PALETTE.len() {
            for j in i + 1..colors::PALETTE.len() {
                assert_ne!(colors::PALETTE[i], colors::PALETTE[j]);
            }
        }
    }
}
