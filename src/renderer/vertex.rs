//! Vertex type and colour palette

use bytemuck::{Pod, Zeroable};

/// Linear RGBA in 0..1
pub type Color = [f32; 4];

/// 2D vertex in logical pixels with a colour
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: Color,
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: Color) -> Self {
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

/// Colour from 8-bit channels
pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
    [
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        a as f32 / 255.0,
    ]
}

pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
    rgba(r, g, b, 255)
}

/// Same colour with alpha scaled to `alpha` (clamped to 0..1)
pub fn fade(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], alpha.clamp(0.0, 1.0)]
}

/// Named palette
pub mod colors {
    use super::{Color, rgb, rgba};

    pub const LIGHTGRAY: Color = rgb(200, 200, 200);
    pub const GRAY: Color = rgb(130, 130, 130);
    pub const DARKGRAY: Color = rgb(80, 80, 80);
    pub const YELLOW: Color = rgb(253, 249, 0);
    pub const GOLD: Color = rgb(255, 203, 0);
    pub const ORANGE: Color = rgb(255, 161, 0);
    pub const PINK: Color = rgb(255, 109, 194);
    pub const RED: Color = rgb(230, 41, 55);
    pub const MAROON: Color = rgb(190, 33, 55);
    pub const GREEN: Color = rgb(0, 228, 48);
    pub const LIME: Color = rgb(0, 158, 47);
    pub const DARKGREEN: Color = rgb(0, 117, 44);
    pub const SKYBLUE: Color = rgb(102, 191, 255);
    pub const BLUE: Color = rgb(0, 121, 241);
    pub const DARKBLUE: Color = rgb(0, 82, 172);
    pub const PURPLE: Color = rgb(200, 122, 255);
    pub const VIOLET: Color = rgb(135, 60, 190);
    pub const DARKPURPLE: Color = rgb(112, 31, 126);
    pub const BEIGE: Color = rgb(211, 176, 131);
    pub const BROWN: Color = rgb(127, 106, 79);
    pub const WHITE: Color = rgb(255, 255, 255);
    pub const BLACK: Color = rgb(0, 0, 0);
    pub const BLANK: Color = rgba(0, 0, 0, 0);
    pub const MAGENTA: Color = rgb(255, 0, 255);
    pub const RAYWHITE: Color = rgb(245, 245, 245);
}
