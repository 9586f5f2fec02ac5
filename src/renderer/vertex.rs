//! Vertex types for 2D overlays

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
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
}

/// `0xRRGGBB` plus alpha as RGBA floats in [0, 1]
pub fn rgba(hex: u32, alpha: f32) -> [f32; 4] {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0), alpha]
}

/// Colors for overlays
pub mod colors {
    /// In-progress lasso stroke and fill
    pub const LASSO: u32 = 0xfff1c1;
    /// Confirmed-path flash
    pub const LASSO_FLASH: u32 = 0xffffff;
    /// Collection sparkles
    pub const SPARKLE: u32 = 0xfff1c1;
}
