use bytemuck::{Pod, Zeroable};
use glam::DVec2;
use serde::Serialize;

/// What an [`Instance`] depicts. Stored as `u32` in the instance so the
/// buffer stays `Pod`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Kind {
    MiniStarGlow = 0,
    MiniStar = 1,
    FlowerShadow = 2,
    Flower = 3,
    Cat = 4,
    LureGlow = 5,
    Lure = 6,
    Particle = 7,
}

/// Per-entity visual output for one tick.
/// Stride = 40 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize)]
pub struct Instance {
    /// Screen position (x, y) in pixels.
    pub position: [f32; 2],
    /// Scale multiplier (x, y). Negative x mirrors horizontally.
    pub scale: [f32; 2],
    /// Rotation in degrees.
    pub rotation: f32,
    /// Opacity in [0, 1].
    pub opacity: f32,
    /// RGB packed as 0xRRGGBB. Doubles as a tint for sprites.
    pub color: u32,
    /// [`Kind`] discriminant.
    pub kind: u32,
    /// Cat sprite id, flower sheet cell, or 0.
    pub variant: u32,
    /// Animation frame index for the cat. Glow kinds carry their gradient
    /// strength here instead, as a percentage (0..=100).
    pub frame: u32,
}

impl Instance {
    pub fn new(kind: Kind, pos: DVec2) -> Self {
        Self {
            position: pos.as_vec2().into(),
            scale: [1.0, 1.0],
            rotation: 0.0,
            opacity: 1.0,
            color: 0xFFFFFF,
            kind: kind as u32,
            variant: 0,
            frame: 0,
        }
    }

    pub fn scaled(mut self, scale: f64) -> Self {
        self.scale = [scale as f32, scale as f32];
        self
    }

    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotation = degrees as f32;
        self
    }

    pub fn faded(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0) as f32;
        self
    }

    pub fn colored(mut self, color: u32) -> Self {
        self.color = color & 0xFFFFFF;
        self
    }

    pub fn is(&self, kind: Kind) -> bool {
        self.kind == kind as u32
    }
}

/// Grey tint with equal channels, as used for depth darkening.
pub fn gray(brightness: f64) -> u32 {
    let c = (brightness.clamp(0.0, 1.0) * 255.0).round() as u32;
    (c << 16) | (c << 8) | c
}
