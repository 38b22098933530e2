//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex in field pixels (y down) with an RGBA color
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

/// Colors for game elements
pub mod colors {
    use crate::sim::PowerUpKind;

    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const FIELD: [f32; 4] = [0.04, 0.04, 0.08, 1.0];
    pub const PLAYER: [f32; 4] = [0.2, 0.6, 1.0, 1.0];
    pub const SHIELD_RING: [f32; 4] = [0.3, 0.9, 1.0, 0.6];
    pub const BULLET: [f32; 4] = [1.0, 0.95, 0.4, 1.0];
    pub const ENEMY: [f32; 4] = [0.95, 0.25, 0.25, 1.0];
    pub const GAME_OVER_BAND: [f32; 4] = [0.6, 0.0, 0.0, 0.75];

    pub const SHIELD: [f32; 4] = [0.3, 0.9, 1.0, 1.0];
    pub const TRIPLE_SHOT: [f32; 4] = [0.4, 1.0, 0.4, 1.0];
    pub const SLOW_SHOT: [f32; 4] = [0.7, 0.5, 1.0, 1.0];
    pub const FAST_SHOT: [f32; 4] = [1.0, 0.6, 0.1, 1.0];

    pub fn powerup(kind: PowerUpKind) -> [f32; 4] {
        match kind {
            PowerUpKind::Shield => SHIELD,
            PowerUpKind::TripleShot => TRIPLE_SHOT,
            PowerUpKind::SlowShot => SLOW_SHOT,
            PowerUpKind::FastShot => FAST_SHOT,
        }
    }
}
