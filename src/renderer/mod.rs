//! WebGPU rendering module
//!
//! `scene` and `shapes` turn simulation state into plain vertices and are
//! usable headless; `pipeline` owns the GPU side.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, field_to_ndc, viewport_to_field};
pub use scene::build_scene;
pub use vertex::Vertex;
