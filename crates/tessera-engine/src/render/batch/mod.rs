//! Immediate-mode batch renderer.
//!
//! Per frame:
//! 1. `reset_stats` (optional, caller's choice of cadence)
//! 2. `begin_batch`
//! 3. any number of `draw_quad` / `draw_box`
//! 4. `end_batch` (uploads the written vertex span)
//! 5. `flush` (one indexed draw call)
//!
//! A submission that would overflow the staging buffer or the texture slot
//! table first runs `end_batch → flush → begin_batch` on its own, so a frame
//! may produce several draw calls without the caller noticing.

mod backend;
mod config;
mod geometry;
mod gpu;
mod renderer;
mod slots;
mod staging;
mod stats;
mod texture;
mod vertex;

pub use backend::BatchBackend;
pub use config::BatchConfig;
pub use geometry::{BoxColors, BoxFace, QUAD_NORMAL};
pub use gpu::{GpuBackend, SHADER_TEXTURE_SLOTS};
pub use renderer::BatchRenderer;
pub use stats::BatchStats;
pub use texture::TextureId;
pub use vertex::Vertex;
