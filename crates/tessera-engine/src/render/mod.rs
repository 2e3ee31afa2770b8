//! GPU rendering subsystem.
//!
//! The batch renderer collects quads and boxes into a CPU staging buffer and
//! issues the fewest indexed draw calls it can. GPU access goes through the
//! `batch::BatchBackend` seam; `batch::GpuBackend` is the wgpu implementation.
//!
//! Convention:
//! - geometry is in world units (right-handed, +Y up)
//! - the vertex shader applies a caller-supplied view-projection matrix

mod ctx;
pub mod batch;

pub use ctx::{RenderCtx, RenderTarget};
