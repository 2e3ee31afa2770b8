//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - keeping a depth attachment the size of the surface
//! - acquiring, clearing and presenting frames

mod depth;
mod frame;
mod gpu;
mod init;
mod surface;

pub use depth::DepthBuffer;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
