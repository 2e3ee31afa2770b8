/// A single acquired surface texture.
///
/// Short-lived: holding it prevents acquisition of the next frame. Hand it
/// back to `Gpu::present` once every draw for the frame has been submitted.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}
