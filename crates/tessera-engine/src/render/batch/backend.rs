use super::texture::TextureId;
use super::vertex::Vertex;

/// GPU side of the batch renderer.
///
/// `BatchRenderer` owns all batching state and calls into the backend only at
/// `end_batch` (upload) and `flush` (draw). The backend owns the vertex and
/// index buffers, the white texture and whatever pipeline state the draw needs.
pub trait BatchBackend {
    /// Texture permanently bound to slot 0. Samples as opaque white.
    fn white_texture(&self) -> TextureId;

    /// Replaces the start of the vertex buffer with `vertices`.
    ///
    /// `vertices` is exactly the span written since the last `begin_batch`;
    /// nothing past it may be read or uploaded.
    fn upload(&mut self, vertices: &[Vertex]);

    /// Issues one indexed draw over the first `index_count` indices.
    ///
    /// `textures[i]` is the texture for slot `i`; `textures[0]` is always the
    /// white texture.
    fn draw(&mut self, textures: &[TextureId], index_count: u32);

    /// Releases GPU resources. Called once, from `BatchRenderer::shutdown`.
    fn shutdown(&mut self) {}
}
