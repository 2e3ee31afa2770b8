use bytemuck::{Pod, Zeroable};

/// One corner of a batched primitive.
///
/// Layout matches `shaders/batch.wgsl` locations 0..=4.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],   // straight alpha
    pub tex_coords: [f32; 2],
    pub tex_slot: u32,     // 0 = white texture
    pub normal: [f32; 3],  // not renormalized
}

impl Vertex {
    /// Stride of one vertex in the GPU vertex buffer.
    pub const SIZE: usize = std::mem::size_of::<Vertex>();

    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x4, // color
        2 => Float32x2, // tex_coords
        3 => Uint32,    // tex_slot
        4 => Float32x3  // normal
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Self::SIZE as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Texture coordinates of a quad's corners in winding order
/// (bottom-left, bottom-right, top-right, top-left).
pub(super) const QUAD_TEX_COORDS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Index pattern shared by every quad: two triangles over its four corners.
pub(super) const QUAD_INDEX_PATTERN: [u32; 6] = [0, 1, 2, 2, 3, 0];

pub(super) const VERTICES_PER_QUAD: usize = 4;
pub(super) const INDICES_PER_QUAD: usize = 6;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_tightly_packed() {
        // 3 + 4 + 2 + 1 + 3 four-byte fields.
        assert_eq!(Vertex::SIZE, 13 * 4);
    }

    #[test]
    fn layout_offsets_follow_field_order() {
        let offsets: Vec<u64> = Vertex::ATTRS.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 28, 36, 40]);
    }
}
