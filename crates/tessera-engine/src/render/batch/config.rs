use anyhow::{Context, Result};

use super::vertex::{Vertex, INDICES_PER_QUAD, VERTICES_PER_QUAD};

/// Batch renderer capacities, fixed at construction.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BatchConfig {
    /// Quads one batch holds before an implicit flush (box faces count as quads).
    pub max_quads: usize,

    /// Size of the texture slot table, the reserved white slot included.
    ///
    /// The wgpu backend caps this at `SHADER_TEXTURE_SLOTS` and the device's
    /// `max_sampled_textures_per_shader_stage`.
    pub max_texture_slots: usize,
}

impl BatchConfig {
    pub const DEFAULT_MAX_QUADS: usize = 10_000;
    pub const DEFAULT_MAX_TEXTURE_SLOTS: usize = 16;

    #[inline]
    pub fn max_vertices(&self) -> usize {
        self.max_quads * VERTICES_PER_QUAD
    }

    #[inline]
    pub fn max_indices(&self) -> usize {
        self.max_quads * INDICES_PER_QUAD
    }

    /// Byte size of a vertex buffer holding a full batch.
    #[inline]
    pub fn vertex_buffer_size(&self) -> u64 {
        (self.max_vertices() * Vertex::SIZE) as u64
    }

    /// Byte size of the `u32` index buffer for a full batch.
    #[inline]
    pub fn index_buffer_size(&self) -> u64 {
        (self.max_indices() * std::mem::size_of::<u32>()) as u64
    }

    /// Checks the capacities a batch renderer can be built with.
    ///
    /// A box face must always fit in an empty batch and a textured quad must
    /// always find a free slot after a flush, so both capacities have lower
    /// bounds. Index values and the running index count are `u32`.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.max_quads >= 1, "batch capacity must hold at least one quad");
        anyhow::ensure!(
            self.max_texture_slots >= 2,
            "texture slot table needs at least one slot beyond the white texture (got {})",
            self.max_texture_slots
        );

        self.max_quads
            .checked_mul(VERTICES_PER_QUAD * Vertex::SIZE)
            .context("batch vertex buffer size overflows usize")?;

        let max_indices = self.max_quads.checked_mul(INDICES_PER_QUAD).unwrap_or(usize::MAX);
        anyhow::ensure!(
            max_indices <= u32::MAX as usize,
            "{} quads exceed the u32 index range",
            self.max_quads
        );

        Ok(())
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_quads: Self::DEFAULT_MAX_QUADS,
            max_texture_slots: Self::DEFAULT_MAX_TEXTURE_SLOTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let cfg = BatchConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.max_vertices(), 40_000);
        assert_eq!(cfg.max_indices(), 60_000);
        assert_eq!(cfg.vertex_buffer_size(), 40_000 * Vertex::SIZE as u64);
        assert_eq!(cfg.index_buffer_size(), 240_000);
    }

    #[test]
    fn zero_quads_rejected() {
        let cfg = BatchConfig { max_quads: 0, ..BatchConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn white_slot_only_rejected() {
        let cfg = BatchConfig { max_texture_slots: 1, ..BatchConfig::default() };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("white texture"));
    }

    #[test]
    fn quad_count_beyond_index_range_rejected() {
        let cfg = BatchConfig { max_quads: (u32::MAX as usize / 4) + 1, ..BatchConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn index_count_bounds_capacity_before_vertex_count() {
        let largest = u32::MAX as usize / INDICES_PER_QUAD;
        let ok = BatchConfig { max_quads: largest, ..BatchConfig::default() };
        ok.validate().unwrap();

        // Vertex count still fits in u32 here; the running index count would not.
        let over = BatchConfig { max_quads: largest + 1, ..BatchConfig::default() };
        assert!(over.max_vertices() <= u32::MAX as usize);
        assert!(over.validate().is_err());
    }
}
