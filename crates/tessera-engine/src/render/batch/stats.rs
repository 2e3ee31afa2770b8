use super::vertex::{INDICES_PER_QUAD, VERTICES_PER_QUAD};

/// Running batch renderer counters.
///
/// Never reset implicitly; the caller zeroes them with
/// `BatchRenderer::reset_stats` at whatever cadence it wants (usually once
/// per frame).
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct BatchStats {
    /// Flushes issued, implicit ones included.
    pub draw_count: u32,
    /// Quads submitted. A box counts as six.
    pub quad_count: u32,
}

impl BatchStats {
    /// Widened so a long-running, never-reset counter cannot overflow here.
    #[inline]
    pub fn vertex_count(&self) -> u64 {
        u64::from(self.quad_count) * VERTICES_PER_QUAD as u64
    }

    #[inline]
    pub fn index_count(&self) -> u64 {
        u64::from(self.quad_count) * INDICES_PER_QUAD as u64
    }
}
