use super::vertex::{Vertex, INDICES_PER_QUAD, QUAD_INDEX_PATTERN, VERTICES_PER_QUAD};

/// CPU-side vertex storage for the batch in progress.
///
/// Preallocated once for a fixed number of quads. `push_quad` appends at the
/// cursor; `rewind` moves the cursor back to the start without touching the
/// stored data. Only `written()` (the prefix up to the cursor) is ever
/// uploaded.
#[derive(Debug)]
pub(super) struct StagingBuffer {
    vertices: Box<[Vertex]>,
    cursor: usize,
}

impl StagingBuffer {
    pub(super) fn with_quad_capacity(max_quads: usize) -> Self {
        Self {
            vertices: vec![Vertex::default(); max_quads * VERTICES_PER_QUAD].into_boxed_slice(),
            cursor: 0,
        }
    }

    #[inline]
    pub(super) fn rewind(&mut self) {
        self.cursor = 0;
    }

    #[inline]
    pub(super) fn quad_capacity(&self) -> usize {
        self.vertices.len() / VERTICES_PER_QUAD
    }

    /// Number of quads written since the last rewind.
    #[inline]
    pub(super) fn quads(&self) -> usize {
        self.cursor / VERTICES_PER_QUAD
    }

    #[inline]
    pub(super) fn has_room_for_quad(&self) -> bool {
        self.cursor + VERTICES_PER_QUAD <= self.vertices.len()
    }

    /// Appends one quad at the cursor.
    ///
    /// Callers check `has_room_for_quad` first; the batch renderer flushes
    /// before this can overflow.
    #[inline]
    pub(super) fn push_quad(&mut self, quad: [Vertex; VERTICES_PER_QUAD]) {
        debug_assert!(self.has_room_for_quad(), "staging buffer overflow");
        let end = self.cursor + VERTICES_PER_QUAD;
        self.vertices[self.cursor..end].copy_from_slice(&quad);
        self.cursor = end;
    }

    /// Vertices written since the last rewind, in submission order.
    #[inline]
    pub(super) fn written(&self) -> &[Vertex] {
        &self.vertices[..self.cursor]
    }

    #[inline]
    pub(super) fn written_bytes(&self) -> usize {
        self.cursor * Vertex::SIZE
    }
}

/// Builds the static index buffer contents for `max_quads` quads.
///
/// Quad `i` uses vertices `4i..4i+4` with the shared 0-1-2, 2-3-0 pattern.
/// Valid for the renderer's lifetime because every primitive is written with
/// the same corner winding.
pub(super) fn quad_indices(max_quads: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(max_quads * INDICES_PER_QUAD);
    for quad in 0..max_quads {
        let base = (quad * VERTICES_PER_QUAD) as u32;
        indices.extend(QUAD_INDEX_PATTERN.iter().map(|i| base + i));
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_at(x: f32) -> [Vertex; 4] {
        let mut v = Vertex::default();
        v.position = [x, 0.0, 0.0];
        [v; 4]
    }

    #[test]
    fn quad_indices_repeat_pattern_with_stride_four() {
        assert_eq!(quad_indices(2), vec![0, 1, 2, 2, 3, 0, 4, 5, 6, 6, 7, 4]);
    }

    #[test]
    fn quad_indices_cover_full_capacity() {
        let indices = quad_indices(10_000);
        assert_eq!(indices.len(), 60_000);
        assert_eq!(indices.iter().copied().max(), Some(39_999));
    }

    #[test]
    fn push_advances_cursor_and_rewind_resets_it() {
        let mut s = StagingBuffer::with_quad_capacity(3);
        assert_eq!(s.quad_capacity(), 3);
        assert!(s.written().is_empty());

        s.push_quad(quad_at(1.0));
        s.push_quad(quad_at(2.0));
        assert_eq!(s.quads(), 2);
        assert_eq!(s.written().len(), 8);
        assert_eq!(s.written_bytes(), 8 * Vertex::SIZE);
        assert_eq!(s.written()[4].position[0], 2.0);

        s.rewind();
        assert_eq!(s.quads(), 0);
        assert!(s.written().is_empty());
    }

    #[test]
    fn room_runs_out_at_capacity() {
        let mut s = StagingBuffer::with_quad_capacity(2);
        s.push_quad(quad_at(0.0));
        assert!(s.has_room_for_quad());
        s.push_quad(quad_at(0.0));
        assert!(!s.has_room_for_quad());
    }

    #[test]
    fn written_never_exposes_data_past_the_cursor() {
        let mut s = StagingBuffer::with_quad_capacity(4);
        for i in 0..4 {
            s.push_quad(quad_at(i as f32));
        }
        s.rewind();
        s.push_quad(quad_at(9.0));
        assert_eq!(s.written().len(), 4);
        assert!(s.written().iter().all(|v| v.position[0] == 9.0));
    }
}
