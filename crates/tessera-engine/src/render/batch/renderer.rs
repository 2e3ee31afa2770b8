use anyhow::Result;
use glam::{Vec2, Vec3};

use crate::paint::{Color, Fill};
use crate::render::RenderCtx;

use super::backend::BatchBackend;
use super::config::BatchConfig;
use super::geometry::{self, BoxColors, BoxFace, BoxGeometry};
use super::gpu::GpuBackend;
use super::slots::TextureSlots;
use super::staging::StagingBuffer;
use super::stats::BatchStats;
use super::texture::TextureId;
use super::vertex::{Vertex, INDICES_PER_QUAD};

/// Immediate-mode batch renderer.
///
/// Collects quads and box faces into one staging buffer and draws each batch
/// with a single indexed call. Running out of quad capacity or texture slots
/// mid-batch triggers an implicit `end_batch → flush → begin_batch`, so
/// callers never see a capacity error, only extra draw calls.
///
/// Draw order is submission order, across implicit flushes included.
pub struct BatchRenderer<B: BatchBackend = GpuBackend> {
    backend: B,
    config: BatchConfig,

    staging: StagingBuffer,
    index_count: u32,
    slots: TextureSlots,

    stats: BatchStats,
    warned_bad_facing: bool,
}

impl BatchRenderer<GpuBackend> {
    /// Creates a renderer drawing through wgpu.
    ///
    /// Fails if the device cannot hold the configured batch; there is no
    /// fallback.
    pub fn with_gpu(ctx: &RenderCtx<'_>, config: BatchConfig) -> Result<Self> {
        let backend = GpuBackend::new(ctx, &config)?;
        Self::new(config, backend)
    }
}

impl<B: BatchBackend> BatchRenderer<B> {
    /// Allocates the staging buffer and slot table on top of `backend`.
    pub fn new(config: BatchConfig, backend: B) -> Result<Self> {
        config.validate()?;

        let slots = TextureSlots::new(backend.white_texture(), config.max_texture_slots);
        let staging = StagingBuffer::with_quad_capacity(config.max_quads);

        log::debug!(
            "batch renderer: {} quads/batch ({} KiB staging), {} texture slots",
            config.max_quads,
            staging.quad_capacity() * 4 * Vertex::SIZE / 1024,
            config.max_texture_slots
        );

        Ok(Self {
            backend,
            config,
            staging,
            index_count: 0,
            slots,
            stats: BatchStats::default(),
            warned_bad_facing: false,
        })
    }

    /// Releases the backend's GPU resources and the staging buffer.
    pub fn shutdown(mut self) {
        self.backend.shutdown();
        log::debug!("batch renderer shut down");
    }

    // ── batch lifecycle ───────────────────────────────────────────────────

    /// Starts a batch: rewinds the staging cursor. No GPU work.
    pub fn begin_batch(&mut self) {
        self.staging.rewind();
    }

    /// Uploads the vertices written since `begin_batch`.
    pub fn end_batch(&mut self) {
        log::trace!("end_batch: uploading {} bytes", self.staging.written_bytes());
        self.backend.upload(self.staging.written());
    }

    /// Draws the accumulated indices with the bound texture slots, then
    /// resets the index count and the slot table (slot 0 stays).
    ///
    /// Counts as a draw call even when nothing was submitted.
    pub fn flush(&mut self) {
        self.backend.draw(self.slots.occupied(), self.index_count);
        self.stats.draw_count += 1;

        self.index_count = 0;
        self.slots.reset();
    }

    // ── submission ────────────────────────────────────────────────────────

    /// Submits an axis-aligned quad in the z = 0 plane.
    ///
    /// `position` is the bottom-left corner. Solid fills tint the white
    /// texture; textured fills sample the texture untinted over [0, 1]².
    pub fn draw_quad(&mut self, position: Vec2, size: Vec2, fill: impl Into<Fill>) {
        match fill.into() {
            Fill::Solid(color) => {
                self.make_room_for_quad();
                self.push_quad(geometry::quad(position, size, color, 0));
            }
            Fill::Texture(id) => {
                let slot = self.texture_slot(id);
                self.push_quad(geometry::quad(position, size, Color::WHITE, slot));
            }
        }
    }

    /// Submits a box as six quads (front, back, left, right, bottom, top).
    ///
    /// `size` is (depth along `facing`, width, height); `position` is the box
    /// center. Each face is its own submission, so a box may straddle an
    /// implicit flush.
    pub fn draw_box(
        &mut self,
        position: Vec3,
        size: Vec3,
        colors: impl Into<BoxColors>,
        facing: Vec3,
    ) {
        if (facing.length_squared() == 0.0 || !facing.is_finite()) && !self.warned_bad_facing {
            log::warn!("draw_box: unusable facing {facing}; using +Z (reported once)");
            self.warned_bad_facing = true;
        }

        let colors = colors.into();
        let geometry = BoxGeometry::new(position, size, facing);

        for face in BoxFace::ALL {
            self.make_room_for_quad();
            self.push_quad(geometry.face_quad(face, &colors));
        }
    }

    // ── statistics ────────────────────────────────────────────────────────

    #[inline]
    pub fn stats(&self) -> BatchStats {
        self.stats
    }

    #[inline]
    pub fn reset_stats(&mut self) {
        self.stats = BatchStats::default();
    }

    // ── introspection ─────────────────────────────────────────────────────

    #[inline]
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Indices the next `flush` will draw.
    #[inline]
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Quads written to the staging buffer since `begin_batch`.
    #[inline]
    pub fn staged_quads(&self) -> usize {
        self.staging.quads()
    }

    /// Textures bound for the current batch, slot 0 first.
    #[inline]
    pub fn bound_textures(&self) -> &[TextureId] {
        self.slots.occupied()
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    // ── internals ─────────────────────────────────────────────────────────

    fn spill(&mut self) {
        log::trace!("batch full at {} indices; flushing", self.index_count);
        self.end_batch();
        self.flush();
        self.begin_batch();
    }

    /// Flushes first if one more quad would not fit.
    fn make_room_for_quad(&mut self) {
        let indices_full =
            self.index_count as usize + INDICES_PER_QUAD > self.config.max_indices();
        if indices_full || !self.staging.has_room_for_quad() {
            self.spill();
        }
    }

    /// Resolves the slot for `id`, flushing first if it needs a slot and none
    /// is free. Also makes room for the quad that will sample it.
    fn texture_slot(&mut self, id: TextureId) -> u32 {
        self.make_room_for_quad();

        if let Some(slot) = self.slots.find(id) {
            return slot;
        }
        if self.slots.is_full() {
            self.spill();
        }
        self.slots.bind(id)
    }

    fn push_quad(&mut self, quad: [Vertex; 4]) {
        self.staging.push_quad(quad);
        self.index_count += INDICES_PER_QUAD as u32;
        self.stats.quad_count += 1;
    }
}
