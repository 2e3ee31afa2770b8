use std::collections::HashMap;

use anyhow::Result;

/// Opaque texture handle.
///
/// The batch renderer only compares handles; it never owns what they name.
/// `GpuBackend` hands them out from `create_texture_rgba8`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TextureId(u32);

impl TextureId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Pixel format of every texture the backend creates.
pub(super) const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// A created texture and the view the batch bind group samples.
pub(super) struct GpuTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl GpuTexture {
    /// Creates an RGBA8 texture and uploads `pixels` (tightly packed rows).
    pub(super) fn create_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<Self> {
        anyhow::ensure!(width > 0 && height > 0, "texture '{label}' has zero size");

        let max_dim = device.limits().max_texture_dimension_2d;
        anyhow::ensure!(
            width <= max_dim && height <= max_dim,
            "texture '{label}' is {width}x{height}, device limit is {max_dim}"
        );

        let expected = width as usize * height as usize * 4;
        anyhow::ensure!(
            pixels.len() == expected,
            "texture '{label}' expects {expected} bytes of RGBA8, got {}",
            pixels.len()
        );

        let size = wgpu::Extent3d { width, height, depth_or_array_layers: 1 };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        log::debug!("created texture '{label}' ({width}x{height})");
        Ok(Self { texture, view })
    }

    #[inline]
    pub(super) fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub(super) fn destroy(self) {
        self.texture.destroy();
    }
}

/// Handle table for the textures a backend owns.
///
/// Handles are never reused. A pinned handle (the white texture) survives
/// `remove` and only leaves through `drain`.
pub(super) struct TextureStore<T = GpuTexture> {
    entries: HashMap<TextureId, T>,
    next_id: u32,
    pinned: Option<TextureId>,
}

impl<T> Default for TextureStore<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            next_id: 0,
            pinned: None,
        }
    }
}

impl<T> TextureStore<T> {
    pub(super) fn insert(&mut self, entry: T) -> TextureId {
        let id = TextureId(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, entry);
        id
    }

    /// Inserts an entry that `remove` refuses to take out.
    pub(super) fn insert_pinned(&mut self, entry: T) -> TextureId {
        let id = self.insert(entry);
        self.pinned = Some(id);
        id
    }

    #[inline]
    pub(super) fn get(&self, id: TextureId) -> Option<&T> {
        self.entries.get(&id)
    }

    /// `None` for unknown handles and for the pinned one.
    pub(super) fn remove(&mut self, id: TextureId) -> Option<T> {
        if self.pinned == Some(id) {
            return None;
        }
        self.entries.remove(&id)
    }

    /// Takes every entry out, the pinned one included.
    pub(super) fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.pinned = None;
        self.entries.drain().map(|(_, t)| t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinned_entry_is_not_removable() {
        let mut store = TextureStore::default();
        let white = store.insert_pinned("white");
        let checker = store.insert("checker");

        assert_eq!(store.remove(white), None);
        assert_eq!(store.get(white), Some(&"white"));
        assert_eq!(store.remove(checker), Some("checker"));
    }

    #[test]
    fn unknown_and_removed_handles_are_refused() {
        let mut store = TextureStore::default();
        let id = store.insert(1u8);

        assert_eq!(store.remove(id), Some(1));
        assert_eq!(store.remove(id), None);
        assert_eq!(store.remove(TextureId::from_raw(99)), None);
    }

    #[test]
    fn handles_are_not_reused() {
        let mut store = TextureStore::default();
        let a = store.insert(());
        store.remove(a);
        let b = store.insert(());
        assert_ne!(a, b);
    }

    #[test]
    fn drain_takes_the_pinned_entry_too() {
        let mut store = TextureStore::default();
        store.insert_pinned(0);
        store.insert(1);

        let mut all: Vec<i32> = store.drain().collect();
        all.sort();
        assert_eq!(all, vec![0, 1]);
        assert!(store.get(TextureId::from_raw(0)).is_none());
    }
}
