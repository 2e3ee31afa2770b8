use crate::render::batch::TextureId;

use super::Color;

/// Fill source for a quad.
///
/// Solid fills sample the reserved white texture and tint it with the color;
/// textured fills sample the given texture with an opaque white tint, so both
/// share one shader path.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Fill {
    Solid(Color),
    Texture(TextureId),
}

impl Fill {
    #[inline]
    pub const fn solid(color: Color) -> Self {
        Fill::Solid(color)
    }

    #[inline]
    pub const fn texture(id: TextureId) -> Self {
        Fill::Texture(id)
    }
}

impl From<Color> for Fill {
    #[inline]
    fn from(color: Color) -> Self {
        Fill::Solid(color)
    }
}

impl From<TextureId> for Fill {
    #[inline]
    fn from(id: TextureId) -> Self {
        Fill::Texture(id)
    }
}
