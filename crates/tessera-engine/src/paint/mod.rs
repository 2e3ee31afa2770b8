//! Paint model shared between callers and the batch renderer.
//!
//! Scope:
//! - color representation (straight alpha, channels in [0, 1])
//! - fill sources for quads (solid color or bound texture)
//!
//! Geometry types remain in `coords`.

pub mod color;
pub mod fill;

pub use color::Color;
pub use fill::Fill;
