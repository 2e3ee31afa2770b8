//! Coordinate and geometry types shared by the batch renderer and its callers.
//!
//! World space:
//! - right-handed, +Y up
//! - 2D quads live in the z = 0 plane, growing toward +X / +Y
//!
//! Vector and matrix math comes from `glam`; this module adds the frame and
//! viewport types the renderer needs on top of it.

mod basis;
mod viewport;

pub use basis::{Basis, WORLD_UP};
pub use glam::{Mat4, Vec2, Vec3, Vec4};
pub use viewport::Viewport;
