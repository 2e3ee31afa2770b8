//! Vertex generation for batched primitives.
//!
//! Every primitive is emitted as quads of four corners in the same winding
//! (bottom-left, bottom-right, top-right, top-left in the quad's own frame),
//! so the precomputed index buffer applies to all of them.

use glam::{Vec2, Vec3};

use crate::coords::Basis;
use crate::paint::Color;

use super::vertex::{Vertex, QUAD_TEX_COORDS};

/// Normal written for 2D quads (they lie in the z = 0 plane).
pub const QUAD_NORMAL: Vec3 = Vec3::Z;

/// One face of a box, in emission order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BoxFace {
    Front,
    Back,
    Left,
    Right,
    Bottom,
    Top,
}

impl BoxFace {
    pub const ALL: [BoxFace; 6] = [
        BoxFace::Front,
        BoxFace::Back,
        BoxFace::Left,
        BoxFace::Right,
        BoxFace::Bottom,
        BoxFace::Top,
    ];

    /// Outward normal of this face in the given frame.
    pub fn normal(self, b: Basis) -> Vec3 {
        match self {
            BoxFace::Front => b.right.cross(b.up),
            BoxFace::Back => b.right.cross(-b.up),
            BoxFace::Left => b.facing.cross(b.up),
            BoxFace::Right => b.facing.cross(-b.up),
            BoxFace::Bottom => b.right.cross(b.facing),
            BoxFace::Top => b.facing.cross(b.right),
        }
    }
}

/// Flat color per box face.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoxColors {
    pub front: Color,
    pub back: Color,
    pub left: Color,
    pub right: Color,
    pub bottom: Color,
    pub top: Color,
}

impl BoxColors {
    /// Same color on all six faces.
    pub const fn uniform(color: Color) -> Self {
        Self {
            front: color,
            back: color,
            left: color,
            right: color,
            bottom: color,
            top: color,
        }
    }

    /// Caller color on the front face, a fixed high-contrast palette on the
    /// rest. Useful for checking box orientation by eye.
    pub const fn debug_palette(front: Color) -> Self {
        Self {
            front,
            back: Color::rgb(0.8, 0.1, 0.2),
            left: Color::rgb(0.4, 0.6, 0.2),
            right: Color::rgb(1.0, 1.0, 1.0),
            bottom: Color::rgb(0.0, 1.0, 1.0),
            top: Color::rgb(1.0, 0.0, 1.0),
        }
    }

    #[inline]
    pub fn face(&self, face: BoxFace) -> Color {
        match face {
            BoxFace::Front => self.front,
            BoxFace::Back => self.back,
            BoxFace::Left => self.left,
            BoxFace::Right => self.right,
            BoxFace::Bottom => self.bottom,
            BoxFace::Top => self.top,
        }
    }
}

impl From<Color> for BoxColors {
    #[inline]
    fn from(color: Color) -> Self {
        Self::uniform(color)
    }
}

/// Builds one quad from corners already in winding order.
#[inline]
fn quad_from_corners(corners: [Vec3; 4], color: Color, tex_slot: u32, normal: Vec3) -> [Vertex; 4] {
    let color = color.to_array();
    let normal = normal.to_array();
    std::array::from_fn(|i| Vertex {
        position: corners[i].to_array(),
        color,
        tex_coords: QUAD_TEX_COORDS[i],
        tex_slot,
        normal,
    })
}

/// Axis-aligned quad in the z = 0 plane, `position` at its bottom-left corner.
pub(super) fn quad(position: Vec2, size: Vec2, color: Color, tex_slot: u32) -> [Vertex; 4] {
    let p = position.extend(0.0);
    let w = Vec3::new(size.x, 0.0, 0.0);
    let h = Vec3::new(0.0, size.y, 0.0);
    quad_from_corners([p, p + w, p + w + h, p + h], color, tex_slot, QUAD_NORMAL)
}

/// Box geometry around a center point.
///
/// `size` is (depth along `facing`, width along `right`, height along `up`).
#[derive(Debug, Copy, Clone, PartialEq)]
pub(super) struct BoxGeometry {
    basis: Basis,
    /// Corner on the front face at the bottom-left of the box's own frame.
    front_bottom_left: Vec3,
    depth: Vec3,
    width: Vec3,
    height: Vec3,
}

impl BoxGeometry {
    pub(super) fn new(position: Vec3, size: Vec3, facing: Vec3) -> Self {
        let basis = Basis::from_facing(facing);
        let depth = basis.facing * size.x;
        let width = basis.right * size.y;
        let height = basis.up * size.z;

        Self {
            basis,
            front_bottom_left: position + depth * 0.5 - width * 0.5 - height * 0.5,
            depth,
            width,
            height,
        }
    }

    #[inline]
    pub(super) fn basis(&self) -> Basis {
        self.basis
    }

    /// Corners of one face in winding order.
    pub(super) fn corners(&self, face: BoxFace) -> [Vec3; 4] {
        let o = self.front_bottom_left;
        let (d, w, h) = (self.depth, self.width, self.height);
        match face {
            BoxFace::Front => [o, o + w, o + w + h, o + h],
            BoxFace::Back => [o - d, o + w - d, o + w + h - d, o + h - d],
            BoxFace::Left => [o, o - d, o - d + h, o + h],
            BoxFace::Right => [o + w, o - d + w, o - d + h + w, o + h + w],
            BoxFace::Bottom => [o, o - d, o - d + w, o + w],
            BoxFace::Top => [o + h, o - d + h, o - d + w + h, o + w + h],
        }
    }

    /// Vertices of one face, sampling the white texture.
    pub(super) fn face_quad(&self, face: BoxFace, colors: &BoxColors) -> [Vertex; 4] {
        quad_from_corners(self.corners(face), colors.face(face), 0, face.normal(self.basis()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn pos(v: &Vertex) -> Vec3 {
        Vec3::from_array(v.position)
    }

    fn centroid(corners: [Vec3; 4]) -> Vec3 {
        corners.iter().copied().sum::<Vec3>() / 4.0
    }

    // ── quads ─────────────────────────────────────────────────────────────

    #[test]
    fn quad_corners_follow_winding() {
        let q = quad(Vec2::new(10.0, 20.0), Vec2::new(3.0, 4.0), Color::WHITE, 0);
        assert_eq!(q[0].position, [10.0, 20.0, 0.0]);
        assert_eq!(q[1].position, [13.0, 20.0, 0.0]);
        assert_eq!(q[2].position, [13.0, 24.0, 0.0]);
        assert_eq!(q[3].position, [10.0, 24.0, 0.0]);
    }

    #[test]
    fn quad_carries_color_slot_uv_and_normal() {
        let c = Color::new(0.1, 0.2, 0.3, 0.4);
        let q = quad(Vec2::ZERO, Vec2::ONE, c, 5);
        for (i, v) in q.iter().enumerate() {
            assert_eq!(v.color, [0.1, 0.2, 0.3, 0.4]);
            assert_eq!(v.tex_slot, 5);
            assert_eq!(v.tex_coords, QUAD_TEX_COORDS[i]);
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
    }

    // ── boxes ─────────────────────────────────────────────────────────────

    #[test]
    fn facing_z_box_spans_half_extents() {
        let g = BoxGeometry::new(Vec3::ZERO, Vec3::new(2.0, 4.0, 6.0), Vec3::Z);
        let front = g.corners(BoxFace::Front);
        assert_eq!(front[0], Vec3::new(-2.0, -3.0, 1.0));
        assert_eq!(front[2], Vec3::new(2.0, 3.0, 1.0));

        let back = g.corners(BoxFace::Back);
        assert_eq!(back[0], Vec3::new(-2.0, -3.0, -1.0));
    }

    #[test]
    fn facing_z_normals_point_along_world_axes() {
        let b = Basis::from_facing(Vec3::Z);
        assert_eq!(BoxFace::Front.normal(b), Vec3::Z);
        assert_eq!(BoxFace::Back.normal(b), -Vec3::Z);
        assert_eq!(BoxFace::Left.normal(b), -Vec3::X);
        assert_eq!(BoxFace::Right.normal(b), Vec3::X);
        assert_eq!(BoxFace::Bottom.normal(b), -Vec3::Y);
        assert_eq!(BoxFace::Top.normal(b), Vec3::Y);
    }

    #[test]
    fn each_normal_is_orthogonal_to_exactly_two_frame_axes() {
        for facing in [Vec3::Z, Vec3::new(1.0, 0.5, -0.25), Vec3::new(-2.0, -1.0, 3.0)] {
            let b = Basis::from_facing(facing);
            for face in BoxFace::ALL {
                let n = face.normal(b);
                let orthogonal = [b.facing, b.right, b.up]
                    .iter()
                    .filter(|axis| n.dot(**axis).abs() < 1e-5)
                    .count();
                assert_eq!(orthogonal, 2, "{face:?} normal {n} for facing {facing}");
            }
        }
    }

    #[test]
    fn normals_point_outward() {
        let center = Vec3::new(5.0, -2.0, 8.0);
        for facing in [Vec3::Z, Vec3::X, Vec3::new(0.3, 0.7, -0.6), Vec3::Y] {
            let g = BoxGeometry::new(center, Vec3::new(3.0, 5.0, 7.0), facing);
            for face in BoxFace::ALL {
                let outward = centroid(g.corners(face)) - center;
                let n = face.normal(g.basis());
                assert!(n.dot(outward) > 0.0, "{face:?} normal {n} points inward for facing {facing}");
            }
        }
    }

    #[test]
    fn face_corners_are_coplanar_with_their_normal() {
        let g = BoxGeometry::new(Vec3::new(1.0, 2.0, 3.0), Vec3::splat(4.0), Vec3::new(1.0, 1.0, 0.0));
        for face in BoxFace::ALL {
            let corners = g.corners(face);
            let n = face.normal(g.basis());
            for c in &corners[1..] {
                assert_abs_diff_eq!((*c - corners[0]).dot(n), 0.0, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn face_quads_use_white_slot_and_face_color() {
        let g = BoxGeometry::new(Vec3::ZERO, Vec3::ONE, Vec3::Z);
        let colors = BoxColors::debug_palette(Color::rgb(0.1, 0.2, 0.8));
        for face in BoxFace::ALL {
            let q = g.face_quad(face, &colors);
            assert!(q.iter().all(|v| v.tex_slot == 0));
            assert!(q.iter().all(|v| v.color == colors.face(face).to_array()));
            assert!(q.iter().all(|v| v.normal == face.normal(g.basis()).to_array()));
            assert_eq!(centroid(q.map(|v| pos(&v))), centroid(g.corners(face)));
        }
    }

    #[test]
    fn uniform_colors_from_color() {
        let c = Color::rgb(0.5, 0.5, 0.0);
        let colors: BoxColors = c.into();
        assert!(BoxFace::ALL.iter().all(|&f| colors.face(f) == c));
    }

    #[test]
    fn debug_palette_keeps_front_color() {
        let front = Color::rgb(0.1, 0.2, 0.8);
        let colors = BoxColors::debug_palette(front);
        assert_eq!(colors.front, front);
        assert_eq!(colors.top, Color::rgb(1.0, 0.0, 1.0));
    }
}
