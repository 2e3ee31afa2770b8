use glam::Vec3;

/// World-space up axis boxes are oriented against.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Orthonormal local frame of a box.
///
/// `facing` points out of the front face, `right` along the box width and
/// `up` along its height.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Basis {
    pub facing: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl Basis {
    /// Builds the frame for a facing direction.
    ///
    /// `right = normalize(WORLD_UP × facing)` and `up = normalize(facing × right)`.
    ///
    /// Degenerate input:
    /// - a zero-length or non-finite `facing` is replaced by +Z
    /// - a `facing` parallel to `WORLD_UP` takes world +X, made orthogonal
    ///   to `facing`, as `right`
    ///
    /// A nearly parallel `facing` still uses the cross product, so the frame
    /// turns continuously as `facing` approaches `WORLD_UP`.
    pub fn from_facing(facing: Vec3) -> Self {
        let facing = facing.try_normalize().unwrap_or(Vec3::Z);

        let right = WORLD_UP
            .cross(facing)
            .try_normalize()
            .or_else(|| (Vec3::X - facing * facing.x).try_normalize())
            .unwrap_or(Vec3::X);

        let up = facing.cross(right).normalize();

        Self { facing, right, up }
    }
}

impl Default for Basis {
    fn default() -> Self {
        Self::from_facing(Vec3::Z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_orthonormal(b: Basis) {
        assert_abs_diff_eq!(b.facing.length(), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(b.right.length(), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(b.up.length(), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(b.facing.dot(b.right), 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(b.facing.dot(b.up), 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(b.right.dot(b.up), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn facing_z_gives_world_axes() {
        let b = Basis::from_facing(Vec3::Z);
        assert_eq!(b.facing, Vec3::Z);
        assert_eq!(b.right, Vec3::X);
        assert_eq!(b.up, Vec3::Y);
    }

    #[test]
    fn right_is_orthogonal_to_facing_and_world_up() {
        let b = Basis::from_facing(Vec3::Z);
        assert_eq!(b.right.dot(Vec3::Z), 0.0);
        assert_eq!(b.right.dot(WORLD_UP), 0.0);
    }

    #[test]
    fn facing_is_normalized() {
        let b = Basis::from_facing(Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(b.facing, Vec3::Z);
    }

    #[test]
    fn arbitrary_facing_is_orthonormal() {
        for facing in [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-1.0, 0.3, 2.0),
            Vec3::new(0.2, -0.9, 0.1),
            Vec3::new(-3.0, 4.0, -5.0),
        ] {
            assert_orthonormal(Basis::from_facing(facing));
        }
    }

    #[test]
    fn facing_parallel_to_up_falls_back_to_world_x() {
        let b = Basis::from_facing(Vec3::Y);
        assert_eq!(b.right, Vec3::X);
        assert_orthonormal(b);

        let b = Basis::from_facing(-Vec3::Y);
        assert_eq!(b.right, Vec3::X);
        assert_orthonormal(b);
    }

    #[test]
    fn nearly_parallel_facing_keeps_the_cross_product_frame() {
        let b = Basis::from_facing(Vec3::new(7e-5, 1.0, 7e-5));
        let half = std::f32::consts::FRAC_1_SQRT_2;
        assert_abs_diff_eq!(b.right.x, half, epsilon = 1e-4);
        assert_abs_diff_eq!(b.right.y, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(b.right.z, -half, epsilon = 1e-4);
        assert_orthonormal(b);
    }

    #[test]
    fn underflowing_cross_product_still_yields_an_orthogonal_right() {
        let b = Basis::from_facing(Vec3::new(1e-30, 1.0, 0.0));
        assert_abs_diff_eq!(b.right.dot(b.facing), 0.0, epsilon = 1e-6);
        assert_orthonormal(b);
    }

    #[test]
    fn zero_facing_falls_back_to_z() {
        assert_eq!(Basis::from_facing(Vec3::ZERO), Basis::from_facing(Vec3::Z));
        assert_eq!(Basis::from_facing(Vec3::NAN), Basis::from_facing(Vec3::Z));
    }
}
