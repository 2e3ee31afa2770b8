use tessera_engine::coords::{Mat4, Vec3};
use tessera_engine::input::{InputFrame, InputState, Key};

/// Height change per second while W/S is held.
const HEIGHT_SPEED: f32 = 60.0;
/// Orbit angle change per second (radians) while A/D is held.
const ORBIT_SPEED: f32 = 6.0;
/// Radians of orbit per pixel of horizontal pointer motion.
const MOUSE_SENSITIVITY: f32 = 0.05;
/// Radius change per wheel line; scrolling up moves closer.
const ZOOM_STEP: f32 = 5.0;
const MIN_RADIUS: f32 = 10.0;
const MAX_RADIUS: f32 = 500.0;

/// Look-at camera circling the origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitCamera {
    /// Position on the orbit, radians from +X toward +Z.
    pub angle: f32,
    pub height: f32,
    pub radius: f32,

    /// Vertical field of view, radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            angle: 0.0,
            height: 50.0,
            radius: 100.0,
            fov_y: 90f32.to_radians(),
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl OrbitCamera {
    pub fn eye(&self) -> Vec3 {
        Vec3::new(
            self.angle.cos() * self.radius,
            self.height,
            self.angle.sin() * self.radius,
        )
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y)
    }

    /// Perspective with wgpu's [0, 1] clip depth.
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }

    /// W/S raise and lower, A/D orbit, pointer motion does both, the wheel zooms.
    pub fn update(&mut self, input: &InputState, frame: &InputFrame, dt: f32) {
        if input.key_down(Key::W) {
            self.height += HEIGHT_SPEED * dt;
        } else if input.key_down(Key::S) {
            self.height -= HEIGHT_SPEED * dt;
        }

        if input.key_down(Key::A) {
            self.angle -= ORBIT_SPEED * dt;
        } else if input.key_down(Key::D) {
            self.angle += ORBIT_SPEED * dt;
        }

        let (dx, dy) = frame.pointer_delta;
        self.angle += dx * MOUSE_SENSITIVITY;
        self.height -= dy;

        self.radius = (self.radius - frame.wheel_lines * ZOOM_STEP).clamp(MIN_RADIUS, MAX_RADIUS);
    }
}
