use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};

use crate::config::FlightConfig;
use crate::input::MovementFlags;

const DEGENERATE_EPSILON: f32 = 1e-12;

/// Motion constants applied once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightParams {
    pub speed: f32,
    pub rotation_speed: f32,
    pub torus_spin: Vec3,
}

impl Default for FlightParams {
    fn default() -> Self {
        Self::from_config(&FlightConfig::default())
    }
}

impl FlightParams {
    pub fn from_config(config: &FlightConfig) -> Self {
        Self {
            speed: config.speed,
            rotation_speed: config.rotation_speed,
            torus_spin: Vec3::from_array(config.torus_spin),
        }
    }
}

/// Camera pose. Rotation is Euler XYZ in radians (pitch, yaw, roll); only yaw
/// is driven by input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl CameraState {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
        }
    }

    pub fn yaw(&self) -> f32 {
        self.rotation.y
    }

    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    /// Camera-to-world transform.
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation(), self.position)
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.world_matrix().inverse()
    }

    /// Orient the camera (which looks down its local -Z) towards `target`,
    /// keeping +Y as up. Roll ends up zero.
    ///
    /// The result depends only on position and target. A target on the
    /// camera gives the identity orientation; a target straight above or
    /// below has its direction nudged off the vertical by `1e-4` so a basis
    /// still exists.
    pub fn look_at(&mut self, target: Vec3) {
        let offset = self.position - target;
        let mut back = if offset.length_squared() < DEGENERATE_EPSILON {
            Vec3::Z
        } else {
            offset.normalize()
        };
        let mut right = Vec3::Y.cross(back);
        if right.length_squared() < DEGENERATE_EPSILON {
            back.z += 1e-4;
            back = back.normalize();
            right = Vec3::Y.cross(back);
        }
        let right = right.normalize();
        let up = back.cross(right);

        let q = Quat::from_mat3(&Mat3::from_cols(right, up, back));
        let (x, y, z) = q.to_euler(EulerRot::XYZ);
        self.rotation = Vec3::new(x, y, z);
    }
}

/// Integrate one frame of camera motion from the held keys.
///
/// Forward moves along the yaw heading on the XZ plane, left/right turn about
/// the vertical axis, up/down move along world Y. Opposing keys cancel.
pub fn integrate_camera(camera: &mut CameraState, flags: &MovementFlags, params: &FlightParams) {
    let speed = params.speed;
    let yaw = camera.rotation.y;

    if flags.forward {
        camera.position.x -= yaw.sin() * speed;
        camera.position.z -= yaw.cos() * speed;
    }
    if flags.backward {
        camera.position.x += yaw.sin() * speed;
        camera.position.z += yaw.cos() * speed;
    }

    if flags.left {
        camera.rotation.y += params.rotation_speed;
    }
    if flags.right {
        camera.rotation.y -= params.rotation_speed;
    }

    if flags.up {
        camera.position.y += speed;
    }
    if flags.down {
        camera.position.y -= speed;
    }
}

/// Advance a decorative rotation by one frame.
pub fn spin(rotation: &mut Vec3, rate: Vec3) {
    *rotation += rate;
}
