use minicraft_geom::{Mat4, Quat, Vec3};

/// Eye position and orientation. Right-handed, Y up, looking down -Z at rest.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Yaw about +Y then pitch about the yawed right axis, in radians.
    pub fn from_yaw_pitch(position: Vec3, yaw: f32, pitch: f32) -> Self {
        let yaw_q = Quat::from_axis_angle(Vec3::UP, yaw);
        let pitch_q = Quat::from_axis_angle(Vec3::RIGHT, pitch);
        Self {
            position,
            rotation: (yaw_q * pitch_q).normalized(),
        }
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation.rotate(Vec3::FORWARD)
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        self.rotation.rotate(Vec3::RIGHT)
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.rotation.rotate(Vec3::UP)
    }

    /// Camera-to-world transform.
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.world_matrix().rigid_inverse()
    }

    /// Point one unit ahead, for look-at style renderers.
    pub fn target(&self) -> Vec3 {
        self.position + self.forward()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn rest_orientation_looks_down_negative_z() {
        let cam = Camera::new(Vec3::new(1.0, 2.0, 3.0));
        assert!(close(cam.forward(), Vec3::new(0.0, 0.0, -1.0)));
        assert!(close(cam.right(), Vec3::RIGHT));
        assert!(close(cam.up(), Vec3::UP));
        assert!(close(cam.target(), Vec3::new(1.0, 2.0, 2.0)));
    }

    #[test]
    fn yaw_quarter_turn_faces_negative_x() {
        let cam = Camera::from_yaw_pitch(Vec3::ZERO, std::f32::consts::FRAC_PI_2, 0.0);
        assert!(close(cam.forward(), Vec3::new(-1.0, 0.0, 0.0)));
        assert!(close(cam.right(), Vec3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn view_matrix_inverts_world_matrix() {
        let cam = Camera::from_yaw_pitch(Vec3::new(4.0, 5.0, -6.0), 0.7, -0.3);
        let p = Vec3::new(0.25, -1.0, 2.0);
        let there = cam.world_matrix().transform_point(p);
        assert!(close(cam.view_matrix().transform_point(there), p));
        assert!(close(cam.view_matrix().transform_point(cam.position), Vec3::ZERO));
    }
}
