use core::ops::{Mul, MulAssign};

use crate::Vec3;

/// Unit quaternion (Hamilton convention, `w` scalar part).
///
/// `a * b` is the rotation `b` followed by `a`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    pub const IDENTITY: Quat = Quat {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    #[inline]
    pub const fn from_xyzw(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle` radians around `axis` (normalized here).
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let a = axis.normalized();
        let (s, c) = (angle * 0.5).sin_cos();
        Self {
            x: a.x * s,
            y: a.y * s,
            z: a.z * s,
            w: c,
        }
    }

    #[inline]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }

    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
                z: self.z / len,
                w: self.w / len,
            }
        } else {
            Self::IDENTITY
        }
    }

    #[inline]
    pub fn conjugate(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: self.w,
        }
    }

    /// Rotate a vector by this quaternion.
    #[inline]
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let u = Vec3::new(self.x, self.y, self.z);
        let t = u.cross(v) * 2.0;
        v + t * self.w + u.cross(t)
    }
}

impl Mul for Quat {
    type Output = Quat;
    #[inline]
    fn mul(self, rhs: Quat) -> Quat {
        Quat {
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        }
    }
}

impl MulAssign for Quat {
    #[inline]
    fn mul_assign(&mut self, rhs: Quat) {
        *self = *self * rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn vapprox(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn quarter_turn_around_up_maps_forward_to_left() {
        let q = Quat::from_axis_angle(Vec3::UP, FRAC_PI_2);
        assert!(vapprox(q.rotate(Vec3::FORWARD), Vec3::new(-1.0, 0.0, 0.0)));
    }

    #[test]
    fn positive_pitch_around_right_looks_up() {
        let q = Quat::from_axis_angle(Vec3::RIGHT, 0.3);
        let f = q.rotate(Vec3::FORWARD);
        assert!(f.y > 0.0);
        assert!((f.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn product_applies_right_operand_first() {
        let a = Quat::from_axis_angle(Vec3::UP, FRAC_PI_2);
        let b = Quat::from_axis_angle(Vec3::RIGHT, FRAC_PI_2);
        let v = Vec3::FORWARD;
        assert!(vapprox((a * b).rotate(v), a.rotate(b.rotate(v))));
        // Rotations do not commute.
        assert!(!vapprox((a * b).rotate(v), (b * a).rotate(v)));
    }

    #[test]
    fn conjugate_undoes_rotation() {
        let q = Quat::from_axis_angle(Vec3::new(1.0, 2.0, 3.0), 1.1);
        let v = Vec3::new(0.2, -4.0, 9.0);
        assert!(vapprox(q.conjugate().rotate(q.rotate(v)), v));
    }

    #[test]
    fn normalizing_degenerate_quat_yields_identity() {
        assert_eq!(Quat::from_xyzw(0.0, 0.0, 0.0, 0.0).normalized(), Quat::IDENTITY);
    }
}
