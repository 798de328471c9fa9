use core::ops::Mul;

use crate::{Quat, Vec3};

/// Column-major 4x4 matrix acting on column vectors (`m * v`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat4 {
    pub cols: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn from_translation(t: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[3] = [t.x, t.y, t.z, 1.0];
        m
    }

    pub fn from_quat(q: Quat) -> Self {
        let x = q.rotate(Vec3::new(1.0, 0.0, 0.0));
        let y = q.rotate(Vec3::new(0.0, 1.0, 0.0));
        let z = q.rotate(Vec3::new(0.0, 0.0, 1.0));
        Mat4 {
            cols: [
                [x.x, x.y, x.z, 0.0],
                [y.x, y.y, y.z, 0.0],
                [z.x, z.y, z.z, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Rotate, then translate.
    pub fn from_rotation_translation(q: Quat, t: Vec3) -> Self {
        let mut m = Self::from_quat(q);
        m.cols[3] = [t.x, t.y, t.z, 1.0];
        m
    }

    #[inline]
    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.cols[3][0], self.cols[3][1], self.cols[3][2])
    }

    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.transform_vector(p) + self.translation()
    }

    /// Applies only the upper 3x3 part (directions / normals of rigid transforms).
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        let c = &self.cols;
        Vec3::new(
            c[0][0] * v.x + c[1][0] * v.y + c[2][0] * v.z,
            c[0][1] * v.x + c[1][1] * v.y + c[2][1] * v.z,
            c[0][2] * v.x + c[1][2] * v.y + c[2][2] * v.z,
        )
    }

    pub fn transpose(&self) -> Self {
        let mut out = [[0.0; 4]; 4];
        for (i, col) in self.cols.iter().enumerate() {
            for (j, v) in col.iter().enumerate() {
                out[j][i] = *v;
            }
        }
        Mat4 { cols: out }
    }

    /// Inverse of a rotation + translation matrix (no scale).
    pub fn rigid_inverse(&self) -> Self {
        let mut r = self.transpose();
        r.cols[0][3] = 0.0;
        r.cols[1][3] = 0.0;
        r.cols[2][3] = 0.0;
        r.cols[3] = [0.0, 0.0, 0.0, 1.0];
        let t = r.transform_vector(self.translation());
        r.cols[3] = [-t.x, -t.y, -t.z, 1.0];
        r
    }

    /// Flat column-major array, the layout rlgl and GPU constant buffers expect.
    pub fn to_cols_array(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for (i, col) in self.cols.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(col);
        }
        out
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Mul for Mat4 {
    type Output = Mat4;
    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut out = [[0.0f32; 4]; 4];
        for (c, col) in rhs.cols.iter().enumerate() {
            for r in 0..4 {
                out[c][r] = (0..4).map(|k| self.cols[k][r] * col[k]).sum();
            }
        }
        Mat4 { cols: out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vapprox(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn translation_moves_points_not_vectors() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert!(vapprox(m.transform_point(Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0)));
        assert!(vapprox(m.transform_vector(Vec3::UP), Vec3::UP));
    }

    #[test]
    fn product_applies_right_operand_first() {
        let r = Mat4::from_quat(Quat::from_axis_angle(Vec3::UP, core::f32::consts::FRAC_PI_2));
        let t = Mat4::from_translation(Vec3::new(0.0, 0.0, -2.0));
        // Translate along -Z then rotate a quarter turn: ends up on -X.
        let p = (r * t).transform_point(Vec3::ZERO);
        assert!(vapprox(p, Vec3::new(-2.0, 0.0, 0.0)));
    }

    #[test]
    fn rigid_inverse_round_trips() {
        let q = Quat::from_axis_angle(Vec3::new(0.3, 1.0, -0.2), 0.8);
        let m = Mat4::from_rotation_translation(q, Vec3::new(4.0, -1.0, 2.5));
        let p = Vec3::new(0.5, 7.0, -3.0);
        assert!(vapprox(m.rigid_inverse().transform_point(m.transform_point(p)), p));
    }

    #[test]
    fn cols_array_is_column_major() {
        let m = Mat4::from_translation(Vec3::new(7.0, 8.0, 9.0));
        let a = m.to_cols_array();
        assert_eq!(&a[12..16], &[7.0, 8.0, 9.0, 1.0]);
        assert!(Mat4::IDENTITY.is_identity());
        assert!(!m.is_identity());
    }
}
