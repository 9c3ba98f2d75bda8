//! Column-major 4x4 matrices.
//!
//! `Mat4.0[c][r]` is column `c`, row `r`, which matches how WGSL reads a `mat4x4<f32>`
//! from a uniform buffer. Matrices act on column vectors, so `a.multiply(&b)` applies
//! `b` first.

use crate::math::vec::Vec3;

/// A column-major 4x4 `f32` matrix.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Mat4(pub [[f32; 4]; 4]);

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    /// The identity matrix.
    pub fn identity() -> Mat4 {
        Mat4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Right-handed perspective projection with a `[0, 1]` depth range.
    pub fn perspective(
        field_of_view_y_in_radians: f32,
        aspect: f32,
        z_near: f32,
        z_far: f32,
    ) -> Mat4 {
        let f = 1.0 / (field_of_view_y_in_radians * 0.5).tan();
        let range_reciprocal = 1.0 / (z_near - z_far);

        Mat4([
            [f / aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, z_far * range_reciprocal, -1.0],
            [0.0, 0.0, z_far * z_near * range_reciprocal, 0.0],
        ])
    }

    /// Right-handed view matrix looking from `eye` towards `target`.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        let f = (target - eye).normalize();
        let s = f.cross(&up).normalize();
        let u = s.cross(&f);

        Mat4([
            [s.x(), u.x(), -f.x(), 0.0],
            [s.y(), u.y(), -f.y(), 0.0],
            [s.z(), u.z(), -f.z(), 0.0],
            [-s.dot(&eye), -u.dot(&eye), f.dot(&eye), 1.0],
        ])
    }

    /// Translation by `(tx, ty, tz)`.
    pub fn translation(tx: f32, ty: f32, tz: f32) -> Mat4 {
        Mat4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [tx, ty, tz, 1.0],
        ])
    }

    /// Non-uniform scale along each axis.
    pub fn scaling(sx: f32, sy: f32, sz: f32) -> Mat4 {
        Mat4([
            [sx, 0.0, 0.0, 0.0],
            [0.0, sy, 0.0, 0.0],
            [0.0, 0.0, sz, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation about the X axis.
    pub fn rotation_x(angle_in_radians: f32) -> Mat4 {
        let (s, c) = angle_in_radians.sin_cos();
        Mat4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, s, 0.0],
            [0.0, -s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation about the Y axis.
    pub fn rotation_y(angle_in_radians: f32) -> Mat4 {
        let (s, c) = angle_in_radians.sin_cos();
        Mat4([
            [c, 0.0, -s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation about the Z axis.
    pub fn rotation_z(angle_in_radians: f32) -> Mat4 {
        let (s, c) = angle_in_radians.sin_cos();
        Mat4([
            [c, s, 0.0, 0.0],
            [-s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Translate, rotate about X then Y then Z, then scale.
    pub fn model(origin: Vec3, rotation: Vec3, scale: Vec3) -> Mat4 {
        Mat4::translation(origin.x(), origin.y(), origin.z())
            .multiply(&Mat4::rotation_x(rotation.x()))
            .multiply(&Mat4::rotation_y(rotation.y()))
            .multiply(&Mat4::rotation_z(rotation.z()))
            .multiply(&Mat4::scaling(scale.x(), scale.y(), scale.z()))
    }

    /// Matrix product `self * b`.
    pub fn multiply(&self, b: &Mat4) -> Mat4 {
        let mut result = [[0.0; 4]; 4];
        for (col, column) in result.iter_mut().enumerate() {
            for (row, cell) in column.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.0[k][row] * b.0[col][k]).sum();
            }
        }
        Mat4(result)
    }

    /// Transforms a point (w = 1) and drops the homogeneous component.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let m = &self.0;
        let v = [p.x(), p.y(), p.z(), 1.0];
        let mut out = [0.0f32; 4];
        for (row, o) in out.iter_mut().enumerate() {
            *o = (0..4).map(|k| m[k][row] * v[k]).sum();
        }
        Vec3::new(out[0], out[1], out[2])
    }
}

impl From<[[f32; 4]; 4]> for Mat4 {
    fn from(matrix: [[f32; 4]; 4]) -> Self {
        Mat4(matrix)
    }
}

impl From<Mat4> for [[f32; 4]; 4] {
    fn from(matrix: Mat4) -> Self {
        matrix.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert_relative_eq!(a.x(), b.x(), epsilon = 1e-5);
        assert_relative_eq!(a.y(), b.y(), epsilon = 1e-5);
        assert_relative_eq!(a.z(), b.z(), epsilon = 1e-5);
    }

    /// Translation then scale order: scale applies to the point before it is moved.
    #[test]
    fn test_model_matrix_scales_then_translates() {
        let m = Mat4::model(
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::ZERO,
            Vec3::new(2.0, 2.0, 2.0),
        );
        assert_vec_eq(m.transform_point(Vec3::new(1.0, 0.0, 0.0)), Vec3::new(12.0, 0.0, 0.0));
    }

    /// A quarter turn about Y maps +X onto -Z in a right-handed system.
    #[test]
    fn test_rotation_y_quarter_turn() {
        let m = Mat4::rotation_y(std::f32::consts::FRAC_PI_2);
        assert_vec_eq(m.transform_point(Vec3::new(1.0, 0.0, 0.0)), Vec3::new(0.0, 0.0, -1.0));
    }

    /// The eye position maps to the view-space origin and the target lies on -Z.
    #[test]
    fn test_look_at() {
        let eye = Vec3::new(1.0, 2.0, 3.0);
        let view = Mat4::look_at(eye, Vec3::new(1.0, 2.0, -7.0), Vec3::UP);
        assert_vec_eq(view.transform_point(eye), Vec3::ZERO);
        assert_vec_eq(
            view.transform_point(Vec3::new(1.0, 2.0, -7.0)),
            Vec3::new(0.0, 0.0, -10.0),
        );
    }

    #[test]
    fn test_identity_is_neutral() {
        let t = Mat4::translation(1.0, 2.0, 3.0);
        assert_eq!(t.multiply(&Mat4::identity()), t);
        assert_eq!(Mat4::identity().multiply(&t), t);
    }

    /// Points on the near and far planes land on depth 0 and 1.
    #[test]
    fn test_perspective_depth_range() {
        let p = Mat4::perspective(60f32.to_radians(), 1.0, 0.1, 1000.0);
        let project = |z: f32| {
            let m = &p.0;
            let clip_z = m[2][2] * z + m[3][2];
            let clip_w = m[2][3] * z + m[3][3];
            clip_z / clip_w
        };
        assert_relative_eq!(project(-0.1), 0.0, epsilon = 1e-5);
        assert_relative_eq!(project(-1000.0), 1.0, epsilon = 1e-4);
    }
}
