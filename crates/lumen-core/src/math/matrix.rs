// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Provides the 4x4 matrix type used for model, view, and projection transforms.

use super::{Vec3, Vec4};
use std::ops::{Index, IndexMut, Mul};

/// A 4x4 column-major matrix.
///
/// This is the type used for every transformation in the pipeline: a shape's
/// model transform, the camera's orientation (view) matrix, and its
/// perspective (projection) matrix. Storage is column-major so that
/// [`Mat4::to_cols_array`] can be uploaded to a shader uniform as-is.
///
/// Element access through [`Mat4::get`] and [`Mat4::set`] is always expressed
/// as `(row, col)`, independently of the storage order.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Mat4 {
    /// The columns of the matrix. `cols[0]` is the first column, and so on.
    pub cols: [Vec4; 4],
}

impl Mat4 {
    /// The 4x4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [Vec4::X, Vec4::Y, Vec4::Z, Vec4::W],
    };

    /// A 4x4 matrix with all elements set to 0.
    pub const ZERO: Self = Self {
        cols: [Vec4::ZERO; 4],
    };

    /// Creates a new matrix from four column vectors.
    #[inline]
    pub const fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self {
            cols: [c0, c1, c2, c3],
        }
    }

    /// Creates a new matrix from its rows, written the way the matrix reads on paper.
    #[inline]
    pub fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        let mut m = Self::ZERO;
        for (row, values) in rows.iter().enumerate() {
            for (col, value) in values.iter().enumerate() {
                m.cols[col][row] = *value;
            }
        }
        m
    }

    /// Returns the element at `(row, col)`.
    ///
    /// # Panics
    /// Panics if `row` or `col` is greater than 3.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.cols[col][row]
    }

    /// Overwrites the element at `(row, col)`.
    ///
    /// # Panics
    /// Panics if `row` or `col` is greater than 3.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.cols[col][row] = value;
    }

    /// Returns a row of the matrix as a `Vec4`.
    #[inline]
    pub fn get_row(&self, index: usize) -> Vec4 {
        Vec4 {
            x: self.cols[0].get(index),
            y: self.cols[1].get(index),
            z: self.cols[2].get(index),
            w: self.cols[3].get(index),
        }
    }

    /// Creates a translation matrix.
    #[inline]
    pub fn from_translation(v: Vec3) -> Self {
        Self::from_cols(
            Vec4::X,
            Vec4::Y,
            Vec4::Z,
            Vec4::new(v.x, v.y, v.z, 1.0),
        )
    }

    /// Creates a matrix for a rotation around the X-axis.
    ///
    /// # Arguments
    ///
    /// * `angle`: The angle of rotation in radians.
    #[inline]
    pub fn from_rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols(
            Vec4::X,
            Vec4::new(0.0, c, s, 0.0),
            Vec4::new(0.0, -s, c, 0.0),
            Vec4::W,
        )
    }

    /// Creates a matrix for a right-handed rotation around the Y-axis.
    ///
    /// # Arguments
    ///
    /// * `angle`: The angle of rotation in radians.
    #[inline]
    pub fn from_rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols(
            Vec4::new(c, 0.0, -s, 0.0),
            Vec4::Y,
            Vec4::new(s, 0.0, c, 0.0),
            Vec4::W,
        )
    }

    /// Creates a matrix for a rotation around the Z-axis.
    ///
    /// # Arguments
    ///
    /// * `angle`: The angle of rotation in radians.
    #[inline]
    pub fn from_rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols(
            Vec4::new(c, s, 0.0, 0.0),
            Vec4::new(-s, c, 0.0, 0.0),
            Vec4::Z,
            Vec4::W,
        )
    }

    /// Creates a rotation that applies `x`, then `y`, then `z` (all in radians),
    /// one axis at a time. The result is `Rz * Ry * Rx`.
    #[inline]
    pub fn from_euler_xyz(x: f32, y: f32, z: f32) -> Self {
        Self::from_rotation_z(z) * Self::from_rotation_y(y) * Self::from_rotation_x(x)
    }

    /// Creates a right-handed perspective projection matrix with an OpenGL
    /// style [-1, 1] depth range.
    ///
    /// With `f = 1 / tan(fov_y / 2)` the non-zero entries are:
    ///
    /// | (row, col) | value                          |
    /// |------------|--------------------------------|
    /// | (0, 0)     | `f / aspect`                   |
    /// | (1, 1)     | `f`                            |
    /// | (2, 2)     | `(far + near) / (near - far)`  |
    /// | (2, 3)     | `2 * far * near / (near - far)`|
    /// | (3, 2)     | `-1`                           |
    ///
    /// No validation is performed: degenerate inputs produce a degenerate
    /// (possibly non-finite) matrix.
    #[inline]
    pub fn perspective_rh_gl(fov_y_radians: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        let f = 1.0 / (fov_y_radians / 2.0).tan();
        let range = z_near - z_far;

        Self::from_cols(
            Vec4::new(f / aspect_ratio, 0.0, 0.0, 0.0),
            Vec4::new(0.0, f, 0.0, 0.0),
            Vec4::new(0.0, 0.0, (z_far + z_near) / range, -1.0),
            Vec4::new(0.0, 0.0, (2.0 * z_far * z_near) / range, 0.0),
        )
    }

    /// Creates a right-handed view matrix from an already computed camera basis.
    ///
    /// The rows are `right`, `up` and `-forward`; the translation column holds
    /// the negated dot product of each row axis with `eye`, so that `eye`
    /// maps to the origin.
    #[inline]
    pub fn from_view_axes(eye: Vec3, right: Vec3, up: Vec3, forward: Vec3) -> Self {
        Self::from_cols(
            Vec4::new(right.x, up.x, -forward.x, 0.0),
            Vec4::new(right.y, up.y, -forward.y, 0.0),
            Vec4::new(right.z, up.z, -forward.z, 0.0),
            Vec4::new(-eye.dot(right), -eye.dot(up), eye.dot(forward), 1.0),
        )
    }

    /// Creates a right-handed view matrix for a camera looking from `eye` towards `target`.
    ///
    /// `forward = normalize(target - eye)`, `right = normalize(forward x up)`
    /// and the recomputed up is `right x forward`. When `eye == target` or `up`
    /// is parallel to the view direction the affected axes collapse to zero
    /// and the resulting matrix is degenerate.
    #[inline]
    pub fn look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let forward = (target - eye).normalize();
        let right = forward.cross(up).normalize();
        let up = right.cross(forward);
        Self::from_view_axes(eye, right, up, forward)
    }

    /// Returns the transpose of the matrix, where rows and columns are swapped.
    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_cols(
            self.get_row(0),
            self.get_row(1),
            self.get_row(2),
            self.get_row(3),
        )
    }

    /// Flattens the matrix in column-major order, the layout shader uniforms expect.
    #[inline]
    pub fn to_cols_array(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for (i, col) in self.cols.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(&[col.x, col.y, col.z, col.w]);
        }
        out
    }

    /// Flattens the matrix in row-major order.
    #[inline]
    pub fn to_rows_array(&self) -> [f32; 16] {
        self.transpose().to_cols_array()
    }
}

impl Default for Mat4 {
    /// Returns the 4x4 identity matrix.
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Mat4> for Mat4 {
    type Output = Self;
    /// Multiplies this matrix by another `Mat4`. Note that matrix multiplication is not commutative.
    #[inline]
    fn mul(self, rhs: Mat4) -> Self::Output {
        let mut cols = [Vec4::ZERO; 4];
        for (c_idx, target) in cols.iter_mut().enumerate() {
            *target = self * rhs.cols[c_idx];
        }
        Mat4 { cols }
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    /// Transforms a `Vec4` by this matrix.
    #[inline]
    fn mul(self, rhs: Vec4) -> Self::Output {
        self.cols[0] * rhs.x + self.cols[1] * rhs.y + self.cols[2] * rhs.z + self.cols[3] * rhs.w
    }
}

impl Index<usize> for Mat4 {
    type Output = Vec4;
    /// Returns the column at `index`.
    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.cols[index]
    }
}

impl IndexMut<usize> for Mat4 {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.cols[index]
    }
}

// --- Tests ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, FRAC_PI_2, PI};
    use approx::assert_relative_eq;

    fn vec4_approx_eq(a: Vec4, b: Vec4) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z) && approx_eq(a.w, b.w)
    }

    fn mat4_approx_eq(a: Mat4, b: Mat4) -> bool {
        a.cols
            .iter()
            .zip(b.cols.iter())
            .all(|(ca, cb)| vec4_approx_eq(*ca, *cb))
    }

    #[test]
    fn test_identity_default() {
        assert_eq!(Mat4::default(), Mat4::IDENTITY);
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(m * Mat4::IDENTITY, m);
        assert_eq!(Mat4::IDENTITY * m, m);
    }

    #[test]
    fn test_get_set_row_col() {
        let mut m = Mat4::from_rows([
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
            [13.0, 14.0, 15.0, 16.0],
        ]);
        assert_eq!(m.get(0, 3), 4.0);
        assert_eq!(m.get(3, 0), 13.0);
        assert_eq!(m[1], Vec4::new(2.0, 6.0, 10.0, 14.0));
        assert_eq!(m.get_row(2), Vec4::new(9.0, 10.0, 11.0, 12.0));

        m.set(2, 1, -1.0);
        assert_eq!(m.get(2, 1), -1.0);
        assert_eq!(m.cols[1].z, -1.0);
    }

    #[test]
    fn test_flattened_orders() {
        let m = Mat4::from_translation(Vec3::new(7.0, 8.0, 9.0));
        let cols = m.to_cols_array();
        assert_eq!(&cols[12..16], &[7.0, 8.0, 9.0, 1.0]);
        let rows = m.to_rows_array();
        assert_eq!(rows[3], 7.0);
        assert_eq!(rows[7], 8.0);
        assert_eq!(rows[11], 9.0);
    }

    #[test]
    fn test_translation_moves_points_not_directions() {
        let m = Mat4::from_translation(Vec3::new(1.0, -2.0, 3.0));
        assert_eq!(m * Vec4::new(1.0, 1.0, 1.0, 1.0), Vec4::new(2.0, -1.0, 4.0, 1.0));
        assert_eq!(m * Vec4::new(1.0, 1.0, 1.0, 0.0), Vec4::new(1.0, 1.0, 1.0, 0.0));
    }

    #[test]
    fn test_rotations() {
        let rz = Mat4::from_rotation_z(FRAC_PI_2);
        assert!(vec4_approx_eq(rz * Vec4::X.truncate().extend(1.0), Vec4::new(0.0, 1.0, 0.0, 1.0)));

        let rx = Mat4::from_rotation_x(FRAC_PI_2);
        assert!(vec4_approx_eq(rx * Vec4::Y, Vec4::Z));

        let ry = Mat4::from_rotation_y(FRAC_PI_2);
        assert!(vec4_approx_eq(ry * Vec4::Z, Vec4::X));
    }

    #[test]
    fn test_euler_is_z_y_x_product() {
        let (x, y, z) = (0.3, -1.1, 2.0);
        let expected = Mat4::from_rotation_z(z) * Mat4::from_rotation_y(y) * Mat4::from_rotation_x(x);
        assert!(mat4_approx_eq(Mat4::from_euler_xyz(x, y, z), expected));
    }

    #[test]
    fn test_multiplication_is_not_commutative() {
        let t = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let r = Mat4::from_rotation_z(PI / 2.0);
        assert!(!mat4_approx_eq(t * r, r * t));
    }

    #[test]
    fn test_transpose_twice_is_identity_op() {
        let m = Mat4::from_euler_xyz(0.1, 0.2, 0.3) * Mat4::from_translation(Vec3::ONE);
        assert_eq!(m.transpose().transpose(), m);
        assert_eq!(m.transpose().get(0, 3), m.get(3, 0));
    }

    #[test]
    fn test_perspective_rh_gl_entries() {
        let (fov, aspect, near, far) = (60f32.to_radians(), 16.0 / 9.0, 0.5, 250.0);
        let m = Mat4::perspective_rh_gl(fov, aspect, near, far);
        let f = 1.0 / (fov / 2.0).tan();

        assert_relative_eq!(m.get(0, 0), f / aspect, epsilon = 1e-6);
        assert_relative_eq!(m.get(1, 1), f, epsilon = 1e-6);
        assert_relative_eq!(m.get(2, 2), (far + near) / (near - far), epsilon = 1e-6);
        assert_relative_eq!(m.get(2, 3), 2.0 * far * near / (near - far), epsilon = 1e-4);
        assert_eq!(m.get(3, 2), -1.0);
        assert_eq!(m.get(3, 3), 0.0);
        assert_eq!(m.get(0, 1), 0.0);
    }

    #[test]
    fn test_look_at_maps_eye_to_origin() {
        let eye = Vec3::new(3.0, 4.0, 5.0);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        let p = view * eye.extend(1.0);
        assert!(vec4_approx_eq(p, Vec4::W));

        // The target lies straight ahead on -Z in eye space.
        let t = view * Vec4::W;
        assert!(approx_eq(t.x, 0.0) && approx_eq(t.y, 0.0));
        assert!(t.z < 0.0);
    }

    #[test]
    fn test_look_at_degenerate_is_not_nan() {
        let view = Mat4::look_at_rh(Vec3::ONE, Vec3::ONE, Vec3::Y);
        assert!(view.to_cols_array().iter().all(|v| v.is_finite()));
    }
}
