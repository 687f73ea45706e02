// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
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

//! 4x4 homogeneous matrix
//!
//! Row-major, column vectors: a point is transformed as `M * [x, y, z, 1]`.
//! Every forward operation (`translate`, `rotate_*`, `scale`, `apply`)
//! post-multiplies, and every `inv_*` operation pre-multiplies the inverse of
//! the same elementary transform. Applying an operation to a matrix and its
//! `inv_` twin to the matrix's inverse keeps the pair inverse to each other
//! without a general inversion.

/// 4x4 transform matrix
///
/// # Example
///
/// ```
/// use softraster::core::transform::Matrix3D;
///
/// let mut m = Matrix3D::IDENTITY;
/// m.translate(10.0, 0.0, 0.0);
/// m.scale(2.0, 2.0, 2.0);
/// assert_eq!(m.mult([1.0, 1.0, 1.0]), [12.0, 2.0, 2.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3D {
    m: [[f32; 4]; 4],
}

impl Default for Matrix3D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix3D {
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub const fn from_rows(m: [[f32; 4]; 4]) -> Self {
        Self { m }
    }

    pub fn rows(&self) -> [[f32; 4]; 4] {
        self.m
    }

    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.m[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.m[row][col] = value;
    }

    pub fn reset(&mut self) {
        *self = Self::IDENTITY;
    }

    pub fn translate(&mut self, tx: f32, ty: f32, tz: f32) {
        for row in &mut self.m {
            row[3] += tx * row[0] + ty * row[1] + tz * row[2];
        }
    }

    pub fn rotate_x(&mut self, angle: f32) {
        self.apply(&Self::rotation_x(angle));
    }

    pub fn rotate_y(&mut self, angle: f32) {
        self.apply(&Self::rotation_y(angle));
    }

    pub fn rotate_z(&mut self, angle: f32) {
        self.apply(&Self::rotation_z(angle));
    }

    /// Rotate around an arbitrary axis
    ///
    /// The axis is expected to be normalized.
    pub fn rotate(&mut self, angle: f32, axis: [f32; 3]) {
        self.apply(&Self::rotation(angle, axis));
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        for row in &mut self.m {
            row[0] *= x;
            row[1] *= y;
            row[2] *= z;
        }
    }

    /// `self = self * n`
    pub fn apply(&mut self, n: &Matrix3D) {
        self.m = Self::product(&self.m, &n.m);
    }

    /// `self = n * self`
    pub fn pre_apply(&mut self, n: &Matrix3D) {
        self.m = Self::product(&n.m, &self.m);
    }

    pub fn inv_translate(&mut self, tx: f32, ty: f32, tz: f32) {
        let mut t = Self::IDENTITY;
        t.m[0][3] = -tx;
        t.m[1][3] = -ty;
        t.m[2][3] = -tz;
        self.pre_apply(&t);
    }

    pub fn inv_rotate_x(&mut self, angle: f32) {
        self.pre_apply(&Self::rotation_x(-angle));
    }

    pub fn inv_rotate_y(&mut self, angle: f32) {
        self.pre_apply(&Self::rotation_y(-angle));
    }

    pub fn inv_rotate_z(&mut self, angle: f32) {
        self.pre_apply(&Self::rotation_z(-angle));
    }

    pub fn inv_rotate(&mut self, angle: f32, axis: [f32; 3]) {
        self.pre_apply(&Self::rotation(-angle, axis));
    }

    pub fn inv_scale(&mut self, x: f32, y: f32, z: f32) {
        let mut s = Self::IDENTITY;
        s.m[0][0] = 1.0 / x;
        s.m[1][1] = 1.0 / y;
        s.m[2][2] = 1.0 / z;
        self.pre_apply(&s);
    }

    /// Pre-multiply by the inverse of `n`
    ///
    /// Returns false and leaves `self` untouched when `n` is singular.
    pub fn inv_apply(&mut self, n: &Matrix3D) -> bool {
        let mut inverse = *n;
        if !inverse.invert() {
            return false;
        }
        self.pre_apply(&inverse);
        true
    }

    /// Invert in place through the adjugate
    ///
    /// Returns false and leaves the matrix unchanged when the determinant is
    /// zero.
    pub fn invert(&mut self) -> bool {
        let det = self.determinant();
        if det == 0.0 {
            return false;
        }

        let mut out = [[0.0f32; 4]; 4];
        for (row, out_row) in out.iter_mut().enumerate() {
            for (col, out_val) in out_row.iter_mut().enumerate() {
                // adjugate is the transposed cofactor matrix
                let minor = self.minor(col, row);
                let sign = if (row + col) % 2 == 0 { 1.0 } else { -1.0 };
                *out_val = sign * minor / det;
            }
        }
        self.m = out;
        true
    }

    pub fn determinant(&self) -> f32 {
        (0..4)
            .map(|col| {
                let sign = if col % 2 == 0 { 1.0 } else { -1.0 };
                sign * self.m[0][col] * self.minor(0, col)
            })
            .sum()
    }

    pub fn transpose(&mut self) {
        let m = self.m;
        for (row, out_row) in self.m.iter_mut().enumerate() {
            for (col, out_val) in out_row.iter_mut().enumerate() {
                *out_val = m[col][row];
            }
        }
    }

    /// Transform a point, ignoring the w row
    #[inline]
    pub fn mult(&self, p: [f32; 3]) -> [f32; 3] {
        let m = &self.m;
        [
            m[0][0] * p[0] + m[0][1] * p[1] + m[0][2] * p[2] + m[0][3],
            m[1][0] * p[0] + m[1][1] * p[1] + m[1][2] * p[2] + m[1][3],
            m[2][0] * p[0] + m[2][1] * p[1] + m[2][2] * p[2] + m[2][3],
        ]
    }

    #[inline]
    pub fn mult4(&self, p: [f32; 4]) -> [f32; 4] {
        let mut out = [0.0; 4];
        for (o, row) in out.iter_mut().zip(&self.m) {
            *o = row[0] * p[0] + row[1] * p[1] + row[2] * p[2] + row[3] * p[3];
        }
        out
    }

    /// Multiply a direction by the transpose of the upper 3x3
    ///
    /// Called on an inverse matrix this gives the inverse-transpose used for
    /// normals.
    #[inline]
    pub fn mult_transposed(&self, d: [f32; 3]) -> [f32; 3] {
        let m = &self.m;
        [
            m[0][0] * d[0] + m[1][0] * d[1] + m[2][0] * d[2],
            m[0][1] * d[0] + m[1][1] * d[1] + m[2][1] * d[2],
            m[0][2] * d[0] + m[1][2] * d[1] + m[2][2] * d[2],
        ]
    }

    fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    fn rotation(angle: f32, [x, y, z]: [f32; 3]) -> Self {
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        Self::from_rows([
            [t * x * x + c, t * x * y - s * z, t * x * z + s * y, 0.0],
            [t * x * y + s * z, t * y * y + c, t * y * z - s * x, 0.0],
            [t * x * z - s * y, t * y * z + s * x, t * z * z + c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    fn product(a: &[[f32; 4]; 4], b: &[[f32; 4]; 4]) -> [[f32; 4]; 4] {
        let mut out = [[0.0f32; 4]; 4];
        for (i, out_row) in out.iter_mut().enumerate() {
            for (j, out_val) in out_row.iter_mut().enumerate() {
                *out_val = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j] + a[i][3] * b[3][j];
            }
        }
        out
    }

    /// Determinant of the 3x3 matrix left after removing `row` and `col`
    fn minor(&self, row: usize, col: usize) -> f32 {
        let mut sub = [[0.0f32; 3]; 3];
        let rows = (0..4).filter(|&r| r != row);
        for (si, r) in rows.enumerate() {
            let cols = (0..4).filter(|&c| c != col);
            for (sj, c) in cols.enumerate() {
                sub[si][sj] = self.m[r][c];
            }
        }
        sub[0][0] * (sub[1][1] * sub[2][2] - sub[1][2] * sub[2][1])
            + sub[0][1] * (sub[1][2] * sub[2][0] - sub[1][0] * sub[2][2])
            + sub[0][2] * (sub[1][0] * sub[2][1] - sub[1][1] * sub[2][0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_identity(m: &Matrix3D) {
        for row in 0..4 {
            for col in 0..4 {
                let expected = if row == col { 1.0 } else { 0.0 };
                assert!(
                    (m.get(row, col) - expected).abs() < 1e-4,
                    "m[{}][{}] = {}",
                    row,
                    col,
                    m.get(row, col)
                );
            }
        }
    }

    fn paired(ops: impl Fn(&mut Matrix3D, &mut Matrix3D)) -> Matrix3D {
        let mut fwd = Matrix3D::IDENTITY;
        let mut inv = Matrix3D::IDENTITY;
        ops(&mut fwd, &mut inv);
        let mut product = fwd;
        product.apply(&inv);
        product
    }

    #[test]
    fn test_translate_moves_points() {
        let mut m = Matrix3D::IDENTITY;
        m.translate(1.0, 2.0, 3.0);
        assert_eq!(m.mult([0.0, 0.0, 0.0]), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_rotate_z_quarter_turn() {
        let mut m = Matrix3D::IDENTITY;
        m.rotate_z(std::f32::consts::FRAC_PI_2);
        let p = m.mult([1.0, 0.0, 0.0]);
        assert!(p[0].abs() < 1e-6);
        assert!((p[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_axis_rotation_matches_rotate_z() {
        let mut a = Matrix3D::IDENTITY;
        let mut b = Matrix3D::IDENTITY;
        a.rotate_z(0.7);
        b.rotate(0.7, [0.0, 0.0, 1.0]);
        for row in 0..4 {
            for col in 0..4 {
                assert!((a.get(row, col) - b.get(row, col)).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_paired_operations_stay_inverse() {
        let product = paired(|fwd, inv| {
            fwd.translate(5.0, -3.0, 2.0);
            inv.inv_translate(5.0, -3.0, 2.0);
            fwd.rotate_x(0.3);
            inv.inv_rotate_x(0.3);
            fwd.rotate_y(-1.1);
            inv.inv_rotate_y(-1.1);
            fwd.scale(2.0, 0.5, 4.0);
            inv.inv_scale(2.0, 0.5, 4.0);
            fwd.rotate(0.9, [0.0, 0.6, 0.8]);
            inv.inv_rotate(0.9, [0.0, 0.6, 0.8]);
        });
        assert_identity(&product);
    }

    #[test]
    fn test_invert_general_matrix() {
        let original = Matrix3D::from_rows([
            [2.0, 0.0, 1.0, 3.0],
            [0.0, 1.0, 0.0, -2.0],
            [1.0, 0.0, 3.0, 0.5],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let mut inv = original;
        assert!(inv.invert());
        let mut product = original;
        product.apply(&inv);
        assert_identity(&product);
    }

    #[test]
    fn test_invert_singular_is_noop() {
        let singular = Matrix3D::from_rows([
            [1.0, 2.0, 3.0, 0.0],
            [2.0, 4.0, 6.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let mut m = singular;
        assert_eq!(m.determinant(), 0.0);
        assert!(!m.invert());
        assert_eq!(m, singular);

        let mut target = Matrix3D::IDENTITY;
        assert!(!target.inv_apply(&singular));
        assert_eq!(target, Matrix3D::IDENTITY);
    }

    #[test]
    fn test_determinant_of_scale() {
        let mut m = Matrix3D::IDENTITY;
        m.scale(2.0, 3.0, 4.0);
        assert_eq!(m.determinant(), 24.0);
    }

    #[test]
    fn test_transpose_and_mult_transposed() {
        let mut m = Matrix3D::from_rows([
            [1.0, 2.0, 3.0, 0.0],
            [4.0, 5.0, 6.0, 0.0],
            [7.0, 8.0, 9.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        assert_eq!(m.mult_transposed([1.0, 0.0, 0.0]), [1.0, 2.0, 3.0]);
        m.transpose();
        assert_eq!(m.get(0, 1), 4.0);
        assert_eq!(m.get(2, 0), 3.0);
    }
}
