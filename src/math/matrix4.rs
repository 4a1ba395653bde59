use std::ops::{Mul, MulAssign};

use super::{Matrix3, Scalar, Vector3, Vector4};

/// A 4x4 matrix stored row-major (`m[row][col]`).
///
/// Vectors are columns: `M * v` applies `M` to `v`, translation lives in the
/// last column (`m[0][3]`, `m[1][3]`, `m[2][3]`), and `A * B` applies `B`
/// first. Composition is associative but not commutative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4<T> {
    pub m: [[T; 4]; 4],
}

impl<T: Scalar> Matrix4<T> {
    #[must_use]
    pub const fn from_rows(m: [[T; 4]; 4]) -> Self {
        Self { m }
    }

    #[rustfmt::skip]
    #[must_use]
    pub fn new(
        m00: T, m01: T, m02: T, m03: T,
        m10: T, m11: T, m12: T, m13: T,
        m20: T, m21: T, m22: T, m23: T,
        m30: T, m31: T, m32: T, m33: T,
    ) -> Self {
        Self {
            m: [
                [m00, m01, m02, m03],
                [m10, m11, m12, m13],
                [m20, m21, m22, m23],
                [m30, m31, m32, m33],
            ],
        }
    }

    #[must_use]
    pub fn identity() -> Self {
        let (o, z) = (T::ONE, T::ZERO);
        Self::new(o, z, z, z, z, o, z, z, z, z, o, z, z, z, z, o)
    }

    #[must_use]
    pub fn zero() -> Self {
        Self { m: [[T::ZERO; 4]; 4] }
    }

    // ========================================================================
    // Builders
    // ========================================================================

    #[must_use]
    pub fn translation(x: T, y: T, z: T) -> Self {
        let (o, n) = (T::ONE, T::ZERO);
        Self::new(o, n, n, x, n, o, n, y, n, n, o, z, n, n, n, o)
    }

    #[must_use]
    pub fn from_translation(v: Vector3<T>) -> Self {
        Self::translation(v.x, v.y, v.z)
    }

    #[must_use]
    pub fn scaling(x: T, y: T, z: T) -> Self {
        let (o, n) = (T::ONE, T::ZERO);
        Self::new(x, n, n, n, n, y, n, n, n, n, z, n, n, n, n, o)
    }

    #[must_use]
    pub fn rotation_x(angle: T) -> Self {
        let (s, c) = (angle.sin(), angle.cos());
        let (o, n) = (T::ONE, T::ZERO);
        Self::new(o, n, n, n, n, c, -s, n, n, s, c, n, n, n, n, o)
    }

    #[must_use]
    pub fn rotation_y(angle: T) -> Self {
        let (s, c) = (angle.sin(), angle.cos());
        let (o, n) = (T::ONE, T::ZERO);
        Self::new(c, n, s, n, n, o, n, n, -s, n, c, n, n, n, n, o)
    }

    #[must_use]
    pub fn rotation_z(angle: T) -> Self {
        let (s, c) = (angle.sin(), angle.cos());
        let (o, n) = (T::ONE, T::ZERO);
        Self::new(c, -s, n, n, s, c, n, n, n, n, o, n, n, n, n, o)
    }

    /// Rotation whose rows are the given basis vectors (`right`, `up`,
    /// `forward`).
    #[rustfmt::skip]
    #[must_use]
    pub fn from_rotation_basis(forward: Vector3<T>, up: Vector3<T>, right: Vector3<T>) -> Self {
        let (o, n) = (T::ONE, T::ZERO);
        Self::new(
            right.x, right.y, right.z, n,
            up.x, up.y, up.z, n,
            forward.x, forward.y, forward.z, n,
            n, n, n, o,
        )
    }

    /// Rotation from a forward and an up vector; right is `normalize(up × forward)`.
    ///
    /// `forward` and `up` must be non-zero and non-parallel. Otherwise the
    /// right row collapses to zero and the result is a degenerate matrix; no
    /// error is reported.
    #[must_use]
    pub fn from_forward_up(forward: Vector3<T>, up: Vector3<T>) -> Self {
        let right = up.cross(forward).normalize();
        Self::from_rotation_basis(forward, up, right)
    }

    /// Orthographic projection mapping the box to normalized device coordinates.
    #[rustfmt::skip]
    #[must_use]
    pub fn orthographic(left: T, right: T, bottom: T, top: T, z_near: T, z_far: T) -> Self {
        let width = right - left;
        let height = top - bottom;
        let depth = z_far - z_near;
        let (o, n, two) = (T::ONE, T::ZERO, T::TWO);

        Self::new(
            two / width, n, n, -(right + left) / width,
            n, two / height, n, -(top + bottom) / height,
            n, n, -two / depth, -(z_far + z_near) / depth,
            n, n, n, o,
        )
    }

    /// Perspective projection. `fov` is the vertical field of view in radians.
    ///
    /// Undefined when `tan(fov / 2) == 0` or `aspect_ratio == 0`.
    #[rustfmt::skip]
    #[must_use]
    pub fn perspective(fov: T, aspect_ratio: T, z_near: T, z_far: T) -> Self {
        let tan_half_fov = (fov * T::HALF).tan();
        let z_range = z_near - z_far;
        let (o, n) = (T::ONE, T::ZERO);

        Self::new(
            o / (tan_half_fov * aspect_ratio), n, n, n,
            n, o / tan_half_fov, n, n,
            n, n, (-z_near - z_far) / z_range, T::TWO * z_far * z_near / z_range,
            n, n, o, n,
        )
    }

    // ========================================================================
    // Chained builders (post-multiply, like `self * builder`)
    // ========================================================================

    #[must_use]
    pub fn translate(self, x: T, y: T, z: T) -> Self {
        self * Self::translation(x, y, z)
    }

    #[must_use]
    pub fn scale(self, x: T, y: T, z: T) -> Self {
        self * Self::scaling(x, y, z)
    }

    #[must_use]
    pub fn rotate_x(self, angle: T) -> Self {
        self * Self::rotation_x(angle)
    }

    #[must_use]
    pub fn rotate_y(self, angle: T) -> Self {
        self * Self::rotation_y(angle)
    }

    #[must_use]
    pub fn rotate_z(self, angle: T) -> Self {
        self * Self::rotation_z(angle)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn row(&self, index: usize) -> Vector4<T> {
        let r = self.m[index];
        Vector4::new(r[0], r[1], r[2], r[3])
    }

    #[must_use]
    pub fn col(&self, index: usize) -> Vector4<T> {
        Vector4::new(self.m[0][index], self.m[1][index], self.m[2][index], self.m[3][index])
    }

    #[must_use]
    pub fn translation_part(&self) -> Vector3<T> {
        Vector3::new(self.m[0][3], self.m[1][3], self.m[2][3])
    }

    /// Upper-left 3x3 block.
    #[rustfmt::skip]
    #[must_use]
    pub fn rotation(&self) -> Matrix3<T> {
        let m = &self.m;
        Matrix3::new(
            m[0][0], m[0][1], m[0][2],
            m[1][0], m[1][1], m[1][2],
            m[2][0], m[2][1], m[2][2],
        )
    }

    /// Replaces the upper-left 3x3 block, keeping translation and the last row.
    #[must_use]
    pub fn with_rotation(mut self, rotation: &Matrix3<T>) -> Self {
        self.set_rotation(rotation);
        self
    }

    pub fn set_rotation(&mut self, rotation: &Matrix3<T>) {
        for r in 0..3 {
            self.m[r][..3].copy_from_slice(&rotation.m[r]);
        }
    }

    /// Transforms a point (implicit `w = 1`, no perspective divide).
    #[must_use]
    pub fn transform_point(&self, p: Vector3<T>) -> Vector3<T> {
        (*self * p.extend(T::ONE)).truncate()
    }

    /// Transforms a direction (implicit `w = 0`).
    #[must_use]
    pub fn transform_vector(&self, v: Vector3<T>) -> Vector3<T> {
        (*self * v.extend(T::ZERO)).truncate()
    }

    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut out = *self;
        for r in 0..4 {
            for c in 0..4 {
                out.m[r][c] = self.m[c][r];
            }
        }
        out
    }

    /// Column-major flattening, the layout used by the cofactor expansion.
    fn to_cols_flat(self) -> [T; 16] {
        let mut a = [T::ZERO; 16];
        for (i, value) in a.iter_mut().enumerate() {
            *value = self.m[i % 4][i / 4];
        }
        a
    }

    fn from_cols_flat(a: &[T; 16]) -> Self {
        let mut out = Self::zero();
        for (i, value) in a.iter().enumerate() {
            out.m[i % 4][i / 4] = *value;
        }
        out
    }

    /// The 16 cofactors, transposed (the adjugate), in column-major order.
    #[rustfmt::skip]
    fn adjugate_flat(a: &[T; 16]) -> [T; 16] {
        let mut inv = [T::ZERO; 16];

        inv[0] = a[5] * a[10] * a[15] - a[5] * a[11] * a[14] - a[9] * a[6] * a[15]
            + a[9] * a[7] * a[14] + a[13] * a[6] * a[11] - a[13] * a[7] * a[10];
        inv[4] = -a[4] * a[10] * a[15] + a[4] * a[11] * a[14] + a[8] * a[6] * a[15]
            - a[8] * a[7] * a[14] - a[12] * a[6] * a[11] + a[12] * a[7] * a[10];
        inv[8] = a[4] * a[9] * a[15] - a[4] * a[11] * a[13] - a[8] * a[5] * a[15]
            + a[8] * a[7] * a[13] + a[12] * a[5] * a[11] - a[12] * a[7] * a[9];
        inv[12] = -a[4] * a[9] * a[14] + a[4] * a[10] * a[13] + a[8] * a[5] * a[14]
            - a[8] * a[6] * a[13] - a[12] * a[5] * a[10] + a[12] * a[6] * a[9];

        inv[1] = -a[1] * a[10] * a[15] + a[1] * a[11] * a[14] + a[9] * a[2] * a[15]
            - a[9] * a[3] * a[14] - a[13] * a[2] * a[11] + a[13] * a[3] * a[10];
        inv[5] = a[0] * a[10] * a[15] - a[0] * a[11] * a[14] - a[8] * a[2] * a[15]
            + a[8] * a[3] * a[14] + a[12] * a[2] * a[11] - a[12] * a[3] * a[10];
        inv[9] = -a[0] * a[9] * a[15] + a[0] * a[11] * a[13] + a[8] * a[1] * a[15]
            - a[8] * a[3] * a[13] - a[12] * a[1] * a[11] + a[12] * a[3] * a[9];
        inv[13] = a[0] * a[9] * a[14] - a[0] * a[10] * a[13] - a[8] * a[1] * a[14]
            + a[8] * a[2] * a[13] + a[12] * a[1] * a[10] - a[12] * a[2] * a[9];

        inv[2] = a[1] * a[6] * a[15] - a[1] * a[7] * a[14] - a[5] * a[2] * a[15]
            + a[5] * a[3] * a[14] + a[13] * a[2] * a[7] - a[13] * a[3] * a[6];
        inv[6] = -a[0] * a[6] * a[15] + a[0] * a[7] * a[14] + a[4] * a[2] * a[15]
            - a[4] * a[3] * a[14] - a[12] * a[2] * a[7] + a[12] * a[3] * a[6];
        inv[10] = a[0] * a[5] * a[15] - a[0] * a[7] * a[13] - a[4] * a[1] * a[15]
            + a[4] * a[3] * a[13] + a[12] * a[1] * a[7] - a[12] * a[3] * a[5];
        inv[14] = -a[0] * a[5] * a[14] + a[0] * a[6] * a[13] + a[4] * a[1] * a[14]
            - a[4] * a[2] * a[13] - a[12] * a[1] * a[6] + a[12] * a[2] * a[5];

        inv[3] = -a[1] * a[6] * a[11] + a[1] * a[7] * a[10] + a[5] * a[2] * a[11]
            - a[5] * a[3] * a[10] - a[9] * a[2] * a[7] + a[9] * a[3] * a[6];
        inv[7] = a[0] * a[6] * a[11] - a[0] * a[7] * a[10] - a[4] * a[2] * a[11]
            + a[4] * a[3] * a[10] + a[8] * a[2] * a[7] - a[8] * a[3] * a[6];
        inv[11] = -a[0] * a[5] * a[11] + a[0] * a[7] * a[9] + a[4] * a[1] * a[11]
            - a[4] * a[3] * a[9] - a[8] * a[1] * a[7] + a[8] * a[3] * a[5];
        inv[15] = a[0] * a[5] * a[10] - a[0] * a[6] * a[9] - a[4] * a[1] * a[10]
            + a[4] * a[2] * a[9] + a[8] * a[1] * a[6] - a[8] * a[2] * a[5];

        inv
    }

    #[must_use]
    pub fn determinant(&self) -> T {
        let a = self.to_cols_flat();
        let inv = Self::adjugate_flat(&a);
        a[0] * inv[0] + a[1] * inv[4] + a[2] * inv[8] + a[3] * inv[12]
    }

    /// Full inverse by cofactor expansion.
    ///
    /// A matrix whose determinant is exactly zero has no inverse; the identity
    /// is returned so that a degenerate transform cannot spread NaN through a
    /// frame.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let a = self.to_cols_flat();
        let mut inv = Self::adjugate_flat(&a);

        let det = a[0] * inv[0] + a[1] * inv[4] + a[2] * inv[8] + a[3] * inv[12];
        if det == T::ZERO {
            return Self::identity();
        }

        let inv_det = T::ONE / det;
        for value in &mut inv {
            *value *= inv_det;
        }
        Self::from_cols_flat(&inv)
    }

    /// Element-wise comparison within `epsilon`.
    #[must_use]
    pub fn abs_diff_eq(&self, other: &Self, epsilon: T) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .all(|(a, b)| (*a - *b).abs() <= epsilon)
    }
}

impl<T: Scalar> Default for Matrix4<T> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<T: Scalar> Mul for Matrix4<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut out = [[T::ZERO; 4]; 4];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                let mut sum = T::ZERO;
                for k in 0..4 {
                    sum += self.m[r][k] * rhs.m[k][c];
                }
                *value = sum;
            }
        }
        Self { m: out }
    }
}

impl<T: Scalar> MulAssign for Matrix4<T> {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<T: Scalar> Mul<Vector4<T>> for Matrix4<T> {
    type Output = Vector4<T>;

    fn mul(self, v: Vector4<T>) -> Vector4<T> {
        Vector4::new(
            self.row(0).dot(v),
            self.row(1).dot(v),
            self.row(2).dot(v),
            self.row(3).dot(v),
        )
    }
}

/// Transforms a point, see [`Matrix4::transform_point`].
impl<T: Scalar> Mul<Vector3<T>> for Matrix4<T> {
    type Output = Vector3<T>;

    fn mul(self, p: Vector3<T>) -> Vector3<T> {
        self.transform_point(p)
    }
}

/// Row-vector product `vᵀ · M`.
impl<T: Scalar> Mul<Matrix4<T>> for Vector4<T> {
    type Output = Vector4<T>;

    fn mul(self, m: Matrix4<T>) -> Vector4<T> {
        Vector4::new(m.col(0).dot(self), m.col(1).dot(self), m.col(2).dot(self), m.col(3).dot(self))
    }
}

// ============================================================================
// glam interop (glam is column-major)
// ============================================================================

impl From<glam::Mat4> for Matrix4<f32> {
    fn from(mat: glam::Mat4) -> Self {
        Self::from_rows(mat.transpose().to_cols_array_2d())
    }
}

impl From<Matrix4<f32>> for glam::Mat4 {
    fn from(mat: Matrix4<f32>) -> Self {
        glam::Mat4::from_cols_array_2d(&mat.m).transpose()
    }
}

impl From<glam::DMat4> for Matrix4<f64> {
    fn from(mat: glam::DMat4) -> Self {
        Self::from_rows(mat.transpose().to_cols_array_2d())
    }
}

impl From<Matrix4<f64>> for glam::DMat4 {
    fn from(mat: Matrix4<f64>) -> Self {
        glam::DMat4::from_cols_array_2d(&mat.m).transpose()
    }
}
