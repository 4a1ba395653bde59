use std::ops::Mul;

use super::{Scalar, Vector3};

/// A 3x3 matrix stored row-major (`m[row][col]`).
///
/// Vectors are treated as columns: `M * v` transforms `v`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3<T> {
    pub m: [[T; 3]; 3],
}

impl<T: Scalar> Matrix3<T> {
    #[must_use]
    pub const fn from_rows(m: [[T; 3]; 3]) -> Self {
        Self { m }
    }

    #[rustfmt::skip]
    #[must_use]
    pub fn new(
        m00: T, m01: T, m02: T,
        m10: T, m11: T, m12: T,
        m20: T, m21: T, m22: T,
    ) -> Self {
        Self { m: [[m00, m01, m02], [m10, m11, m12], [m20, m21, m22]] }
    }

    #[must_use]
    pub fn identity() -> Self {
        let (o, z) = (T::ONE, T::ZERO);
        Self::new(o, z, z, z, o, z, z, z, o)
    }

    #[rustfmt::skip]
    #[must_use]
    pub fn transpose(&self) -> Self {
        let m = &self.m;
        Self::new(
            m[0][0], m[1][0], m[2][0],
            m[0][1], m[1][1], m[2][1],
            m[0][2], m[1][2], m[2][2],
        )
    }

    #[must_use]
    pub fn determinant(&self) -> T {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Inverse via the adjugate. A singular matrix yields the identity.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let det = self.determinant();
        if det == T::ZERO {
            return Self::identity();
        }
        let m = &self.m;
        let inv_det = T::ONE / det;
        let adj = Self::new(
            m[1][1] * m[2][2] - m[1][2] * m[2][1],
            m[0][2] * m[2][1] - m[0][1] * m[2][2],
            m[0][1] * m[1][2] - m[0][2] * m[1][1],
            m[1][2] * m[2][0] - m[1][0] * m[2][2],
            m[0][0] * m[2][2] - m[0][2] * m[2][0],
            m[0][2] * m[1][0] - m[0][0] * m[1][2],
            m[1][0] * m[2][1] - m[1][1] * m[2][0],
            m[0][1] * m[2][0] - m[0][0] * m[2][1],
            m[0][0] * m[1][1] - m[0][1] * m[1][0],
        );
        let mut out = adj;
        for row in &mut out.m {
            for value in row.iter_mut() {
                *value *= inv_det;
            }
        }
        out
    }

    #[must_use]
    pub fn row(&self, index: usize) -> Vector3<T> {
        let r = self.m[index];
        Vector3::new(r[0], r[1], r[2])
    }
}

impl<T: Scalar> Default for Matrix3<T> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<T: Scalar> Mul for Matrix3<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut out = [[T::ZERO; 3]; 3];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                let mut sum = T::ZERO;
                for k in 0..3 {
                    sum += self.m[r][k] * rhs.m[k][c];
                }
                *value = sum;
            }
        }
        Self { m: out }
    }
}

impl<T: Scalar> Mul<Vector3<T>> for Matrix3<T> {
    type Output = Vector3<T>;

    fn mul(self, v: Vector3<T>) -> Vector3<T> {
        Vector3::new(self.row(0).dot(v), self.row(1).dot(v), self.row(2).dot(v))
    }
}

/// Row-vector product `vᵀ · M`.
impl<T: Scalar> Mul<Matrix3<T>> for Vector3<T> {
    type Output = Vector3<T>;

    fn mul(self, m: Matrix3<T>) -> Vector3<T> {
        m.transpose() * self
    }
}
