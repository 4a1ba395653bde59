//! 2-, 3- and 4-component vectors.

use std::ops::{Add, AddAssign, Div, DivAssign, Index, Mul, MulAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use super::Scalar;

macro_rules! impl_vector {
    ($name:ident { $($field:ident),+ }, $len:expr) => {
        impl<T: Scalar> $name<T> {
            #[inline]
            #[must_use]
            pub const fn new($($field: T),+) -> Self {
                Self { $($field),+ }
            }

            /// Vector with every component set to `value`.
            #[inline]
            #[must_use]
            pub fn splat(value: T) -> Self {
                Self { $($field: value),+ }
            }

            #[inline]
            #[must_use]
            pub fn zero() -> Self {
                Self::splat(T::ZERO)
            }

            #[inline]
            #[must_use]
            pub fn dot(self, rhs: Self) -> T {
                let mut sum = T::ZERO;
                $(sum += self.$field * rhs.$field;)+
                sum
            }

            #[inline]
            #[must_use]
            pub fn length_squared(self) -> T {
                self.dot(self)
            }

            #[inline]
            #[must_use]
            pub fn length(self) -> T {
                self.length_squared().sqrt()
            }

            /// Returns the unit vector in the same direction.
            ///
            /// A zero-length vector has no direction; it is returned unchanged
            /// instead of producing NaN components.
            #[must_use]
            pub fn normalize(self) -> Self {
                let len = self.length();
                if len == T::ZERO {
                    return self;
                }
                self / len
            }

            /// Component-wise product.
            #[inline]
            #[must_use]
            pub fn mul_elements(self, rhs: Self) -> Self {
                Self { $($field: self.$field * rhs.$field),+ }
            }

            #[must_use]
            pub fn to_array(self) -> [T; $len] {
                [$(self.$field),+]
            }

            /// Component-wise comparison within `epsilon`.
            #[must_use]
            pub fn abs_diff_eq(self, rhs: Self, epsilon: T) -> bool {
                true $(&& (self.$field - rhs.$field).abs() <= epsilon)+
            }
        }

        impl<T: Scalar> Default for $name<T> {
            fn default() -> Self {
                Self::zero()
            }
        }

        impl<T: Scalar> Add for $name<T> {
            type Output = Self;
            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl<T: Scalar> Sub for $name<T> {
            type Output = Self;
            #[inline]
            fn sub(self, rhs: Self) -> Self {
                Self { $($field: self.$field - rhs.$field),+ }
            }
        }

        impl<T: Scalar> Neg for $name<T> {
            type Output = Self;
            #[inline]
            fn neg(self) -> Self {
                Self { $($field: -self.$field),+ }
            }
        }

        impl<T: Scalar> Mul<T> for $name<T> {
            type Output = Self;
            #[inline]
            fn mul(self, rhs: T) -> Self {
                Self { $($field: self.$field * rhs),+ }
            }
        }

        impl<T: Scalar> Div<T> for $name<T> {
            type Output = Self;
            #[inline]
            fn div(self, rhs: T) -> Self {
                Self { $($field: self.$field / rhs),+ }
            }
        }

        impl<T: Scalar> AddAssign for $name<T> {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                $(self.$field += rhs.$field;)+
            }
        }

        impl<T: Scalar> SubAssign for $name<T> {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) {
                $(self.$field -= rhs.$field;)+
            }
        }

        impl<T: Scalar> MulAssign<T> for $name<T> {
            #[inline]
            fn mul_assign(&mut self, rhs: T) {
                $(self.$field *= rhs;)+
            }
        }

        impl<T: Scalar> DivAssign<T> for $name<T> {
            #[inline]
            fn div_assign(&mut self, rhs: T) {
                $(self.$field /= rhs;)+
            }
        }

        impl<T: Scalar> Index<usize> for $name<T> {
            type Output = T;
            fn index(&self, index: usize) -> &T {
                let fields = [$(&self.$field),+];
                fields[index]
            }
        }
    };
}

/// A 2-component vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector2<T> {
    pub x: T,
    pub y: T,
}

/// A 3-component vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector3<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

/// A 4-component vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector4<T> {
    pub x: T,
    pub y: T,
    pub z: T,
    pub w: T,
}

impl_vector!(Vector2 { x, y }, 2);
impl_vector!(Vector3 { x, y, z }, 3);
impl_vector!(Vector4 { x, y, z, w }, 4);

impl<T: Scalar> Vector3<T> {
    #[must_use]
    pub fn unit_x() -> Self {
        Self::new(T::ONE, T::ZERO, T::ZERO)
    }

    #[must_use]
    pub fn unit_y() -> Self {
        Self::new(T::ZERO, T::ONE, T::ZERO)
    }

    #[must_use]
    pub fn unit_z() -> Self {
        Self::new(T::ZERO, T::ZERO, T::ONE)
    }

    #[must_use]
    pub fn one() -> Self {
        Self::splat(T::ONE)
    }

    #[inline]
    #[must_use]
    pub fn cross(self, rhs: Self) -> Self {
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    #[must_use]
    pub fn extend(self, w: T) -> Vector4<T> {
        Vector4::new(self.x, self.y, self.z, w)
    }
}

impl<T: Scalar> Vector4<T> {
    #[must_use]
    pub fn truncate(self) -> Vector3<T> {
        Vector3::new(self.x, self.y, self.z)
    }
}

// ============================================================================
// glam interop
// ============================================================================

impl From<glam::Vec3> for Vector3<f32> {
    fn from(v: glam::Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector3<f32>> for glam::Vec3 {
    fn from(v: Vector3<f32>) -> Self {
        glam::Vec3::new(v.x, v.y, v.z)
    }
}

impl From<glam::Vec4> for Vector4<f32> {
    fn from(v: glam::Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

impl From<Vector4<f32>> for glam::Vec4 {
    fn from(v: Vector4<f32>) -> Self {
        glam::Vec4::new(v.x, v.y, v.z, v.w)
    }
}

impl From<glam::Vec2> for Vector2<f32> {
    fn from(v: glam::Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}
