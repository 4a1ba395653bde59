//! Math Primitives
//!
//! Pure value types used by every node and component:
//! - [`Vector2`], [`Vector3`], [`Vector4`]
//! - [`Matrix3`], [`Matrix4`] with composition, inversion and projection builders
//!
//! All types are generic over a [`Scalar`] (`f32` or `f64`). The scene graph
//! itself works in single precision through the `*f` aliases.
//!
//! Degenerate inputs never panic: the inverse of a singular matrix is the
//! identity and normalizing a zero vector leaves it unchanged.

mod matrix3;
mod matrix4;
mod scalar;
mod vector;

pub use matrix3::Matrix3;
pub use matrix4::Matrix4;
pub use scalar::Scalar;
pub use vector::{Vector2, Vector3, Vector4};

pub type Vector2f = Vector2<f32>;
pub type Vector3f = Vector3<f32>;
pub type Vector4f = Vector4<f32>;
pub type Matrix3f = Matrix3<f32>;
pub type Matrix4f = Matrix4<f32>;

pub type Vector3d = Vector3<f64>;
pub type Matrix4d = Matrix4<f64>;
