//! Math Primitive Tests
//!
//! Tests for:
//! - Matrix4 composition, inversion (including the singular fallback)
//! - Projection builders against known values
//! - from_forward_up basis layout and the degenerate case
//! - Row-vector and column-vector products
//! - glam interop

use std::f32::consts::FRAC_PI_2;

use enco::math::{Matrix3f, Matrix4, Matrix4d, Matrix4f, Vector3, Vector3f, Vector4f};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vector3f, b: Vector3f) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y) && approx(a.z, b.z)
}

fn sample_matrix() -> Matrix4f {
    Matrix4f::translation(3.0, -2.0, 5.0)
        .rotate_y(0.7)
        .rotate_x(-0.3)
        .scale(2.0, 0.5, 1.5)
}

// ============================================================================
// Composition
// ============================================================================

#[test]
fn identity_is_neutral() {
    let m = sample_matrix();
    assert_eq!(m * Matrix4f::identity(), m);
    assert_eq!(Matrix4f::identity() * m, m);
}

#[test]
fn product_is_not_commutative() {
    let t = Matrix4f::translation(1.0, 0.0, 0.0);
    let r = Matrix4f::rotation_z(FRAC_PI_2);

    let tr = (t * r).transform_point(Vector3f::new(1.0, 0.0, 0.0));
    let rt = (r * t).transform_point(Vector3f::new(1.0, 0.0, 0.0));

    assert!(vec3_approx(tr, Vector3f::new(1.0, 1.0, 0.0)));
    assert!(vec3_approx(rt, Vector3f::new(0.0, 2.0, 0.0)));
}

#[test]
fn product_is_associative() {
    let a = Matrix4f::rotation_x(0.4);
    let b = Matrix4f::translation(1.0, 2.0, 3.0);
    let c = Matrix4f::scaling(2.0, 3.0, 4.0);
    assert!(((a * b) * c).abs_diff_eq(&(a * (b * c)), EPSILON));
}

#[test]
fn row_vector_product_uses_transpose() {
    let m = sample_matrix();
    let v = Vector4f::new(1.0, 2.0, 3.0, 1.0);

    let row = v * m;
    let col = m.transpose() * v;
    assert!(approx(row.x, col.x) && approx(row.y, col.y) && approx(row.z, col.z) && approx(row.w, col.w));
}

// ============================================================================
// Inversion
// ============================================================================

#[test]
fn inverse_times_matrix_is_identity() {
    let m = sample_matrix();
    assert!((m * m.inverse()).abs_diff_eq(&Matrix4f::identity(), 1e-4));
    assert!((m.inverse() * m).abs_diff_eq(&Matrix4f::identity(), 1e-4));
}

#[test]
fn inverse_in_double_precision() {
    let m = Matrix4d::translation(10.0, 20.0, 30.0).rotate_z(1.1).scale(3.0, 3.0, 3.0);
    assert!((m * m.inverse()).abs_diff_eq(&Matrix4d::identity(), 1e-12));
}

#[test]
fn singular_inverse_is_exact_identity() {
    assert_eq!(Matrix4f::zero().inverse(), Matrix4f::identity());

    let flat = Matrix4f::scaling(1.0, 0.0, 1.0);
    assert_eq!(flat.determinant(), 0.0);
    assert_eq!(flat.inverse(), Matrix4f::identity());
}

#[test]
fn matrix3_inverse_round_trip() {
    let r = Matrix4f::rotation_y(0.3).rotation();
    assert!(approx(r.determinant(), 1.0));

    let product = r * r.inverse();
    let identity = Matrix3f::identity();
    for row in 0..3 {
        for col in 0..3 {
            assert!(approx(product.m[row][col], identity.m[row][col]));
        }
    }
}

// ============================================================================
// Builders
// ============================================================================

#[test]
fn orthographic_maps_box_to_unit_cube() {
    let m = Matrix4f::orthographic(-2.0, 2.0, -1.0, 1.0, 0.1, 10.0);
    let corner = m.transform_point(Vector3f::new(2.0, 1.0, 0.0));
    assert!(approx(corner.x, 1.0));
    assert!(approx(corner.y, 1.0));
}

#[test]
fn perspective_scales_by_focal_length() {
    let m = Matrix4f::perspective(FRAC_PI_2, 2.0, 0.1, 100.0);
    // tan(45°) = 1
    assert!(approx(m.m[0][0], 0.5));
    assert!(approx(m.m[1][1], 1.0));
    assert!(approx(m.m[3][2], 1.0) || approx(m.m[3][2], -1.0));
}

#[test]
fn forward_up_basis_rows() {
    let forward = Vector3f::unit_z();
    let up = Vector3f::unit_y();
    let m = Matrix4f::from_forward_up(forward, up);

    // right = normalize(up x forward) = +X
    assert!(vec3_approx(m.row(0).truncate(), Vector3f::unit_x()));
    assert!(vec3_approx(m.row(1).truncate(), up));
    assert!(vec3_approx(m.row(2).truncate(), forward));
}

#[test]
fn forward_up_parallel_inputs_degrade_without_panicking() {
    let m = Matrix4f::from_forward_up(Vector3f::unit_y(), Vector3f::unit_y());
    assert_eq!(m.row(0).truncate(), Vector3f::zero());
}

#[test]
fn rotation_block_round_trip() {
    let m = sample_matrix();
    let replaced = Matrix4f::translation(1.0, 2.0, 3.0).with_rotation(&m.rotation());
    assert_eq!(replaced.rotation(), m.rotation());
    assert_eq!(replaced.translation_part(), Vector3f::new(1.0, 2.0, 3.0));
}

// ============================================================================
// Vectors & interop
// ============================================================================

#[test]
fn cross_product_right_handed() {
    let x = Vector3::<f64>::unit_x();
    let y = Vector3::<f64>::unit_y();
    assert_eq!(x.cross(y), Vector3::unit_z());
}

#[test]
fn normalize_zero_vector_stays_zero() {
    assert_eq!(Vector3f::zero().normalize(), Vector3f::zero());
}

#[test]
fn glam_interop_matches_transform_point() {
    let m = sample_matrix();
    let g: glam::Mat4 = m.into();
    let p = Vector3f::new(0.5, -1.0, 2.0);

    let ours = m.transform_point(p);
    let theirs: Vector3f = g.transform_point3(p.into()).into();
    assert!(vec3_approx(ours, theirs));

    let back: Matrix4<f32> = g.into();
    assert!(back.abs_diff_eq(&m, EPSILON));
}
