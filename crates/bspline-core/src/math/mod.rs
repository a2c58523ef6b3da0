//! Mathematical utilities and type definitions.
//!
//! This module provides the fixed-size linear algebra types used throughout the
//! workspace and a few helpers for skew-symmetric matrices and row-major
//! homogeneous transforms.

use nalgebra::{Matrix3, Matrix3x6, Matrix4, Matrix4x6, Matrix6, Vector3, Vector4, Vector6};

/// Scalar type used throughout the library (currently `f64`).
pub type Real = f64;

/// 3D vector with [`Real`] components.
pub type Vec3 = Vector3<Real>;
/// Homogeneous 3D vector with [`Real`] components.
pub type Vec4 = Vector4<Real>;
/// Curve value / SE(3) perturbation vector with [`Real`] components.
pub type Vec6 = Vector6<Real>;
/// 3×3 matrix with [`Real`] entries.
pub type Mat3 = Matrix3<Real>;
/// 4×4 matrix with [`Real`] entries (homogeneous rigid transforms).
pub type Mat4 = Matrix4<Real>;
/// 6×6 matrix with [`Real`] entries.
pub type Mat6 = Matrix6<Real>;
/// 3×6 matrix with [`Real`] entries.
pub type Mat3x6 = Matrix3x6<Real>;
/// 4×6 matrix with [`Real`] entries.
pub type Mat4x6 = Matrix4x6<Real>;

/// Skew-symmetric matrix `[v]×` such that `[v]× u = v × u`.
///
/// ```text
/// [v]× = |  0   -v_z   v_y |
///        |  v_z   0   -v_x |
///        | -v_y  v_x    0  |
/// ```
#[inline]
pub fn skew(v: &Vec3) -> Mat3 {
    Mat3::new(0.0, -v.z, v.y, v.z, 0.0, -v.x, -v.y, v.x, 0.0)
}

/// Inverse of [`skew`]: extract `v` from the antisymmetric part of `m`.
///
/// For a general matrix this returns the vector of `(m - mᵀ) / 2`.
#[inline]
pub fn vee(m: &Mat3) -> Vec3 {
    Vec3::new(
        0.5 * (m[(2, 1)] - m[(1, 2)]),
        0.5 * (m[(0, 2)] - m[(2, 0)]),
        0.5 * (m[(1, 0)] - m[(0, 1)]),
    )
}

/// Build a 4×4 matrix from row-major nested arrays (the JSON layout).
pub fn mat4_from_rows(a: &[[Real; 4]; 4]) -> Mat4 {
    Mat4::from_fn(|r, c| a[r][c])
}

/// Convert a 4×4 matrix into row-major nested arrays (the JSON layout).
pub fn mat4_to_rows(m: &Mat4) -> [[Real; 4]; 4] {
    let mut rows = [[0.0; 4]; 4];
    for (r, row) in rows.iter_mut().enumerate() {
        for (c, v) in row.iter_mut().enumerate() {
            *v = m[(r, c)];
        }
    }
    rows
}
