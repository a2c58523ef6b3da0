//! Homogeneous SE(3) helpers.
//!
//! Perturbations are 6-vectors `δ = [δρ; δφ]` (translation first) applied on the
//! left: `T' = exp(δ^) T ≈ (I + δ^) T` with
//!
//! ```text
//! δ^ = | [δφ]×  δρ |
//!      |   0     0 |
//! ```

use anyhow::{ensure, Result};

use crate::math::{skew, vee, Mat3, Mat4, Mat4x6, Mat6, Real, Vec3, Vec4};

/// Jacobian of `(I + δ^) v` with respect to `δ` for a homogeneous point `v`.
///
/// ```text
/// boxMinus(v) = | w I   -[v_xyz]× |
///               |  0        0     |
/// ```
pub fn box_minus(v: &Vec4) -> Mat4x6 {
    let mut b = Mat4x6::zeros();
    b.fixed_view_mut::<3, 3>(0, 0)
        .copy_from(&(Mat3::identity() * v[3]));
    b.fixed_view_mut::<3, 3>(0, 3)
        .copy_from(&(-skew(&v.xyz())));
    b
}

/// Adjoint of `t`: maps a left perturbation of `X` to a left perturbation of `t X t⁻¹`.
///
/// ```text
/// boxTimes(T) = | R  [t]× R |
///               | 0     R   |
/// ```
pub fn box_times(t: &Mat4) -> Mat6 {
    let r = rotation_part(t);
    let tr = translation_part(t);
    let mut ad = Mat6::zeros();
    ad.fixed_view_mut::<3, 3>(0, 0).copy_from(&r);
    ad.fixed_view_mut::<3, 3>(0, 3).copy_from(&(skew(&tr) * r));
    ad.fixed_view_mut::<3, 3>(3, 3).copy_from(&r);
    ad
}

/// Assemble a homogeneous transform from a rotation matrix and a translation.
pub fn transformation_from_parts(rotation: &Mat3, translation: &Vec3) -> Mat4 {
    let mut t = Mat4::identity();
    t.fixed_view_mut::<3, 3>(0, 0).copy_from(rotation);
    t.fixed_view_mut::<3, 1>(0, 3).copy_from(translation);
    t
}

/// Rigid inverse: `[Rᵀ, -Rᵀ t]`.
pub fn invert_transformation(t: &Mat4) -> Mat4 {
    let r_t = rotation_part(t).transpose();
    transformation_from_parts(&r_t, &(-r_t * translation_part(t)))
}

/// Upper-left 3×3 block.
pub fn rotation_part(t: &Mat4) -> Mat3 {
    t.fixed_view::<3, 3>(0, 0).into_owned()
}

/// Upper-right 3×1 block.
pub fn translation_part(t: &Mat4) -> Vec3 {
    t.fixed_view::<3, 1>(0, 3).into_owned()
}

/// Angle (radians) of the relative rotation `aᵀ b`.
pub fn rotation_angle_between(a: &Mat3, b: &Mat3) -> Real {
    let rel = a.transpose() * b;
    // vee(R) = sin θ a,  tr R = 1 + 2 cos θ
    vee(&rel).norm().atan2(0.5 * (rel.trace() - 1.0))
}

/// Check that `t` is a homogeneous rigid transform within `tol`.
pub fn validate_transformation(t: &Mat4, tol: Real) -> Result<()> {
    ensure!(
        t.iter().all(|v| v.is_finite()),
        "transformation contains non-finite entries"
    );
    let bottom = t.fixed_view::<1, 4>(3, 0);
    ensure!(
        bottom[0].abs() <= tol && bottom[1].abs() <= tol && bottom[2].abs() <= tol
            && (bottom[3] - 1.0).abs() <= tol,
        "last row of a homogeneous transform must be [0 0 0 1], got {bottom}"
    );
    let r = rotation_part(t);
    let ortho = (r.transpose() * r - Mat3::identity()).norm();
    ensure!(
        ortho <= tol,
        "rotation block is not orthonormal (‖RᵀR - I‖ = {ortho:.3e})"
    );
    ensure!(
        r.determinant() > 0.0,
        "rotation block has negative determinant"
    );
    Ok(())
}
