use std::f64::consts::PI;

use nalgebra::{Rotation3, UnitQuaternion};

use super::RotationParameterization;
use crate::math::{skew, Mat3, Mat3x6, Real, Vec3};

/// Below this angle the trigonometric coefficients switch to their Taylor series.
const SMALL_ANGLE_THRESHOLD: Real = 1e-2;

/// Axis-angle (rotation vector) parameterization: `R(φ) = exp([φ]×)`.
///
/// The S matrix is the left Jacobian of SO(3):
///
/// ```text
/// S(φ) = I + a(θ) [φ]× + b(θ) [φ]×²,  a = (1 - cos θ)/θ²,  b = (θ - sin θ)/θ³
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RotationVector;

/// `(a, b, a'/θ, b'/θ)` for the left Jacobian coefficients.
fn left_jacobian_coefficients(theta: Real) -> (Real, Real, Real, Real) {
    if theta < SMALL_ANGLE_THRESHOLD {
        let t2 = theta * theta;
        let t4 = t2 * t2;
        let a = 0.5 - t2 / 24.0 + t4 / 720.0;
        let b = 1.0 / 6.0 - t2 / 120.0 + t4 / 5040.0;
        let da = -1.0 / 12.0 + t2 / 180.0 - t4 / 6720.0;
        let db = -1.0 / 60.0 + t2 / 1260.0 - t4 / 60480.0;
        return (a, b, da, db);
    }

    let sin_t = theta.sin();
    let half_sin = (0.5 * theta).sin();
    // 1 - cos θ without cancellation
    let one_minus_cos = 2.0 * half_sin * half_sin;
    let t2 = theta * theta;
    let t3 = t2 * theta;
    let a = one_minus_cos / t2;
    let b = (theta - sin_t) / t3;
    let da = (theta * sin_t - 2.0 * one_minus_cos) / (t2 * t2);
    let db = (one_minus_cos * theta - 3.0 * (theta - sin_t)) / (t3 * t2);
    (a, b, da, db)
}

impl RotationParameterization for RotationVector {
    fn exp(&self, params: &Vec3) -> Mat3 {
        Rotation3::new(*params).into_inner()
    }

    fn log(&self, rotation: &Mat3) -> Vec3 {
        let q = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(*rotation));
        // Angle in [0, π]: flip to the hemisphere with a non-negative scalar part.
        let (v, w) = if q.w < 0.0 {
            (-q.vector().into_owned(), -q.w)
        } else {
            (q.vector().into_owned(), q.w)
        };
        let n = v.norm();
        if n < 1e-12 {
            return 2.0 * v / w;
        }
        v * (2.0 * n.atan2(w) / n)
    }

    fn s_matrix(&self, params: &Vec3) -> Mat3 {
        let (a, b, _, _) = left_jacobian_coefficients(params.norm());
        let phi = skew(params);
        Mat3::identity() + a * phi + b * phi * phi
    }

    fn angular_velocity_and_jacobian(&self, params: &Vec3, rates: &Vec3) -> (Vec3, Mat3x6) {
        let (a, b, da, db) = left_jacobian_coefficients(params.norm());
        let phi = params;
        let v = rates;

        let phi_x_v = phi.cross(v);
        let phi_x_phi_x_v = phi.cross(&phi_x_v);
        let omega = v + a * phi_x_v + b * phi_x_phi_x_v;

        // d(φ × (φ × v))/dφ = (φ·v) I + φ vᵀ - 2 v φᵀ
        let d_double_cross =
            Mat3::identity() * phi.dot(v) + phi * v.transpose() - 2.0 * v * phi.transpose();
        let d_omega_d_phi = da * phi_x_v * phi.transpose() - a * skew(v)
            + db * phi_x_phi_x_v * phi.transpose()
            + b * d_double_cross;

        let s = Mat3::identity() + a * skew(phi) + b * skew(phi) * skew(phi);

        let mut jacobian = Mat3x6::zeros();
        jacobian.fixed_view_mut::<3, 3>(0, 0).copy_from(&d_omega_d_phi);
        jacobian.fixed_view_mut::<3, 3>(0, 3).copy_from(&s);
        (omega, jacobian)
    }

    fn closest_equivalent(&self, params: &Vec3, reference: &Vec3) -> Vec3 {
        let angle = params.norm();
        let axis = if angle > 1e-12 {
            params / angle
        } else if reference.norm() > 1e-12 {
            reference.normalize()
        } else {
            return *params;
        };

        let mut best = *params;
        let mut best_dist = (best - reference).norm();
        for turns in -3..=3 {
            if turns == 0 {
                continue;
            }
            let candidate = axis * (angle + 2.0 * PI * turns as Real);
            let dist = (candidate - reference).norm();
            if dist < best_dist {
                best = candidate;
                best_dist = dist;
            }
        }
        best
    }
}
