use super::RotationParameterization;
use crate::math::{skew, vee, Mat3, Mat3x6, Vec3};

/// Cayley / Gibbs-vector parameterization `g = tan(θ/2) a`.
///
/// ```text
/// R(g) = (I - [g]×)⁻¹ (I + [g]×) = I + 2/(1 + gᵀg) ([g]× + [g]×²)
/// S(g) = 2/(1 + gᵀg) (I + [g]×)
/// ```
///
/// The parameterization is singular at θ = π; it is well suited to trajectories that
/// stay away from half turns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CayleyParameters;

impl RotationParameterization for CayleyParameters {
    fn exp(&self, params: &Vec3) -> Mat3 {
        let g = skew(params);
        let scale = 2.0 / (1.0 + params.norm_squared());
        Mat3::identity() + scale * (g + g * g)
    }

    fn log(&self, rotation: &Mat3) -> Vec3 {
        // R - Rᵀ = 4/(1 + gᵀg) [g]×  and  1 + tr R = 4/(1 + gᵀg)
        2.0 * vee(rotation) / (1.0 + rotation.trace())
    }

    fn s_matrix(&self, params: &Vec3) -> Mat3 {
        let scale = 2.0 / (1.0 + params.norm_squared());
        scale * (Mat3::identity() + skew(params))
    }

    fn angular_velocity_and_jacobian(&self, params: &Vec3, rates: &Vec3) -> (Vec3, Mat3x6) {
        let c = 2.0 / (1.0 + params.norm_squared());
        let inner = rates + params.cross(rates);
        let omega = c * inner;

        // dc/dg = -c² gᵀ
        let d_omega_d_g = -c * c * inner * params.transpose() - c * skew(rates);
        let s = c * (Mat3::identity() + skew(params));

        let mut jacobian = Mat3x6::zeros();
        jacobian.fixed_view_mut::<3, 3>(0, 0).copy_from(&d_omega_d_g);
        jacobian.fixed_view_mut::<3, 3>(0, 3).copy_from(&s);
        (omega, jacobian)
    }
}
