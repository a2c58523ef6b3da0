//! Rotation parameterizations used by the pose spline.
//!
//! A parameterization maps a 3-vector of curve-space parameters `p` to a rotation
//! matrix `R(p)` and back. The spline interpolates `p` linearly through its basis, so
//! it needs, besides `exp`/`log`, the first-order behaviour of `R(p)`:
//!
//! - the **S matrix**, defined through the left (world-frame) perturbation
//!   `R(p + dp) ≈ exp((S(p) dp)^) R(p)`,
//! - the world-frame angular velocity `ω = S(p) ṗ` and its derivatives with respect
//!   to `p` and `ṗ`,
//! - the **box-minus** Jacobian `∂(R(p) x)/∂p = -[R(p) x]× S(p)`.
//!
//! Two minimal variants are provided: [`RotationVector`] (axis-angle) and
//! [`CayleyParameters`] (Gibbs vector). [`AnyRotation`] dispatches at runtime from a
//! [`RotationKind`] configuration value.

mod cayley;
mod rotation_vector;

pub use cayley::*;
pub use rotation_vector::*;

use crate::math::{skew, Mat3, Mat3x6, Vec3};
use serde::{Deserialize, Serialize};

/// Capability set a rotation parameterization must provide to drive a pose spline.
pub trait RotationParameterization {
    /// Map parameters to a rotation matrix.
    fn exp(&self, params: &Vec3) -> Mat3;

    /// Map a rotation matrix to parameters. Inverse of [`exp`](Self::exp) within the
    /// parameterization's domain.
    fn log(&self, rotation: &Mat3) -> Vec3;

    /// World-frame velocity map: `R(p + dp) ≈ exp((S dp)^) R(p)`.
    fn s_matrix(&self, params: &Vec3) -> Mat3;

    /// Rotation matrix and S matrix in one call.
    fn exp_and_s_matrix(&self, params: &Vec3) -> (Mat3, Mat3) {
        (self.exp(params), self.s_matrix(params))
    }

    /// Local-to-body velocity map: `ω_body = R(p)ᵀ S(p) ṗ`.
    fn body_s_matrix(&self, params: &Vec3) -> Mat3 {
        let (rotation, s) = self.exp_and_s_matrix(params);
        rotation.transpose() * s
    }

    /// Jacobian of `R(p) x` with respect to `p`, given the rotated point `R(p) x`.
    fn box_minus(&self, params: &Vec3, rotated_point: &Vec3) -> Mat3 {
        -skew(rotated_point) * self.s_matrix(params)
    }

    /// World-frame angular velocity `ω = S(p) ṗ`.
    fn angular_velocity(&self, params: &Vec3, rates: &Vec3) -> Vec3 {
        self.s_matrix(params) * rates
    }

    /// World-frame angular velocity and its Jacobian `[∂ω/∂p | ∂ω/∂ṗ]`.
    fn angular_velocity_and_jacobian(&self, params: &Vec3, rates: &Vec3) -> (Vec3, Mat3x6);

    /// Parameters equivalent to `params` (same rotation) that are closest to
    /// `reference`. Used to keep consecutive curve values free of wrap-around jumps.
    fn closest_equivalent(&self, params: &Vec3, _reference: &Vec3) -> Vec3 {
        *params
    }
}

/// Serializable selector for the built-in parameterizations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationKind {
    #[default]
    RotationVector,
    Cayley,
}

/// Runtime-dispatched rotation parameterization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnyRotation {
    RotationVector(RotationVector),
    Cayley(CayleyParameters),
}

impl Default for AnyRotation {
    fn default() -> Self {
        AnyRotation::RotationVector(RotationVector)
    }
}

impl From<RotationKind> for AnyRotation {
    fn from(kind: RotationKind) -> Self {
        match kind {
            RotationKind::RotationVector => AnyRotation::RotationVector(RotationVector),
            RotationKind::Cayley => AnyRotation::Cayley(CayleyParameters),
        }
    }
}

impl AnyRotation {
    pub fn kind(&self) -> RotationKind {
        match self {
            AnyRotation::RotationVector(_) => RotationKind::RotationVector,
            AnyRotation::Cayley(_) => RotationKind::Cayley,
        }
    }
}

impl RotationParameterization for AnyRotation {
    fn exp(&self, params: &Vec3) -> Mat3 {
        match self {
            AnyRotation::RotationVector(m) => m.exp(params),
            AnyRotation::Cayley(m) => m.exp(params),
        }
    }

    fn log(&self, rotation: &Mat3) -> Vec3 {
        match self {
            AnyRotation::RotationVector(m) => m.log(rotation),
            AnyRotation::Cayley(m) => m.log(rotation),
        }
    }

    fn s_matrix(&self, params: &Vec3) -> Mat3 {
        match self {
            AnyRotation::RotationVector(m) => m.s_matrix(params),
            AnyRotation::Cayley(m) => m.s_matrix(params),
        }
    }

    fn angular_velocity_and_jacobian(&self, params: &Vec3, rates: &Vec3) -> (Vec3, Mat3x6) {
        match self {
            AnyRotation::RotationVector(m) => m.angular_velocity_and_jacobian(params, rates),
            AnyRotation::Cayley(m) => m.angular_velocity_and_jacobian(params, rates),
        }
    }

    fn closest_equivalent(&self, params: &Vec3, reference: &Vec3) -> Vec3 {
        match self {
            AnyRotation::RotationVector(m) => m.closest_equivalent(params, reference),
            AnyRotation::Cayley(m) => m.closest_equivalent(params, reference),
        }
    }
}
