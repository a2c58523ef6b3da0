//! Core math primitives for `bspline-pose`.
//!
//! This crate contains:
//! - linear algebra type aliases (`Real`, `Vec3`, `Mat4`, ...),
//! - rotation parameterizations behind the [`RotationParameterization`] trait
//!   ([`RotationVector`], [`CayleyParameters`], runtime-selected [`AnyRotation`]),
//! - homogeneous SE(3) helpers (`box_minus`, `box_times`, rigid inverse).
//!
//! Pose perturbations follow one convention across the workspace: a 6-vector
//! `δ = [δρ; δφ]` applied on the left, `T' = (I + δ^) T`.

/// Linear algebra type aliases and helpers.
pub mod math;
/// Rotation parameterizations and their differential maps.
pub mod rotation;
/// Homogeneous transform helpers.
pub mod se3;
/// Shared helpers for numerical Jacobian checks in tests.
pub mod test_utils;

pub use math::*;
pub use rotation::*;
pub use se3::*;
