//! Uniform B-spline curves and continuous-time SE(3) pose splines.
//!
//! - [`basis`]: Cox–de Boor basis functions and their derivatives.
//! - [`BSpline`]: vector-valued curve with boundary initialization, segment
//!   extension and smoothed least-squares fitting.
//! - [`BSplinePose`]: pose trajectory over a [`RotationParameterization`], with
//!   analytic Jacobians of poses, transformed points, linear acceleration and
//!   angular velocity with respect to the local coefficient window.
//! - [`CoefficientCheckpoint`]: scoped overwrite of a coefficient window.
//! - [`fit`]: serde configuration, input and report types for pose fitting.
//!
//! [`RotationParameterization`]: bspline_core::RotationParameterization

pub mod basis;
mod checkpoint;
mod curve;
mod error;
pub mod fit;
mod pose;

pub use checkpoint::*;
pub use curve::*;
pub use error::*;
pub use fit::{
    evaluate_fit, fit_pose_spline, run_pose_fit, FitOptions, FitResiduals, PoseFitConfig,
    PoseFitInput, PoseFitReport, PoseSample,
};
pub use pose::*;
