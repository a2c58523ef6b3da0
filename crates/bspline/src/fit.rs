//! Configuration, input and report types for fitting a pose spline to samples.

use bspline_core::{
    mat4_from_rows, rotation_angle_between, rotation_part, translation_part, AnyRotation, Mat4,
    Real, RotationKind, RotationParameterization,
};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::{BSplinePose, SplineError};

/// Knot placement and smoothing for [`BSplinePose::init_pose_spline_poses`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitOptions {
    /// Number of uniform segments over the sample time range.
    pub num_segments: usize,
    /// Weight of the integrated squared second derivative.
    pub lambda: Real,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            num_segments: 8,
            lambda: 1e-6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseFitConfig {
    /// Spline order (degree + 1).
    pub order: usize,
    pub rotation: RotationKind,
    pub fit: FitOptions,
}

impl Default for PoseFitConfig {
    fn default() -> Self {
        Self {
            order: 4,
            rotation: RotationKind::default(),
            fit: FitOptions::default(),
        }
    }
}

/// Timestamped pose, row-major homogeneous matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseSample {
    pub t: Real,
    pub pose: [[Real; 4]; 4],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseFitInput {
    pub samples: Vec<PoseSample>,
}

impl PoseFitInput {
    pub fn times(&self) -> Vec<Real> {
        self.samples.iter().map(|s| s.t).collect()
    }

    pub fn poses(&self) -> Vec<Mat4> {
        self.samples.iter().map(|s| mat4_from_rows(&s.pose)).collect()
    }
}

/// Residuals of a fitted spline at the sample times.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitResiduals {
    pub num_samples: usize,
    pub rms_translation: Real,
    pub max_translation: Real,
    /// Radians.
    pub rms_rotation: Real,
    /// Radians.
    pub max_rotation: Real,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseFitReport {
    pub order: usize,
    pub rotation: RotationKind,
    pub t_min: Real,
    pub t_max: Real,
    pub knots: Vec<Real>,
    /// One `[tx, ty, tz, r0, r1, r2]` entry per coefficient.
    pub coefficients: Vec<[Real; 6]>,
    pub residuals: FitResiduals,
}

impl PoseFitReport {
    /// Rebuild the fitted spline from the stored knots and coefficients.
    pub fn to_spline(&self) -> Result<BSplinePose<AnyRotation>, SplineError> {
        let mut spline = BSplinePose::new(self.order, AnyRotation::from(self.rotation))?;
        let coefficients = DMatrix::from_fn(6, self.coefficients.len(), |r, c| {
            self.coefficients[c][r]
        });
        spline.set_knots_and_coefficients(self.knots.clone(), coefficients)?;
        Ok(spline)
    }
}

/// Translation and rotation errors of `spline` against timestamped poses.
pub fn evaluate_fit<R: RotationParameterization>(
    spline: &BSplinePose<R>,
    times: &[Real],
    poses: &[Mat4],
) -> Result<FitResiduals, SplineError> {
    if times.len() != poses.len() {
        return Err(SplineError::DimensionMismatch {
            expected: times.len(),
            got: poses.len(),
        });
    }
    let mut sum_t = 0.0;
    let mut sum_r = 0.0;
    let mut max_t: Real = 0.0;
    let mut max_r: Real = 0.0;
    for (&t, pose) in times.iter().zip(poses) {
        let fitted = spline.transformation(t)?;
        let dt = (translation_part(&fitted) - translation_part(pose)).norm();
        let dr = rotation_angle_between(&rotation_part(&fitted), &rotation_part(pose));
        sum_t += dt * dt;
        sum_r += dr * dr;
        max_t = max_t.max(dt);
        max_r = max_r.max(dr);
    }
    let n = times.len().max(1) as Real;
    Ok(FitResiduals {
        num_samples: times.len(),
        rms_translation: (sum_t / n).sqrt(),
        max_translation: max_t,
        rms_rotation: (sum_r / n).sqrt(),
        max_rotation: max_r,
    })
}

/// Fit a spline to `input` according to `config`.
pub fn fit_pose_spline(
    input: &PoseFitInput,
    config: &PoseFitConfig,
) -> Result<BSplinePose<AnyRotation>, SplineError> {
    if input.samples.is_empty() {
        return Err(SplineError::InvalidFitInput("no samples".into()));
    }
    let mut spline = BSplinePose::new(config.order, AnyRotation::from(config.rotation))?;
    spline.init_pose_spline_poses(
        &input.times(),
        &input.poses(),
        config.fit.num_segments,
        config.fit.lambda,
    )?;
    Ok(spline)
}

/// Fit and summarize: knots, coefficients and residuals at the sample times.
pub fn run_pose_fit(
    input: &PoseFitInput,
    config: &PoseFitConfig,
) -> Result<PoseFitReport, SplineError> {
    let spline = fit_pose_spline(input, config)?;
    let residuals = evaluate_fit(&spline, &input.times(), &input.poses())?;
    let coefficients = spline
        .coefficients()
        .column_iter()
        .map(|c| [c[0], c[1], c[2], c[3], c[4], c[5]])
        .collect();
    Ok(PoseFitReport {
        order: spline.order(),
        rotation: spline.rotation().kind(),
        t_min: spline.t_min()?,
        t_max: spline.t_max()?,
        knots: spline.knots().to_vec(),
        coefficients,
        residuals,
    })
}
