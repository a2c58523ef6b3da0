//! Continuous-time SE(3) trajectory on a 6-dimensional B-spline.
//!
//! The curve value is `[t; p]`: a translation followed by rotation parameters of a
//! [`RotationParameterization`]. The pose at `t` is
//!
//! ```text
//! T(t) = | R(p(t))  t(t) |
//!        |    0       1  |
//! ```
//!
//! Pose Jacobians are expressed as left perturbations `δ = [δρ; δφ]` with
//! `T' = (I + δ^) T`; kinematic Jacobians are plain derivatives of the returned
//! vectors. All Jacobians are taken with respect to the `6k` local coefficients.

use std::ops::Range;

use bspline_core::{
    box_times, invert_transformation, rotation_part, skew, transformation_from_parts,
    translation_part, validate_transformation, Mat3, Mat3x6, Mat4, Mat4x6, Mat6, Real,
    RotationParameterization, RotationVector, Vec3, Vec4, Vec6,
};
use log::debug;
use nalgebra::{DMatrix, DVector, SMatrix};

use crate::{BSpline, LocalJacobian, SplineError};

const POSE_DIMENSION: usize = 6;
/// Tolerance on `RᵀR - I` for input poses.
const POSE_TOLERANCE: Real = 1e-6;

#[derive(Clone, Debug, PartialEq)]
pub struct BSplinePose<R = RotationVector> {
    spline: BSpline,
    rotation: R,
}

fn check_pose(pose: &Mat4) -> Result<(), SplineError> {
    validate_transformation(pose, POSE_TOLERANCE)
        .map_err(|e| SplineError::InvalidPose(e.to_string()))
}

fn head(v: &Vec6) -> Vec3 {
    v.fixed_rows::<3>(0).into_owned()
}

fn tail(v: &Vec6) -> Vec3 {
    v.fixed_rows::<3>(3).into_owned()
}

fn to_vec6(v: &DVector<Real>) -> Vec6 {
    Vec6::from_column_slice(v.as_slice())
}

/// `ROWS × 6k` Jacobian whose `j`-th block is `block * basis[j]`.
fn stack_blocks<const ROWS: usize>(
    block: &SMatrix<Real, ROWS, 6>,
    basis: &DVector<Real>,
) -> DMatrix<Real> {
    let mut jacobian = DMatrix::zeros(ROWS, POSE_DIMENSION * basis.len());
    for (j, b) in basis.iter().enumerate() {
        jacobian
            .fixed_view_mut::<ROWS, 6>(0, POSE_DIMENSION * j)
            .copy_from(&(block * *b));
    }
    jacobian
}

impl<R: RotationParameterization> BSplinePose<R> {
    /// Empty pose spline of the given order (at least 2).
    pub fn new(order: usize, rotation: R) -> Result<Self, SplineError> {
        Ok(Self {
            spline: BSpline::new(order, POSE_DIMENSION)?,
            rotation,
        })
    }

    pub fn order(&self) -> usize {
        self.spline.order()
    }

    pub fn rotation(&self) -> &R {
        &self.rotation
    }

    /// Underlying 6-dimensional curve.
    pub fn spline(&self) -> &BSpline {
        &self.spline
    }

    pub fn knots(&self) -> &[Real] {
        self.spline.knots()
    }

    /// `6 × C` coefficient matrix.
    pub fn coefficients(&self) -> &DMatrix<Real> {
        self.spline.coefficients()
    }

    pub fn is_initialized(&self) -> bool {
        self.spline.is_initialized()
    }

    pub fn num_valid_time_segments(&self) -> usize {
        self.spline.num_valid_time_segments()
    }

    pub fn t_min(&self) -> Result<Real, SplineError> {
        self.spline.t_min()
    }

    pub fn t_max(&self) -> Result<Real, SplineError> {
        self.spline.t_max()
    }

    pub fn curve_value_to_transformation(&self, value: &Vec6) -> Mat4 {
        transformation_from_parts(&self.rotation.exp(&tail(value)), &head(value))
    }

    pub fn transformation_to_curve_value(&self, pose: &Mat4) -> Vec6 {
        let mut value = Vec6::zeros();
        value
            .fixed_rows_mut::<3>(0)
            .copy_from(&translation_part(pose));
        value
            .fixed_rows_mut::<3>(3)
            .copy_from(&self.rotation.log(&rotation_part(pose)));
        value
    }

    /// Pose and the map from a curve value change to the left pose perturbation.
    ///
    /// ```text
    /// JT = | I  [t]× S |
    ///      | 0     S   |
    /// ```
    pub fn curve_value_to_transformation_and_jacobian(&self, value: &Vec6) -> (Mat4, Mat6) {
        let translation = head(value);
        let (rotation, s) = self.rotation.exp_and_s_matrix(&tail(value));
        let mut jt = Mat6::identity();
        jt.fixed_view_mut::<3, 3>(0, 3)
            .copy_from(&(skew(&translation) * s));
        jt.fixed_view_mut::<3, 3>(3, 3).copy_from(&s);
        (transformation_from_parts(&rotation, &translation), jt)
    }

    /// Curve value for `pose` whose rotation part is the representative closest to
    /// `reference`.
    fn unwrapped_curve_value(&self, pose: &Mat4, reference: &Vec3) -> Vec6 {
        let mut value = self.transformation_to_curve_value(pose);
        let rot = self.rotation.closest_equivalent(&tail(&value), reference);
        value.fixed_rows_mut::<3>(3).copy_from(&rot);
        value
    }

    /// One segment on `[t0, t1]` with `transformation(t0) == a` and
    /// `transformation(t1) == b`.
    pub fn init_pose_spline(
        &mut self,
        t0: Real,
        t1: Real,
        a: &Mat4,
        b: &Mat4,
    ) -> Result<(), SplineError> {
        check_pose(a)?;
        check_pose(b)?;
        let start = self.transformation_to_curve_value(a);
        let end = self.unwrapped_curve_value(b, &tail(&start));
        self.spline.init_spline(
            t0,
            t1,
            &DVector::from_column_slice(start.as_slice()),
            &DVector::from_column_slice(end.as_slice()),
        )
    }

    /// Append a segment ending at `t` whose new coefficient is derived from `pose`.
    ///
    /// The trajectory on the previous domain is unchanged. The end pose approaches
    /// `pose` without interpolating it exactly for orders above 2; see
    /// [`BSpline::add_curve_segment`].
    pub fn add_pose_segment(&mut self, t: Real, pose: &Mat4) -> Result<(), SplineError> {
        check_pose(pose)?;
        let t_max = self.t_max()?;
        let reference = self.eval_d(t_max, 0)?;
        let value = self.unwrapped_curve_value(pose, &tail(&reference));
        self.spline
            .add_curve_segment(t, &DVector::from_column_slice(value.as_slice()))
    }

    /// Replace the spline with a smoothed least-squares fit to timestamped poses.
    ///
    /// Rotation parameters are unwrapped sample to sample in time order before
    /// fitting. On error the spline keeps its previous state.
    pub fn init_pose_spline_poses(
        &mut self,
        times: &[Real],
        poses: &[Mat4],
        num_segments: usize,
        lambda: Real,
    ) -> Result<(), SplineError> {
        if times.len() != poses.len() {
            return Err(SplineError::DimensionMismatch {
                expected: times.len(),
                got: poses.len(),
            });
        }
        for (i, pose) in poses.iter().enumerate() {
            validate_transformation(pose, POSE_TOLERANCE)
                .map_err(|e| SplineError::InvalidFitInput(format!("pose {i}: {e}")))?;
        }

        let mut order: Vec<usize> = (0..times.len()).collect();
        order.sort_by(|&a, &b| times[a].total_cmp(&times[b]));

        let mut sorted_times = Vec::with_capacity(times.len());
        let mut values = DMatrix::zeros(POSE_DIMENSION, times.len());
        let mut previous: Option<Vec3> = None;
        for (col, &i) in order.iter().enumerate() {
            let value = match previous {
                Some(reference) => self.unwrapped_curve_value(&poses[i], &reference),
                None => self.transformation_to_curve_value(&poses[i]),
            };
            previous = Some(tail(&value));
            values.set_column(col, &value);
            sorted_times.push(times[i]);
        }

        debug!(
            "fitting {} poses with {num_segments} segments of order {}",
            times.len(),
            self.order()
        );
        self.spline
            .fit_samples(&sorted_times, &values, num_segments, lambda)
    }

    /// `derivative`-th time derivative of the curve value.
    pub fn eval_d(&self, t: Real, derivative: usize) -> Result<Vec6, SplineError> {
        Ok(to_vec6(&self.spline.eval_d(t, derivative)?))
    }

    pub fn eval_d_and_jacobian(
        &self,
        t: Real,
        derivative: usize,
    ) -> Result<LocalJacobian<Vec6>, SplineError> {
        let lj = self.spline.eval_d_and_jacobian(t, derivative)?;
        Ok(LocalJacobian {
            value: to_vec6(&lj.value),
            jacobian: lj.jacobian,
            coefficient_indices: lj.coefficient_indices,
        })
    }

    pub fn transformation(&self, t: Real) -> Result<Mat4, SplineError> {
        Ok(self.curve_value_to_transformation(&self.eval_d(t, 0)?))
    }

    pub fn inverse_transformation(&self, t: Real) -> Result<Mat4, SplineError> {
        Ok(invert_transformation(&self.transformation(t)?))
    }

    /// Pose and `∂δ/∂c` (`6 × 6k`).
    pub fn transformation_and_jacobian(&self, t: Real) -> Result<LocalJacobian<Mat4>, SplineError> {
        let (start, basis) = self.spline.local_basis(t, 0)?;
        let value = to_vec6(&(self.spline.coefficients().columns(start, self.order()) * &basis));
        let (pose, jt) = self.curve_value_to_transformation_and_jacobian(&value);
        Ok(LocalJacobian {
            value: pose,
            jacobian: stack_blocks(&jt, &basis),
            coefficient_indices: self.coefficient_indices(start),
        })
    }

    /// Inverse pose and the Jacobian of its left perturbation, `-Ad(T⁻¹) ∂δ/∂c`.
    pub fn inverse_transformation_and_jacobian(
        &self,
        t: Real,
    ) -> Result<LocalJacobian<Mat4>, SplineError> {
        let (start, basis) = self.spline.local_basis(t, 0)?;
        let value = to_vec6(&(self.spline.coefficients().columns(start, self.order()) * &basis));
        let (pose, jt) = self.curve_value_to_transformation_and_jacobian(&value);
        let inverse = invert_transformation(&pose);
        let block = -box_times(&inverse) * jt;
        Ok(LocalJacobian {
            value: inverse,
            jacobian: stack_blocks(&block, &basis),
            coefficient_indices: self.coefficient_indices(start),
        })
    }

    /// `T(t) v` for a homogeneous vector and its plain derivative (`4 × 6k`).
    pub fn transform_vector_and_jacobian(
        &self,
        t: Real,
        v: &Vec4,
    ) -> Result<LocalJacobian<Vec4>, SplineError> {
        let (start, basis) = self.spline.local_basis(t, 0)?;
        let value = to_vec6(&(self.spline.coefficients().columns(start, self.order()) * &basis));
        let params = tail(&value);
        let rotated = self.rotation.exp(&params) * v.xyz();

        let mut block = Mat4x6::zeros();
        block
            .fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&(Mat3::identity() * v[3]));
        block
            .fixed_view_mut::<3, 3>(0, 3)
            .copy_from(&self.rotation.box_minus(&params, &rotated));

        let moved = rotated + head(&value) * v[3];
        Ok(LocalJacobian {
            value: Vec4::new(moved.x, moved.y, moved.z, v[3]),
            jacobian: stack_blocks(&block, &basis),
            coefficient_indices: self.coefficient_indices(start),
        })
    }

    pub fn position(&self, t: Real) -> Result<Vec3, SplineError> {
        Ok(head(&self.eval_d(t, 0)?))
    }

    pub fn orientation(&self, t: Real) -> Result<Mat3, SplineError> {
        Ok(self.rotation.exp(&tail(&self.eval_d(t, 0)?)))
    }

    /// World-frame linear velocity.
    pub fn linear_velocity(&self, t: Real) -> Result<Vec3, SplineError> {
        Ok(head(&self.eval_d(t, 1)?))
    }

    /// World-frame linear acceleration. Requires order at least 3.
    pub fn linear_acceleration(&self, t: Real) -> Result<Vec3, SplineError> {
        Ok(head(&self.eval_d(t, 2)?))
    }

    pub fn linear_velocity_body_frame(&self, t: Real) -> Result<Vec3, SplineError> {
        Ok(self.orientation(t)?.transpose() * self.linear_velocity(t)?)
    }

    pub fn linear_acceleration_body_frame(&self, t: Real) -> Result<Vec3, SplineError> {
        Ok(self.orientation(t)?.transpose() * self.linear_acceleration(t)?)
    }

    /// World-frame linear acceleration and its Jacobian (`3 × 6k`).
    pub fn linear_acceleration_and_jacobian(
        &self,
        t: Real,
    ) -> Result<LocalJacobian<Vec3>, SplineError> {
        let lj = self.eval_d_and_jacobian(t, 2)?;
        Ok(LocalJacobian {
            value: head(&lj.value),
            jacobian: lj.jacobian.rows(0, 3).into_owned(),
            coefficient_indices: lj.coefficient_indices,
        })
    }

    /// Rotation parameters, their rates and the matching basis weights at `t`.
    fn rotation_state(
        &self,
        t: Real,
    ) -> Result<(usize, Vec3, Vec3, DVector<Real>, DVector<Real>), SplineError> {
        let (start, b0) = self.spline.local_basis(t, 0)?;
        let (_, b1) = self.spline.local_basis(t, 1)?;
        let window = self.spline.coefficients().columns(start, self.order());
        let params = to_vec6(&(&window * &b0));
        let rates = to_vec6(&(&window * &b1));
        Ok((start, tail(&params), tail(&rates), b0, b1))
    }

    /// World-frame angular velocity `ω = S(p) ṗ`.
    pub fn angular_velocity(&self, t: Real) -> Result<Vec3, SplineError> {
        let (_, params, rates, _, _) = self.rotation_state(t)?;
        Ok(self.rotation.angular_velocity(&params, &rates))
    }

    /// World-frame angular velocity and `∂ω/∂c` (`3 × 6k`).
    pub fn angular_velocity_and_jacobian(
        &self,
        t: Real,
    ) -> Result<LocalJacobian<Vec3>, SplineError> {
        let (start, params, rates, b0, b1) = self.rotation_state(t)?;
        let (omega, jw) = self.rotation.angular_velocity_and_jacobian(&params, &rates);
        let d_params: Mat3 = jw.fixed_view::<3, 3>(0, 0).into_owned();
        let d_rates: Mat3 = jw.fixed_view::<3, 3>(0, 3).into_owned();
        Ok(LocalJacobian {
            value: omega,
            jacobian: self.angular_jacobian(&d_params, &d_rates, &b0, &b1),
            coefficient_indices: self.coefficient_indices(start),
        })
    }

    /// Body-frame angular velocity `ω_b = Rᵀ ω`.
    pub fn angular_velocity_body_frame(&self, t: Real) -> Result<Vec3, SplineError> {
        let (_, params, rates, _, _) = self.rotation_state(t)?;
        let rotation = self.rotation.exp(&params);
        Ok(rotation.transpose() * self.rotation.angular_velocity(&params, &rates))
    }

    /// Body-frame angular velocity and `∂ω_b/∂c` (`3 × 6k`).
    ///
    /// With the left perturbation `R' = exp((S dp)^) R`,
    /// `∂ω_b/∂p = Rᵀ ([ω]× S + ∂ω/∂p)` and `∂ω_b/∂ṗ = Rᵀ ∂ω/∂ṗ`.
    pub fn angular_velocity_body_frame_and_jacobian(
        &self,
        t: Real,
    ) -> Result<LocalJacobian<Vec3>, SplineError> {
        let (start, params, rates, b0, b1) = self.rotation_state(t)?;
        let (rotation, s) = self.rotation.exp_and_s_matrix(&params);
        let (omega, jw) = self.rotation.angular_velocity_and_jacobian(&params, &rates);
        let r_t = rotation.transpose();
        let d_params = r_t * (skew(&omega) * s + jw.fixed_view::<3, 3>(0, 0));
        let d_rates = r_t * jw.fixed_view::<3, 3>(0, 3);
        Ok(LocalJacobian {
            value: r_t * omega,
            jacobian: self.angular_jacobian(&d_params, &d_rates, &b0, &b1),
            coefficient_indices: self.coefficient_indices(start),
        })
    }

    /// Assemble `[0 | d_params b0_j + d_rates b1_j]` blocks.
    fn angular_jacobian(
        &self,
        d_params: &Mat3,
        d_rates: &Mat3,
        b0: &DVector<Real>,
        b1: &DVector<Real>,
    ) -> DMatrix<Real> {
        let mut jacobian = DMatrix::zeros(3, POSE_DIMENSION * b0.len());
        for j in 0..b0.len() {
            let mut block = Mat3x6::zeros();
            block
                .fixed_view_mut::<3, 3>(0, 3)
                .copy_from(&(d_params * b0[j] + d_rates * b1[j]));
            jacobian
                .fixed_view_mut::<3, 6>(0, POSE_DIMENSION * j)
                .copy_from(&block);
        }
        jacobian
    }

    fn coefficient_indices(&self, start: usize) -> Range<usize> {
        start * POSE_DIMENSION..(start + self.order()) * POSE_DIMENSION
    }

    /// Scalar parameter indices of the window at `t`.
    pub fn local_coefficient_indices(&self, t: Real) -> Result<Range<usize>, SplineError> {
        Ok(self.coefficient_indices(self.spline.local_coefficient_window(t)?.start))
    }

    /// The `k` window coefficients at `t`, concatenated (`6k`).
    pub fn local_coefficient_vector(&self, t: Real) -> Result<DVector<Real>, SplineError> {
        self.spline.local_coefficient_vector(t)
    }

    /// Overwrite exactly the `k` window coefficients at `t`.
    pub fn set_local_coefficient_vector(
        &mut self,
        t: Real,
        coefficients: &DVector<Real>,
    ) -> Result<(), SplineError> {
        self.spline.set_local_coefficient_vector(t, coefficients)
    }

    /// Replace knots and `6 × C` coefficients.
    pub fn set_knots_and_coefficients(
        &mut self,
        knots: Vec<Real>,
        coefficients: DMatrix<Real>,
    ) -> Result<(), SplineError> {
        self.spline.set_knots_and_coefficients(knots, coefficients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bspline_core::{test_utils, CayleyParameters};
    use crate::ErrorKind;

    fn sample_spline(order: usize) -> BSplinePose {
        let mut rng = test_utils::seeded_rng(order as u64);
        let mut spline = BSplinePose::new(order, RotationVector).unwrap();
        let a = spline.curve_value_to_transformation(&test_utils::random_curve_value(&mut rng));
        let b = spline.curve_value_to_transformation(&test_utils::random_curve_value(&mut rng));
        spline.init_pose_spline(0.0, 1.0, &a, &b).unwrap();
        spline
    }

    #[test]
    fn curve_value_roundtrip() {
        let spline = BSplinePose::new(4, RotationVector).unwrap();
        let mut rng = test_utils::seeded_rng(3);
        for _ in 0..20 {
            let value = test_utils::random_curve_value(&mut rng);
            let back = spline
                .transformation_to_curve_value(&spline.curve_value_to_transformation(&value));
            assert!((back - value).norm() < 1e-6, "value={value:?}");
        }
    }

    #[test]
    fn boundary_poses_are_exact() {
        let mut rng = test_utils::seeded_rng(11);
        for order in 2..=9 {
            let mut spline = BSplinePose::new(order, CayleyParameters).unwrap();
            let a = spline.curve_value_to_transformation(&test_utils::random_curve_value(&mut rng));
            let b = spline.curve_value_to_transformation(&test_utils::random_curve_value(&mut rng));
            spline.init_pose_spline(2.0, 3.5, &a, &b).unwrap();
            assert_eq!(spline.t_min().unwrap(), 2.0);
            assert_eq!(spline.t_max().unwrap(), 3.5);
            let err_a = (spline.transformation(2.0).unwrap() - a).norm();
            let err_b = (spline.transformation(3.5).unwrap() - b).norm();
            assert!(err_a < 1e-9 && err_b < 1e-9, "order {order}: {err_a} {err_b}");
        }
    }

    #[test]
    fn inverse_is_rigid_inverse() {
        let spline = sample_spline(4);
        let t = 0.37;
        let product = spline.transformation(t).unwrap() * spline.inverse_transformation(t).unwrap();
        assert!((product - Mat4::identity()).norm() < 1e-12);
    }

    #[test]
    fn lumped_vector_matches_pose() {
        let spline = sample_spline(5);
        let v = Vec4::new(0.3, -0.4, 1.2, 0.8);
        let lj = spline.transform_vector_and_jacobian(0.6, &v).unwrap();
        let expected = spline.transformation(0.6).unwrap() * v;
        assert!((lj.value - expected).norm() < 1e-12);
        assert_eq!(lj.jacobian.shape(), (4, 30));
        assert!(lj.jacobian.row(3).iter().all(|x| *x == 0.0));
    }

    #[test]
    fn queries_outside_domain_fail() {
        let spline = sample_spline(3);
        for t in [-1e-9, 1.0 + 1e-9] {
            let err = spline.transformation(t).unwrap_err();
            assert_eq!(err.kind(), crate::ErrorKind::Domain);
        }
        let empty = BSplinePose::new(3, RotationVector).unwrap();
        assert!(matches!(empty.transformation(0.0), Err(SplineError::Uninitialized)));
    }

    #[test]
    fn acceleration_needs_order_three() {
        let spline = sample_spline(2);
        let err = spline.linear_acceleration_and_jacobian(0.5).unwrap_err();
        assert!(matches!(
            err,
            SplineError::InvalidDerivativeOrder { derivative: 2, order: 2 }
        ));
        assert_eq!(err.kind(), crate::ErrorKind::InvalidArgument);
        assert!(spline.angular_velocity(0.5).is_ok());
    }

    #[test]
    fn body_frame_quantities_rotate_world_ones() {
        let spline = sample_spline(4);
        let t = 0.8;
        let r = spline.orientation(t).unwrap();
        let w = spline.angular_velocity(t).unwrap();
        let wb = spline.angular_velocity_body_frame(t).unwrap();
        assert!((r * wb - w).norm() < 1e-12);
        let v = spline.linear_velocity(t).unwrap();
        let vb = spline.linear_velocity_body_frame(t).unwrap();
        assert!((r * vb - v).norm() < 1e-12);
        let a = spline.linear_acceleration(t).unwrap();
        let ab = spline.linear_acceleration_body_frame(t).unwrap();
        assert!((r * ab - a).norm() < 1e-12);
    }

    #[test]
    fn angular_velocity_matches_rotation_derivative() {
        // Ṙ Rᵀ = [ω]×
        let spline = sample_spline(5);
        let (t, h) = (0.45, 1e-6);
        let r_dot = (spline.orientation(t + h).unwrap() - spline.orientation(t - h).unwrap())
            / (2.0 * h);
        let omega_hat = r_dot * spline.orientation(t).unwrap().transpose();
        let w = spline.angular_velocity(t).unwrap();
        assert!((omega_hat - skew(&w)).norm() < 1e-6);
    }

    #[test]
    fn extension_keeps_rotation_continuous() {
        let mut spline = BSplinePose::new(4, RotationVector).unwrap();
        let a = spline.curve_value_to_transformation(&Vec6::new(0.0, 0.0, 0.0, 0.0, 0.0, 2.8));
        let b = spline.curve_value_to_transformation(&Vec6::new(1.0, 0.0, 0.0, 0.0, 0.0, 3.0));
        spline.init_pose_spline(0.0, 1.0, &a, &b).unwrap();
        // log() reports this rotation near -3.08 about z.
        let c = spline.curve_value_to_transformation(&Vec6::new(2.0, 0.0, 0.0, 0.0, 0.0, 3.2));
        spline.add_pose_segment(2.0, &c).unwrap();

        // Without unwrapping the new coefficient would be pulled towards -3.08.
        for t in [1.25, 1.5, 1.75, 2.0] {
            let value = spline.eval_d(t, 0).unwrap();
            assert!(value[5] > 2.5 && value[5] < 4.0, "t={t} value={value:?}");
        }
    }

    #[test]
    fn linear_extension_reaches_pose() {
        let mut spline = BSplinePose::new(2, RotationVector).unwrap();
        let a = spline.curve_value_to_transformation(&Vec6::new(0.0, 0.0, 0.0, 0.1, 0.0, 2.8));
        let b = spline.curve_value_to_transformation(&Vec6::new(1.0, 0.0, 0.0, 0.0, 0.2, 3.0));
        let c = spline.curve_value_to_transformation(&Vec6::new(2.0, 1.0, 0.0, 0.0, 0.0, 3.2));
        spline.init_pose_spline(0.0, 1.0, &a, &b).unwrap();
        spline.add_pose_segment(2.0, &c).unwrap();
        assert!((spline.transformation(2.0).unwrap() - c).norm() < 1e-9);
    }

    #[test]
    fn half_turn_is_rejected_by_cayley() {
        let mut spline = BSplinePose::new(3, CayleyParameters).unwrap();
        let half_turn = Mat4::from_diagonal(&Vec4::new(-1.0, -1.0, 1.0, 1.0));
        let err = spline
            .init_pose_spline(0.0, 1.0, &Mat4::identity(), &half_turn)
            .unwrap_err();
        assert!(matches!(err, SplineError::NonFiniteValue), "{err}");
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(!spline.is_initialized());

        let quarter_turn =
            spline.curve_value_to_transformation(&Vec6::new(0.0, 0.0, 0.0, 0.0, 0.0, 1.0));
        spline
            .init_pose_spline(0.0, 1.0, &Mat4::identity(), &quarter_turn)
            .unwrap();
        let before = spline.clone();
        let err = spline.add_pose_segment(2.0, &half_turn).unwrap_err();
        assert!(matches!(err, SplineError::NonFiniteValue), "{err}");
        assert_eq!(spline, before);
        assert!(spline.coefficients().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn non_rigid_poses_are_rejected() {
        let mut spline = BSplinePose::new(4, RotationVector).unwrap();
        let mut scaled = Mat4::identity();
        scaled[(0, 0)] = 2.0;
        let err = spline
            .init_pose_spline(0.0, 1.0, &Mat4::identity(), &scaled)
            .unwrap_err();
        assert!(matches!(err, SplineError::InvalidPose(_)), "{err}");
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        spline
            .init_pose_spline(0.0, 1.0, &Mat4::identity(), &Mat4::identity())
            .unwrap();
        let mut nan = Mat4::identity();
        nan[(1, 3)] = Real::NAN;
        let err = spline.add_pose_segment(2.0, &nan).unwrap_err();
        assert!(matches!(err, SplineError::InvalidPose(_)), "{err}");
        assert_eq!(spline.t_max().unwrap(), 1.0);
    }

    #[test]
    fn coefficient_window_access() {
        let mut spline = sample_spline(3);
        let c = spline.local_coefficient_vector(0.5).unwrap();
        assert_eq!(c.len(), 18);
        assert_eq!(spline.local_coefficient_indices(0.5).unwrap(), 0..18);
        let err = spline
            .set_local_coefficient_vector(0.5, &DVector::zeros(17))
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidArgument);
        assert_eq!(spline.local_coefficient_vector(0.5).unwrap(), c);
    }
}
