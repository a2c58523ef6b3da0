//! Vector-valued B-spline curve.
//!
//! Coefficients are stored column-wise in a `dim × C` matrix; the local coefficient
//! vector at `t` is the concatenation of the `k` window columns (`dim * k` entries).

use std::ops::Range;

use bspline_core::Real;
use log::{debug, warn};
use nalgebra::{DMatrix, DVector};

use crate::basis::{
    basis_function_derivatives, blossom, find_span, local_basis, quadratic_integral, valid_domain,
    validate_knots,
};
use crate::SplineError;

/// Value at a time together with its Jacobian with respect to the local coefficients.
///
/// `coefficient_indices` lists the scalar parameters (in the flattened coefficient
/// matrix, column-major) that the Jacobian columns refer to, in order.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalJacobian<T> {
    pub value: T,
    pub jacobian: DMatrix<Real>,
    pub coefficient_indices: Range<usize>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BSpline {
    order: usize,
    knots: Vec<Real>,
    coefficients: DMatrix<Real>,
}

impl BSpline {
    /// Empty curve of `dimension` components. `order` must be at least 2.
    pub fn new(order: usize, dimension: usize) -> Result<Self, SplineError> {
        if order < 2 {
            return Err(SplineError::InvalidOrder(order));
        }
        Ok(Self {
            order,
            knots: Vec::new(),
            coefficients: DMatrix::zeros(dimension, 0),
        })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn dimension(&self) -> usize {
        self.coefficients.nrows()
    }

    pub fn knots(&self) -> &[Real] {
        &self.knots
    }

    pub fn coefficients(&self) -> &DMatrix<Real> {
        &self.coefficients
    }

    pub fn num_coefficients(&self) -> usize {
        self.coefficients.ncols()
    }

    pub fn is_initialized(&self) -> bool {
        self.num_coefficients() > 0
    }

    /// Replace knots and coefficients after validating their shapes.
    pub fn set_knots_and_coefficients(
        &mut self,
        knots: Vec<Real>,
        coefficients: DMatrix<Real>,
    ) -> Result<(), SplineError> {
        if coefficients.nrows() != self.dimension() {
            return Err(SplineError::DimensionMismatch {
                expected: self.dimension(),
                got: coefficients.nrows(),
            });
        }
        if knots.len() != coefficients.ncols() + self.order {
            return Err(SplineError::InvalidKnots(format!(
                "{} coefficients of order {} need {} knots, got {}",
                coefficients.ncols(),
                self.order,
                coefficients.ncols() + self.order,
                knots.len()
            )));
        }
        validate_knots(&knots, self.order)?;
        self.knots = knots;
        self.coefficients = coefficients;
        Ok(())
    }

    fn domain(&self) -> Result<(Real, Real), SplineError> {
        if !self.is_initialized() {
            return Err(SplineError::Uninitialized);
        }
        Ok(valid_domain(&self.knots, self.order))
    }

    pub fn t_min(&self) -> Result<Real, SplineError> {
        Ok(self.domain()?.0)
    }

    pub fn t_max(&self) -> Result<Real, SplineError> {
        Ok(self.domain()?.1)
    }

    /// Number of knot intervals inside the valid domain.
    pub fn num_valid_time_segments(&self) -> usize {
        if self.is_initialized() {
            self.num_coefficients() + 1 - self.order
        } else {
            0
        }
    }

    /// Bounds of valid segment `segment`, if it exists.
    pub fn time_interval(&self, segment: usize) -> Option<(Real, Real)> {
        if segment >= self.num_valid_time_segments() {
            return None;
        }
        let i = self.order - 1 + segment;
        Some((self.knots[i], self.knots[i + 1]))
    }

    /// Start of the coefficient window and the `derivative`-th basis weights at `t`.
    pub fn local_basis(
        &self,
        t: Real,
        derivative: usize,
    ) -> Result<(usize, DVector<Real>), SplineError> {
        self.domain()?;
        local_basis(&self.knots, self.order, t, derivative)
    }

    /// Coefficient columns influencing `t`.
    pub fn local_coefficient_window(&self, t: Real) -> Result<Range<usize>, SplineError> {
        self.domain()?;
        let start = find_span(&self.knots, self.order, t)? + 1 - self.order;
        Ok(start..start + self.order)
    }

    pub fn eval(&self, t: Real) -> Result<DVector<Real>, SplineError> {
        self.eval_d(t, 0)
    }

    /// `derivative`-th time derivative of the curve at `t`.
    pub fn eval_d(&self, t: Real, derivative: usize) -> Result<DVector<Real>, SplineError> {
        let (start, basis) = self.local_basis(t, derivative)?;
        Ok(self.coefficients.columns(start, self.order) * basis)
    }

    /// `derivative`-th time derivative and its Jacobian (`dim × dim·k`, blocks `b_j I`).
    pub fn eval_d_and_jacobian(
        &self,
        t: Real,
        derivative: usize,
    ) -> Result<LocalJacobian<DVector<Real>>, SplineError> {
        let (start, basis) = self.local_basis(t, derivative)?;
        let dim = self.dimension();
        let mut jacobian = DMatrix::zeros(dim, dim * self.order);
        for (j, b) in basis.iter().enumerate() {
            for r in 0..dim {
                jacobian[(r, j * dim + r)] = *b;
            }
        }
        Ok(LocalJacobian {
            value: self.coefficients.columns(start, self.order) * basis,
            jacobian,
            coefficient_indices: start * dim..(start + self.order) * dim,
        })
    }

    /// The `k` window coefficients at `t`, concatenated.
    pub fn local_coefficient_vector(&self, t: Real) -> Result<DVector<Real>, SplineError> {
        let window = self.local_coefficient_window(t)?;
        let block = self.coefficients.columns(window.start, self.order);
        Ok(DVector::from_column_slice(block.clone_owned().as_slice()))
    }

    /// Overwrite exactly the `k` window coefficients at `t`.
    pub fn set_local_coefficient_vector(
        &mut self,
        t: Real,
        coefficients: &DVector<Real>,
    ) -> Result<(), SplineError> {
        let window = self.local_coefficient_window(t)?;
        let dim = self.dimension();
        if coefficients.len() != dim * self.order {
            return Err(SplineError::DimensionMismatch {
                expected: dim * self.order,
                got: coefficients.len(),
            });
        }
        for (j, col) in window.enumerate() {
            self.coefficients
                .column_mut(col)
                .copy_from(&coefficients.rows(j * dim, dim));
        }
        Ok(())
    }

    fn check_value(&self, value: &DVector<Real>) -> Result<(), SplineError> {
        if value.len() != self.dimension() {
            return Err(SplineError::DimensionMismatch {
                expected: self.dimension(),
                got: value.len(),
            });
        }
        if value.iter().any(|v| !v.is_finite()) {
            return Err(SplineError::NonFiniteValue);
        }
        Ok(())
    }

    /// One-segment curve on `[t0, t1]` through `p0` and `p1`.
    ///
    /// The boundary values are equality constraints; the remaining freedom minimizes
    /// the squared derivatives of order `1..=m` at both ends, `m = ⌈k/2⌉ - 1`.
    pub fn init_spline(
        &mut self,
        t0: Real,
        t1: Real,
        p0: &DVector<Real>,
        p1: &DVector<Real>,
    ) -> Result<(), SplineError> {
        if !(t0.is_finite() && t1.is_finite() && t1 > t0) {
            return Err(SplineError::InvalidInterval { t0, t1 });
        }
        self.check_value(p0)?;
        self.check_value(p1)?;

        let k = self.order;
        let dt = t1 - t0;
        let mut knots: Vec<Real> = (0..2 * k)
            .map(|i| t0 + (i as Real - (k - 1) as Real) * dt)
            .collect();
        knots[k - 1] = t0;
        knots[k] = t1;
        validate_knots(&knots, k)?;

        let span = k - 1;
        let at_t0 = basis_function_derivatives(&knots, k, span, t0, k - 1);
        let at_t1 = basis_function_derivatives(&knots, k, span, t1, k - 1);
        let m = (k + (k & 1)) / 2 - 1;

        // KKT system [[DᵀD, Pᵀ], [P, 0]] [x; μ] = [0; p]
        let mut kkt = DMatrix::zeros(k + 2, k + 2);
        for d in 1..=m {
            for row in [&at_t0[d], &at_t1[d]] {
                for i in 0..k {
                    for j in 0..k {
                        kkt[(i, j)] += row[i] * row[j];
                    }
                }
            }
        }
        for j in 0..k {
            kkt[(k, j)] = at_t0[0][j];
            kkt[(j, k)] = at_t0[0][j];
            kkt[(k + 1, j)] = at_t1[0][j];
            kkt[(j, k + 1)] = at_t1[0][j];
        }
        let mut rhs = DMatrix::zeros(k + 2, self.dimension());
        rhs.row_mut(k).copy_from(&p0.transpose());
        rhs.row_mut(k + 1).copy_from(&p1.transpose());

        let solution = kkt.lu().solve(&rhs).ok_or_else(|| {
            SplineError::IllPosedFit("boundary interpolation system is singular".into())
        })?;
        self.knots = knots;
        self.coefficients = solution.rows(0, k).transpose();
        debug!("initialized order {k} spline on [{t0}, {t1}]");
        Ok(())
    }

    /// Append one segment `[t_max, t]` whose new coefficient is pulled towards `value`.
    ///
    /// The knots up to `t_max` are kept and `k` knots spaced by `t - t_max` follow.
    /// The last `k - 1` coefficients are re-expressed exactly on the new knots as
    /// blossoms of the previous last piece, so the curve on the previous domain is
    /// unchanged. With `w = N_C(t)` the weight of the new coefficient at `t`, it
    /// minimizes `‖c(t) - value‖² + w(1 - w) ‖c_C - value‖²`, which gives
    /// `c_C = (2 - w) value - Σ_{j<C} N_j(t) c_j`.
    ///
    /// Exact interpolation would divide by `w` (`1/(k-1)!` on uniform knots) and grow
    /// the coefficients geometrically over repeated calls. Linear splines (`w = 1`)
    /// still pass through `value`.
    pub fn add_curve_segment(&mut self, t: Real, value: &DVector<Real>) -> Result<(), SplineError> {
        let t_max = self.t_max()?;
        if !(t.is_finite() && t > t_max) {
            return Err(SplineError::NonIncreasingTime { t, t_max });
        }
        self.check_value(value)?;

        let k = self.order;
        let p = k - 1;
        let c = self.num_coefficients();
        let dt = t - t_max;

        let mut knots: Vec<Real> = self.knots[..=c].to_vec();
        knots.extend((0..k).map(|j| t + j as Real * dt));
        validate_knots(&knots, k)?;

        let last_window = self.coefficients.columns(c - k, k).into_owned();
        let mut coefficients = self.coefficients.clone().insert_column(c, 0.0);
        for i in c - p..c {
            let column = blossom(&self.knots, k, c - 1, &last_window, &knots[i + 1..=i + p]);
            coefficients.set_column(i, &column);
        }

        let end = basis_function_derivatives(&knots, k, c, t, 0);
        let w = end[0][p];
        let mut fixed = DVector::<Real>::zeros(self.dimension());
        for j in 0..p {
            fixed += coefficients.column(c - p + j) * end[0][j];
        }
        let new_column = value * (2.0 - w) - fixed;
        if new_column.iter().any(|v| !v.is_finite()) {
            return Err(SplineError::NonFiniteValue);
        }
        coefficients.set_column(c, &new_column);

        self.knots = knots;
        self.coefficients = coefficients;
        debug!("appended segment [{t_max}, {t}], {} coefficients", c + 1);
        Ok(())
    }

    /// `∫ ‖c^(d)(t)‖² dt` as a quadratic form on each coefficient row (`C × C`).
    pub fn curve_quadratic_integral(&self, derivative: usize) -> Result<DMatrix<Real>, SplineError> {
        self.domain()?;
        if derivative >= self.order {
            return Err(SplineError::InvalidDerivativeOrder {
                derivative,
                order: self.order,
            });
        }
        Ok(quadratic_integral(&self.knots, self.order, derivative))
    }

    /// Least-squares fit of `values` (one column per sample) at `times`.
    ///
    /// Uses `num_segments` uniform segments over `[min(times), max(times)]` and
    /// minimizes `Σ ‖c(t_i) - v_i‖² + λ ∫ ‖c^(d)(t)‖² dt` with `d = min(2, k-1)`.
    /// The curve is left untouched on failure.
    pub fn fit_samples(
        &mut self,
        times: &[Real],
        values: &DMatrix<Real>,
        num_segments: usize,
        lambda: Real,
    ) -> Result<(), SplineError> {
        if values.nrows() != self.dimension() {
            return Err(SplineError::DimensionMismatch {
                expected: self.dimension(),
                got: values.nrows(),
            });
        }
        if values.ncols() != times.len() {
            return Err(SplineError::DimensionMismatch {
                expected: times.len(),
                got: values.ncols(),
            });
        }
        if num_segments == 0 {
            return Err(SplineError::InvalidFitInput(
                "at least one segment is required".into(),
            ));
        }
        if !(lambda.is_finite() && lambda >= 0.0) {
            return Err(SplineError::InvalidFitInput(format!(
                "smoothing weight must be finite and non-negative, got {lambda}"
            )));
        }
        if times.iter().any(|t| !t.is_finite()) || values.iter().any(|v| !v.is_finite()) {
            return Err(SplineError::InvalidFitInput(
                "samples must be finite".into(),
            ));
        }
        let t0 = times.iter().copied().fold(Real::INFINITY, Real::min);
        let t1 = times.iter().copied().fold(Real::NEG_INFINITY, Real::max);
        if !(t1 > t0) {
            return Err(SplineError::InvalidFitInput(
                "samples must span a non-empty time interval".into(),
            ));
        }

        let k = self.order;
        let num_coefficients = num_segments + k - 1;
        let dt = (t1 - t0) / num_segments as Real;
        let mut knots: Vec<Real> = (0..num_coefficients + k)
            .map(|i| t0 + (i as Real - (k - 1) as Real) * dt)
            .collect();
        knots[k - 1] = t0;
        knots[num_coefficients] = t1;
        validate_knots(&knots, k)?;

        if times.len() < num_coefficients {
            warn!(
                "{} samples for {} coefficients, relying on smoothing (lambda = {lambda})",
                times.len(),
                num_coefficients
            );
        }

        let mut normal = DMatrix::zeros(num_coefficients, num_coefficients);
        let mut rhs = DMatrix::zeros(num_coefficients, self.dimension());
        for (i, &t) in times.iter().enumerate() {
            let (start, basis) = local_basis(&knots, k, t, 0)?;
            for a in 0..k {
                for b in 0..k {
                    normal[(start + a, start + b)] += basis[a] * basis[b];
                }
                let mut row = rhs.row_mut(start + a);
                row += values.column(i).transpose() * basis[a];
            }
        }
        let smoothing = quadratic_integral(&knots, k, 2.min(k - 1));
        normal += smoothing * lambda;

        let max_diagonal = normal.diagonal().max();
        let cholesky = normal.cholesky().ok_or_else(|| {
            SplineError::IllPosedFit("normal equations are not positive definite".into())
        })?;
        let min_pivot = cholesky.l_dirty().diagonal().min();
        if min_pivot * min_pivot <= 1e-12 * max_diagonal {
            return Err(SplineError::IllPosedFit(format!(
                "normal equations are numerically singular (pivot {min_pivot:.3e})"
            )));
        }
        let solution = cholesky.solve(&rhs);

        self.knots = knots;
        self.coefficients = solution.transpose();
        debug!(
            "fitted {} samples with {num_segments} segments ({num_coefficients} coefficients)",
            times.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(v: Real) -> DVector<Real> {
        DVector::from_element(1, v)
    }

    #[test]
    fn uninitialized_curve_reports_it() {
        let curve = BSpline::new(3, 2).unwrap();
        assert!(matches!(curve.t_min(), Err(SplineError::Uninitialized)));
        assert!(matches!(curve.eval(0.0), Err(SplineError::Uninitialized)));
        assert_eq!(curve.num_valid_time_segments(), 0);
        assert!(matches!(BSpline::new(1, 2), Err(SplineError::InvalidOrder(1))));
    }

    #[test]
    fn init_interpolates_end_points() {
        for order in 2..=9 {
            let mut curve = BSpline::new(order, 2).unwrap();
            let p0 = DVector::from_vec(vec![1.0, -2.0]);
            let p1 = DVector::from_vec(vec![0.5, 3.0]);
            curve.init_spline(0.5, 2.0, &p0, &p1).unwrap();
            assert_eq!(curve.t_min().unwrap(), 0.5);
            assert_eq!(curve.t_max().unwrap(), 2.0);
            assert!((curve.eval(0.5).unwrap() - &p0).norm() < 1e-9, "order {order}");
            assert!((curve.eval(2.0).unwrap() - &p1).norm() < 1e-9, "order {order}");
        }
    }

    #[test]
    fn init_rejects_empty_interval() {
        let mut curve = BSpline::new(4, 1).unwrap();
        let err = curve
            .init_spline(1.0, 1.0, &scalar(0.0), &scalar(1.0))
            .unwrap_err();
        assert!(matches!(err, SplineError::InvalidInterval { .. }));
        assert!(!curve.is_initialized());
    }

    #[test]
    fn repeated_extension_preserves_previous_domain() {
        let steps = [0.6, 1.1, 0.8, 1.5, 0.7, 1.3, 0.9, 1.2];
        for order in 2..=9 {
            let mut curve = BSpline::new(order, 2).unwrap();
            curve
                .init_spline(
                    0.0,
                    1.0,
                    &DVector::from_vec(vec![0.3, -1.0]),
                    &DVector::from_vec(vec![-0.7, 0.4]),
                )
                .unwrap();
            let mut t_end = 1.0;
            for (n, dt) in steps.iter().enumerate() {
                let before = curve.clone();
                let target = t_end + dt;
                let x = n as Real;
                let value = DVector::from_vec(vec![(1.7 * x).sin(), (0.9 * x).cos() - 0.5]);
                curve.add_curve_segment(target, &value).unwrap();

                assert_eq!(curve.t_max().unwrap(), target);
                assert_eq!(curve.num_valid_time_segments(), n + 2);
                let mut t = 0.0;
                while t <= t_end {
                    let err = (curve.eval(t).unwrap() - before.eval(t).unwrap()).norm();
                    assert!(err < 1e-9, "order {order} step {n} t={t} err={err}");
                    t += 0.0371;
                }
                let err = (curve.eval(t_end).unwrap() - before.eval(t_end).unwrap()).norm();
                assert!(err < 1e-9, "order {order} step {n} at old end: err={err}");
                t_end = target;
            }
        }
    }

    #[test]
    fn linear_extension_passes_through_value() {
        let mut curve = BSpline::new(2, 1).unwrap();
        curve.init_spline(0.0, 1.0, &scalar(0.3), &scalar(-0.7)).unwrap();
        curve.add_curve_segment(2.5, &scalar(2.0)).unwrap();
        assert!((curve.eval(2.5).unwrap()[0] - 2.0).abs() < 1e-12);
        assert!((curve.eval(1.75).unwrap()[0] - 0.65).abs() < 1e-12);
    }

    #[test]
    fn extension_keeps_coefficients_bounded() {
        // Alternating targets drive undamped interpolation to blow up at high order.
        for order in [4, 6, 9] {
            let mut curve = BSpline::new(order, 1).unwrap();
            curve.init_spline(0.0, 1.0, &scalar(1.0), &scalar(-1.0)).unwrap();
            for n in 0..30 {
                let target = if n % 2 == 0 { 1.0 } else { -1.0 };
                curve
                    .add_curve_segment(2.0 + n as Real, &scalar(target))
                    .unwrap();
            }
            let largest = curve.coefficients().amax();
            assert!(largest < 1e3, "order {order}: largest coefficient {largest}");
            let end = curve.eval(31.0).unwrap()[0];
            assert!(end.abs() < 1e3, "order {order}: end value {end}");
        }
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let mut curve = BSpline::new(3, 1).unwrap();
        let err = curve
            .init_spline(0.0, 1.0, &scalar(Real::NAN), &scalar(1.0))
            .unwrap_err();
        assert!(matches!(err, SplineError::NonFiniteValue));
        assert!(!curve.is_initialized());

        curve.init_spline(0.0, 1.0, &scalar(0.0), &scalar(1.0)).unwrap();
        let before = curve.clone();
        let err = curve
            .add_curve_segment(2.0, &scalar(Real::INFINITY))
            .unwrap_err();
        assert!(matches!(err, SplineError::NonFiniteValue));
        assert_eq!(curve, before);
    }

    #[test]
    fn extension_requires_increasing_time() {
        let mut curve = BSpline::new(3, 1).unwrap();
        curve.init_spline(0.0, 1.0, &scalar(0.0), &scalar(1.0)).unwrap();
        let err = curve.add_curve_segment(1.0, &scalar(0.0)).unwrap_err();
        assert!(matches!(err, SplineError::NonIncreasingTime { .. }));
        assert_eq!(curve.num_coefficients(), 3);
    }

    #[test]
    fn local_coefficients_roundtrip() {
        let mut curve = BSpline::new(4, 2).unwrap();
        curve
            .init_spline(0.0, 1.0, &DVector::from_vec(vec![0.0, 1.0]), &DVector::from_vec(vec![2.0, 0.0]))
            .unwrap();
        curve
            .add_curve_segment(2.0, &DVector::from_vec(vec![1.0, 1.0]))
            .unwrap();

        assert_eq!(curve.local_coefficient_window(1.5).unwrap(), 1..5);
        let c = curve.local_coefficient_vector(1.5).unwrap();
        assert_eq!(c.len(), 8);
        assert_eq!(c[2], curve.coefficients()[(0, 2)]);
        assert_eq!(c[3], curve.coefficients()[(1, 2)]);

        let replaced = DVector::from_fn(8, |i, _| i as Real);
        curve.set_local_coefficient_vector(1.5, &replaced).unwrap();
        assert_eq!(curve.local_coefficient_vector(1.5).unwrap(), replaced);
        assert_eq!(curve.coefficients()[(1, 4)], 7.0);

        let err = curve
            .set_local_coefficient_vector(1.5, &DVector::zeros(7))
            .unwrap_err();
        assert!(matches!(err, SplineError::DimensionMismatch { expected: 8, got: 7 }));
    }

    #[test]
    fn jacobian_is_basis_blocks() {
        let mut curve = BSpline::new(3, 2).unwrap();
        curve
            .init_spline(0.0, 1.0, &DVector::from_vec(vec![0.0, 1.0]), &DVector::from_vec(vec![2.0, 0.0]))
            .unwrap();
        let lj = curve.eval_d_and_jacobian(0.4, 1).unwrap();
        let c = curve.local_coefficient_vector(0.4).unwrap();
        assert_eq!(lj.coefficient_indices, 0..6);
        assert!((&lj.jacobian * c - &lj.value).norm() < 1e-12);
        assert!((lj.value - curve.eval_d(0.4, 1).unwrap()).norm() < 1e-15);
    }

    #[test]
    fn fit_reproduces_polynomial() {
        // A cubic is in the span of any order-4 spline, and its curvature penalty
        // is tiny for small lambda.
        let f = |t: Real| 0.5 - t + 0.25 * t * t * t;
        let times: Vec<Real> = (0..=40).map(|i| i as Real * 0.05).collect();
        let values = DMatrix::from_fn(1, times.len(), |_, c| f(times[c]));
        let mut curve = BSpline::new(4, 1).unwrap();
        curve.fit_samples(&times, &values, 5, 0.0).unwrap();

        assert_eq!(curve.t_min().unwrap(), 0.0);
        assert_eq!(curve.t_max().unwrap(), 2.0);
        assert_eq!(curve.num_valid_time_segments(), 5);
        for &t in &times {
            let err = (curve.eval(t).unwrap()[0] - f(t)).abs();
            assert!(err < 1e-9, "t={t} err={err}");
        }
    }

    #[test]
    fn underdetermined_fit_is_damped_or_rejected() {
        let times = [0.0, 0.4, 1.0];
        let values = DMatrix::from_row_slice(1, 3, &[0.0, 1.0, 0.5]);

        let mut curve = BSpline::new(4, 1).unwrap();
        curve.fit_samples(&times, &values, 6, 1e-3).unwrap();
        assert_eq!(curve.num_coefficients(), 9);

        let mut singular = BSpline::new(4, 1).unwrap();
        singular
            .init_spline(0.0, 1.0, &scalar(0.0), &scalar(1.0))
            .unwrap();
        let before = singular.clone();
        let err = singular.fit_samples(&times, &values, 6, 0.0).unwrap_err();
        assert!(matches!(err, SplineError::IllPosedFit(_)));
        assert_eq!(singular, before);
    }

    #[test]
    fn quadratic_integral_requires_valid_derivative() {
        let mut curve = BSpline::new(3, 1).unwrap();
        curve.init_spline(0.0, 1.0, &scalar(0.0), &scalar(1.0)).unwrap();
        assert_eq!(curve.curve_quadratic_integral(2).unwrap().shape(), (3, 3));
        assert!(curve.curve_quadratic_integral(3).is_err());
    }

    #[test]
    fn time_intervals_follow_knots() {
        let mut curve = BSpline::new(2, 1).unwrap();
        curve.init_spline(0.0, 1.0, &scalar(0.0), &scalar(1.0)).unwrap();
        curve.add_curve_segment(3.0, &scalar(0.0)).unwrap();
        assert_eq!(curve.time_interval(0), Some((0.0, 1.0)));
        assert_eq!(curve.time_interval(1), Some((1.0, 3.0)));
        assert_eq!(curve.time_interval(2), None);
    }
}
