//! Helpers for testing spline evaluation and analytic Jacobians.
//!
//! This module is public to allow use across workspace test suites,
//! but is not intended for production use. Randomness is always driven by an
//! explicitly seeded [`StdRng`] so test failures are reproducible.

use nalgebra::{DMatrix, DVector};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{Real, Vec4, Vec6};

/// Deterministic RNG for a test case.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Central-difference Jacobian of `f` at `x`.
///
/// Column `j` is `(f(x + h e_j) - f(x - h e_j)) / 2h`.
pub fn numerical_jacobian<F>(mut f: F, x: &DVector<Real>, step: Real) -> DMatrix<Real>
where
    F: FnMut(&DVector<Real>) -> DVector<Real>,
{
    let f0 = f(x);
    let mut jac = DMatrix::zeros(f0.len(), x.len());
    let mut shifted = x.clone();
    for j in 0..x.len() {
        shifted[j] = x[j] + step;
        let plus = f(&shifted);
        shifted[j] = x[j] - step;
        let minus = f(&shifted);
        shifted[j] = x[j];
        jac.set_column(j, &((plus - minus) / (2.0 * step)));
    }
    jac
}

/// Curve value `[translation; rotation parameters]` with entries uniform in `[-1, 1]`.
pub fn random_curve_value(rng: &mut StdRng) -> Vec6 {
    Vec6::from_fn(|_, _| rng.random_range(-1.0..=1.0))
}

/// Homogeneous point with entries uniform in `[-1, 1]` (including `w`).
pub fn random_homogeneous_point(rng: &mut StdRng) -> Vec4 {
    Vec4::from_fn(|_, _| rng.random_range(-1.0..=1.0))
}

/// `t_min, t_min + step, ...` strictly below `t_max`, followed by `t_max` itself.
pub fn time_samples(t_min: Real, t_max: Real, step: Real) -> Vec<Real> {
    let mut out = Vec::new();
    let mut t = t_min;
    while t < t_max {
        out.push(t);
        t += step;
    }
    out.push(t_max);
    out
}

/// Largest absolute entry of `a - b`.
pub fn max_abs_diff(a: &DMatrix<Real>, b: &DMatrix<Real>) -> Real {
    assert_eq!(a.shape(), b.shape(), "shape mismatch");
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, Real::max)
}
