//! B-spline basis evaluation over a strictly increasing knot vector.
//!
//! With `C` coefficients and order `k` the knot vector has `C + k` entries and the
//! valid domain is `[knots[k-1], knots[C]]`. A time `t` in span `i`
//! (`knots[i] <= t < knots[i+1]`, `k-1 <= i <= C-1`) is influenced by the
//! coefficients `i-k+1 ..= i`. The right end of the domain belongs to the last span.

use bspline_core::Real;
use nalgebra::{DMatrix, DVector, SymmetricEigen};

use crate::SplineError;

/// Check order and knot vector for a spline with at least one coefficient.
pub fn validate_knots(knots: &[Real], order: usize) -> Result<(), SplineError> {
    if order < 2 {
        return Err(SplineError::InvalidOrder(order));
    }
    if knots.len() < 2 * order {
        return Err(SplineError::InvalidKnots(format!(
            "order {order} needs at least {} knots, got {}",
            2 * order,
            knots.len()
        )));
    }
    if let Some(bad) = knots.iter().position(|u| !u.is_finite()) {
        return Err(SplineError::InvalidKnots(format!(
            "knot {bad} is not finite"
        )));
    }
    if let Some(i) = knots.windows(2).position(|w| w[1] <= w[0]) {
        return Err(SplineError::InvalidKnots(format!(
            "knots must be strictly increasing, knot {} = {} follows {}",
            i + 1,
            knots[i + 1],
            knots[i]
        )));
    }
    Ok(())
}

/// `(t_min, t_max)` of a validated knot vector.
pub fn valid_domain(knots: &[Real], order: usize) -> (Real, Real) {
    (knots[order - 1], knots[knots.len() - order])
}

/// Span index `i` with `knots[i] <= t < knots[i+1]`, the right domain end mapped
/// to the last span.
pub fn find_span(knots: &[Real], order: usize, t: Real) -> Result<usize, SplineError> {
    let (t_min, t_max) = valid_domain(knots, order);
    // Written so that NaN is rejected too.
    if !(t >= t_min && t <= t_max) {
        return Err(SplineError::OutOfRange { t, t_min, t_max });
    }
    let last = knots.len() - order - 1;
    let upper = knots.partition_point(|&u| u <= t);
    Ok(upper.saturating_sub(1).clamp(order - 1, last))
}

/// Non-zero basis functions on `span` and their derivatives up to `max_derivative`.
///
/// Returns `ders` with `ders[d][j]` the `d`-th derivative of `N_{span-k+1+j}` at `t`
/// (The NURBS Book, algorithm A2.3). `max_derivative` must be below `order`.
pub fn basis_function_derivatives(
    knots: &[Real],
    order: usize,
    span: usize,
    t: Real,
    max_derivative: usize,
) -> Vec<Vec<Real>> {
    let p = order - 1;
    let n = max_derivative.min(p);

    // ndu[j][r]: basis values (upper triangle) and knot differences (lower triangle)
    let mut ndu = vec![vec![0.0; order]; order];
    let mut left = vec![0.0; order];
    let mut right = vec![0.0; order];
    ndu[0][0] = 1.0;
    for j in 1..=p {
        left[j] = t - knots[span + 1 - j];
        right[j] = knots[span + j] - t;
        let mut saved = 0.0;
        for r in 0..j {
            ndu[j][r] = right[r + 1] + left[j - r];
            let temp = ndu[r][j - 1] / ndu[j][r];
            ndu[r][j] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        ndu[j][j] = saved;
    }

    let mut ders = vec![vec![0.0; order]; max_derivative + 1];
    for j in 0..=p {
        ders[0][j] = ndu[j][p];
    }

    let mut a = [vec![0.0; order], vec![0.0; order]];
    for r in 0..=p {
        let (mut s1, mut s2) = (0usize, 1usize);
        a[0][0] = 1.0;
        for k in 1..=n {
            let mut d = 0.0;
            let rk = r as isize - k as isize;
            let pk = p - k;
            if rk >= 0 {
                a[s2][0] = a[s1][0] / ndu[pk + 1][rk as usize];
                d = a[s2][0] * ndu[rk as usize][pk];
            }
            let j1 = if rk >= -1 { 1 } else { (-rk) as usize };
            let j2 = if r <= pk + 1 { k - 1 } else { p - r };
            for j in j1..=j2 {
                let idx = (rk + j as isize) as usize;
                a[s2][j] = (a[s1][j] - a[s1][j - 1]) / ndu[pk + 1][idx];
                d += a[s2][j] * ndu[idx][pk];
            }
            if r <= pk {
                a[s2][k] = -a[s1][k - 1] / ndu[pk + 1][r];
                d += a[s2][k] * ndu[r][pk];
            }
            ders[k][r] = d;
            std::mem::swap(&mut s1, &mut s2);
        }
    }

    let mut factor = p as Real;
    for k in 1..=n {
        for value in ders[k].iter_mut() {
            *value *= factor;
        }
        factor *= (p - k) as Real;
    }
    ders
}

/// Start of the local coefficient window and the `derivative`-th basis derivatives
/// at `t`.
pub fn local_basis(
    knots: &[Real],
    order: usize,
    t: Real,
    derivative: usize,
) -> Result<(usize, DVector<Real>), SplineError> {
    if derivative >= order {
        return Err(SplineError::InvalidDerivativeOrder { derivative, order });
    }
    let span = find_span(knots, order, t)?;
    let ders = basis_function_derivatives(knots, order, span, t, derivative);
    Ok((
        span + 1 - order,
        DVector::from_column_slice(&ders[derivative]),
    ))
}

/// Blossom of the polynomial piece on `span` evaluated at `args`.
///
/// `window` holds the coefficient columns `span-k+1 ..= span`, and `args` has
/// `k - 1` entries. The blossom is symmetric and affine in each argument. At
/// `(t, ..., t)` it is the curve value at `t`; at `knots[i+1 ..= i+k-1]` it is
/// coefficient `i` of any knot vector on which this piece is represented.
pub fn blossom(
    knots: &[Real],
    order: usize,
    span: usize,
    window: &DMatrix<Real>,
    args: &[Real],
) -> DVector<Real> {
    let p = order - 1;
    debug_assert_eq!(args.len(), p);
    let mut points: Vec<DVector<Real>> = window.column_iter().map(|c| c.into_owned()).collect();
    for (level, &u) in args.iter().enumerate() {
        let r = level + 1;
        for j in (r..=p).rev() {
            let i = span + j - p;
            let alpha = (u - knots[i]) / (knots[i + p + 1 - r] - knots[i]);
            points[j] = &points[j - 1] * (1.0 - alpha) + &points[j] * alpha;
        }
    }
    points.swap_remove(p)
}

/// Gauss-Legendre nodes and weights on `[-1, 1]` (Golub-Welsch).
pub(crate) fn gauss_legendre(n: usize) -> (Vec<Real>, Vec<Real>) {
    let jacobi = DMatrix::from_fn(n, n, |r, c| {
        if r + 1 == c || c + 1 == r {
            let i = r.max(c) as Real;
            i / (4.0 * i * i - 1.0).sqrt()
        } else {
            0.0
        }
    });
    let eig = SymmetricEigen::new(jacobi);
    let mut rule: Vec<(Real, Real)> = (0..n)
        .map(|i| {
            let v0 = eig.eigenvectors[(0, i)];
            (eig.eigenvalues[i], 2.0 * v0 * v0)
        })
        .collect();
    rule.sort_by(|a, b| a.0.total_cmp(&b.0));
    rule.into_iter().unzip()
}

/// `Q[i][j] = ∫ N_i^(d)(t) N_j^(d)(t) dt` over the valid domain.
///
/// For a scalar curve with coefficients `c`, `∫ (c(t)^(d))² dt = cᵀ Q c`.
pub fn quadratic_integral(knots: &[Real], order: usize, derivative: usize) -> DMatrix<Real> {
    let num_coefficients = knots.len() - order;
    let (nodes, weights) = gauss_legendre(order);
    let mut q = DMatrix::zeros(num_coefficients, num_coefficients);
    for span in order - 1..num_coefficients {
        let (a, b) = (knots[span], knots[span + 1]);
        let half = 0.5 * (b - a);
        let mid = 0.5 * (a + b);
        let start = span + 1 - order;
        for (x, w) in nodes.iter().zip(&weights) {
            let ders = basis_function_derivatives(knots, order, span, mid + half * x, derivative);
            let row = &ders[derivative];
            for i in 0..order {
                for j in 0..order {
                    q[(start + i, start + j)] += w * half * row[i] * row[j];
                }
            }
        }
    }
    q
}
