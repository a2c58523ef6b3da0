use bspline_core::Real;
use thiserror::Error;

/// Coarse classification of [`SplineError`] values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A time lies outside the valid domain or does not advance it.
    Domain,
    /// A structural precondition on the arguments does not hold.
    InvalidArgument,
    /// The fitting system could not be solved.
    IllPosedFit,
}

#[derive(Debug, Error)]
pub enum SplineError {
    #[error("spline order must be at least 2, got {0}")]
    InvalidOrder(usize),
    #[error("spline has no segments yet")]
    Uninitialized,
    #[error("time {t} outside the valid domain [{t_min}, {t_max}]")]
    OutOfRange { t: Real, t_min: Real, t_max: Real },
    #[error("time {t} must be strictly greater than the current t_max {t_max}")]
    NonIncreasingTime { t: Real, t_max: Real },
    #[error("derivative order {derivative} must be below the spline order {order}")]
    InvalidDerivativeOrder { derivative: usize, order: usize },
    #[error("expected {expected} values, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("invalid knot vector: {0}")]
    InvalidKnots(String),
    #[error("interval end {t1} must be greater than its start {t0}")]
    InvalidInterval { t0: Real, t1: Real },
    #[error("curve value contains non-finite entries")]
    NonFiniteValue,
    #[error("invalid pose: {0}")]
    InvalidPose(String),
    #[error("invalid fit input: {0}")]
    InvalidFitInput(String),
    #[error("fit system is singular: {0}")]
    IllPosedFit(String),
}

impl SplineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SplineError::Uninitialized
            | SplineError::OutOfRange { .. }
            | SplineError::NonIncreasingTime { .. } => ErrorKind::Domain,
            SplineError::IllPosedFit(_) => ErrorKind::IllPosedFit,
            SplineError::InvalidOrder(_)
            | SplineError::InvalidDerivativeOrder { .. }
            | SplineError::DimensionMismatch { .. }
            | SplineError::InvalidKnots(_)
            | SplineError::InvalidInterval { .. }
            | SplineError::NonFiniteValue
            | SplineError::InvalidPose(_)
            | SplineError::InvalidFitInput(_) => ErrorKind::InvalidArgument,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        let out = SplineError::OutOfRange {
            t: 2.0,
            t_min: 0.0,
            t_max: 1.0,
        };
        assert_eq!(out.kind(), ErrorKind::Domain);
        assert_eq!(
            SplineError::DimensionMismatch { expected: 24, got: 23 }.kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            SplineError::IllPosedFit("cholesky".into()).kind(),
            ErrorKind::IllPosedFit
        );
        assert_eq!(SplineError::NonFiniteValue.kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            SplineError::InvalidPose("scaled rotation".into()).kind(),
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn messages_carry_values() {
        let msg = SplineError::NonIncreasingTime { t: 1.0, t_max: 2.0 }.to_string();
        assert!(msg.contains("1") && msg.contains("2"), "{msg}");
    }
}
