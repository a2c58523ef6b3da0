//! Scoped mutation of a local coefficient window.

use std::ops::Deref;

use bspline_core::{Real, RotationParameterization};
use log::error;
use nalgebra::DVector;

use crate::{BSplinePose, SplineError};

/// Saves the window covering `t` on creation and writes it back on drop.
///
/// While alive, the window may be overwritten through
/// [`set_local_coefficient_vector`](Self::set_local_coefficient_vector) and the
/// spline evaluated through `Deref`. Restoration happens on every exit path,
/// including early returns and unwinding.
pub struct CoefficientCheckpoint<'a, R: RotationParameterization> {
    spline: &'a mut BSplinePose<R>,
    t: Real,
    saved: DVector<Real>,
}

impl<'a, R: RotationParameterization> CoefficientCheckpoint<'a, R> {
    pub fn new(spline: &'a mut BSplinePose<R>, t: Real) -> Result<Self, SplineError> {
        let saved = spline.local_coefficient_vector(t)?;
        Ok(Self { spline, t, saved })
    }

    /// Window contents at creation.
    pub fn saved(&self) -> &DVector<Real> {
        &self.saved
    }

    pub fn set_local_coefficient_vector(
        &mut self,
        coefficients: &DVector<Real>,
    ) -> Result<(), SplineError> {
        self.spline.set_local_coefficient_vector(self.t, coefficients)
    }
}

impl<R: RotationParameterization> Deref for CoefficientCheckpoint<'_, R> {
    type Target = BSplinePose<R>;

    fn deref(&self) -> &BSplinePose<R> {
        self.spline
    }
}

impl<R: RotationParameterization> Drop for CoefficientCheckpoint<'_, R> {
    fn drop(&mut self) {
        if let Err(err) = self.spline.set_local_coefficient_vector(self.t, &self.saved) {
            error!("failed to restore local coefficients at t = {}: {err}", self.t);
        }
    }
}

impl<R: RotationParameterization> BSplinePose<R> {
    /// Guard restoring the window covering `t` when dropped.
    pub fn checkpoint(&mut self, t: Real) -> Result<CoefficientCheckpoint<'_, R>, SplineError> {
        CoefficientCheckpoint::new(self, t)
    }

    /// Evaluate `f` with the window covering `t` temporarily set to `coefficients`.
    pub fn with_local_coefficients<T>(
        &mut self,
        t: Real,
        coefficients: &DVector<Real>,
        f: impl FnOnce(&Self) -> T,
    ) -> Result<T, SplineError> {
        let mut guard = self.checkpoint(t)?;
        guard.set_local_coefficient_vector(coefficients)?;
        Ok(f(&guard))
    }
}
