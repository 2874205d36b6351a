use std::fmt;

use crate::error::ViewFactorError;
use crate::model::{Model, PlanarSurfaceRef};

/// The fraction of radiation leaving one surface that arrives at another.
///
/// Values lie in `(-inf, 1]`; anything above 1 (or NaN) is rejected at
/// construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewFactor {
    from: PlanarSurfaceRef,
    to: PlanarSurfaceRef,
    value: f64,
}

impl ViewFactor {
    /// Creates a view factor from `from` to `to`.
    ///
    /// `-inf` is accepted here, but records only hold finite reals, so
    /// adding such a view factor to a record set always fails with
    /// [`RecordError::NonFiniteValue`](crate::error::RecordError::NonFiniteValue).
    ///
    /// # Errors
    ///
    /// Returns [`ViewFactorError::ValueAboveOne`] if `value` is greater than 1
    /// or NaN.
    pub fn new(
        from: PlanarSurfaceRef,
        to: PlanarSurfaceRef,
        value: f64,
    ) -> Result<Self, ViewFactorError> {
        if value > 1.0 || value.is_nan() {
            return Err(ViewFactorError::ValueAboveOne(value));
        }
        Ok(Self { from, to, value })
    }

    /// The radiating surface.
    #[must_use]
    pub fn from_surface(&self) -> PlanarSurfaceRef {
        self.from
    }

    /// The receiving surface.
    #[must_use]
    pub fn to_surface(&self) -> PlanarSurfaceRef {
        self.to
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns an object that formats the view factor with surface names
    /// looked up in `model`.
    #[must_use]
    pub fn display<'a>(&'a self, model: &'a Model) -> ViewFactorDisplay<'a> {
        ViewFactorDisplay {
            view_factor: self,
            model,
        }
    }
}

/// Helper for printing a [`ViewFactor`] with [`format!`] and `{}`.
pub struct ViewFactorDisplay<'a> {
    view_factor: &'a ViewFactor,
    model: &'a Model,
}

impl fmt::Display for ViewFactorDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let from = self.model.name(self.view_factor.from.id).unwrap_or_default();
        let to = self.model.name(self.view_factor.to.id).unwrap_or_default();
        write!(
            f,
            "(fromSurface {from}, toSurface {to}, {})",
            self.view_factor.value
        )
    }
}
