use tracing::{debug, error, warn};

use crate::error::{RecordError, ViewFactorError};
use crate::model::{ObjectId, PlanarSurfaceRef};
use crate::record::{ExtensibleGroupReader, ExtensibleGroupStore, SurfaceResolver};

use super::data::ViewFactor;
use super::extensible_fields::{FROM_SURFACE_NAME, TO_SURFACE_NAME, VIEW_FACTOR};

/// How [`ViewFactorRecordSet::add_view_factors`] reports per-element failures.
///
/// Both policies attempt every element in order and keep the ones that were
/// written; they only differ in what the call returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BatchPolicy {
    /// Fail with [`ViewFactorError::BatchIncomplete`] if any element failed.
    #[default]
    Aggregate,
    /// Log failed elements and report success regardless.
    DiscardFailures,
}

/// The ordered view factors of one thermal zone.
///
/// Backed by the extensible groups of a record: one group per view factor,
/// in insertion order. Every mutating operation either completes or leaves
/// the groups exactly as they were. Listing only needs an
/// [`ExtensibleGroupReader`], so a shared borrow of the record is enough.
#[derive(Debug)]
pub struct ViewFactorRecordSet<S> {
    store: S,
    zone: ObjectId,
}

impl<S> ViewFactorRecordSet<S>
where
    S: ExtensibleGroupReader + SurfaceResolver,
{
    /// Wraps the groups of a record owned by `zone`.
    #[must_use]
    pub fn new(store: S, zone: ObjectId) -> Self {
        Self { store, zone }
    }

    /// The thermal zone this record belongs to.
    #[must_use]
    pub fn thermal_zone(&self) -> ObjectId {
        self.zone
    }

    /// Number of stored groups, including any that no longer resolve.
    #[must_use]
    pub fn num_view_factors(&self) -> usize {
        self.store.num_groups()
    }

    /// Reads back every well-formed view factor, in storage order.
    ///
    /// Groups whose surfaces no longer resolve to planar surfaces, or whose
    /// value is missing or invalid, are left out, so the result may be
    /// shorter than [`Self::num_view_factors`].
    #[must_use]
    pub fn view_factors(&self) -> Vec<ViewFactor> {
        (0..self.store.num_groups())
            .filter_map(|group| {
                let view_factor = self.read_group(group);
                if view_factor.is_none() {
                    debug!(group, "skipping unresolved view factor");
                }
                view_factor
            })
            .collect()
    }

    fn read_group(&self, group: usize) -> Option<ViewFactor> {
        let from = self.resolve(group, FROM_SURFACE_NAME)?;
        let to = self.resolve(group, TO_SURFACE_NAME)?;
        let value = self.store.double(group, VIEW_FACTOR)?;
        ViewFactor::new(from, to, value).ok()
    }

    fn resolve(&self, group: usize, field: usize) -> Option<PlanarSurfaceRef> {
        let id = self.store.pointer(group, field)?;
        self.store.resolve_planar_surface(id)
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }
}

impl<S> ViewFactorRecordSet<S>
where
    S: ExtensibleGroupStore + SurfaceResolver,
{
    /// Appends a view factor.
    ///
    /// # Errors
    ///
    /// Returns [`ViewFactorError::WriteFailed`] if either surface cannot be
    /// referenced or the value cannot be stored. The new group is removed
    /// again before returning, so nothing is added.
    pub fn add_view_factor(&mut self, view_factor: &ViewFactor) -> Result<(), ViewFactorError> {
        let group = self
            .store
            .push_group()
            .map_err(ViewFactorError::WriteFailed)?;
        if let Err(e) = self.write_group(group, view_factor) {
            warn!(group, error = %e, "discarding partially written view factor");
            if let Err(erase) = self.store.erase_group(group) {
                error!(group, error = %erase, "failed to discard view factor group");
            }
            return Err(ViewFactorError::WriteFailed(e));
        }
        Ok(())
    }

    fn write_group(&mut self, group: usize, view_factor: &ViewFactor) -> Result<(), RecordError> {
        self.store
            .set_pointer(group, FROM_SURFACE_NAME, view_factor.from_surface().id)?;
        self.store
            .set_pointer(group, TO_SURFACE_NAME, view_factor.to_surface().id)?;
        self.store
            .set_double(group, VIEW_FACTOR, view_factor.value())
    }

    /// Builds a view factor and appends it.
    ///
    /// # Errors
    ///
    /// Returns [`ViewFactorError::ValueAboveOne`] before touching the store if
    /// `value` is invalid, otherwise the errors of [`Self::add_view_factor`].
    pub fn add_view_factor_between(
        &mut self,
        from: PlanarSurfaceRef,
        to: PlanarSurfaceRef,
        value: f64,
    ) -> Result<(), ViewFactorError> {
        let view_factor = ViewFactor::new(from, to, value)?;
        self.add_view_factor(&view_factor)
    }

    /// Appends each view factor in order.
    ///
    /// Elements that fail are skipped; the rest are kept.
    ///
    /// # Errors
    ///
    /// With [`BatchPolicy::Aggregate`], returns
    /// [`ViewFactorError::BatchIncomplete`] if any element failed.
    pub fn add_view_factors(
        &mut self,
        view_factors: &[ViewFactor],
        policy: BatchPolicy,
    ) -> Result<(), ViewFactorError> {
        let mut added = 0;
        for (index, view_factor) in view_factors.iter().enumerate() {
            match self.add_view_factor(view_factor) {
                Ok(()) => added += 1,
                Err(e) => warn!(index, error = %e, "view factor not added"),
            }
        }
        if added == view_factors.len() || policy == BatchPolicy::DiscardFailures {
            return Ok(());
        }
        Err(ViewFactorError::BatchIncomplete {
            requested: view_factors.len(),
            added,
        })
    }

    /// Removes the view factor at `index`; later ones move down by one.
    ///
    /// # Errors
    ///
    /// Returns [`ViewFactorError::IndexOutOfRange`] without modifying the
    /// store if there is no such view factor.
    pub fn remove_view_factor(&mut self, index: usize) -> Result<(), ViewFactorError> {
        let count = self.num_view_factors();
        if index >= count {
            return Err(ViewFactorError::IndexOutOfRange { index, count });
        }
        self.store
            .erase_group(index)
            .map_err(ViewFactorError::WriteFailed)
    }

    pub fn remove_all_view_factors(&mut self) {
        self.store.clear_groups();
    }

    /// Raw access to the store. Writes through it are never rolled back.
    #[cfg(test)]
    pub(crate) fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}
