use slotmap::SlotMap;

use crate::error::RecordError;
use crate::record::{
    check_reference, ExtensibleGroupReader, ExtensibleGroupStore, ExtensibleRecord, FieldValue,
    SurfaceResolver,
};

use super::object::{ModelObject, ObjectId};
use super::surface::{PlanarSurfaceKind, PlanarSurfaceRef};

/// A record stored in a [`Model`](super::Model), borrowed together with the
/// model's objects so pointer writes can be checked against live handles.
#[derive(Debug)]
pub struct ModelRecord<'m> {
    objects: &'m SlotMap<ObjectId, ModelObject>,
    record: &'m mut ExtensibleRecord,
}

impl<'m> ModelRecord<'m> {
    pub(super) fn new(
        objects: &'m SlotMap<ObjectId, ModelObject>,
        record: &'m mut ExtensibleRecord,
    ) -> Self {
        Self { objects, record }
    }

    #[must_use]
    pub fn record(&self) -> &ExtensibleRecord {
        &*self.record
    }
}

/// Read-only counterpart of [`ModelRecord`], borrowed from a shared model.
#[derive(Debug, Clone, Copy)]
pub struct ModelRecordRef<'m> {
    objects: &'m SlotMap<ObjectId, ModelObject>,
    record: &'m ExtensibleRecord,
}

impl<'m> ModelRecordRef<'m> {
    pub(super) fn new(
        objects: &'m SlotMap<ObjectId, ModelObject>,
        record: &'m ExtensibleRecord,
    ) -> Self {
        Self { objects, record }
    }

    #[must_use]
    pub fn record(&self) -> &'m ExtensibleRecord {
        self.record
    }
}

pub(super) fn resolve_planar_surface(
    objects: &SlotMap<ObjectId, ModelObject>,
    id: ObjectId,
) -> Option<PlanarSurfaceRef> {
    let kind = PlanarSurfaceKind::from_object_type(objects.get(id)?.object_type())?;
    Some(PlanarSurfaceRef { id, kind })
}

impl ExtensibleGroupReader for ModelRecord<'_> {
    fn num_groups(&self) -> usize {
        self.record.num_groups()
    }

    fn pointer(&self, group: usize, field: usize) -> Option<ObjectId> {
        self.record.group_pointer(group, field)
    }

    fn double(&self, group: usize, field: usize) -> Option<f64> {
        self.record.group_real(group, field)
    }
}

impl ExtensibleGroupStore for ModelRecord<'_> {
    fn push_group(&mut self) -> Result<usize, RecordError> {
        Ok(self.record.push_group())
    }

    fn erase_group(&mut self, index: usize) -> Result<(), RecordError> {
        self.record.erase_group(index)
    }

    fn clear_groups(&mut self) {
        self.record.clear_groups();
    }

    fn set_pointer(
        &mut self,
        group: usize,
        field: usize,
        target: ObjectId,
    ) -> Result<(), RecordError> {
        let target_type = self.objects.get(target).map(ModelObject::object_type);
        check_reference(&*self.record, field, target_type)?;
        self.record
            .set_group_field(group, field, FieldValue::Pointer(target))
    }

    fn set_double(&mut self, group: usize, field: usize, value: f64) -> Result<(), RecordError> {
        self.record.set_group_field(group, field, FieldValue::Real(value))
    }
}

impl SurfaceResolver for ModelRecord<'_> {
    fn resolve_planar_surface(&self, id: ObjectId) -> Option<PlanarSurfaceRef> {
        resolve_planar_surface(self.objects, id)
    }
}

impl ExtensibleGroupReader for ModelRecordRef<'_> {
    fn num_groups(&self) -> usize {
        self.record.num_groups()
    }

    fn pointer(&self, group: usize, field: usize) -> Option<ObjectId> {
        self.record.group_pointer(group, field)
    }

    fn double(&self, group: usize, field: usize) -> Option<f64> {
        self.record.group_real(group, field)
    }
}

impl SurfaceResolver for ModelRecordRef<'_> {
    fn resolve_planar_surface(&self, id: ObjectId) -> Option<PlanarSurfaceRef> {
        resolve_planar_surface(self.objects, id)
    }
}
