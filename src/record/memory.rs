use slotmap::SlotMap;

use crate::error::RecordError;
use crate::model::{ObjectId, ObjectType, PlanarSurfaceKind, PlanarSurfaceRef};

use super::{
    check_reference, ExtensibleGroupReader, ExtensibleGroupStore, ExtensibleRecord, FieldValue,
    RecordSchema, SurfaceResolver,
};

/// A standalone record together with a registry of live handles.
///
/// Stands in for a full [`Model`](crate::model::Model) wherever only the
/// group storage and handle resolution matter. Handles are registered with
/// an object type and can be unregistered to simulate upstream deletion.
#[derive(Debug, Clone)]
pub struct MemoryRecordStore {
    record: ExtensibleRecord,
    objects: SlotMap<ObjectId, ObjectType>,
}

impl MemoryRecordStore {
    #[must_use]
    pub fn new(schema: &'static RecordSchema) -> Self {
        Self {
            record: ExtensibleRecord::new(schema),
            objects: SlotMap::with_key(),
        }
    }

    /// Registers a live object of the given type and returns its handle.
    pub fn register(&mut self, object_type: ObjectType) -> ObjectId {
        self.objects.insert(object_type)
    }

    /// Forgets a handle. Groups that point at it keep the stale value.
    pub fn unregister(&mut self, id: ObjectId) -> Option<ObjectType> {
        self.objects.remove(id)
    }

    #[must_use]
    pub fn record(&self) -> &ExtensibleRecord {
        &self.record
    }

    /// Raw access to the record, bypassing handle validation.
    #[cfg(test)]
    pub(crate) fn record_mut(&mut self) -> &mut ExtensibleRecord {
        &mut self.record
    }
}

impl ExtensibleGroupReader for MemoryRecordStore {
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

impl ExtensibleGroupStore for MemoryRecordStore {
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
        check_reference(&self.record, field, self.objects.get(target).copied())?;
        self.record
            .set_group_field(group, field, FieldValue::Pointer(target))
    }

    fn set_double(&mut self, group: usize, field: usize, value: f64) -> Result<(), RecordError> {
        self.record.set_group_field(group, field, FieldValue::Real(value))
    }
}

impl SurfaceResolver for MemoryRecordStore {
    fn resolve_planar_surface(&self, id: ObjectId) -> Option<PlanarSurfaceRef> {
        let kind = PlanarSurfaceKind::from_object_type(*self.objects.get(id)?)?;
        Some(PlanarSurfaceRef { id, kind })
    }
}
