//! Generic records with repeated field groups.
//!
//! A record has a fixed list of fields followed by zero or more
//! "extensible groups": fixed-width blocks of fields that are appended,
//! indexed and erased like the elements of a list.

pub mod memory;

pub use memory::MemoryRecordStore;

use crate::error::RecordError;
use crate::model::{ObjectId, ObjectType, PlanarSurfaceRef};

/// The set of object types a pointer field may refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceList {
    /// Thermal zones only.
    ThermalZones,
    /// Surfaces, sub-surfaces and internal masses.
    PlanarSurfaces,
}

impl ReferenceList {
    /// Returns `true` if objects of type `object_type` may be referenced.
    #[must_use]
    pub fn accepts(self, object_type: ObjectType) -> bool {
        match self {
            Self::ThermalZones => object_type == ObjectType::ThermalZone,
            Self::PlanarSurfaces => object_type.is_planar_surface(),
        }
    }
}

/// The kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A reference to another object.
    Pointer(ReferenceList),
    /// A finite real number.
    Real,
}

impl FieldKind {
    fn name(self) -> &'static str {
        match self {
            Self::Pointer(_) => "pointer",
            Self::Real => "real",
        }
    }
}

/// A stored field value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Pointer(ObjectId),
    Real(f64),
}

/// Static layout of a record: its fixed fields and the fields of one group.
#[derive(Debug)]
pub struct RecordSchema {
    pub fields: &'static [FieldKind],
    pub group: &'static [FieldKind],
}

type Group = Vec<Option<FieldValue>>;

/// In-memory storage for one record.
///
/// Writes check the field index and the field kind. Whether a pointer
/// target exists is the caller's concern, since only the owner of the
/// record knows which handles are live.
#[derive(Debug, Clone)]
pub struct ExtensibleRecord {
    schema: &'static RecordSchema,
    fields: Vec<Option<FieldValue>>,
    groups: Vec<Group>,
}

impl ExtensibleRecord {
    /// Creates an empty record with all fields unset.
    #[must_use]
    pub fn new(schema: &'static RecordSchema) -> Self {
        Self {
            schema,
            fields: vec![None; schema.fields.len()],
            groups: Vec::new(),
        }
    }

    #[must_use]
    pub fn schema(&self) -> &'static RecordSchema {
        self.schema
    }

    #[must_use]
    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    /// Returns the value of a fixed field, if set.
    #[must_use]
    pub fn field(&self, index: usize) -> Option<FieldValue> {
        self.fields.get(index).copied().flatten()
    }

    /// Sets a fixed field.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range or the value does not
    /// match the field kind.
    pub fn set_field(&mut self, index: usize, value: FieldValue) -> Result<(), RecordError> {
        let kind = self
            .schema
            .fields
            .get(index)
            .copied()
            .ok_or(RecordError::FieldIndexOutOfRange(index))?;
        check_kind(index, kind, value)?;
        self.fields[index] = Some(value);
        Ok(())
    }

    /// Returns the kind of a group field.
    #[must_use]
    pub fn group_field_kind(&self, field: usize) -> Option<FieldKind> {
        self.schema.group.get(field).copied()
    }

    #[must_use]
    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// Appends an empty group and returns its index.
    pub fn push_group(&mut self) -> usize {
        self.groups.push(vec![None; self.schema.group.len()]);
        self.groups.len() - 1
    }

    /// Removes the group at `index`; later groups move down by one.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::GroupIndexOutOfRange`] if there is no such group.
    pub fn erase_group(&mut self, index: usize) -> Result<(), RecordError> {
        if index >= self.groups.len() {
            return Err(RecordError::GroupIndexOutOfRange {
                index,
                count: self.groups.len(),
            });
        }
        self.groups.remove(index);
        Ok(())
    }

    pub fn clear_groups(&mut self) {
        self.groups.clear();
    }

    /// Returns a field of a group, if both exist and the field is set.
    #[must_use]
    pub fn group_field(&self, group: usize, field: usize) -> Option<FieldValue> {
        self.groups.get(group)?.get(field).copied().flatten()
    }

    /// Returns a group field if it holds a pointer.
    #[must_use]
    pub fn group_pointer(&self, group: usize, field: usize) -> Option<ObjectId> {
        match self.group_field(group, field)? {
            FieldValue::Pointer(id) => Some(id),
            FieldValue::Real(_) => None,
        }
    }

    /// Returns a group field if it holds a real number.
    #[must_use]
    pub fn group_real(&self, group: usize, field: usize) -> Option<f64> {
        match self.group_field(group, field)? {
            FieldValue::Real(v) => Some(v),
            FieldValue::Pointer(_) => None,
        }
    }

    /// Sets a field of an existing group.
    ///
    /// # Errors
    ///
    /// Returns an error if the group or field does not exist, or the value
    /// does not match the field kind.
    pub fn set_group_field(
        &mut self,
        group: usize,
        field: usize,
        value: FieldValue,
    ) -> Result<(), RecordError> {
        let count = self.groups.len();
        let kind = self
            .group_field_kind(field)
            .ok_or(RecordError::FieldIndexOutOfRange(field))?;
        check_kind(field, kind, value)?;
        let slot = self
            .groups
            .get_mut(group)
            .ok_or(RecordError::GroupIndexOutOfRange {
                index: group,
                count,
            })?;
        slot[field] = Some(value);
        Ok(())
    }
}

fn check_kind(field: usize, kind: FieldKind, value: FieldValue) -> Result<(), RecordError> {
    match (kind, value) {
        (FieldKind::Pointer(_), FieldValue::Pointer(_)) => Ok(()),
        (FieldKind::Real, FieldValue::Real(v)) if v.is_finite() => Ok(()),
        (FieldKind::Real, FieldValue::Real(_)) => Err(RecordError::NonFiniteValue(field)),
        _ => Err(RecordError::FieldKindMismatch {
            field,
            expected: kind.name(),
        }),
    }
}

/// Read access to the ordered field groups of a single record.
///
/// This is the storage seam the view factor collection is written against;
/// group indices are dense and renumber on erase.
pub trait ExtensibleGroupReader {
    fn num_groups(&self) -> usize;

    fn pointer(&self, group: usize, field: usize) -> Option<ObjectId>;

    fn double(&self, group: usize, field: usize) -> Option<f64>;
}

/// Write access to the field groups of a single record.
pub trait ExtensibleGroupStore: ExtensibleGroupReader {
    /// Appends an empty group and returns its index.
    ///
    /// # Errors
    ///
    /// Returns an error if the store refuses the append.
    fn push_group(&mut self) -> Result<usize, RecordError>;

    /// Removes the group at `index`, shifting later groups down by one.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    fn erase_group(&mut self, index: usize) -> Result<(), RecordError>;

    fn clear_groups(&mut self);

    /// Points a group field at another object.
    ///
    /// # Errors
    ///
    /// Returns an error if the target does not exist or the field does not
    /// accept objects of the target's type.
    fn set_pointer(&mut self, group: usize, field: usize, target: ObjectId)
        -> Result<(), RecordError>;

    /// Writes a real group field.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is not real or the value is not finite.
    fn set_double(&mut self, group: usize, field: usize, value: f64) -> Result<(), RecordError>;
}

/// Resolves a handle to a planar surface.
pub trait SurfaceResolver {
    /// Returns `None` if `id` is stale or is not a planar surface.
    fn resolve_planar_surface(&self, id: ObjectId) -> Option<PlanarSurfaceRef>;
}

/// Shared pointer validation for stores that know the type of each live handle.
pub(crate) fn check_reference(
    record: &ExtensibleRecord,
    field: usize,
    target_type: Option<ObjectType>,
) -> Result<(), RecordError> {
    match record.group_field_kind(field) {
        Some(FieldKind::Pointer(list)) => {
            let found = target_type.ok_or(RecordError::UnresolvedHandle)?;
            if list.accepts(found) {
                Ok(())
            } else {
                Err(RecordError::ReferenceNotAccepted { field, found })
            }
        }
        Some(FieldKind::Real) => Err(RecordError::FieldKindMismatch {
            field,
            expected: "pointer",
        }),
        None => Err(RecordError::FieldIndexOutOfRange(field)),
    }
}
