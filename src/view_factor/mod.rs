//! User-specified view factors of a thermal zone.
//!
//! Each view factor is persisted as one extensible group of the zone's
//! `OS:ZoneProperty:UserViewFactors:BySurfaceName` record, in insertion order.

pub mod data;
pub mod record_set;

pub use data::{ViewFactor, ViewFactorDisplay};
pub use record_set::{BatchPolicy, ViewFactorRecordSet};

use crate::record::{FieldKind, RecordSchema, ReferenceList};

/// Fixed field indices of the user view factor record.
pub mod fields {
    pub const THERMAL_ZONE_NAME: usize = 0;
}

/// Field indices within one extensible group of the user view factor record.
pub mod extensible_fields {
    pub const FROM_SURFACE_NAME: usize = 0;
    pub const TO_SURFACE_NAME: usize = 1;
    pub const VIEW_FACTOR: usize = 2;
}

/// Layout of `OS:ZoneProperty:UserViewFactors:BySurfaceName`.
pub static USER_VIEW_FACTORS_SCHEMA: RecordSchema = RecordSchema {
    fields: &[FieldKind::Pointer(ReferenceList::ThermalZones)],
    group: &[
        FieldKind::Pointer(ReferenceList::PlanarSurfaces),
        FieldKind::Pointer(ReferenceList::PlanarSurfaces),
        FieldKind::Real,
    ],
};
