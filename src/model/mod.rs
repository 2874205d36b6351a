pub mod object;
pub mod record;
pub mod surface;
pub mod thermal_zone;

pub use object::{ModelObject, ObjectId, ObjectType};
pub use record::{ModelRecord, ModelRecordRef};
pub use surface::{
    InternalMassData, PlanarSurfaceKind, PlanarSurfaceRef, SubSurfaceData, SubSurfaceType,
    SurfaceData, SurfaceType,
};
pub use thermal_zone::ThermalZoneData;

use slotmap::{SecondaryMap, SlotMap};
use tracing::{debug, error};

use crate::error::{ModelError, Result};
use crate::math::polygon_3d::planar_normal;
use crate::record::{ExtensibleRecord, FieldValue, SurfaceResolver};
use crate::view_factor::{fields, ViewFactorRecordSet, USER_VIEW_FACTORS_SCHEMA};

/// Central arena that owns all model objects.
///
/// Objects reference each other via [`ObjectId`] (generational indices), so
/// a reference to a removed object stops resolving instead of dangling.
/// Objects backed by a generic record keep its fields in a side table keyed
/// by the same id.
#[derive(Debug, Default)]
pub struct Model {
    objects: SlotMap<ObjectId, ModelObject>,
    records: SecondaryMap<ObjectId, ExtensibleRecord>,
}

impl Model {
    /// Creates a new, empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of live objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    // --- Insertion ---

    /// Inserts a thermal zone and returns its ID.
    pub fn add_thermal_zone(&mut self, data: ThermalZoneData) -> ObjectId {
        let id = self.objects.insert(ModelObject::ThermalZone(data));
        debug!(?id, "added thermal zone");
        id
    }

    /// Inserts a surface and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex loop is not a valid planar polygon.
    pub fn add_surface(&mut self, data: SurfaceData) -> Result<ObjectId> {
        planar_normal(&data.vertices)?;
        let id = self.objects.insert(ModelObject::Surface(data));
        debug!(?id, "added surface");
        Ok(id)
    }

    /// Inserts a sub-surface and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent is not a surface in this model or the
    /// vertex loop is not a valid planar polygon.
    pub fn add_sub_surface(&mut self, data: SubSurfaceData) -> Result<ObjectId> {
        let parent = self.object(data.surface)?;
        if !matches!(parent, ModelObject::Surface(_)) {
            return Err(ModelError::WrongObjectType {
                expected: "surface",
                found: parent.object_type(),
            }
            .into());
        }
        planar_normal(&data.vertices)?;
        let id = self.objects.insert(ModelObject::SubSurface(data));
        debug!(?id, "added sub-surface");
        Ok(id)
    }

    /// Inserts an internal mass and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidValue`] unless the area is finite and positive.
    pub fn add_internal_mass(&mut self, data: InternalMassData) -> Result<ObjectId> {
        if !(data.surface_area.is_finite() && data.surface_area > 0.0) {
            return Err(ModelError::InvalidValue {
                field: "surface area",
                value: data.surface_area,
            }
            .into());
        }
        let id = self.objects.insert(ModelObject::InternalMass(data));
        debug!(?id, "added internal mass");
        Ok(id)
    }

    // --- Lookup ---

    /// Returns a reference to the object, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the model.
    pub fn object(&self, id: ObjectId) -> Result<&ModelObject, ModelError> {
        self.objects
            .get(id)
            .ok_or_else(|| ModelError::EntityNotFound("object".into()))
    }

    #[must_use]
    pub fn object_type(&self, id: ObjectId) -> Option<ObjectType> {
        self.objects.get(id).map(ModelObject::object_type)
    }

    #[must_use]
    pub fn name(&self, id: ObjectId) -> Option<&str> {
        self.objects.get(id)?.name()
    }

    /// Returns the IDs of all live objects of the given type.
    #[must_use]
    pub fn objects_of_type(&self, object_type: ObjectType) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|(_, object)| object.object_type() == object_type)
            .map(|(id, _)| id)
            .collect()
    }

    /// Returns the thermal zone data, or an error if `id` is not a thermal zone.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is missing or of another type.
    pub fn thermal_zone(&self, id: ObjectId) -> Result<&ThermalZoneData, ModelError> {
        match self.object(id)? {
            ModelObject::ThermalZone(zone) => Ok(zone),
            other => Err(ModelError::WrongObjectType {
                expected: "thermal zone",
                found: other.object_type(),
            }),
        }
    }

    /// Resolves a handle to a planar surface.
    #[must_use]
    pub fn planar_surface(&self, id: ObjectId) -> Option<PlanarSurfaceRef> {
        record::resolve_planar_surface(&self.objects, id)
    }

    // --- Removal ---

    /// Removes an object and everything that cannot exist without it.
    ///
    /// Removing a thermal zone removes its user view factor record; removing
    /// a surface removes its sub-surfaces. Other references to the removed
    /// objects are left in place and no longer resolve.
    ///
    /// Returns the IDs of every removed object, `id` first.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the model.
    pub fn remove_object(&mut self, id: ObjectId) -> Result<Vec<ObjectId>> {
        let object_type = self.object(id)?.object_type();
        let mut removed = vec![id];
        match object_type {
            ObjectType::ThermalZone => removed.extend(self.view_factor_record_for(id)),
            ObjectType::Surface => removed.extend(
                self.objects
                    .iter()
                    .filter(|(_, o)| matches!(o, ModelObject::SubSurface(s) if s.surface == id))
                    .map(|(child, _)| child),
            ),
            _ => {}
        }
        for &child in &removed {
            self.objects.remove(child);
            self.records.remove(child);
        }
        debug!(?id, %object_type, count = removed.len(), "removed objects");
        Ok(removed)
    }

    // --- User view factors ---

    /// Creates the user view factor record of a thermal zone.
    ///
    /// # Errors
    ///
    /// Returns an error if `zone` is not a thermal zone or already has one.
    pub fn add_zone_property_user_view_factors(&mut self, zone: ObjectId) -> Result<ObjectId> {
        self.thermal_zone(zone)?;
        if self.view_factor_record_for(zone).is_some() {
            return Err(ModelError::DuplicateZoneProperty.into());
        }
        let mut record = ExtensibleRecord::new(&USER_VIEW_FACTORS_SCHEMA);
        record.set_field(fields::THERMAL_ZONE_NAME, FieldValue::Pointer(zone))?;
        let id = self
            .objects
            .insert(ModelObject::ZonePropertyUserViewFactorsBySurfaceName);
        self.records.insert(id, record);
        debug!(?id, ?zone, "added user view factor record");
        Ok(id)
    }

    /// Returns the user view factor record of a thermal zone, if any.
    #[must_use]
    pub fn view_factor_record_for(&self, zone: ObjectId) -> Option<ObjectId> {
        let target = Some(FieldValue::Pointer(zone));
        self.records
            .iter()
            .find(|(_, record)| record.field(fields::THERMAL_ZONE_NAME) == target)
            .map(|(id, _)| id)
    }

    /// Returns the user view factor record of a thermal zone, creating it
    /// on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if `zone` is not a thermal zone.
    pub fn zone_property_user_view_factors(&mut self, zone: ObjectId) -> Result<ObjectId> {
        match self.view_factor_record_for(zone) {
            Some(id) => Ok(id),
            None => self.add_zone_property_user_view_factors(zone),
        }
    }

    /// Borrows a user view factor record as a read-only [`ViewFactorRecordSet`].
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::EntityNotFound`] if `record` does not exist and
    /// [`ModelError::MissingThermalZone`] if the record lost its zone.
    pub fn view_factors(
        &self,
        record: ObjectId,
    ) -> Result<ViewFactorRecordSet<ModelRecordRef<'_>>> {
        let data = self
            .records
            .get(record)
            .ok_or_else(|| ModelError::EntityNotFound("user view factor record".into()))?;
        let zone = attached_zone(&self.objects, record, data)?;
        Ok(ViewFactorRecordSet::new(
            ModelRecordRef::new(&self.objects, data),
            zone,
        ))
    }

    /// Borrows a user view factor record as a [`ViewFactorRecordSet`] that
    /// can add and remove view factors.
    ///
    /// # Errors
    ///
    /// Same as [`Self::view_factors`].
    pub fn view_factors_mut(
        &mut self,
        record: ObjectId,
    ) -> Result<ViewFactorRecordSet<ModelRecord<'_>>> {
        let Self { objects, records } = self;
        let data = records
            .get_mut(record)
            .ok_or_else(|| ModelError::EntityNotFound("user view factor record".into()))?;
        let zone = attached_zone(objects, record, data)?;
        Ok(ViewFactorRecordSet::new(ModelRecord::new(objects, data), zone))
    }
}

/// Returns the thermal zone a user view factor record points at.
fn attached_zone(
    objects: &SlotMap<ObjectId, ModelObject>,
    record: ObjectId,
    data: &ExtensibleRecord,
) -> Result<ObjectId, ModelError> {
    match data.field(fields::THERMAL_ZONE_NAME) {
        Some(FieldValue::Pointer(zone))
            if objects
                .get(zone)
                .is_some_and(|o| o.object_type() == ObjectType::ThermalZone) =>
        {
            Ok(zone)
        }
        _ => {
            error!(?record, "user view factor record is not attached to a thermal zone");
            Err(ModelError::MissingThermalZone)
        }
    }
}

impl SurfaceResolver for Model {
    fn resolve_planar_surface(&self, id: ObjectId) -> Option<PlanarSurfaceRef> {
        self.planar_surface(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{GeometryError, ViewFactorError, ZoneviewError};
    use crate::math::Point3;
    use crate::view_factor::{BatchPolicy, ViewFactor};

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    struct Room {
        model: Model,
        zone: ObjectId,
        south: ObjectId,
        floor: ObjectId,
        window: ObjectId,
        mass: ObjectId,
    }

    /// A 4 m x 3 m room with a south wall, a floor, a window and some furniture.
    fn room() -> Room {
        init_tracing();
        let mut model = Model::new();
        let zone = model.add_thermal_zone(ThermalZoneData::new("Office"));
        let south = model
            .add_surface(SurfaceData::new(
                "South Wall",
                SurfaceType::Wall,
                vec![
                    p(0.0, 0.0, 3.0),
                    p(0.0, 0.0, 0.0),
                    p(4.0, 0.0, 0.0),
                    p(4.0, 0.0, 3.0),
                ],
            ))
            .unwrap();
        let floor = model
            .add_surface(SurfaceData::new(
                "Floor",
                SurfaceType::Floor,
                vec![
                    p(0.0, 3.0, 0.0),
                    p(4.0, 3.0, 0.0),
                    p(4.0, 0.0, 0.0),
                    p(0.0, 0.0, 0.0),
                ],
            ))
            .unwrap();
        let window = model
            .add_sub_surface(SubSurfaceData::new(
                "South Window",
                SubSurfaceType::FixedWindow,
                vec![
                    p(1.0, 0.0, 2.0),
                    p(1.0, 0.0, 1.0),
                    p(3.0, 0.0, 1.0),
                    p(3.0, 0.0, 2.0),
                ],
                south,
            ))
            .unwrap();
        let mass = model
            .add_internal_mass(InternalMassData::new("Furniture", 6.0))
            .unwrap();
        Room {
            model,
            zone,
            south,
            floor,
            window,
            mass,
        }
    }

    fn vf(model: &Model, from: ObjectId, to: ObjectId, value: f64) -> ViewFactor {
        ViewFactor::new(
            model.planar_surface(from).unwrap(),
            model.planar_surface(to).unwrap(),
            value,
        )
        .unwrap()
    }

    // ── objects ──

    #[test]
    fn non_planar_surface_rejected() {
        let mut model = Model::new();
        let err = model
            .add_surface(SurfaceData::new(
                "Warped",
                SurfaceType::RoofCeiling,
                vec![
                    p(0.0, 0.0, 3.0),
                    p(1.0, 0.0, 3.0),
                    p(1.0, 1.0, 3.5),
                    p(0.0, 1.0, 3.0),
                ],
            ))
            .unwrap_err();
        assert!(matches!(
            err,
            ZoneviewError::Geometry(GeometryError::NonPlanar { .. })
        ));
        assert!(model.is_empty());
    }

    #[test]
    fn non_finite_vertex_rejected() {
        let mut r = room();
        let before = r.model.len();
        let err = r
            .model
            .add_surface(SurfaceData::new(
                "Broken Wall",
                SurfaceType::Wall,
                vec![
                    p(0.0, 0.0, 3.0),
                    p(1.0, f64::NAN, 0.0),
                    p(4.0, 0.0, 0.0),
                    p(4.0, 0.0, 3.0),
                ],
            ))
            .unwrap_err();
        assert!(matches!(
            err,
            ZoneviewError::Geometry(GeometryError::NonFiniteVertex(1))
        ));
        let err = r
            .model
            .add_sub_surface(SubSurfaceData::new(
                "Broken Window",
                SubSurfaceType::FixedWindow,
                vec![p(f64::INFINITY, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 0.0, 1.0)],
                r.south,
            ))
            .unwrap_err();
        assert!(matches!(
            err,
            ZoneviewError::Geometry(GeometryError::NonFiniteVertex(0))
        ));
        assert_eq!(r.model.len(), before);
    }

    #[test]
    fn sub_surface_needs_surface_parent() {
        let mut r = room();
        let err = r
            .model
            .add_sub_surface(SubSurfaceData::new(
                "Door",
                SubSurfaceType::Door,
                vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 0.0, 2.0)],
                r.zone,
            ))
            .unwrap_err();
        assert!(matches!(
            err,
            ZoneviewError::Model(ModelError::WrongObjectType {
                found: ObjectType::ThermalZone,
                ..
            })
        ));
    }

    #[test]
    fn internal_mass_area_must_be_positive() {
        let mut model = Model::new();
        for area in [0.0, -2.0, f64::NAN] {
            assert!(model
                .add_internal_mass(InternalMassData::new("Bad", area))
                .is_err());
        }
    }

    #[test]
    fn zone_is_not_a_planar_surface() {
        let r = room();
        assert_eq!(r.model.len(), 5);
        assert!(r.model.resolve_planar_surface(r.zone).is_none());
        assert!(r.model.planar_surface(r.zone).is_none());
        assert_eq!(r.model.name(r.zone), Some("Office"));
        assert_eq!(
            r.model.planar_surface(r.window).unwrap().kind,
            PlanarSurfaceKind::SubSurface
        );
    }

    #[test]
    fn removing_surface_removes_its_windows() {
        let mut r = room();
        let removed = r.model.remove_object(r.south).unwrap();
        assert_eq!(removed, vec![r.south, r.window]);
        assert!(r.model.object(r.window).is_err());
        assert!(r.model.object(r.floor).is_ok());
    }

    // ── user view factor records ──

    #[test]
    fn one_record_per_zone() {
        let mut r = room();
        let record = r.model.add_zone_property_user_view_factors(r.zone).unwrap();
        assert!(matches!(
            r.model.add_zone_property_user_view_factors(r.zone),
            Err(ZoneviewError::Model(ModelError::DuplicateZoneProperty))
        ));
        assert_eq!(r.model.zone_property_user_view_factors(r.zone).unwrap(), record);
        assert_eq!(
            r.model.objects_of_type(ObjectType::ZonePropertyUserViewFactorsBySurfaceName),
            vec![record]
        );
    }

    #[test]
    fn get_or_create_creates_once() {
        let mut r = room();
        assert!(r.model.view_factor_record_for(r.zone).is_none());
        let first = r.model.zone_property_user_view_factors(r.zone).unwrap();
        let second = r.model.zone_property_user_view_factors(r.zone).unwrap();
        assert_eq!(first, second);
        assert_eq!(r.model.view_factor_record_for(r.zone), Some(first));
    }

    #[test]
    fn record_requires_thermal_zone() {
        let mut r = room();
        assert!(r.model.add_zone_property_user_view_factors(r.floor).is_err());
    }

    #[test]
    fn record_set_reports_its_zone() {
        let mut r = room();
        let record = r.model.zone_property_user_view_factors(r.zone).unwrap();
        let set = r.model.view_factors(record).unwrap();
        assert_eq!(set.thermal_zone(), r.zone);
    }

    #[test]
    fn three_view_factors_round_trip() {
        let mut r = room();
        let record = r.model.zone_property_user_view_factors(r.zone).unwrap();
        let expected = vec![
            vf(&r.model, r.south, r.floor, 0.5),
            vf(&r.model, r.floor, r.window, 0.9),
            vf(&r.model, r.south, r.window, 1.0),
        ];
        let mut set = r.model.view_factors_mut(record).unwrap();
        for v in &expected {
            set.add_view_factor(v).unwrap();
        }
        assert_eq!(set.num_view_factors(), 3);
        assert_eq!(set.store().record().num_groups(), 3);

        // a fresh binding re-reads the stored groups
        let set = r.model.view_factors(record).unwrap();
        assert_eq!(set.view_factors(), expected);
    }

    #[test]
    fn listing_needs_only_a_shared_model() {
        let mut r = room();
        let record = r.model.zone_property_user_view_factors(r.zone).unwrap();
        let v = vf(&r.model, r.south, r.floor, 0.5);
        r.model
            .view_factors_mut(record)
            .unwrap()
            .add_view_factor(&v)
            .unwrap();

        let model = &r.model;
        let first = model.view_factors(record).unwrap();
        let second = model.view_factors(record).unwrap();
        let listed: Vec<String> = first
            .view_factors()
            .iter()
            .map(|listed| listed.display(model).to_string())
            .collect();
        assert_eq!(listed, vec!["(fromSurface South Wall, toSurface Floor, 0.5)"]);
        assert_eq!(second.num_view_factors(), 1);
        assert_eq!(second.store().record().num_groups(), 1);
    }

    #[test]
    fn pointer_to_removed_surface_fails_without_partial_group() {
        let mut r = room();
        let record = r.model.zone_property_user_view_factors(r.zone).unwrap();
        let stale = vf(&r.model, r.mass, r.floor, 0.2);
        r.model.remove_object(r.mass).unwrap();

        let mut set = r.model.view_factors_mut(record).unwrap();
        let err = set.add_view_factor(&stale).unwrap_err();
        assert!(matches!(err, ViewFactorError::WriteFailed(_)));
        assert!(err.is_recoverable());
        assert_eq!(set.num_view_factors(), 0);
    }

    #[test]
    fn removed_surface_is_skipped_when_listing() {
        let mut r = room();
        let record = r.model.zone_property_user_view_factors(r.zone).unwrap();
        let kept = vf(&r.model, r.south, r.floor, 0.4);
        let dropped = vf(&r.model, r.mass, r.floor, 0.3);
        let mut set = r.model.view_factors_mut(record).unwrap();
        set.add_view_factors(&[dropped, kept], BatchPolicy::Aggregate)
            .unwrap();

        r.model.remove_object(r.mass).unwrap();
        let set = r.model.view_factors(record).unwrap();
        assert_eq!(set.num_view_factors(), 2);
        assert_eq!(set.view_factors(), vec![kept]);
    }

    #[test]
    fn removing_zone_removes_record() {
        let mut r = room();
        let record = r.model.zone_property_user_view_factors(r.zone).unwrap();
        let removed = r.model.remove_object(r.zone).unwrap();
        assert_eq!(removed, vec![r.zone, record]);
        assert!(matches!(
            r.model.view_factors(record),
            Err(ZoneviewError::Model(ModelError::EntityNotFound(_)))
        ));
    }

    #[test]
    fn record_without_zone_is_an_integrity_error() {
        let mut model = Model::new();
        let id = model
            .objects
            .insert(ModelObject::ZonePropertyUserViewFactorsBySurfaceName);
        model
            .records
            .insert(id, ExtensibleRecord::new(&USER_VIEW_FACTORS_SCHEMA));
        assert!(matches!(
            model.view_factors(id),
            Err(ZoneviewError::Model(ModelError::MissingThermalZone))
        ));
        assert!(matches!(
            model.view_factors_mut(id),
            Err(ZoneviewError::Model(ModelError::MissingThermalZone))
        ));
    }

    #[test]
    fn display_uses_surface_names() {
        let r = room();
        let v = vf(&r.model, r.south, r.window, 0.25);
        assert_eq!(
            v.display(&r.model).to_string(),
            "(fromSurface South Wall, toSurface South Window, 0.25)"
        );
    }
}
