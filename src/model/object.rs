use std::fmt;

use super::surface::{InternalMassData, SubSurfaceData, SurfaceData};
use super::thermal_zone::ThermalZoneData;

slotmap::new_key_type! {
    /// Unique identifier for an object in the model.
    pub struct ObjectId;
}

/// Schema type of a model object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    ThermalZone,
    Surface,
    SubSurface,
    InternalMass,
    ZonePropertyUserViewFactorsBySurfaceName,
}

impl ObjectType {
    /// Returns the schema name of this object type.
    #[must_use]
    pub fn idd_name(self) -> &'static str {
        match self {
            Self::ThermalZone => "OS:ThermalZone",
            Self::Surface => "OS:Surface",
            Self::SubSurface => "OS:SubSurface",
            Self::InternalMass => "OS:InternalMass",
            Self::ZonePropertyUserViewFactorsBySurfaceName => {
                "OS:ZoneProperty:UserViewFactors:BySurfaceName"
            }
        }
    }

    /// Returns `true` for types that can take part in a view factor.
    #[must_use]
    pub fn is_planar_surface(self) -> bool {
        matches!(self, Self::Surface | Self::SubSurface | Self::InternalMass)
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.idd_name())
    }
}

/// An object owned by the model.
///
/// The user view factor record carries no data here: its fields live in the
/// model's record table under the same [`ObjectId`].
#[derive(Debug, Clone)]
pub enum ModelObject {
    ThermalZone(ThermalZoneData),
    Surface(SurfaceData),
    SubSurface(SubSurfaceData),
    InternalMass(InternalMassData),
    ZonePropertyUserViewFactorsBySurfaceName,
}

impl ModelObject {
    #[must_use]
    pub fn object_type(&self) -> ObjectType {
        match self {
            Self::ThermalZone(_) => ObjectType::ThermalZone,
            Self::Surface(_) => ObjectType::Surface,
            Self::SubSurface(_) => ObjectType::SubSurface,
            Self::InternalMass(_) => ObjectType::InternalMass,
            Self::ZonePropertyUserViewFactorsBySurfaceName => {
                ObjectType::ZonePropertyUserViewFactorsBySurfaceName
            }
        }
    }

    /// Returns the object's name, if it has one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::ThermalZone(zone) => Some(zone.name.as_str()),
            Self::Surface(surface) => Some(surface.name.as_str()),
            Self::SubSurface(sub) => Some(sub.name.as_str()),
            Self::InternalMass(mass) => Some(mass.name.as_str()),
            Self::ZonePropertyUserViewFactorsBySurfaceName => None,
        }
    }
}
