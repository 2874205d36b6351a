use crate::math::Point3;

use super::object::{ObjectId, ObjectType};

/// Construction role of a building surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceType {
    Wall,
    Floor,
    RoofCeiling,
}

/// Role of a sub-surface within its parent surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubSurfaceType {
    FixedWindow,
    OperableWindow,
    Door,
    Skylight,
}

/// Data associated with a building surface.
///
/// The vertex loop must be planar; the model checks this on insertion.
#[derive(Debug, Clone)]
pub struct SurfaceData {
    pub name: String,
    pub surface_type: SurfaceType,
    pub vertices: Vec<Point3>,
}

impl SurfaceData {
    #[must_use]
    pub fn new(name: impl Into<String>, surface_type: SurfaceType, vertices: Vec<Point3>) -> Self {
        Self {
            name: name.into(),
            surface_type,
            vertices,
        }
    }
}

/// Data associated with a window, door or skylight.
#[derive(Debug, Clone)]
pub struct SubSurfaceData {
    pub name: String,
    pub sub_surface_type: SubSurfaceType,
    pub vertices: Vec<Point3>,
    /// The surface this sub-surface is cut into.
    pub surface: ObjectId,
}

impl SubSurfaceData {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        sub_surface_type: SubSurfaceType,
        vertices: Vec<Point3>,
        surface: ObjectId,
    ) -> Self {
        Self {
            name: name.into(),
            sub_surface_type,
            vertices,
            surface,
        }
    }
}

/// Data associated with an internal mass (furniture, partitions).
///
/// Internal masses have no geometry, only an exposed area in m².
#[derive(Debug, Clone)]
pub struct InternalMassData {
    pub name: String,
    pub surface_area: f64,
}

impl InternalMassData {
    #[must_use]
    pub fn new(name: impl Into<String>, surface_area: f64) -> Self {
        Self {
            name: name.into(),
            surface_area,
        }
    }
}

/// The concrete kind behind a planar surface handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanarSurfaceKind {
    Surface,
    SubSurface,
    InternalMass,
}

impl PlanarSurfaceKind {
    /// Maps an object type to a planar surface kind, if it is one.
    #[must_use]
    pub fn from_object_type(object_type: ObjectType) -> Option<Self> {
        match object_type {
            ObjectType::Surface => Some(Self::Surface),
            ObjectType::SubSurface => Some(Self::SubSurface),
            ObjectType::InternalMass => Some(Self::InternalMass),
            ObjectType::ThermalZone | ObjectType::ZonePropertyUserViewFactorsBySurfaceName => None,
        }
    }
}

/// A handle known to resolve to a planar surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlanarSurfaceRef {
    pub id: ObjectId,
    pub kind: PlanarSurfaceKind,
}
