pub mod error;
pub mod math;
pub mod model;
pub mod record;
pub mod view_factor;

pub use error::{Result, ZoneviewError};
pub use model::{Model, ObjectId, ObjectType, PlanarSurfaceRef};
pub use view_factor::{BatchPolicy, ViewFactor, ViewFactorRecordSet};
