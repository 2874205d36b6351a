/// Data associated with a thermal zone.
#[derive(Debug, Clone)]
pub struct ThermalZoneData {
    pub name: String,
}

impl ThermalZoneData {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
