use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A real boarding location as stored in the stop catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PhysicalStop {
    pub id: String,
    pub name: String,
    pub demand: i64,
    pub lat: f64,
    pub lon: f64,
}

impl PhysicalStop {
    pub fn new(id: impl Into<String>, name: impl Into<String>, demand: i64, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            demand,
            lat,
            lon,
        }
    }

    pub fn point(&self) -> geo_types::Point {
        geo_types::Point::new(self.lon, self.lat)
    }
}
