use geo::{Distance, Haversine};

use crate::{
    duration_provider::{DurationProvider, Minutes, ProviderError, minutes_from_seconds},
    geometry_provider::{GeometryProvider, LatLng},
};

/// Straight-line travel at a constant speed.
#[derive(Debug, Clone, Copy)]
pub struct AsTheCrowFlies {
    pub speed_kmh: f64,
}

impl AsTheCrowFlies {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    pub fn seconds_between(&self, from: geo_types::Point, to: geo_types::Point) -> f64 {
        let meters = Haversine.distance(from, to);
        meters / (self.speed_kmh * 1000.0 / 3600.0)
    }
}

impl DurationProvider for AsTheCrowFlies {
    async fn duration(
        &self,
        from: geo_types::Point,
        to: geo_types::Point,
    ) -> Result<Minutes, ProviderError> {
        if self.speed_kmh <= 0.0 {
            return Err(ProviderError::NotConfigured(format!(
                "speed must be positive, got {} km/h",
                self.speed_kmh
            )));
        }

        Ok(minutes_from_seconds(self.seconds_between(from, to)))
    }
}

impl GeometryProvider for AsTheCrowFlies {
    async fn detailed_path(&self, from: geo_types::Point, to: geo_types::Point) -> Vec<LatLng> {
        if from == to {
            return Vec::new();
        }

        vec![from.into(), to.into()]
    }
}
