use std::{future::Future, sync::Arc};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<LatLng> for geo_types::Point {
    fn from(value: LatLng) -> Self {
        geo_types::Point::new(value.lng, value.lat)
    }
}

impl From<geo_types::Point> for LatLng {
    fn from(value: geo_types::Point) -> Self {
        LatLng {
            lat: value.y(),
            lng: value.x(),
        }
    }
}

/// Road geometry used for display only.
///
/// Failures are swallowed by implementations: the path is empty when the
/// lookup fails or when both points are the same.
pub trait GeometryProvider: Send + Sync {
    fn detailed_path(
        &self,
        from: geo_types::Point,
        to: geo_types::Point,
    ) -> impl Future<Output = Vec<LatLng>> + Send;
}

impl<T> GeometryProvider for Arc<T>
where
    T: GeometryProvider,
{
    fn detailed_path(
        &self,
        from: geo_types::Point,
        to: geo_types::Point,
    ) -> impl Future<Output = Vec<LatLng>> + Send {
        self.as_ref().detailed_path(from, to)
    }
}

/// Geometry provider that never returns a path.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoGeometry;

impl GeometryProvider for NoGeometry {
    async fn detailed_path(&self, _from: geo_types::Point, _to: geo_types::Point) -> Vec<LatLng> {
        Vec::new()
    }
}
