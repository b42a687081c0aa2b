use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shuttle_matrix_providers::{duration_provider::Minutes, geometry_provider::LatLng};

use crate::solution::stop_visit::StopVisit;

/// One vehicle's timed route. The last visit is the depot at the deadline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BusRoute {
    pub bus_id: usize,
    pub visits: Vec<StopVisit>,
    pub total_duration: Minutes,
    pub final_load: i64,
    pub color: String,
    /// Road geometry between consecutive stops, display only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub geometry: Vec<Vec<LatLng>>,
}

impl BusRoute {
    /// Minutes since midnight at which the vehicle leaves the depot.
    pub fn departure_time(&self) -> Option<Minutes> {
        self.visits
            .last()
            .map(|depot| depot.arrival_time - self.total_duration)
    }

    /// Visits before the final depot arrival.
    pub fn stops(&self) -> &[StopVisit] {
        match self.visits.split_last() {
            Some((_, stops)) => stops,
            None => &[],
        }
    }
}
