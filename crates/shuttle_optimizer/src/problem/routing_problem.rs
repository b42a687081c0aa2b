use std::sync::Arc;

use shuttle_matrix_providers::duration_provider::Minutes;

use crate::{
    matrix::time_matrix::TimeMatrix,
    problem::{
        configuration_error::ConfigurationError,
        virtual_stop::{NodeIdx, VirtualStop},
    },
};

/// Everything the model builder needs for one solve.
pub struct RoutingProblemInstance {
    stops: Vec<VirtualStop>,
    time_matrix: Arc<TimeMatrix>,
    vehicle_capacities: Vec<i64>,
    depot: NodeIdx,
    per_leg_time_limit: Minutes,
    max_service_time: Minutes,
}

impl RoutingProblemInstance {
    pub fn stops(&self) -> &[VirtualStop] {
        &self.stops
    }

    pub fn stop(&self, node: NodeIdx) -> &VirtualStop {
        &self.stops[node]
    }

    pub fn node_count(&self) -> usize {
        self.stops.len()
    }

    pub fn time_matrix(&self) -> &Arc<TimeMatrix> {
        &self.time_matrix
    }

    pub fn travel_time(&self, from: NodeIdx, to: NodeIdx) -> Minutes {
        self.time_matrix.get(from, to)
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicle_capacities.len()
    }

    pub fn vehicle_capacities(&self) -> &[i64] {
        &self.vehicle_capacities
    }

    pub fn depot(&self) -> NodeIdx {
        self.depot
    }

    pub fn is_depot(&self, node: NodeIdx) -> bool {
        node == self.depot
    }

    pub fn per_leg_time_limit(&self) -> Minutes {
        self.per_leg_time_limit
    }

    pub fn max_service_time(&self) -> Minutes {
        self.max_service_time
    }

    pub fn demands(&self) -> Vec<i64> {
        self.stops.iter().map(|stop| stop.demand()).collect()
    }
}

#[derive(Default)]
pub struct RoutingProblemInstanceBuilder {
    stops: Option<Vec<VirtualStop>>,
    time_matrix: Option<Arc<TimeMatrix>>,
    vehicle_count: usize,
    capacity: i64,
    per_leg_time_limit: Minutes,
    max_service_time: Minutes,
}

impl RoutingProblemInstanceBuilder {
    pub fn set_stops(&mut self, stops: Vec<VirtualStop>) -> &mut Self {
        self.stops = Some(stops);
        self
    }

    pub fn set_time_matrix(&mut self, time_matrix: Arc<TimeMatrix>) -> &mut Self {
        self.time_matrix = Some(time_matrix);
        self
    }

    /// Homogeneous fleet of `count` vehicles with `capacity` seats each.
    pub fn set_fleet(&mut self, count: usize, capacity: i64) -> &mut Self {
        self.vehicle_count = count;
        self.capacity = capacity;
        self
    }

    pub fn set_per_leg_time_limit(&mut self, limit: Minutes) -> &mut Self {
        self.per_leg_time_limit = limit;
        self
    }

    pub fn set_max_service_time(&mut self, max_service_time: Minutes) -> &mut Self {
        self.max_service_time = max_service_time;
        self
    }

    pub fn build(self) -> Result<RoutingProblemInstance, ConfigurationError> {
        if self.capacity <= 0 {
            return Err(ConfigurationError::InvalidCapacity(self.capacity));
        }

        if self.vehicle_count == 0 {
            return Err(ConfigurationError::NoVehicles);
        }

        let stops = self.stops.unwrap_or_default();
        if stops.is_empty() {
            return Err(ConfigurationError::EmptyCatalog);
        }

        let time_matrix = self
            .time_matrix
            .unwrap_or_else(|| Arc::new(TimeMatrix::zeros(stops.len())));
        if time_matrix.size() != stops.len() {
            return Err(ConfigurationError::MatrixSize {
                matrix: time_matrix.size(),
                stops: stops.len(),
            });
        }

        Ok(RoutingProblemInstance {
            stops,
            time_matrix,
            vehicle_capacities: vec![self.capacity; self.vehicle_count],
            depot: NodeIdx::new(0),
            per_leg_time_limit: self.per_leg_time_limit,
            max_service_time: self.max_service_time,
        })
    }
}
