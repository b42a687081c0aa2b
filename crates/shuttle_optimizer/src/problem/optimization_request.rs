use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shuttle_matrix_providers::duration_provider::Minutes;

use crate::problem::configuration_error::ConfigurationError;

/// Parameters of one optimization run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OptimizationRequest {
    /// Seats per vehicle.
    pub capacity: i64,
    /// Legs longer than this are strongly discouraged.
    pub per_leg_time_limit: Minutes,
    /// Upper bound on the cumulative driving time of a route.
    pub max_service_time: Minutes,
    pub vehicle_count: usize,
    /// Arrival time at the depot, in minutes since midnight.
    pub deadline: Minutes,
    /// Stop catalog to load.
    pub source_id: String,
}

impl OptimizationRequest {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.capacity <= 0 {
            return Err(ConfigurationError::InvalidCapacity(self.capacity));
        }

        if self.vehicle_count == 0 {
            return Err(ConfigurationError::NoVehicles);
        }

        if self.per_leg_time_limit < 0 {
            return Err(ConfigurationError::NegativeLimit {
                name: "per_leg_time_limit",
                value: self.per_leg_time_limit,
            });
        }

        if self.max_service_time < 0 {
            return Err(ConfigurationError::NegativeLimit {
                name: "max_service_time",
                value: self.max_service_time,
            });
        }

        Ok(())
    }
}
