use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shuttle_matrix_providers::duration_provider::Minutes;

use crate::problem::stop_key::StopKey;

/// A route fixed by the caller. Its order is kept as is; only timing and load
/// are recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LockedRouteRequest {
    pub bus_id: usize,
    pub stops: Vec<StopKey>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RouteValidation {
    pub bus_id: usize,
    pub total_load: i64,
    pub total_time: Minutes,
    pub capacity_ok: bool,
    pub message: String,
    /// Duration of every leg, trailing leg to the depot included.
    pub legs: Vec<Minutes>,
    /// Stops that are not in the catalog.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unmatched: Vec<StopKey>,
}
