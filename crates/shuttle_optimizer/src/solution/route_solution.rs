use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::solution::bus_route::BusRoute;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RouteSolution {
    pub used_buses: usize,
    pub routes: Vec<BusRoute>,
    /// Solver objective, absent for merged solutions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<i64>,
}

impl RouteSolution {
    pub fn empty() -> Self {
        Self {
            used_buses: 0,
            routes: Vec::new(),
            objective: None,
        }
    }

    pub fn total_duration(&self) -> i64 {
        self.routes.iter().map(|route| route.total_duration).sum()
    }

    pub fn total_load(&self) -> i64 {
        self.routes.iter().map(|route| route.final_load).sum()
    }
}
