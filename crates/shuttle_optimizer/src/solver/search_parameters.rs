use jiff::SignedDuration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FirstSolutionStrategy {
    /// Extend each route from its last node towards the cheapest reachable node.
    PathCheapestArc,
    /// Insert each node where it increases the total cost the least.
    CheapestInsertion,
}

#[derive(Clone, Debug)]
pub struct SearchParameters {
    pub first_solution_strategy: FirstSolutionStrategy,
    /// Wall-clock budget for the whole solve.
    pub time_limit: SignedDuration,
    /// Improve the first solution until a local optimum or the time limit.
    pub local_search: bool,
}
