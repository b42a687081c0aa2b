use jiff::SignedDuration;
use shuttle_matrix_providers::duration_provider::Minutes;

use crate::{
    matrix::time_matrix::UNKNOWN_DURATION,
    solver::search_parameters::{FirstSolutionStrategy, SearchParameters},
};

#[derive(Clone, Debug)]
pub struct MatrixParams {
    /// Multiplier applied to legs flagged as U-turns.
    pub u_turn_penalty_factor: f64,
    /// Legs slower than this, in straight-line meters per minute, are flagged.
    pub u_turn_threshold_meters_per_minute: f64,
    /// Value stored for pairs whose lookup failed.
    pub unknown_duration: Minutes,
    pub max_concurrent_lookups: usize,
}

impl Default for MatrixParams {
    fn default() -> Self {
        Self {
            u_turn_penalty_factor: 3.0,
            u_turn_threshold_meters_per_minute: 60.0,
            unknown_duration: UNKNOWN_DURATION,
            max_concurrent_lookups: 8,
        }
    }
}

#[derive(Clone, Debug)]
pub struct OptimizerParams {
    pub matrix: MatrixParams,
    /// Arc cost used instead of the travel time when a leg exceeds the per-leg limit.
    pub long_leg_penalty: i64,
    pub search: SearchParameters,
    /// Fetch road geometry for every leg of the final routes.
    pub with_geometry: bool,
}

impl Default for OptimizerParams {
    fn default() -> Self {
        Self {
            matrix: MatrixParams::default(),
            long_leg_penalty: 100_000,
            search: SearchParameters {
                first_solution_strategy: FirstSolutionStrategy::PathCheapestArc,
                time_limit: SignedDuration::from_secs(100),
                local_search: true,
            },
            with_geometry: true,
        }
    }
}
