use std::sync::Arc;

use tracing::{Level, instrument, warn};

use crate::{
    problem::{routing_problem::RoutingProblemInstance, virtual_stop::NodeIdx},
    solver::routing_model::RoutingModel,
};

pub const SERVICE_TIME_DIMENSION: &str = "ServiceTime";
pub const CAPACITY_DIMENSION: &str = "Capacity";

/// Declares the routing model of a problem instance.
///
/// - arc cost: free when leaving the depot, otherwise the travel time, or
///   `long_leg_penalty` for a leg between two stops longer than the per-leg limit;
/// - service time: travel time accumulated from the first stop, bounded by the
///   service window;
/// - capacity: passengers on board when arriving at each stop, bounded by the vehicle
///   capacity up to the closing depot.
#[instrument(skip_all, level = Level::DEBUG)]
pub fn build_routing_model(problem: &RoutingProblemInstance, long_leg_penalty: i64) -> RoutingModel {
    let depot = problem.depot();
    let mut model = RoutingModel::new(problem.node_count(), problem.vehicle_count(), depot);

    let matrix = Arc::clone(problem.time_matrix());
    let per_leg_time_limit = problem.per_leg_time_limit();
    model.set_arc_cost_evaluator(move |from, to| {
        if from == depot {
            return 0;
        }

        let minutes = matrix.get(from, to);
        if to != depot && minutes > per_leg_time_limit {
            long_leg_penalty
        } else {
            minutes
        }
    });

    let matrix = Arc::clone(problem.time_matrix());
    model.add_dimension(
        SERVICE_TIME_DIMENSION,
        move |from, to| {
            if from == depot {
                0
            } else {
                matrix.get(from, to)
            }
        },
        problem.max_service_time(),
    );

    let demands = problem.demands();
    model.add_unary_dimension_with_vehicle_capacity(
        CAPACITY_DIMENSION,
        move |node| demands[node.get()],
        problem.vehicle_capacities().to_vec(),
    );

    model
}

/// Stops that cannot reach the depot within the service window even when
/// visited last. Logged as warnings, the solve still runs.
pub fn precheck_service_window(problem: &RoutingProblemInstance) -> Vec<NodeIdx> {
    let depot = problem.depot();
    let max_service_time = problem.max_service_time();

    (0..problem.node_count())
        .map(NodeIdx::new)
        .filter(|&node| node != depot)
        .filter(|&node| {
            let to_depot = problem.travel_time(node, depot);
            if to_depot > max_service_time {
                warn!(
                    "Stop {} ({}) needs {} min to reach the depot, above the {} min service window",
                    problem.stop(node).name(),
                    problem.stop(node).key(),
                    to_depot,
                    max_service_time
                );
                true
            } else {
                false
            }
        })
        .collect()
}
