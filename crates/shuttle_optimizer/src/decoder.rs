use shuttle_matrix_providers::duration_provider::Minutes;
use tracing::{Level, debug, instrument};

use crate::{
    model::route_model_builder::{CAPACITY_DIMENSION, SERVICE_TIME_DIMENSION},
    problem::{routing_problem::RoutingProblemInstance, virtual_stop::NodeIdx},
    solution::{
        itinerary::{Itinerary, schedule_routes},
        route_solution::RouteSolution,
    },
    solver::{assignment::Assignment, routing_model::RoutingModel},
};

/// Itineraries of the used vehicles, in vehicle order.
///
/// Travel is the service-time transit of each arc: nothing out of the depot,
/// the matrix duration otherwise. Loads come from the capacity dimension: the
/// passengers on board when the bus reaches each stop.
pub fn decode_itineraries(
    assignment: &Assignment,
    problem: &RoutingProblemInstance,
    model: &RoutingModel,
) -> Vec<Itinerary> {
    let service_time = model.dimension_index(SERVICE_TIME_DIMENSION);
    let capacity = model.dimension_index(CAPACITY_DIMENSION);
    let depot = problem.depot();

    (0..assignment.vehicle_count())
        .filter(|&vehicle| assignment.is_vehicle_used(vehicle))
        .map(|vehicle| {
            let route = assignment.route(vehicle);
            let mut itinerary = Itinerary::new(problem.stop(depot).clone());

            let cumul = |dimension: Option<usize>, position: usize| {
                dimension.map_or(0, |dimension| assignment.cumul(dimension, vehicle, position))
            };
            let travel = |position: usize| match service_time {
                Some(dimension) => {
                    assignment.cumul(dimension, vehicle, position)
                        - assignment.cumul(dimension, vehicle, position - 1)
                }
                None => leg_travel(problem, route[position - 1], route[position]),
            };

            let last = route.len() - 1;
            for position in 1..last {
                itinerary.push_visit(
                    problem.stop(route[position]).clone(),
                    travel(position),
                    cumul(capacity, position),
                );
            }
            itinerary.set_return(travel(last), cumul(capacity, last));

            debug!(
                "Vehicle {}: {} stops, {} min, load {}",
                vehicle,
                itinerary.visits().len(),
                itinerary.total_duration(),
                itinerary.final_load()
            );

            itinerary
        })
        .collect()
}

fn leg_travel(problem: &RoutingProblemInstance, from: NodeIdx, to: NodeIdx) -> Minutes {
    if problem.is_depot(from) {
        0
    } else {
        problem.travel_time(from, to)
    }
}

/// Turns an assignment into timed bus routes arriving at the depot at `deadline`.
#[instrument(skip_all, level = Level::DEBUG)]
pub fn decode_assignment(
    assignment: &Assignment,
    problem: &RoutingProblemInstance,
    model: &RoutingModel,
    deadline: Minutes,
) -> RouteSolution {
    let itineraries = decode_itineraries(assignment, problem, model);
    let mut solution = schedule_routes(itineraries, deadline);
    solution.objective = Some(assignment.objective());
    solution
}
