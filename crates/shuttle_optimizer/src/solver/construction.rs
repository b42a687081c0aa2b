use tracing::{debug, warn};

use crate::{
    problem::virtual_stop::NodeIdx,
    solver::{
        routing_model::RoutingModel, search_parameters::FirstSolutionStrategy,
        solver_error::SolverError, working_routes::SearchClock,
    },
};

/// Partial first solution: the visited nodes of every vehicle and the nodes
/// no vehicle could take.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Construction {
    pub visits: Vec<Vec<NodeIdx>>,
    pub unrouted: Vec<NodeIdx>,
}

/// Builds a first solution with `strategy`. When nodes are left over, the
/// other strategy is tried and the better partial solution is repaired by
/// ejecting and reinserting nodes until everything is routed or the clock
/// runs out.
pub(crate) fn construct_solution(
    model: &RoutingModel,
    strategy: FirstSolutionStrategy,
    clock: &SearchClock,
) -> Result<Vec<Vec<NodeIdx>>, SolverError> {
    let mut construction = run_strategy(model, strategy, clock)?;

    if !construction.unrouted.is_empty() {
        let fallback = match strategy {
            FirstSolutionStrategy::PathCheapestArc => FirstSolutionStrategy::CheapestInsertion,
            FirstSolutionStrategy::CheapestInsertion => FirstSolutionStrategy::PathCheapestArc,
        };
        debug!(
            "{:?} left {} nodes unrouted, trying {:?}",
            strategy,
            construction.unrouted.len(),
            fallback
        );

        let other = run_strategy(model, fallback, clock)?;
        if other.unrouted.len() < construction.unrouted.len() {
            construction = other;
        }
    }

    if !construction.unrouted.is_empty() {
        repair(model, &mut construction, clock)?;
    }

    if !construction.unrouted.is_empty() {
        warn!("{} nodes could not be routed", construction.unrouted.len());
        return Err(SolverError::Infeasible {
            unassigned: construction.unrouted.len(),
        });
    }

    Ok(construction.visits)
}

fn run_strategy(
    model: &RoutingModel,
    strategy: FirstSolutionStrategy,
    clock: &SearchClock,
) -> Result<Construction, SolverError> {
    match strategy {
        FirstSolutionStrategy::PathCheapestArc => path_cheapest_arc(model, clock),
        FirstSolutionStrategy::CheapestInsertion => cheapest_insertion(model, clock),
    }
}

/// Opens vehicles one at a time and keeps extending the current route with
/// the cheapest arc from its last node, as long as the route can still be
/// closed at the depot within every dimension bound. Ties go to the lowest node.
fn path_cheapest_arc(model: &RoutingModel, clock: &SearchClock) -> Result<Construction, SolverError> {
    let depot = model.depot();
    let dimensions = model.dimensions();
    let mut unrouted = vec![true; model.node_count()];
    unrouted[depot.get()] = false;
    let mut remaining = model.node_count() - 1;

    let mut visits = vec![Vec::new(); model.vehicle_count()];

    for (vehicle, route) in visits.iter_mut().enumerate() {
        if remaining == 0 {
            break;
        }

        if clock.is_expired() {
            return Err(SolverError::TimeLimit(clock.limit()));
        }

        let mut last = depot;
        let mut cumuls = vec![0; dimensions.len()];

        loop {
            let mut best: Option<(i64, NodeIdx, Vec<i64>)> = None;

            for node in model.nodes().filter(|node| unrouted[node.get()]) {
                let cost = model.arc_cost(last, node);
                if best.as_ref().is_some_and(|(best_cost, _, _)| cost >= *best_cost) {
                    continue;
                }

                let next_cumuls: Vec<i64> = dimensions
                    .iter()
                    .zip(&cumuls)
                    .map(|(dimension, cumul)| cumul + dimension.transit(last, node))
                    .collect();

                let fits = dimensions.iter().zip(&next_cumuls).all(|(dimension, &cumul)| {
                    let capacity = dimension.capacity(vehicle);
                    cumul <= capacity && cumul + dimension.transit(node, depot) <= capacity
                });

                if fits {
                    best = Some((cost, node, next_cumuls));
                }
            }

            let Some((_, node, next_cumuls)) = best else {
                break;
            };

            route.push(node);
            unrouted[node.get()] = false;
            remaining -= 1;
            last = node;
            cumuls = next_cumuls;
        }

        debug!("Vehicle {} opened with {} nodes", vehicle, route.len());
    }

    let unrouted: Vec<NodeIdx> = model.nodes().filter(|node| unrouted[node.get()]).collect();
    if !unrouted.is_empty() {
        debug!("{} nodes left unrouted by path cheapest arc", unrouted.len());
    }

    Ok(Construction { visits, unrouted })
}

/// Inserts nodes one by one, hardest first (longest way back to the depot),
/// at the position of least added cost among the open routes and one unused
/// vehicle.
fn cheapest_insertion(model: &RoutingModel, clock: &SearchClock) -> Result<Construction, SolverError> {
    let depot = model.depot();
    let mut nodes: Vec<NodeIdx> = model.nodes().collect();
    nodes.sort_by_key(|&node| std::cmp::Reverse(model.arc_cost(node, depot)));

    let mut routes: Vec<Vec<NodeIdx>> = vec![vec![depot, depot]; model.vehicle_count()];
    let mut unrouted = Vec::new();

    for node in nodes {
        if clock.is_expired() {
            return Err(SolverError::TimeLimit(clock.limit()));
        }

        let first_unused = routes.iter().position(|route| route.len() == 2);
        let best = best_insertion(model, &routes, node, |vehicle, route| {
            route.len() > 2 || Some(vehicle) == first_unused
        });

        match best {
            Some(insertion) => routes[insertion.vehicle].insert(insertion.position, node),
            None => unrouted.push(node),
        }
    }

    if !unrouted.is_empty() {
        debug!("{} nodes left unrouted by cheapest insertion", unrouted.len());
    }

    Ok(Construction {
        visits: open_routes(routes),
        unrouted,
    })
}

/// Routes every unrouted node it can: directly at its cheapest feasible
/// position, or by ejecting one routed node to make room and reinserting the
/// ejected node in another vehicle.
fn repair(
    model: &RoutingModel,
    construction: &mut Construction,
    clock: &SearchClock,
) -> Result<(), SolverError> {
    let mut routes = closed_routes(model, &construction.visits);
    let mut progress = true;

    while progress && !construction.unrouted.is_empty() {
        progress = false;

        let mut index = 0;
        while index < construction.unrouted.len() {
            if clock.is_expired() {
                construction.visits = open_routes(routes);
                return Err(SolverError::TimeLimit(clock.limit()));
            }

            let node = construction.unrouted[index];
            if let Some(insertion) = best_insertion(model, &routes, node, |_, _| true) {
                routes[insertion.vehicle].insert(insertion.position, node);
            } else if let Some(repaired) = eject_and_insert(model, &routes, node) {
                routes = repaired;
            } else {
                index += 1;
                continue;
            }

            debug!("Repaired node {}", node);
            construction.unrouted.swap_remove(index);
            progress = true;
        }
    }

    construction.visits = open_routes(routes);
    Ok(())
}

/// Tries every routed node as the one making room for `node`. Keeps the
/// cheapest pair of insertions.
fn eject_and_insert(
    model: &RoutingModel,
    routes: &[Vec<NodeIdx>],
    node: NodeIdx,
) -> Option<Vec<Vec<NodeIdx>>> {
    let mut best: Option<(i64, Vec<Vec<NodeIdx>>)> = None;

    for (vehicle, route) in routes.iter().enumerate() {
        for position in 1..route.len() - 1 {
            let mut candidate = routes.to_vec();
            let ejected = candidate[vehicle].remove(position);

            let Some(first) =
                best_insertion(model, &candidate, node, |other, _| other == vehicle)
            else {
                continue;
            };
            candidate[vehicle].insert(first.position, node);

            let Some(second) =
                best_insertion(model, &candidate, ejected, |other, _| other != vehicle)
            else {
                continue;
            };
            candidate[second.vehicle].insert(second.position, ejected);

            let cost: i64 = candidate.iter().map(|route| model.route_cost(route)).sum();
            if best.as_ref().is_none_or(|(best_cost, _)| cost < *best_cost) {
                best = Some((cost, candidate));
            }
        }
    }

    best.map(|(_, routes)| routes)
}

#[derive(Debug, Clone, Copy)]
struct Insertion {
    delta: i64,
    vehicle: usize,
    position: usize,
}

/// Cheapest feasible position for `node` among the routes `allowed` accepts.
/// Ties go to the first vehicle and position.
fn best_insertion(
    model: &RoutingModel,
    routes: &[Vec<NodeIdx>],
    node: NodeIdx,
    allowed: impl Fn(usize, &[NodeIdx]) -> bool,
) -> Option<Insertion> {
    let mut best: Option<Insertion> = None;

    for (vehicle, route) in routes.iter().enumerate() {
        if !allowed(vehicle, route) {
            continue;
        }

        for position in 1..route.len() {
            let (before, after) = (route[position - 1], route[position]);
            let delta = model.arc_cost(before, node) + model.arc_cost(node, after)
                - model.arc_cost(before, after);

            if best.is_some_and(|best| delta >= best.delta) {
                continue;
            }

            let mut candidate = route.clone();
            candidate.insert(position, node);
            if model.is_feasible(vehicle, &candidate) {
                best = Some(Insertion {
                    delta,
                    vehicle,
                    position,
                });
            }
        }
    }

    best
}

fn closed_routes(model: &RoutingModel, visits: &[Vec<NodeIdx>]) -> Vec<Vec<NodeIdx>> {
    let depot = model.depot();
    visits
        .iter()
        .map(|visits| {
            std::iter::once(depot)
                .chain(visits.iter().copied())
                .chain(std::iter::once(depot))
                .collect()
        })
        .collect()
}

fn open_routes(routes: Vec<Vec<NodeIdx>>) -> Vec<Vec<NodeIdx>> {
    routes
        .into_iter()
        .map(|route| route[1..route.len() - 1].to_vec())
        .collect()
}
