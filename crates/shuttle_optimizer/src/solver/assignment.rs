use crate::{problem::virtual_stop::NodeIdx, solver::routing_model::RoutingModel};

/// Solver output: one route per vehicle, cumulative dimension values along
/// each route and the objective.
#[derive(Debug, Clone)]
pub struct Assignment {
    /// Full routes `[depot, .., depot]`, empty for unused vehicles.
    routes: Vec<Vec<NodeIdx>>,
    /// Indexed by dimension, vehicle, then position in the route.
    cumuls: Vec<Vec<Vec<i64>>>,
    objective: i64,
}

impl Assignment {
    /// Builds an assignment from the visited nodes of every vehicle, depot excluded.
    pub fn from_routes(model: &RoutingModel, visits: Vec<Vec<NodeIdx>>) -> Self {
        let depot = model.depot();
        let routes: Vec<Vec<NodeIdx>> = visits
            .into_iter()
            .map(|nodes| {
                if nodes.is_empty() {
                    return nodes;
                }

                let mut route = Vec::with_capacity(nodes.len() + 2);
                route.push(depot);
                route.extend(nodes);
                route.push(depot);
                route
            })
            .collect();

        let cumuls = (0..model.dimensions().len())
            .map(|dimension| {
                routes
                    .iter()
                    .map(|route| model.cumuls(dimension, route))
                    .collect()
            })
            .collect();

        let objective = routes.iter().map(|route| model.route_cost(route)).sum();

        Self {
            routes,
            cumuls,
            objective,
        }
    }

    pub fn vehicle_count(&self) -> usize {
        self.routes.len()
    }

    pub fn route(&self, vehicle: usize) -> &[NodeIdx] {
        &self.routes[vehicle]
    }

    pub fn is_vehicle_used(&self, vehicle: usize) -> bool {
        !self.routes[vehicle].is_empty()
    }

    pub fn used_vehicle_count(&self) -> usize {
        self.routes.iter().filter(|route| !route.is_empty()).count()
    }

    /// Node following `position` in the route of `vehicle`, if any.
    pub fn cumul(&self, dimension: usize, vehicle: usize, position: usize) -> i64 {
        self.cumuls[dimension][vehicle][position]
    }

    pub fn objective(&self) -> i64 {
        self.objective
    }
}
