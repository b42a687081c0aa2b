use jiff::{SignedDuration, Timestamp};

use crate::{problem::virtual_stop::NodeIdx, solver::routing_model::RoutingModel};

/// Mutable routes during search. Every route is a full `[depot, .., depot]`
/// sequence, `[depot, depot]` when the vehicle is unused.
pub(crate) struct WorkingRoutes<'a> {
    model: &'a RoutingModel,
    routes: Vec<Vec<NodeIdx>>,
}

impl<'a> WorkingRoutes<'a> {
    pub fn from_visits(model: &'a RoutingModel, visits: Vec<Vec<NodeIdx>>) -> Self {
        let depot = model.depot();
        let mut routes: Vec<Vec<NodeIdx>> = visits
            .into_iter()
            .map(|nodes| {
                let mut route = Vec::with_capacity(nodes.len() + 2);
                route.push(depot);
                route.extend(nodes);
                route.push(depot);
                route
            })
            .collect();
        routes.resize(model.vehicle_count(), vec![depot, depot]);

        Self { model, routes }
    }

    pub fn model(&self) -> &RoutingModel {
        self.model
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn route(&self, vehicle: usize) -> &[NodeIdx] {
        &self.routes[vehicle]
    }

    pub fn is_route_empty(&self, vehicle: usize) -> bool {
        self.routes[vehicle].len() <= 2
    }

    #[inline]
    pub fn arc_cost(&self, from: NodeIdx, to: NodeIdx) -> i64 {
        self.model.arc_cost(from, to)
    }

    pub fn total_cost(&self) -> i64 {
        self.routes
            .iter()
            .map(|route| self.model.route_cost(route))
            .sum()
    }

    pub fn is_feasible(&self, vehicle: usize, route: &[NodeIdx]) -> bool {
        self.model.is_feasible(vehicle, route)
    }

    pub fn route_mut(&mut self, vehicle: usize) -> &mut Vec<NodeIdx> {
        &mut self.routes[vehicle]
    }

    /// Visited nodes per vehicle, depot excluded.
    pub fn into_visits(self) -> Vec<Vec<NodeIdx>> {
        self.routes
            .into_iter()
            .map(|route| route[1..route.len() - 1].to_vec())
            .collect()
    }
}

pub(crate) struct SearchClock {
    started: Timestamp,
    limit: SignedDuration,
}

impl SearchClock {
    pub fn start(limit: SignedDuration) -> Self {
        Self {
            started: Timestamp::now(),
            limit,
        }
    }

    pub fn elapsed(&self) -> SignedDuration {
        Timestamp::now().duration_since(self.started)
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed() >= self.limit
    }

    pub fn limit(&self) -> SignedDuration {
        self.limit
    }
}
