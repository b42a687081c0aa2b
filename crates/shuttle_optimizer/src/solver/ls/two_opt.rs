use crate::{
    problem::virtual_stop::NodeIdx,
    solver::{
        ls::r#move::{LocalSearchOperator, RoutePair},
        working_routes::WorkingRoutes,
    },
};

/// **Intra-Route 2-Opt**
///
/// Reverses the segment between positions `start` and `end`, both included.
///
/// ```text
/// BEFORE: (A) -> [B -> C -> D] -> (E)
/// AFTER:  (A) -> [D -> C -> B] -> (E)
/// ```
///
/// Arc costs are not symmetric, so the cost of the reversed segment is
/// recomputed.
#[derive(Debug)]
pub(crate) struct TwoOptOperator {
    route: usize,
    start: usize,
    end: usize,
}

impl TwoOptOperator {
    pub fn new(route: usize, start: usize, end: usize) -> Self {
        debug_assert!(start < end);
        Self { route, start, end }
    }

    fn reversed(&self, routes: &WorkingRoutes) -> Vec<NodeIdx> {
        let mut route = routes.route(self.route).to_vec();
        route[self.start..=self.end].reverse();
        route
    }
}

impl LocalSearchOperator for TwoOptOperator {
    fn generate_moves<C>(routes: &WorkingRoutes, (r1, r2): RoutePair, mut consumer: C)
    where
        C: FnMut(Self),
    {
        if r1 != r2 {
            return;
        }

        let len = routes.route(r1).len();
        for start in 1..len.saturating_sub(2) {
            for end in start + 1..len - 1 {
                consumer(Self::new(r1, start, end));
            }
        }
    }

    fn transport_cost_delta(&self, routes: &WorkingRoutes) -> i64 {
        let route = routes.route(self.route);
        let (before, after) = (route[self.start - 1], route[self.end + 1]);
        let (first, last) = (route[self.start], route[self.end]);

        let mut delta = routes.arc_cost(before, last) + routes.arc_cost(first, after)
            - routes.arc_cost(before, first)
            - routes.arc_cost(last, after);

        for position in self.start..self.end {
            let (a, b) = (route[position], route[position + 1]);
            delta += routes.arc_cost(b, a) - routes.arc_cost(a, b);
        }

        delta
    }

    fn is_valid(&self, routes: &WorkingRoutes) -> bool {
        routes.is_feasible(self.route, &self.reversed(routes))
    }

    fn apply(&self, routes: &mut WorkingRoutes) {
        routes.route_mut(self.route)[self.start..=self.end].reverse();
    }

    fn updated_routes(&self) -> Vec<usize> {
        vec![self.route]
    }
}
