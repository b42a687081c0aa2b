use crate::{
    problem::virtual_stop::NodeIdx,
    solver::{
        ls::r#move::{LocalSearchOperator, RoutePair},
        working_routes::WorkingRoutes,
    },
};

/// **Inter-Route Swap**
///
/// Exchanges the node at `first` in `first_route` with the node at `second`
/// in `second_route`.
///
/// ```text
/// BEFORE:
///    R1: ... (A) -> [F] -> (C) ...
///    R2: ... (X) -> [G] -> (Y) ...
///
/// AFTER:
///    R1: ... (A) -> [G] -> (C) ...
///    R2: ... (X) -> [F] -> (Y) ...
/// ```
#[derive(Debug)]
pub(crate) struct InterSwapOperator {
    first_route: usize,
    first: usize,
    second_route: usize,
    second: usize,
}

impl InterSwapOperator {
    pub fn new(first_route: usize, first: usize, second_route: usize, second: usize) -> Self {
        debug_assert!(first_route != second_route);
        Self {
            first_route,
            first,
            second_route,
            second,
        }
    }

    fn candidates(&self, routes: &WorkingRoutes) -> (Vec<NodeIdx>, Vec<NodeIdx>) {
        let mut first = routes.route(self.first_route).to_vec();
        let mut second = routes.route(self.second_route).to_vec();
        std::mem::swap(&mut first[self.first], &mut second[self.second]);
        (first, second)
    }
}

impl LocalSearchOperator for InterSwapOperator {
    fn generate_moves<C>(routes: &WorkingRoutes, (r1, r2): RoutePair, mut consumer: C)
    where
        C: FnMut(Self),
    {
        // Each unordered pair of routes is enough.
        if r1 >= r2 {
            return;
        }

        let first_len = routes.route(r1).len();
        let second_len = routes.route(r2).len();
        for first in 1..first_len - 1 {
            for second in 1..second_len - 1 {
                consumer(Self::new(r1, first, r2, second));
            }
        }
    }

    fn transport_cost_delta(&self, routes: &WorkingRoutes) -> i64 {
        let r1 = routes.route(self.first_route);
        let r2 = routes.route(self.second_route);
        let (a, f, c) = (r1[self.first - 1], r1[self.first], r1[self.first + 1]);
        let (x, g, y) = (r2[self.second - 1], r2[self.second], r2[self.second + 1]);

        let first_delta = routes.arc_cost(a, g) + routes.arc_cost(g, c)
            - routes.arc_cost(a, f)
            - routes.arc_cost(f, c);
        let second_delta = routes.arc_cost(x, f) + routes.arc_cost(f, y)
            - routes.arc_cost(x, g)
            - routes.arc_cost(g, y);

        first_delta + second_delta
    }

    fn is_valid(&self, routes: &WorkingRoutes) -> bool {
        let (first, second) = self.candidates(routes);
        routes.is_feasible(self.first_route, &first)
            && routes.is_feasible(self.second_route, &second)
    }

    fn apply(&self, routes: &mut WorkingRoutes) {
        let (first, second) = self.candidates(routes);
        *routes.route_mut(self.first_route) = first;
        *routes.route_mut(self.second_route) = second;
    }

    fn updated_routes(&self) -> Vec<usize> {
        vec![self.first_route, self.second_route]
    }
}
