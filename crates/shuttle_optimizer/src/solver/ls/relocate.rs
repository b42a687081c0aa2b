use crate::solver::{
    ls::r#move::{LocalSearchOperator, RoutePair},
    working_routes::WorkingRoutes,
};

/// **Intra-Route Relocate**
///
/// Moves the node at `from` so that it sits right before the node currently
/// at `to`.
///
/// ```text
/// BEFORE:
///    Route: ... (A) -> [from] -> (C) ... (X) -> (Y) ...
///
/// AFTER:
///    Route: ... (A) -> (C) ... (X) -> [from] -> (Y) ...
/// ```
#[derive(Debug)]
pub(crate) struct RelocateOperator {
    route: usize,
    from: usize,
    to: usize,
}

impl RelocateOperator {
    pub fn new(route: usize, from: usize, to: usize) -> Self {
        debug_assert!(from != to && from + 1 != to);
        Self { route, from, to }
    }

    fn relocated(&self, routes: &WorkingRoutes) -> Vec<crate::problem::virtual_stop::NodeIdx> {
        let mut route = routes.route(self.route).to_vec();
        let node = route.remove(self.from);
        let insert_at = if self.to > self.from {
            self.to - 1
        } else {
            self.to
        };
        route.insert(insert_at, node);
        route
    }
}

impl LocalSearchOperator for RelocateOperator {
    fn generate_moves<C>(routes: &WorkingRoutes, (r1, r2): RoutePair, mut consumer: C)
    where
        C: FnMut(Self),
    {
        if r1 != r2 {
            return;
        }

        let len = routes.route(r1).len();
        for from in 1..len - 1 {
            for to in 1..len {
                if to != from && to != from + 1 {
                    consumer(Self::new(r1, from, to));
                }
            }
        }
    }

    fn transport_cost_delta(&self, routes: &WorkingRoutes) -> i64 {
        let route = routes.route(self.route);
        let (a, node, c) = (route[self.from - 1], route[self.from], route[self.from + 1]);
        let (x, y) = (route[self.to - 1], route[self.to]);

        routes.arc_cost(a, c) - routes.arc_cost(a, node) - routes.arc_cost(node, c)
            + routes.arc_cost(x, node)
            + routes.arc_cost(node, y)
            - routes.arc_cost(x, y)
    }

    fn is_valid(&self, routes: &WorkingRoutes) -> bool {
        routes.is_feasible(self.route, &self.relocated(routes))
    }

    fn apply(&self, routes: &mut WorkingRoutes) {
        let relocated = self.relocated(routes);
        *routes.route_mut(self.route) = relocated;
    }

    fn updated_routes(&self) -> Vec<usize> {
        vec![self.route]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_model, nodes};

    #[test]
    fn test_delta_matches_recomputed_cost() {
        let model = create_test_model(5, 1, 100);
        let routes = WorkingRoutes::from_visits(&model, vec![nodes(&[1, 2, 3, 4])]);
        let before = routes.total_cost();

        let mut checked = 0;
        RelocateOperator::generate_moves(&routes, (0, 0), |op| {
            let mut after = WorkingRoutes::from_visits(&model, vec![nodes(&[1, 2, 3, 4])]);
            let delta = op.transport_cost_delta(&routes);
            op.apply(&mut after);
            assert_eq!(after.total_cost() - before, delta, "{op:?}");
            checked += 1;
        });

        assert!(checked > 0);
    }

    #[test]
    fn test_apply_forward_and_backward() {
        let model = create_test_model(5, 1, 100);
        let mut routes = WorkingRoutes::from_visits(&model, vec![nodes(&[1, 2, 3, 4])]);

        RelocateOperator::new(0, 1, 4).apply(&mut routes);
        assert_eq!(routes.route(0), nodes(&[0, 2, 3, 1, 4, 0]));

        RelocateOperator::new(0, 3, 1).apply(&mut routes);
        assert_eq!(routes.route(0), nodes(&[0, 1, 2, 3, 4, 0]));
    }
}
