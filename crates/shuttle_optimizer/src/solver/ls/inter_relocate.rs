use crate::{
    problem::virtual_stop::NodeIdx,
    solver::{
        ls::r#move::{LocalSearchOperator, RoutePair},
        working_routes::WorkingRoutes,
    },
};

/// **Inter-Route Relocate**
///
/// Moves the node at `from` in `from_route` right before the node at `to` in
/// `to_route`.
///
/// ```text
/// BEFORE:
///    R1: ... (A) -> [from] -> (C) ...
///    R2: ... (X) -> (Y) ...
///
/// AFTER:
///    R1: ... (A) -> (C) ...
///    R2: ... (X) -> [from] -> (Y) ...
/// ```
#[derive(Debug)]
pub(crate) struct InterRelocateOperator {
    from_route: usize,
    from: usize,
    to_route: usize,
    to: usize,
}

impl InterRelocateOperator {
    pub fn new(from_route: usize, from: usize, to_route: usize, to: usize) -> Self {
        debug_assert!(from_route != to_route);
        Self {
            from_route,
            from,
            to_route,
            to,
        }
    }

    fn candidates(&self, routes: &WorkingRoutes) -> (Vec<NodeIdx>, Vec<NodeIdx>) {
        let mut source = routes.route(self.from_route).to_vec();
        let node = source.remove(self.from);
        let mut target = routes.route(self.to_route).to_vec();
        target.insert(self.to, node);
        (source, target)
    }
}

impl LocalSearchOperator for InterRelocateOperator {
    fn generate_moves<C>(routes: &WorkingRoutes, (r1, r2): RoutePair, mut consumer: C)
    where
        C: FnMut(Self),
    {
        if r1 == r2 {
            return;
        }

        let source_len = routes.route(r1).len();
        let target_len = routes.route(r2).len();
        for from in 1..source_len - 1 {
            for to in 1..target_len {
                consumer(Self::new(r1, from, r2, to));
            }
        }
    }

    fn transport_cost_delta(&self, routes: &WorkingRoutes) -> i64 {
        let source = routes.route(self.from_route);
        let target = routes.route(self.to_route);
        let (a, node, c) = (source[self.from - 1], source[self.from], source[self.from + 1]);
        let (x, y) = (target[self.to - 1], target[self.to]);

        routes.arc_cost(a, c) - routes.arc_cost(a, node) - routes.arc_cost(node, c)
            + routes.arc_cost(x, node)
            + routes.arc_cost(node, y)
            - routes.arc_cost(x, y)
    }

    fn is_valid(&self, routes: &WorkingRoutes) -> bool {
        let (source, target) = self.candidates(routes);
        routes.is_feasible(self.from_route, &source) && routes.is_feasible(self.to_route, &target)
    }

    fn apply(&self, routes: &mut WorkingRoutes) {
        let (source, target) = self.candidates(routes);
        *routes.route_mut(self.from_route) = source;
        *routes.route_mut(self.to_route) = target;
    }

    fn updated_routes(&self) -> Vec<usize> {
        vec![self.from_route, self.to_route]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_model, nodes};

    #[test]
    fn test_delta_matches_recomputed_cost() {
        let model = create_test_model(6, 3, 100);
        let visits = vec![nodes(&[1, 2, 3]), nodes(&[4, 5]), vec![]];
        let routes = WorkingRoutes::from_visits(&model, visits.clone());
        let before = routes.total_cost();

        for pair in [(0, 1), (1, 0), (0, 2)] {
            InterRelocateOperator::generate_moves(&routes, pair, |op| {
                let mut after = WorkingRoutes::from_visits(&model, visits.clone());
                let delta = op.transport_cost_delta(&routes);
                op.apply(&mut after);
                assert_eq!(after.total_cost() - before, delta, "{op:?}");
            });
        }
    }

    #[test]
    fn test_apply_into_empty_route() {
        let model = create_test_model(4, 2, 100);
        let mut routes = WorkingRoutes::from_visits(&model, vec![nodes(&[1, 2, 3])]);

        InterRelocateOperator::new(0, 2, 1, 1).apply(&mut routes);

        assert_eq!(routes.route(0), nodes(&[0, 1, 3, 0]));
        assert_eq!(routes.route(1), nodes(&[0, 2, 0]));
    }

    #[test]
    fn test_capacity_makes_move_invalid() {
        // Every node has demand 1.
        let model = create_test_model(5, 2, 2);
        let routes = WorkingRoutes::from_visits(&model, vec![nodes(&[1, 2]), nodes(&[3, 4])]);

        assert!(!InterRelocateOperator::new(0, 1, 1, 1).is_valid(&routes));
    }
}
