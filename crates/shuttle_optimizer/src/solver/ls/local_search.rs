use tracing::{debug, instrument};

use crate::solver::{
    ls::{
        inter_relocate::InterRelocateOperator,
        inter_swap::InterSwapOperator,
        r#move::{LocalSearchMove, LocalSearchOperator, RoutePair},
        relocate::RelocateOperator,
        two_opt::TwoOptOperator,
    },
    working_routes::{SearchClock, WorkingRoutes},
};

/// Best-improvement descent over all route pairs.
pub(crate) struct LocalSearch {
    pairs: Vec<RoutePair>,
}

impl LocalSearch {
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Applies improving moves until none is left or the clock expires.
    /// Returns the number of applied moves.
    #[instrument(skip_all, level = "debug")]
    pub fn descend(&mut self, routes: &mut WorkingRoutes, clock: &SearchClock) -> usize {
        let mut applied = 0;

        loop {
            if clock.is_expired() {
                debug!("Local search stopped by the time limit after {applied} moves");
                break;
            }

            self.build_pairs(routes);

            let Some((best_move, delta)) = self.find_best_move(routes, clock) else {
                break;
            };

            debug!(
                "{} on routes {:?}: {}",
                best_move.operator_name(),
                best_move.updated_routes(),
                delta
            );
            best_move.apply(routes);
            applied += 1;
        }

        applied
    }

    /// Pairs between every used route, plus one unused route as a target.
    fn build_pairs(&mut self, routes: &WorkingRoutes) {
        self.pairs.clear();

        let mut candidates: Vec<usize> = (0..routes.len())
            .filter(|&vehicle| !routes.is_route_empty(vehicle))
            .collect();
        let used = candidates.len();
        if let Some(unused) = (0..routes.len()).find(|&vehicle| routes.is_route_empty(vehicle)) {
            candidates.push(unused);
        }

        for &r1 in &candidates[..used] {
            for &r2 in &candidates {
                self.pairs.push((r1, r2));
            }
        }
    }

    fn find_best_move(
        &self,
        routes: &WorkingRoutes,
        clock: &SearchClock,
    ) -> Option<(LocalSearchMove, i64)> {
        let mut best_delta = 0;
        let mut best_move: Option<LocalSearchMove> = None;

        for &pair in &self.pairs {
            if clock.is_expired() {
                return None;
            }

            RelocateOperator::generate_moves(routes, pair, |op| {
                let delta = op.transport_cost_delta(routes);
                if delta < best_delta && op.is_valid(routes) {
                    best_delta = delta;
                    best_move = Some(LocalSearchMove::Relocate(op));
                }
            });

            TwoOptOperator::generate_moves(routes, pair, |op| {
                let delta = op.transport_cost_delta(routes);
                if delta < best_delta && op.is_valid(routes) {
                    best_delta = delta;
                    best_move = Some(LocalSearchMove::TwoOpt(op));
                }
            });

            InterRelocateOperator::generate_moves(routes, pair, |op| {
                let delta = op.transport_cost_delta(routes);
                if delta < best_delta && op.is_valid(routes) {
                    best_delta = delta;
                    best_move = Some(LocalSearchMove::InterRelocate(op));
                }
            });

            InterSwapOperator::generate_moves(routes, pair, |op| {
                let delta = op.transport_cost_delta(routes);
                if delta < best_delta && op.is_valid(routes) {
                    best_delta = delta;
                    best_move = Some(LocalSearchMove::InterSwap(op));
                }
            });
        }

        best_move.map(|best_move| (best_move, best_delta))
    }
}
