use crate::solver::{
    ls::{
        inter_relocate::InterRelocateOperator, inter_swap::InterSwapOperator,
        relocate::RelocateOperator, two_opt::TwoOptOperator,
    },
    working_routes::WorkingRoutes,
};

pub(crate) type RoutePair = (usize, usize);

pub(crate) trait LocalSearchOperator: Sized {
    fn generate_moves<C>(routes: &WorkingRoutes, pair: RoutePair, consumer: C)
    where
        C: FnMut(Self);

    fn transport_cost_delta(&self, routes: &WorkingRoutes) -> i64;

    fn is_valid(&self, routes: &WorkingRoutes) -> bool;

    fn apply(&self, routes: &mut WorkingRoutes);

    fn updated_routes(&self) -> Vec<usize>;
}

#[derive(Debug)]
pub(crate) enum LocalSearchMove {
    /// Moves one node to another position of the same route.
    Relocate(RelocateOperator),
    /// Reverses a segment of a route.
    TwoOpt(TwoOptOperator),
    /// Moves one node to another route.
    InterRelocate(InterRelocateOperator),
    /// Exchanges two nodes of different routes.
    InterSwap(InterSwapOperator),
}

impl LocalSearchMove {
    pub fn operator_name(&self) -> &'static str {
        match self {
            LocalSearchMove::Relocate(_) => "Relocate",
            LocalSearchMove::TwoOpt(_) => "TwoOpt",
            LocalSearchMove::InterRelocate(_) => "InterRelocate",
            LocalSearchMove::InterSwap(_) => "InterSwap",
        }
    }

    pub fn apply(&self, routes: &mut WorkingRoutes) {
        match self {
            LocalSearchMove::Relocate(op) => op.apply(routes),
            LocalSearchMove::TwoOpt(op) => op.apply(routes),
            LocalSearchMove::InterRelocate(op) => op.apply(routes),
            LocalSearchMove::InterSwap(op) => op.apply(routes),
        }
    }

    pub fn updated_routes(&self) -> Vec<usize> {
        match self {
            LocalSearchMove::Relocate(op) => op.updated_routes(),
            LocalSearchMove::TwoOpt(op) => op.updated_routes(),
            LocalSearchMove::InterRelocate(op) => op.updated_routes(),
            LocalSearchMove::InterSwap(op) => op.updated_routes(),
        }
    }
}
