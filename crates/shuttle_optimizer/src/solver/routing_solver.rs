use crate::solver::{
    assignment::Assignment, routing_model::RoutingModel, search_parameters::SearchParameters,
    solver_error::SolverError,
};

/// Anything able to turn a declarative routing model into an assignment.
pub trait RoutingSolver: Send + Sync {
    fn solve(
        &self,
        model: &RoutingModel,
        params: &SearchParameters,
    ) -> Result<Assignment, SolverError>;
}
