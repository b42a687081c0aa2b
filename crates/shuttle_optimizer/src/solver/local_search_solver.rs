use tracing::{Level, info, instrument};

use crate::{
    solver::{
        assignment::Assignment,
        construction::construct_solution,
        ls::local_search::LocalSearch,
        routing_model::RoutingModel,
        routing_solver::RoutingSolver,
        search_parameters::SearchParameters,
        solver_error::SolverError,
        working_routes::{SearchClock, WorkingRoutes},
    },
    timer_debug,
};

/// First-solution heuristic followed by a local-search descent, within the
/// wall-clock budget of the search parameters.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalSearchSolver;

impl RoutingSolver for LocalSearchSolver {
    #[instrument(skip_all, level = Level::DEBUG)]
    fn solve(
        &self,
        model: &RoutingModel,
        params: &SearchParameters,
    ) -> Result<Assignment, SolverError> {
        model.validate()?;

        let clock = SearchClock::start(params.time_limit);

        let visits = timer_debug!(
            "First solution",
            construct_solution(model, params.first_solution_strategy, &clock)
        )?;

        let mut routes = WorkingRoutes::from_visits(model, visits);
        let initial_cost = routes.total_cost();

        if params.local_search {
            let moves = timer_debug!(
                "Local search",
                LocalSearch::new().descend(&mut routes, &clock)
            );

            info!(
                "Solved in {:?}: cost {} -> {} after {} moves",
                clock.elapsed(),
                initial_cost,
                routes.total_cost(),
                moves
            );
        } else {
            info!("Solved in {:?}: cost {}", clock.elapsed(), initial_cost);
        }

        Ok(Assignment::from_routes(model, routes.into_visits()))
    }
}
