use std::sync::Arc;

use futures::future::join_all;
use shuttle_matrix_providers::{
    cache::DurationCache, duration_provider::DurationProvider, geometry_provider::GeometryProvider,
};
use thiserror::Error;
use tracing::{Level, debug, info, instrument, warn};

use crate::{
    decoder::{decode_assignment, decode_itineraries},
    matrix::matrix_builder::MatrixBuilder,
    model::route_model_builder::{build_routing_model, precheck_service_window},
    params::OptimizerParams,
    problem::{
        configuration_error::ConfigurationError,
        optimization_request::OptimizationRequest,
        routing_problem::{RoutingProblemInstance, RoutingProblemInstanceBuilder},
        stop_data_provider::StopDataProvider,
        virtual_stop::VirtualStop,
    },
    reoptimize::{
        locked_route::{LockedRouteRequest, RouteValidation},
        merger::{dedupe_locked_stops, free_stops, locked_stop_ids, merge_itineraries},
        validator::validate_locked_route,
    },
    solution::route_solution::RouteSolution,
    solver::{
        assignment::Assignment, routing_model::RoutingModel, routing_solver::RoutingSolver,
        solver_error::SolverError,
    },
    timer_debug,
};

#[derive(Debug, Error)]
pub enum OptimizationError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("failed to load stop catalog: {0}")]
    Catalog(anyhow::Error),

    #[error("optimization failed: {0}")]
    Solver(#[from] SolverError),
}

/// Drives matrix building, modeling, solving and decoding for a request.
pub struct RouteOptimizer<C, P, G, S> {
    matrix_builder: MatrixBuilder<C, P>,
    geometry: G,
    solver: S,
    params: OptimizerParams,
}

struct Solved {
    problem: RoutingProblemInstance,
    model: RoutingModel,
    assignment: Assignment,
}

impl<C, P, G, S> RouteOptimizer<C, P, G, S>
where
    C: DurationCache,
    P: DurationProvider,
    G: GeometryProvider,
    S: RoutingSolver,
{
    pub fn new(cache: C, provider: P, geometry: G, solver: S, params: OptimizerParams) -> Self {
        Self {
            matrix_builder: MatrixBuilder::new(cache, provider, params.matrix.clone()),
            geometry,
            solver,
            params,
        }
    }

    /// Solves the whole catalog of `request.source_id`.
    #[instrument(skip_all, level = Level::INFO, fields(source_id = %request.source_id))]
    pub async fn optimize(
        &self,
        catalog: &impl StopDataProvider,
        request: &OptimizationRequest,
    ) -> Result<RouteSolution, OptimizationError> {
        request.validate()?;
        let stops = load_catalog(catalog, request)?;

        self.optimize_stops(stops, request).await
    }

    /// Solves an already split stop list, depot first.
    pub async fn optimize_stops(
        &self,
        stops: Vec<VirtualStop>,
        request: &OptimizationRequest,
    ) -> Result<RouteSolution, OptimizationError> {
        request.validate()?;

        if stops.len() <= 1 {
            info!("No stop besides the depot, nothing to solve");
            return Ok(RouteSolution::empty());
        }

        let solved = self.solve(stops, request).await?;
        let mut solution = decode_assignment(
            &solved.assignment,
            &solved.problem,
            &solved.model,
            request.deadline,
        );

        self.attach_geometry(&mut solution).await;
        info!(
            "Solution uses {} buses, {} passengers",
            solution.used_buses,
            solution.total_load()
        );

        Ok(solution)
    }

    /// Keeps `locked_routes` as given and solves the remaining stops.
    #[instrument(skip_all, level = Level::INFO, fields(source_id = %request.source_id))]
    pub async fn reoptimize(
        &self,
        catalog: &impl StopDataProvider,
        locked_routes: &[LockedRouteRequest],
        request: &OptimizationRequest,
    ) -> Result<RouteSolution, OptimizationError> {
        request.validate()?;
        let all_stops = load_catalog(catalog, request)?;
        let depot_id = all_stops.first().map(VirtualStop::original_id).unwrap_or_default();
        let locked_routes = dedupe_locked_stops(locked_routes, depot_id);

        let locked_ids = locked_stop_ids(&locked_routes);
        let remaining = free_stops(&all_stops, &locked_ids);
        debug!(
            "Catalog has {} stops, {} locked ids {:?}, {} left to solve",
            all_stops.len(),
            locked_ids.len(),
            locked_ids,
            remaining.len().saturating_sub(1)
        );

        let mut locked = Vec::with_capacity(locked_routes.len());
        for route in &locked_routes {
            let validated = validate_locked_route(
                &self.matrix_builder,
                &all_stops,
                route,
                request.capacity,
            )
            .await?;

            if !validated.validation.capacity_ok {
                warn!("Locked bus {}: {}", route.bus_id, validated.validation.message);
            }

            if validated.itinerary.is_empty() {
                warn!("Locked bus {} has no known stop, dropped", route.bus_id);
                continue;
            }

            locked.push(validated.itinerary);
        }

        let solved = if remaining.len() > 1 {
            let solved = self.solve(remaining, request).await?;
            decode_itineraries(&solved.assignment, &solved.problem, &solved.model)
        } else {
            info!("Every stop is locked, skipping the solver");
            Vec::new()
        };

        info!(
            "Merging {} locked and {} new routes",
            locked.len(),
            solved.len()
        );
        let mut solution = merge_itineraries(locked, solved, request.deadline);
        self.attach_geometry(&mut solution).await;

        Ok(solution)
    }

    /// Checks a single hand-edited route against the catalog.
    pub async fn validate(
        &self,
        catalog: &impl StopDataProvider,
        route: &LockedRouteRequest,
        capacity: i64,
        source_id: &str,
    ) -> Result<RouteValidation, OptimizationError> {
        if capacity <= 0 {
            return Err(ConfigurationError::InvalidCapacity(capacity).into());
        }

        let stops = catalog
            .virtual_stops(capacity, source_id)
            .map_err(catalog_error)?;

        let validated = validate_locked_route(&self.matrix_builder, &stops, route, capacity).await?;
        Ok(validated.validation)
    }

    /// Builds and solves the model of `stops`, depot first, at least one stop.
    async fn solve(
        &self,
        stops: Vec<VirtualStop>,
        request: &OptimizationRequest,
    ) -> Result<Solved, OptimizationError> {
        let matrix = timer_debug!("Time matrix", self.matrix_builder.build(&stops).await);

        let mut builder = RoutingProblemInstanceBuilder::default();
        builder
            .set_stops(stops)
            .set_time_matrix(Arc::new(matrix))
            .set_fleet(request.vehicle_count, request.capacity)
            .set_per_leg_time_limit(request.per_leg_time_limit)
            .set_max_service_time(request.max_service_time);
        let problem = builder.build()?;

        let unreachable = precheck_service_window(&problem);
        if !unreachable.is_empty() {
            warn!(
                "{} stops cannot reach the depot within the service window",
                unreachable.len()
            );
        }

        let model = build_routing_model(&problem, self.params.long_leg_penalty);
        info!(
            "Solving {} stops with {} vehicles (limit {:?}, {:?})",
            problem.node_count() - 1,
            problem.vehicle_count(),
            self.params.search.time_limit,
            self.params.search.first_solution_strategy
        );

        let assignment = self.solver.solve(&model, &self.params.search)?;

        Ok(Solved {
            problem,
            model,
            assignment,
        })
    }

    /// Road geometry between consecutive stops of every route. The final
    /// depot arrival is left out.
    async fn attach_geometry(&self, solution: &mut RouteSolution) {
        if !self.params.with_geometry {
            return;
        }

        for route in &mut solution.routes {
            let segments = route
                .stops()
                .windows(2)
                .map(|pair| {
                    self.geometry
                        .detailed_path(pair[0].stop.point(), pair[1].stop.point())
                })
                .collect::<Vec<_>>();

            route.geometry = join_all(segments).await;
        }
    }
}

fn load_catalog(
    catalog: &impl StopDataProvider,
    request: &OptimizationRequest,
) -> Result<Vec<VirtualStop>, OptimizationError> {
    let stops = catalog
        .virtual_stops(request.capacity, &request.source_id)
        .map_err(catalog_error)?;

    if stops.is_empty() {
        return Err(ConfigurationError::EmptyCatalog.into());
    }

    info!(
        "Loaded {} virtual stops from {}",
        stops.len(),
        request.source_id
    );

    Ok(stops)
}

fn catalog_error(error: anyhow::Error) -> OptimizationError {
    match error.downcast::<ConfigurationError>() {
        Ok(configuration) => OptimizationError::Configuration(configuration),
        Err(error) => OptimizationError::Catalog(error),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use jiff::SignedDuration;
    use shuttle_matrix_providers::{cache::InMemoryDurationCache, geometry_provider::NoGeometry};

    use super::*;
    use crate::{
        problem::{
            physical_stop::PhysicalStop, stop_data_provider::InMemoryStopDataProvider,
            stop_key::StopKey,
        },
        solver::local_search_solver::LocalSearchSolver,
        test_utils::CountingProvider,
    };

    type TestOptimizer =
        RouteOptimizer<InMemoryDurationCache, Arc<CountingProvider>, NoGeometry, LocalSearchSolver>;

    fn optimizer(provider: Arc<CountingProvider>) -> TestOptimizer {
        let mut params = OptimizerParams::default();
        params.search.time_limit = SignedDuration::from_secs(5);

        RouteOptimizer::new(
            InMemoryDurationCache::default(),
            provider,
            NoGeometry,
            LocalSearchSolver,
            params,
        )
    }

    fn catalog() -> InMemoryStopDataProvider {
        let mut catalog = InMemoryStopDataProvider::new();
        catalog
            .insert(
                "morning",
                vec![
                    PhysicalStop::new("DEPOT_0", "Plant", 0, 37.50, 127.00),
                    PhysicalStop::new("ST_1", "North gate", 6, 37.52, 127.00),
                    PhysicalStop::new("ST_2", "Station", 6, 37.52, 127.02),
                    PhysicalStop::new("ST_3", "Market", 3, 37.48, 127.02),
                ],
            )
            .insert(
                "empty_line",
                vec![PhysicalStop::new("DEPOT_0", "Plant", 0, 37.50, 127.00)],
            );
        catalog
    }

    fn request(source_id: &str) -> OptimizationRequest {
        OptimizationRequest {
            capacity: 10,
            per_leg_time_limit: 30,
            max_service_time: 90,
            vehicle_count: 3,
            deadline: 480,
            source_id: source_id.to_owned(),
        }
    }

    #[tokio::test]
    async fn test_optimize_serves_every_stop() {
        let optimizer = optimizer(Arc::new(CountingProvider::constant(5)));

        let solution = optimizer.optimize(&catalog(), &request("morning")).await.unwrap();

        assert_eq!(solution.used_buses, solution.routes.len());
        assert!(solution.used_buses >= 2);
        assert_eq!(solution.total_load(), 15);
        assert!(solution.objective.is_some());

        let mut served: Vec<&str> = solution
            .routes
            .iter()
            .flat_map(|route| route.stops().iter().map(|visit| visit.stop.original_id()))
            .collect();
        served.sort();
        assert_eq!(served, vec!["ST_1", "ST_2", "ST_3"]);

        for route in &solution.routes {
            assert!(route.final_load <= 10);
            assert_eq!(route.visits.last().unwrap().arrival_time, 480);
            assert!(route.geometry.iter().all(|segment| segment.is_empty()));
        }
    }

    #[tokio::test]
    async fn test_optimize_only_depot() {
        let provider = Arc::new(CountingProvider::constant(5));
        let optimizer = optimizer(Arc::clone(&provider));

        let solution = optimizer
            .optimize(&catalog(), &request("empty_line"))
            .await
            .unwrap();

        assert_eq!(solution.used_buses, 0);
        assert!(solution.routes.is_empty());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_optimize_rejects_bad_request() {
        let optimizer = optimizer(Arc::new(CountingProvider::constant(5)));
        let mut request = request("morning");
        request.capacity = 0;

        let result = optimizer.optimize(&catalog(), &request).await;

        assert!(matches!(
            result,
            Err(OptimizationError::Configuration(ConfigurationError::InvalidCapacity(0)))
        ));
    }

    #[tokio::test]
    async fn test_unknown_source_is_a_catalog_error() {
        let optimizer = optimizer(Arc::new(CountingProvider::constant(5)));

        let result = optimizer.optimize(&catalog(), &request("evening")).await;

        assert!(matches!(result, Err(OptimizationError::Catalog(_))));
    }

    #[tokio::test]
    async fn test_reoptimize_keeps_locked_route() {
        let optimizer = optimizer(Arc::new(CountingProvider::constant(5)));
        let locked = vec![LockedRouteRequest {
            bus_id: 7,
            stops: vec![
                StopKey::unsplit("DEPOT_0"),
                StopKey::unsplit("ST_1"),
                StopKey::unsplit("ST_3"),
            ],
        }];

        let solution = optimizer
            .reoptimize(&catalog(), &locked, &request("morning"))
            .await
            .unwrap();

        assert_eq!(solution.used_buses, 2);
        let first = &solution.routes[0];
        assert_eq!(first.bus_id, 1);
        let ids: Vec<&str> = first.stops().iter().map(|v| v.stop.original_id()).collect();
        assert_eq!(ids, vec!["ST_1", "ST_3"]);
        assert_eq!(first.final_load, 9);

        let second = &solution.routes[1];
        let ids: Vec<&str> = second.stops().iter().map(|v| v.stop.original_id()).collect();
        assert_eq!(ids, vec!["ST_2"]);
    }

    #[tokio::test]
    async fn test_reoptimize_everything_locked() {
        let optimizer = optimizer(Arc::new(CountingProvider::constant(5)));
        let locked = vec![LockedRouteRequest {
            bus_id: 1,
            stops: vec![
                StopKey::unsplit("DEPOT_0"),
                StopKey::unsplit("ST_1"),
                StopKey::unsplit("ST_2"),
                StopKey::unsplit("ST_3"),
            ],
        }];

        let solution = optimizer
            .reoptimize(&catalog(), &locked, &request("morning"))
            .await
            .unwrap();

        assert_eq!(solution.used_buses, 1);
        assert_eq!(solution.routes[0].final_load, 15);
        assert_eq!(solution.objective, None);
    }

    #[tokio::test]
    async fn test_reoptimize_serves_a_stop_locked_twice_once() {
        let optimizer = optimizer(Arc::new(CountingProvider::constant(5)));
        let locked = vec![
            LockedRouteRequest {
                bus_id: 1,
                stops: vec![StopKey::unsplit("ST_1")],
            },
            LockedRouteRequest {
                bus_id: 2,
                stops: vec![StopKey::unsplit("ST_1"), StopKey::unsplit("ST_2")],
            },
        ];

        let solution = optimizer
            .reoptimize(&catalog(), &locked, &request("morning"))
            .await
            .unwrap();

        let mut served: Vec<&str> = solution
            .routes
            .iter()
            .flat_map(|route| route.stops().iter().map(|visit| visit.stop.original_id()))
            .collect();
        served.sort();
        assert_eq!(served, vec!["ST_1", "ST_2", "ST_3"]);
        assert_eq!(solution.total_load(), 15);
        assert_eq!(solution.routes[0].final_load, 6);
        assert_eq!(solution.routes[1].final_load, 6);
    }

    #[tokio::test]
    async fn test_validate_rejects_empty_catalog() {
        let optimizer = optimizer(Arc::new(CountingProvider::constant(5)));
        let mut catalog = catalog();
        catalog.insert("closed", Vec::new());
        let route = LockedRouteRequest {
            bus_id: 1,
            stops: vec![StopKey::unsplit("ST_1")],
        };

        let result = optimizer.validate(&catalog, &route, 10, "closed").await;

        assert!(matches!(
            result,
            Err(OptimizationError::Configuration(ConfigurationError::EmptyCatalog))
        ));
    }

    #[tokio::test]
    async fn test_validate_reports_overload() {
        let optimizer = optimizer(Arc::new(CountingProvider::constant(5)));
        let route = LockedRouteRequest {
            bus_id: 2,
            stops: vec![
                StopKey::unsplit("DEPOT_0"),
                StopKey::unsplit("ST_1"),
                StopKey::unsplit("ST_2"),
            ],
        };

        let validation = optimizer
            .validate(&catalog(), &route, 10, "morning")
            .await
            .unwrap();

        assert!(!validation.capacity_ok);
        assert_eq!(validation.total_load, 12);
        assert_eq!(validation.message, "capacity exceeded: load 12 > capacity 10");
        assert_eq!(validation.legs, vec![5, 5, 5]);
        assert_eq!(validation.total_time, 15);
    }
}
