#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use jiff::SignedDuration;
use shuttle_matrix_providers::{
    cache::InMemoryDurationCache,
    duration_provider::{DurationProvider, Minutes, ProviderError},
    geometry_provider::NoGeometry,
};
use shuttle_optimizer::{
    optimizer::RouteOptimizer,
    params::OptimizerParams,
    problem::{
        optimization_request::OptimizationRequest, physical_stop::PhysicalStop,
        stop_data_provider::InMemoryStopDataProvider,
    },
    solver::local_search_solver::LocalSearchSolver,
};

pub type TestOptimizer = RouteOptimizer<
    Arc<InMemoryDurationCache>,
    Arc<MatrixProvider>,
    NoGeometry,
    LocalSearchSolver,
>;

/// Durations looked up from a fixed matrix, indexed by the position of each
/// coordinate in `stops`.
pub struct MatrixProvider {
    points: Vec<geo_types::Point>,
    rows: Vec<Vec<Minutes>>,
    calls: AtomicUsize,
}

impl MatrixProvider {
    pub fn new(stops: &[PhysicalStop], rows: Vec<Vec<Minutes>>) -> Self {
        Self {
            points: stops.iter().map(PhysicalStop::point).collect(),
            rows,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn position(&self, point: geo_types::Point) -> Option<usize> {
        self.points.iter().position(|candidate| *candidate == point)
    }
}

impl DurationProvider for MatrixProvider {
    async fn duration(
        &self,
        from: geo_types::Point,
        to: geo_types::Point,
    ) -> Result<Minutes, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match (self.position(from), self.position(to)) {
            (Some(i), Some(j)) => Ok(self.rows[i][j]),
            _ => Err(ProviderError::NoRoute { from, to }),
        }
    }
}

pub fn create_optimizer(
    cache: Arc<InMemoryDurationCache>,
    provider: Arc<MatrixProvider>,
) -> TestOptimizer {
    let mut params = OptimizerParams::default();
    params.search.time_limit = SignedDuration::from_secs(5);

    RouteOptimizer::new(cache, provider, NoGeometry, LocalSearchSolver, params)
}

pub fn create_catalog(source_id: &str, stops: Vec<PhysicalStop>) -> InMemoryStopDataProvider {
    let mut catalog = InMemoryStopDataProvider::new();
    catalog.insert(source_id, stops);
    catalog
}

pub fn create_request(source_id: &str, capacity: i64, vehicle_count: usize) -> OptimizationRequest {
    OptimizationRequest {
        capacity,
        per_leg_time_limit: 30,
        max_service_time: 120,
        vehicle_count,
        deadline: 480,
        source_id: source_id.to_owned(),
    }
}

/// Depot and three stops about a kilometer apart.
pub fn create_commuter_stops() -> Vec<PhysicalStop> {
    vec![
        PhysicalStop::new("DEPOT_0", "Plant", 0, 37.500, 127.000),
        PhysicalStop::new("ST_1", "North gate", 6, 37.510, 127.000),
        PhysicalStop::new("ST_2", "Station", 6, 37.510, 127.010),
        PhysicalStop::new("ST_3", "Market", 4, 37.490, 127.010),
    ]
}

pub fn create_commuter_matrix() -> Vec<Vec<Minutes>> {
    vec![
        vec![0, 5, 5, 6],
        vec![5, 0, 3, 7],
        vec![5, 3, 0, 4],
        vec![6, 7, 4, 0],
    ]
}
