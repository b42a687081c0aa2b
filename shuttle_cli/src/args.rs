use std::{path::PathBuf, sync::Arc};

use clap::{Args, ValueEnum};
use shuttle_matrix_providers::{
    cache::FileDurationCache,
    directions_client::{DirectionsClient, DirectionsProvider},
};
use shuttle_optimizer::{
    optimizer::RouteOptimizer,
    params::OptimizerParams,
    problem::optimization_request::OptimizationRequest,
    solver::{local_search_solver::LocalSearchSolver, search_parameters::FirstSolutionStrategy},
};
use tracing::info;

use crate::parsers;

pub type CliOptimizer =
    RouteOptimizer<FileDurationCache, Arc<DirectionsClient>, Arc<DirectionsClient>, LocalSearchSolver>;

#[derive(Args)]
pub struct RequestArgs {
    /// Stop catalog to load, `{source}.csv` in `SHUTTLE_DATA_FOLDER`
    #[arg(short, long)]
    pub source: String,

    /// Seats per bus
    #[arg(short, long)]
    pub capacity: i64,

    /// Number of buses available
    #[arg(short = 'n', long, default_value_t = 10)]
    pub vehicles: usize,

    /// Legs longer than this many minutes are strongly discouraged
    #[arg(long, default_value_t = 30)]
    pub per_leg_limit: i64,

    /// Maximum driving minutes of a route
    #[arg(long, default_value_t = 120)]
    pub max_service_time: i64,

    /// Arrival time at the depot (e.g., "08:30")
    #[arg(long, value_parser = parsers::parse_deadline, default_value = "08:00")]
    pub deadline: i64,
}

impl RequestArgs {
    pub fn to_request(&self) -> OptimizationRequest {
        OptimizationRequest {
            capacity: self.capacity,
            per_leg_time_limit: self.per_leg_limit,
            max_service_time: self.max_service_time,
            vehicle_count: self.vehicles,
            deadline: self.deadline,
            source_id: self.source.clone(),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ProviderArg {
    Kakao,
    Crow,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    PathCheapestArc,
    CheapestInsertion,
}

impl From<StrategyArg> for FirstSolutionStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::PathCheapestArc => FirstSolutionStrategy::PathCheapestArc,
            StrategyArg::CheapestInsertion => FirstSolutionStrategy::CheapestInsertion,
        }
    }
}

#[derive(Args)]
pub struct EngineArgs {
    /// Directions provider used for durations and geometry
    #[arg(long, value_enum, default_value = "kakao")]
    pub provider: ProviderArg,

    /// Straight-line speed of the crow provider, in km/h
    #[arg(long, default_value_t = 30.0)]
    pub speed_kmh: f64,

    /// Duration cache file, defaults to `durations.json` in `SHUTTLE_CACHE_FOLDER`
    #[arg(long)]
    pub cache: Option<PathBuf>,

    /// Timeout for the solver (e.g., "30s", "5m", "PT1H30M")
    #[arg(short, long, value_parser = parsers::parse_duration, default_value = "100s")]
    pub timeout: jiff::SignedDuration,

    #[arg(long, value_enum, default_value = "path-cheapest-arc")]
    pub strategy: StrategyArg,

    /// Skip the local search after the first solution
    #[arg(long)]
    pub no_local_search: bool,

    /// Skip fetching road geometry
    #[arg(long)]
    pub no_geometry: bool,
}

impl EngineArgs {
    pub fn build_optimizer(&self) -> anyhow::Result<CliOptimizer> {
        let provider = match self.provider {
            ProviderArg::Kakao => DirectionsProvider::KakaoMobility,
            ProviderArg::Crow => DirectionsProvider::AsTheCrowFlies {
                speed_kmh: self.speed_kmh,
            },
        };
        let client = Arc::new(DirectionsClient::from_env(provider)?);

        let cache = match &self.cache {
            Some(path) => FileDurationCache::new(path),
            None => FileDurationCache::from_env()?,
        };
        info!("Using duration cache {}", cache.path().display());

        let mut params = OptimizerParams::default();
        params.search.time_limit = self.timeout;
        params.search.first_solution_strategy = self.strategy.into();
        params.search.local_search = !self.no_local_search;
        params.with_geometry = !self.no_geometry;

        Ok(RouteOptimizer::new(
            cache,
            Arc::clone(&client),
            client,
            LocalSearchSolver,
            params,
        ))
    }
}
