use thiserror::Error;

/// Invalid input, rejected before any modeling happens.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("vehicle capacity must be positive, got {0}")]
    InvalidCapacity(i64),

    #[error("vehicle count must be positive")]
    NoVehicles,

    #[error("stop catalog is empty, a depot is required")]
    EmptyCatalog,

    #[error("stop {id} has a negative demand of {demand}")]
    NegativeDemand { id: String, demand: i64 },

    #[error("depot {id} must have zero demand, got {demand}")]
    DepotDemand { id: String, demand: i64 },

    #[error("{name} must not be negative, got {value}")]
    NegativeLimit { name: &'static str, value: i64 },

    #[error("time matrix has size {matrix} but there are {stops} stops")]
    MatrixSize { matrix: usize, stops: usize },
}
