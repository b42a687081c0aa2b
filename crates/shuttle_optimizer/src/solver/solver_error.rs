use jiff::SignedDuration;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolverError {
    #[error("no feasible assignment: {unassigned} nodes could not be routed")]
    Infeasible { unassigned: usize },

    #[error("time limit of {0:?} reached before a first solution was found")]
    TimeLimit(SignedDuration),

    #[error("invalid model: {0}")]
    InvalidModel(String),
}
