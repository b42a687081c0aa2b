pub mod assignment;
mod construction;
pub mod local_search_solver;
mod ls;
pub mod routing_model;
pub mod routing_solver;
pub mod search_parameters;
pub mod solver_error;
mod working_routes;
