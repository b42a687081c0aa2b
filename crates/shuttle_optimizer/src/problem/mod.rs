pub mod configuration_error;
pub mod optimization_request;
pub mod physical_stop;
pub mod routing_problem;
pub mod split;
pub mod stop_data_provider;
pub mod stop_key;
pub mod virtual_stop;
