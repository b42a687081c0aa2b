pub mod locked_route;
pub mod merger;
pub mod validator;
