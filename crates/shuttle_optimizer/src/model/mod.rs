pub mod route_model_builder;
