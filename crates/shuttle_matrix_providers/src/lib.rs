pub mod as_the_crow_flies;
pub mod cache;
pub mod directions_client;
pub mod duration_provider;
pub mod geometry_provider;
pub mod kakao_api;
