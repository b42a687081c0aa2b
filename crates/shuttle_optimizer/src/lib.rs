pub mod colors;
pub mod decoder;
pub mod matrix;
pub mod model;
pub mod optimizer;
pub mod params;
pub mod problem;
pub mod reoptimize;
pub mod solution;
pub mod solver;
mod utils;

#[cfg(test)]
pub(crate) mod test_utils;
