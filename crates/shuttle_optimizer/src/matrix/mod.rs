pub mod matrix_builder;
pub mod penalty;
pub mod time_matrix;
