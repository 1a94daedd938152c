//! CLI library for testing purposes

pub mod output;
pub mod validation;

pub use output::write_output;
pub use validation::{validate_file_path, validate_output_path, validate_paths};
