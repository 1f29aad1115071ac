//! Utility functions and helpers.

pub mod preflight;
pub mod settings;

pub use preflight::{check_directory_exists, check_git_repository};
pub use settings::{get_env_var, Settings};
