//! CLI command implementations.

mod build;
mod config;
mod doctor;
mod index;

pub use build::{run_build, BuildOptions};
pub use config::run_config;
pub use doctor::run_doctor;
pub use index::run_index;
