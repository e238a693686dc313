//! Schema module - Configuration and reporting types for novelty search runs.

mod config;
mod progress;

pub use config::*;
pub use progress::*;
