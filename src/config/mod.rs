//! Configuration module for jerk-sync.
//!
//! Provides kinematic limits per axis and the solver tolerances, loadable
//! from TOML files (with `std` feature) or constructed directly.

mod limits;
#[cfg(feature = "std")]
mod loader;
mod solver;
mod system;
mod validation;

pub use limits::KinematicLimits;
pub use solver::SolverConfig;
pub use system::{SystemConfig, MAX_AXES};
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};
