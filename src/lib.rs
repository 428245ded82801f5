//! # jerk-sync
//!
//! Jerk-limited ("double-S") motion profiles for one degree of freedom, with
//! the primitives needed to give several axes one common duration.
//!
//! ## Features
//!
//! - **Minimum-time profiles**: seven constant-jerk phases within velocity,
//!   acceleration and jerk bounds, from any start state to any target state
//! - **Blocked intervals**: durations above the minimum that no profile reaches
//! - **Fixed-duration profiles**: re-fit a profile to a common duration
//! - **Brake pre-phase**: out-of-bound start states are brought back first
//! - **no_std compatible**: allocation-free core, `heapless` collections
//! - **Configuration-driven**: axis limits and tolerances from TOML files
//!
//! ## Quick Start
//!
//! ```rust
//! use jerk_sync::{KinematicLimits, Profile, State, Step1, Step2};
//!
//! let limits = KinematicLimits::symmetric(1.0, 1.0, 1.0);
//! let (start, target) = (State::at_rest(0.0), State::at_rest(1.0));
//!
//! let block = Step1::new(start, target, &limits).solve()?;
//! let tf = block.earliest_from(5.0);
//!
//! let mut profile = Profile::default();
//! assert!(Step2::new(tf, start, target, &limits).get_profile(&mut profile));
//! assert!((profile.duration() - 5.0).abs() < 1e-9);
//! # Ok::<(), jerk_sync::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Core modules
pub mod config;
pub mod error;
pub mod motion;
pub mod solver;

// Re-exports for ergonomic API
pub use config::{validate_config, KinematicLimits, SolverConfig, SystemConfig};
pub use error::{ConfigError, Error, MotionError, Result};
pub use motion::{Block, Brake, BrakeTrajectory, Direction, Interval, Limits, Profile, State, Teeth};
pub use solver::{Step1, Step2, STEP2_ORDER};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};
