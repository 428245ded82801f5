//! Motion module for jerk-sync.
//!
//! Provides the kinematic state, the seven-phase profile with its topology
//! tags, the brake pre-phase and the blocked-interval summary.

mod block;
mod brake;
mod profile;
mod state;

pub use block::{Block, Interval, MAX_CANDIDATES, MAX_INTERVALS};
pub use brake::{Brake, BrakeTrajectory};
pub use profile::{Direction, Limits, Profile, Teeth};
pub use state::State;
