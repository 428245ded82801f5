//! Numerical tolerances used by the profile solvers.

use serde::Deserialize;

use crate::error::{ConfigError, Error, Result};

/// Tolerances shared by the brake, the minimum-time and the fixed-duration solvers.
///
/// They absorb floating point round-off in bound and zero comparisons only; a
/// profile that genuinely violates a bound or misses its target is never
/// accepted because of them.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Margin beyond the velocity/acceleration bounds before a brake pre-phase is triggered.
    pub eps: f64,

    /// Allowed absolute deviation of the final position from the target.
    pub position_tolerance: f64,

    /// Allowed absolute deviation of the final velocity from the target.
    pub velocity_tolerance: f64,

    /// Allowed absolute deviation of the final acceleration from the target.
    pub acceleration_tolerance: f64,

    /// Allowed excess of sampled velocity/acceleration over their bounds.
    pub bound_tolerance: f64,

    /// Phase durations in `[-time_tolerance, 0)` are treated as zero; plateaus
    /// shorter than this are not reported as saturated limits.
    pub time_tolerance: f64,

    /// Profiles whose durations differ by less than this are the same solution.
    pub duplicate_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            eps: 2e-14,
            position_tolerance: 1e-9,
            velocity_tolerance: 1e-9,
            acceleration_tolerance: 1e-9,
            bound_tolerance: 1e-10,
            time_tolerance: 1e-11,
            duplicate_tolerance: 1e-9,
        }
    }
}

impl SolverConfig {
    /// Check that every tolerance is a positive finite number.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTolerance`] with the first offending value.
    pub fn validate(&self) -> Result<()> {
        let values = [
            self.eps,
            self.position_tolerance,
            self.velocity_tolerance,
            self.acceleration_tolerance,
            self.bound_tolerance,
            self.time_tolerance,
            self.duplicate_tolerance,
        ];
        match values.iter().find(|v| !v.is_finite() || **v <= 0.0) {
            Some(v) => Err(Error::Config(ConfigError::InvalidTolerance(*v))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SolverConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.eps, 2e-14);
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let config = SolverConfig {
            position_tolerance: -1.0,
            ..SolverConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(Error::Config(ConfigError::InvalidTolerance(-1.0)))
        );
    }
}
