//! Kinematic limits of one degree of freedom.

use serde::Deserialize;

use crate::error::{ConfigError, Error, Result};

/// Velocity, acceleration and jerk bounds for one axis.
///
/// The acceleration bound is symmetric (`[-max_acceleration, max_acceleration]`),
/// the velocity bound may be asymmetric but must contain zero.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct KinematicLimits {
    /// Maximum velocity (>= 0).
    #[serde(rename = "max_velocity")]
    pub v_max: f64,

    /// Minimum velocity (<= 0). Defaults to `-max_velocity` when omitted.
    #[serde(rename = "min_velocity", default = "default_min_velocity")]
    pub v_min: f64,

    /// Maximum absolute acceleration (> 0).
    #[serde(rename = "max_acceleration")]
    pub a_max: f64,

    /// Maximum absolute jerk (> 0).
    #[serde(rename = "max_jerk")]
    pub j_max: f64,
}

// Sentinel resolved by `KinematicLimits::resolved`.
fn default_min_velocity() -> f64 {
    f64::NAN
}

impl KinematicLimits {
    /// Create limits with an explicit velocity range.
    pub const fn new(v_max: f64, v_min: f64, a_max: f64, j_max: f64) -> Self {
        Self {
            v_max,
            v_min,
            a_max,
            j_max,
        }
    }

    /// Create limits with a velocity range symmetric around zero.
    pub const fn symmetric(v_max: f64, a_max: f64, j_max: f64) -> Self {
        Self::new(v_max, -v_max, a_max, j_max)
    }

    /// Replace an omitted minimum velocity by `-v_max`.
    pub fn resolved(mut self) -> Self {
        if self.v_min.is_nan() {
            self.v_min = -self.v_max;
        }
        self
    }

    /// Check that the limits describe a usable axis.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a bound is non-finite, the velocity range
    /// is inverted or excludes zero, or the acceleration or jerk bound is not
    /// strictly positive.
    pub fn validate(&self) -> Result<()> {
        let limits = self.resolved();
        let values = [limits.v_max, limits.v_min, limits.a_max, limits.j_max];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::Config(ConfigError::NonFiniteLimit));
        }

        if limits.v_min > limits.v_max || limits.v_min > 0.0 || limits.v_max < 0.0 {
            return Err(Error::Config(ConfigError::InvalidVelocityRange {
                min: limits.v_min,
                max: limits.v_max,
            }));
        }

        if limits.a_max <= 0.0 {
            return Err(Error::Config(ConfigError::InvalidMaxAcceleration(limits.a_max)));
        }

        if limits.j_max <= 0.0 {
            return Err(Error::Config(ConfigError::InvalidMaxJerk(limits.j_max)));
        }

        Ok(())
    }

    /// Check if a velocity lies within `[v_min - tol, v_max + tol]`.
    #[inline]
    pub fn contains_velocity(&self, v: f64, tol: f64) -> bool {
        v >= self.v_min - tol && v <= self.v_max + tol
    }

    /// Check if an acceleration lies within `[-a_max - tol, a_max + tol]`.
    #[inline]
    pub fn contains_acceleration(&self, a: f64, tol: f64) -> bool {
        a >= -self.a_max - tol && a <= self.a_max + tol
    }
}
