//! Kinematic state of one degree of freedom.

use serde::{Deserialize, Serialize};

/// Position, velocity and acceleration at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct State {
    /// Position.
    pub p: f64,
    /// Velocity.
    pub v: f64,
    /// Acceleration.
    pub a: f64,
}

impl State {
    /// Create a new state.
    #[inline]
    pub const fn new(p: f64, v: f64, a: f64) -> Self {
        Self { p, v, a }
    }

    /// Rest state at a position.
    #[inline]
    pub const fn at_rest(p: f64) -> Self {
        Self::new(p, 0.0, 0.0)
    }

    /// Advance the state by `t` under constant jerk `j`.
    #[inline]
    pub fn integrate(self, t: f64, j: f64) -> Self {
        Self {
            p: self.p + t * (self.v + t * (self.a / 2.0 + t * j / 6.0)),
            v: self.v + t * (self.a + t * j / 2.0),
            a: self.a + t * j,
        }
    }

    /// Point reflection through the origin (used for the DOWN direction).
    #[inline]
    pub fn mirrored(self) -> Self {
        Self::new(-self.p, -self.v, -self.a)
    }

    /// Check that all components are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.p.is_finite() && self.v.is_finite() && self.a.is_finite()
    }
}
