//! Brake pre-phase that returns an out-of-bound start state into the limits.
//!
//! When the initial velocity or acceleration lies outside the kinematic
//! limits no 7-phase profile can start from it. The brake computes at most
//! two constant-jerk segments, prepended to the profile, after which the
//! state is back inside `[v_min, v_max] x [-a_max, a_max]`.

use libm::sqrt;
use serde::{Deserialize, Serialize};

use super::State;

/// Up to two `(duration, jerk)` segments executed before the main profile.
///
/// Zero-length segments mean no braking is needed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BrakeTrajectory {
    /// Segment durations.
    pub t: [f64; 2],
    /// Segment jerks.
    pub j: [f64; 2],
}

impl BrakeTrajectory {
    /// No braking.
    pub const NONE: Self = Self {
        t: [0.0; 2],
        j: [0.0; 2],
    };

    /// Total braking time.
    #[inline]
    pub fn duration(&self) -> f64 {
        self.t[0] + self.t[1]
    }

    /// Whether any segment has a positive duration.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.duration() > 0.0
    }

    /// State reached after executing both segments from `start`.
    pub fn apply(&self, start: State) -> State {
        start.integrate(self.t[0], self.j[0]).integrate(self.t[1], self.j[1])
    }

    /// State at time `t` into the brake (clamped to the brake end).
    pub fn state_at(&self, start: State, t: f64) -> State {
        if t <= self.t[0] {
            return start.integrate(t.max(0.0), self.j[0]);
        }
        let mid = start.integrate(self.t[0], self.j[0]);
        mid.integrate((t - self.t[0]).min(self.t[1]), self.j[1])
    }

    fn mirrored(self) -> Self {
        Self {
            t: self.t,
            j: [-self.j[0], -self.j[1]],
        }
    }
}

/// Brake calculator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brake {
    /// Margin beyond a bound before braking is triggered.
    pub eps: f64,
}

impl Default for Brake {
    fn default() -> Self {
        Self { eps: 2e-14 }
    }
}

impl Brake {
    /// Create a brake calculator with an explicit trigger margin.
    pub const fn new(eps: f64) -> Self {
        Self { eps }
    }

    /// Compute the brake pre-phase for a start velocity and acceleration.
    ///
    /// Assumes `v_min <= v_max`, `a_max > 0` and `j_max > 0`. Always succeeds;
    /// returns [`BrakeTrajectory::NONE`] when `(v0, a0)` is within the limits.
    pub fn get_brake_trajectory(
        &self,
        v0: f64,
        a0: f64,
        v_max: f64,
        v_min: f64,
        a_max: f64,
        j_max: f64,
    ) -> BrakeTrajectory {
        let brake = if a0 > a_max + self.eps {
            Self::acceleration_brake(v0, a0, v_max, v_min, a_max, j_max)
        } else if a0 < -a_max - self.eps {
            Self::acceleration_brake(-v0, -a0, -v_min, -v_max, a_max, j_max).mirrored()
        } else if v0 > v_max + self.eps {
            Self::velocity_brake(v0, a0, v_max, v_min, a_max, j_max)
        } else if v0 < v_min - self.eps {
            Self::velocity_brake(-v0, -a0, -v_min, -v_max, a_max, j_max).mirrored()
        } else {
            BrakeTrajectory::NONE
        };

        #[cfg(feature = "defmt")]
        if brake.is_active() {
            defmt::debug!(
                "brake: t = [{}, {}], j = [{}, {}]",
                brake.t[0],
                brake.t[1],
                brake.j[0],
                brake.j[1]
            );
        }

        brake
    }

    // a0 > a_max: ramp the acceleration down with -j_max.
    fn acceleration_brake(
        v0: f64,
        a0: f64,
        v_max: f64,
        v_min: f64,
        a_max: f64,
        j_max: f64,
    ) -> BrakeTrajectory {
        let v_at_a_zero = v0 + a0 * a0 / (2.0 * j_max);
        if v_at_a_zero > v_max {
            // The velocity bound is crossed anyway, so brake the velocity right away.
            return Self::velocity_brake(v0, a0, v_max, v_min, a_max, j_max);
        }

        let t_to_a_max = (a0 - a_max) / j_max;
        let v_at_a_max = v0 + a0 * t_to_a_max - j_max * t_to_a_max * t_to_a_max / 2.0;
        if v_at_a_max < v_min {
            // Hold the bound acceleration until the velocity is back in range,
            // or until ramping it to zero would carry the velocity past v_max.
            let t_to_v_min = (v_min - v_at_a_max) / a_max;
            let t_to_v_max = (v_max - v_at_a_max) / a_max - a_max / (2.0 * j_max);
            return BrakeTrajectory {
                t: [t_to_a_max, t_to_v_min.min(t_to_v_max).max(0.0)],
                j: [-j_max, 0.0],
            };
        }

        BrakeTrajectory {
            t: [t_to_a_max, 0.0],
            j: [-j_max, 0.0],
        }
    }

    // Velocity ends above v_max: decelerate with -j_max, holding -a_max if reached.
    // Braking stops early when ramping the acceleration back to zero would
    // carry the velocity below v_min.
    fn velocity_brake(
        v0: f64,
        a0: f64,
        v_max: f64,
        v_min: f64,
        a_max: f64,
        j_max: f64,
    ) -> BrakeTrajectory {
        let t_to_a_min = (a0 + a_max) / j_max;
        let t_to_v_max = (a0 + sqrt((a0 * a0 + 2.0 * j_max * (v0 - v_max)).max(0.0))) / j_max;
        let t_to_v_min = (a0 + sqrt((a0 * a0 / 2.0 + j_max * (v0 - v_min)).max(0.0))) / j_max;
        let t_stop = t_to_v_max.min(t_to_v_min);

        if t_to_a_min < t_stop {
            let v_at_a_min = v0 + a0 * t_to_a_min - j_max * t_to_a_min * t_to_a_min / 2.0;
            let t_hold_v_max = (v_at_a_min - v_max) / a_max;
            let t_hold_v_min = (v_at_a_min - v_min) / a_max - a_max / (2.0 * j_max);
            BrakeTrajectory {
                t: [t_to_a_min.max(0.0), t_hold_v_max.min(t_hold_v_min).max(0.0)],
                j: [-j_max, 0.0],
            }
        } else {
            BrakeTrajectory {
                t: [t_stop.max(0.0), 0.0],
                j: [-j_max, 0.0],
            }
        }
    }
}
