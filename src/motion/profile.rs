//! Seven-phase jerk-limited motion profile.
//!
//! A profile is a sequence of seven constant-jerk phases, optionally preceded
//! by a brake pre-phase. The phase sums exclude the brake; [`Profile::duration`]
//! includes it.

use serde::{Deserialize, Serialize};

use super::{BrakeTrajectory, State};
use crate::config::{KinematicLimits, SolverConfig};

/// Which bounds a profile actually saturates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Limits {
    /// No bound is held over a phase.
    #[default]
    None,
    /// Acceleration plateau in the first lobe.
    Acc0,
    /// Acceleration plateau in the second lobe.
    Acc1,
    /// Acceleration plateaus in both lobes.
    Acc0Acc1,
    /// Cruise phase at constant velocity.
    Vel,
    /// First-lobe acceleration plateau and cruise.
    Acc0Vel,
    /// Second-lobe acceleration plateau and cruise.
    Acc1Vel,
    /// Both acceleration plateaus and cruise.
    Acc0Acc1Vel,
}

impl Limits {
    /// Classify from which plateau phases are present.
    pub fn from_plateaus(acc0: bool, acc1: bool, vel: bool) -> Self {
        match (acc0, acc1, vel) {
            (false, false, false) => Limits::None,
            (true, false, false) => Limits::Acc0,
            (false, true, false) => Limits::Acc1,
            (true, true, false) => Limits::Acc0Acc1,
            (false, false, true) => Limits::Vel,
            (true, false, true) => Limits::Acc0Vel,
            (false, true, true) => Limits::Acc1Vel,
            (true, true, true) => Limits::Acc0Acc1Vel,
        }
    }

    /// Whether a cruise phase is present.
    #[inline]
    pub fn has_cruise(self) -> bool {
        matches!(
            self,
            Limits::Vel | Limits::Acc0Vel | Limits::Acc1Vel | Limits::Acc0Acc1Vel
        )
    }
}

/// Jerk sign pattern of the seven phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Teeth {
    /// `(+, 0, -, 0, -, 0, +)`: the two acceleration lobes have opposite signs.
    #[default]
    Uddu,
    /// `(+, 0, -, 0, +, 0, -)`: both lobes have the same sign.
    Udud,
}

impl Teeth {
    /// Unit jerk of each phase, for an UP profile.
    pub const fn pattern(self) -> [f64; 7] {
        match self {
            Teeth::Uddu => [1.0, 0.0, -1.0, 0.0, -1.0, 0.0, 1.0],
            Teeth::Udud => [1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0],
        }
    }
}

/// Sign of the leading jerk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Leads with positive jerk.
    #[default]
    Up,
    /// Leads with negative jerk.
    Down,
}

impl Direction {
    /// Both directions, UP first.
    pub const ALL: [Direction; 2] = [Direction::Up, Direction::Down];

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Up => 1.0,
            Direction::Down => -1.0,
        }
    }
}

/// Planned motion of one degree of freedom.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Profile {
    /// Phase durations.
    pub t: [f64; 7],
    /// Cumulative phase end times (brake excluded).
    pub t_sum: [f64; 7],
    /// Phase jerks.
    pub j: [f64; 7],
    /// State at each phase boundary; `states[0]` is the state after the brake.
    pub states: [State; 8],
    /// Brake pre-phase.
    pub brake: BrakeTrajectory,
    /// State before the brake.
    pub brake_start: State,
    /// Saturated bounds.
    pub limits: Limits,
    /// Jerk sign pattern.
    pub teeth: Teeth,
    /// Sign of the leading jerk.
    pub direction: Direction,
}

impl Profile {
    /// Build a profile by integrating the phases from `start`.
    pub fn from_phases(start: State, t: [f64; 7], j: [f64; 7]) -> Self {
        let mut profile = Profile {
            t,
            j,
            brake_start: start,
            ..Profile::default()
        };

        profile.states[0] = start;
        let mut sum = 0.0;
        for i in 0..7 {
            sum += t[i];
            profile.t_sum[i] = sum;
            profile.states[i + 1] = profile.states[i].integrate(t[i], j[i]);
        }
        profile
    }

    /// Attach the brake pre-phase that leads from `origin` to `states[0]`.
    pub fn with_brake(mut self, origin: State, brake: BrakeTrajectory) -> Self {
        self.brake = brake;
        self.brake_start = origin;
        self
    }

    /// Attach topology tags.
    pub fn with_tags(mut self, limits: Limits, teeth: Teeth, direction: Direction) -> Self {
        self.limits = limits;
        self.teeth = teeth;
        self.direction = direction;
        self
    }

    /// Duration of the brake pre-phase.
    #[inline]
    pub fn t_brake(&self) -> f64 {
        self.brake.duration()
    }

    /// Total duration, brake included.
    #[inline]
    pub fn duration(&self) -> f64 {
        self.t_sum[6] + self.t_brake()
    }

    /// State at the end of the last phase.
    #[inline]
    pub fn end_state(&self) -> State {
        self.states[7]
    }

    /// Sample the motion at time `t` from the start of the brake.
    ///
    /// Times before zero return the initial state; times past the duration
    /// return the end state.
    pub fn state_at(&self, t: f64) -> State {
        let t_brake = self.t_brake();
        if t <= 0.0 {
            return self.brake_start;
        }
        if t < t_brake {
            return self.brake.state_at(self.brake_start, t);
        }

        let tau = t - t_brake;
        for i in 0..7 {
            if tau < self.t_sum[i] {
                let start = self.t_sum[i] - self.t[i];
                return self.states[i].integrate(tau - start, self.j[i]);
            }
        }
        self.end_state()
    }

    /// Validate the profile against the target and the kinematic limits.
    ///
    /// Checks non-negative durations, the end state within the configured
    /// tolerances, accelerations at every phase boundary, and velocities at
    /// every phase boundary and at every interior zero of the acceleration.
    /// A start above `v_max` (below `v_min`) is accepted while the
    /// acceleration stays non-positive (non-negative), so a braked start can
    /// return into the band.
    pub fn check(&self, target: &State, limits: &KinematicLimits, config: &SolverConfig) -> bool {
        if self.t.iter().any(|t| !t.is_finite() || *t < 0.0) {
            return false;
        }

        let end = self.end_state();
        if !end.is_finite()
            || libm::fabs(end.p - target.p) > config.position_tolerance
            || libm::fabs(end.v - target.v) > config.velocity_tolerance
            || libm::fabs(end.a - target.a) > config.acceleration_tolerance
        {
            return false;
        }

        let a_tol = config.bound_tolerance * limits.a_max.max(1.0);
        let v_tol = config.bound_tolerance * limits.v_max.max(-limits.v_min).max(1.0);

        // A braked start may still lie outside the velocity band. It is exempt
        // while the velocity moves monotonically back towards the band.
        let mut above = self.states[0].v > limits.v_max + v_tol;
        let mut below = self.states[0].v < limits.v_min - v_tol;

        for i in 0..7 {
            let (s, e) = (self.states[i], self.states[i + 1]);
            if !limits.contains_acceleration(e.a, a_tol) {
                return false;
            }

            above &= s.a <= a_tol && e.a <= a_tol;
            below &= s.a >= -a_tol && e.a >= -a_tol;
            if (!above && e.v > limits.v_max + v_tol) || (!below && e.v < limits.v_min - v_tol) {
                return false;
            }
            above &= e.v > limits.v_max + v_tol;
            below &= e.v < limits.v_min - v_tol;

            // Velocity extremum inside the phase.
            let j = self.j[i];
            if j != 0.0 && self.t[i] > 0.0 && s.a * e.a < 0.0 {
                let v_ext = s.v - s.a * s.a / (2.0 * j);
                if !limits.contains_velocity(v_ext, v_tol) {
                    return false;
                }
            }
        }

        true
    }
}
