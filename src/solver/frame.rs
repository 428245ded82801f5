//! Boundary conditions and the UP frame.
//!
//! Every branch is written once, for a profile leading with positive jerk.
//! A DOWN profile is solved as the UP profile of the mirrored problem
//! (positions, velocities and accelerations negated, velocity bounds swapped)
//! and its jerks are negated again when the profile is built.

use crate::config::{KinematicLimits, SolverConfig};
use crate::motion::{Brake, BrakeTrajectory, Direction, Limits, Profile, State, Teeth};

/// Boundary states, limits and brake shared by all branches of one solve.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Boundary {
    pub(crate) origin: State,
    pub(crate) brake: BrakeTrajectory,
    /// State after the brake.
    pub(crate) start: State,
    pub(crate) target: State,
    pub(crate) limits: KinematicLimits,
    pub(crate) config: SolverConfig,
}

impl Boundary {
    pub(crate) fn new(
        origin: State,
        target: State,
        limits: &KinematicLimits,
        config: &SolverConfig,
    ) -> Self {
        let limits = limits.resolved();
        let brake = Brake::new(config.eps).get_brake_trajectory(
            origin.v,
            origin.a,
            limits.v_max,
            limits.v_min,
            limits.a_max,
            limits.j_max,
        );
        Boundary {
            origin,
            brake,
            start: brake.apply(origin),
            target,
            limits,
            config: *config,
        }
    }

    pub(crate) fn frame(&self, direction: Direction) -> Frame {
        Frame::new(direction, self)
    }

    /// Whether the braked start already equals the target.
    pub(crate) fn at_target(&self) -> bool {
        libm::fabs(self.start.p - self.target.p) <= self.config.position_tolerance
            && libm::fabs(self.start.v - self.target.v) <= self.config.velocity_tolerance
            && libm::fabs(self.start.a - self.target.a) <= self.config.acceleration_tolerance
    }

    /// Build the profile for the given durations and keep it if it is valid.
    ///
    /// Durations in `[-time_tolerance, 0)` are clamped to zero.
    pub(crate) fn accept(&self, frame: &Frame, t: [f64; 7], teeth: Teeth) -> Option<Profile> {
        let tol = self.config.time_tolerance;
        if t.iter().any(|t| !t.is_finite() || *t < -tol) {
            return None;
        }
        let t = t.map(|t| t.max(0.0));

        let limits = Limits::from_plateaus(t[1] > tol, t[5] > tol, t[3] > tol);
        let profile = Profile::from_phases(self.start, t, frame.jerks(teeth))
            .with_brake(self.origin, self.brake)
            .with_tags(limits, teeth, frame.direction);

        if profile.check(&self.target, &self.limits, &self.config) {
            #[cfg(feature = "defmt")]
            defmt::trace!(
                "accepted {} {} {} profile, duration {}",
                frame.direction,
                teeth,
                limits,
                profile.duration()
            );
            Some(profile)
        } else {
            None
        }
    }
}

/// Boundary conditions seen from a profile leading with positive jerk.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame {
    pub(crate) direction: Direction,
    pub(crate) start: State,
    pub(crate) target: State,
    /// Velocity bound in the direction of the leading jerk.
    pub(crate) v_top: f64,
    /// Velocity bound opposite to the leading jerk.
    pub(crate) v_bottom: f64,
    pub(crate) a_max: f64,
    pub(crate) j_max: f64,
    // Products of the boundary terms reused by many branches.
    pub(crate) a0_a0: f64,
    pub(crate) af_af: f64,
    pub(crate) dv: f64,
}

impl Frame {
    fn new(direction: Direction, boundary: &Boundary) -> Self {
        let limits = &boundary.limits;
        let (start, target, v_top, v_bottom) = match direction {
            Direction::Up => (boundary.start, boundary.target, limits.v_max, limits.v_min),
            Direction::Down => (
                boundary.start.mirrored(),
                boundary.target.mirrored(),
                -limits.v_min,
                -limits.v_max,
            ),
        };

        Frame {
            direction,
            start,
            target,
            v_top,
            v_bottom,
            a_max: limits.a_max,
            j_max: limits.j_max,
            a0_a0: start.a * start.a,
            af_af: target.a * target.a,
            dv: target.v - start.v,
        }
    }

    /// Jerks of the seven phases in the original frame.
    pub(crate) fn jerks(&self, teeth: Teeth) -> [f64; 7] {
        let k = self.direction.sign() * self.j_max;
        teeth.pattern().map(|u| u * k)
    }

    /// Position reached in this frame after the given phases.
    pub(crate) fn end_position(&self, t: &[f64; 7], teeth: Teeth) -> f64 {
        let pattern = teeth.pattern();
        t.iter()
            .zip(pattern)
            .fold(self.start, |s, (t, u)| s.integrate(*t, u * self.j_max))
            .p
    }
}
