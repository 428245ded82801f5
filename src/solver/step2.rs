//! Profile with an imposed total duration.

use core::ops::ControlFlow;

use super::algebra::{Expr, Poly};
use super::frame::{Boundary, Frame};
use super::shape::{RootSign, Shape};
use crate::config::{KinematicLimits, SolverConfig};
use crate::error::{MotionError, Result};
use crate::motion::{Direction, Limits, Profile, State, Teeth};

/// Fixed-duration solver for one degree of freedom.
///
/// Branches are tried in a fixed priority order (limit class, then
/// direction, then jerk pattern) and the first valid profile is returned.
#[derive(Debug, Clone)]
pub struct Step2 {
    tf: f64,
    start: State,
    target: State,
    limits: KinematicLimits,
    config: SolverConfig,
}

/// Branch priority of [`Step2::get_profile`].
pub const STEP2_ORDER: [Limits; 8] = [
    Limits::Acc0Acc1Vel,
    Limits::Acc1Vel,
    Limits::Acc0Vel,
    Limits::Vel,
    Limits::Acc0Acc1,
    Limits::Acc1,
    Limits::Acc0,
    Limits::None,
];

impl Step2 {
    /// Create a solver for total duration `tf` (brake included).
    pub fn new(tf: f64, start: State, target: State, limits: &KinematicLimits) -> Self {
        Step2 {
            tf,
            start,
            target,
            limits: limits.resolved(),
            config: SolverConfig::default(),
        }
    }

    /// Use explicit solver tolerances.
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Find a profile lasting exactly `tf`.
    ///
    /// Writes the first valid profile to `profile` and returns `true`;
    /// returns `false` and leaves `profile` untouched when none exists.
    pub fn get_profile(&self, profile: &mut Profile) -> bool {
        let boundary = Boundary::new(self.start, self.target, &self.limits, &self.config);
        let t = self.tf - boundary.brake.duration();
        let tol = self.config.time_tolerance;
        if !t.is_finite() || t < -tol {
            return false;
        }
        let t = t.max(0.0);

        if let Some(found) = hold(&boundary, t) {
            *profile = found;
            return true;
        }

        for class in STEP2_ORDER {
            for direction in Direction::ALL {
                let frame = boundary.frame(direction);
                for teeth in [Teeth::Uddu, Teeth::Udud] {
                    if let ControlFlow::Break(found) = branch(&boundary, &frame, class, teeth, t) {
                        #[cfg(feature = "defmt")]
                        defmt::debug!("step2: {} {} {} fits {}", class, direction, teeth, self.tf);
                        *profile = found;
                        return true;
                    }
                }
            }
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("step2: no profile with duration {}", self.tf);
        false
    }

    /// Find the profile, reporting failures as errors.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::NonFiniteState`] for NaN or infinite inputs,
    /// [`MotionError::DurationTooShort`] when `tf` does not even cover the
    /// brake pre-phase and [`MotionError::DurationBlocked`] when no profile
    /// lasts `tf`.
    pub fn solve(&self) -> Result<Profile> {
        if !self.tf.is_finite() || !self.start.is_finite() || !self.target.is_finite() {
            return Err(MotionError::NonFiniteState.into());
        }
        let boundary = Boundary::new(self.start, self.target, &self.limits, &self.config);
        let t_brake = boundary.brake.duration();
        if self.tf < t_brake - self.config.time_tolerance {
            return Err(MotionError::DurationTooShort {
                duration: self.tf,
                minimum: t_brake,
            }
            .into());
        }
        let mut profile = Profile::default();
        if self.get_profile(&mut profile) {
            Ok(profile)
        } else {
            Err(MotionError::DurationBlocked { duration: self.tf }.into())
        }
    }
}

// Already at the target: stand still, or do nothing when no time is left.
fn hold(boundary: &Boundary, t: f64) -> Option<Profile> {
    if !boundary.at_target() {
        return None;
    }
    let frame = boundary.frame(Direction::Up);
    let config = &boundary.config;
    let at_rest = libm::fabs(boundary.start.v) <= config.velocity_tolerance
        && libm::fabs(boundary.start.a) <= config.acceleration_tolerance;
    if at_rest || t <= config.time_tolerance {
        boundary.accept(&frame, [0.0, 0.0, 0.0, t, 0.0, 0.0, 0.0], Teeth::Uddu)
    } else {
        None
    }
}

fn branch(
    boundary: &Boundary,
    f: &Frame,
    class: Limits,
    teeth: Teeth,
    t: f64,
) -> ControlFlow<Profile> {
    let shape = if class.has_cruise() {
        cruise_shape(f, class, teeth, t)
    } else if teeth == Teeth::Udud {
        double_lobe_shape(f, class, t)
    } else {
        // Without cruise the single-excursion shapes have no free parameter
        // left once the duration is fixed.
        None
    };

    match shape {
        Some(shape) => shape.solve(f.start, f.target.p, |candidate| {
            match boundary.accept(f, candidate.t, teeth) {
                Some(profile) => ControlFlow::Break(profile),
                None => ControlFlow::Continue(()),
            }
        }),
        None => ControlFlow::Continue(()),
    }
}

// Two lobes around a cruise at a velocity the duration selects.
fn cruise_shape(f: &Frame, class: Limits, teeth: Teeth, t: f64) -> Option<Shape> {
    let (a_max, j) = (f.a_max, f.j_max);
    let (v0, a0) = (f.start.v, f.start.a);
    let (vf, af) = (f.target.v, f.target.a);
    // Sign of the second lobe.
    let s2 = match teeth {
        Teeth::Uddu => -1.0,
        Teeth::Udud => 1.0,
    };
    let x = Expr::x();
    let zero = Expr::ZERO;
    let a_top = Expr::constant(a_max);
    let a2_plateau = Expr::constant(s2 * a_max);
    let c1 = (2.0 * a_max * a_max - f.a0_a0) / (2.0 * j);
    let c2 = (2.0 * a_max * a_max - f.af_af) / (2.0 * j);

    // Cruise velocity after a first lobe peaking at x.
    let vc_lobe1 = Poly::quadratic(v0 - f.a0_a0 / (2.0 * j), 0.0, 1.0 / j);
    let t5_for = |vc: Expr| (vf - vc) * (s2 / a_max) - c2 / a_max;
    let t1_for = |vc: Expr| (vc - v0 - c1) / a_max;
    let lobe1_peak = |ap: Expr| [(ap - a0) / j, ap / j];
    let ap_lo = a0.max(0.0);

    let (t0, t1, t2, ap, t4, t5, t6, a2, lo, hi, radical) = match class {
        Limits::Acc0Acc1Vel => {
            let vc = x;
            (
                Expr::constant((a_max - a0) / j),
                t1_for(vc),
                Expr::constant(a_max / j),
                a_top,
                Expr::constant(a_max / j),
                t5_for(vc),
                Expr::constant((a_max - s2 * af) / j),
                a2_plateau,
                f.v_bottom,
                f.v_top,
                None,
            )
        }
        Limits::Acc1Vel => {
            let [t0, t2] = lobe1_peak(x);
            (
                t0,
                zero,
                t2,
                x,
                Expr::constant(a_max / j),
                t5_for(Expr::poly(vc_lobe1)),
                Expr::constant((a_max - s2 * af) / j),
                a2_plateau,
                ap_lo,
                a_max,
                None,
            )
        }
        Limits::Acc0Vel => {
            let vc = Expr::poly(Poly::quadratic(vf + s2 * f.af_af / (2.0 * j), 0.0, -s2 / j));
            let (lo, hi) = match teeth {
                Teeth::Uddu => (-a_max, af.min(0.0)),
                Teeth::Udud => (af.max(0.0), a_max),
            };
            (
                Expr::constant((a_max - a0) / j),
                t1_for(vc),
                Expr::constant(a_max / j),
                a_top,
                x * (s2 / j),
                zero,
                (x - af) * (s2 / j),
                x,
                lo,
                hi,
                None,
            )
        }
        _ => {
            // y is the second-lobe extremum.
            let [t0, t2] = lobe1_peak(x);
            let y = Expr::y();
            let radicand = Poly::quadratic(
                f.af_af / 2.0 + s2 * (j * (vf - v0) + f.a0_a0 / 2.0),
                0.0,
                -s2,
            );
            (
                t0,
                zero,
                t2,
                x,
                y * (s2 / j),
                zero,
                (y - af) * (s2 / j),
                y,
                ap_lo,
                a_max,
                Some((radicand, RootSign::from_sign(s2))),
            )
        }
    };

    let t3 = t - (t0 + t1 + t2 + t4 + t5 + t6);
    let shape = Shape::new(
        [t0, t1, t2, t3, t4, t5, t6],
        [ap, ap, zero, zero, a2, a2, Expr::constant(af)],
        lo,
        hi,
    );

    Some(match radical {
        Some((d, sign)) => shape.with_radical(d, sign),
        None => shape,
    })
}

// Jerk pattern (+, -, +, -) without cruise: peaks a1 and a2 around a trough am.
fn double_lobe_shape(f: &Frame, class: Limits, t: f64) -> Option<Shape> {
    let (a_max, j) = (f.a_max, f.j_max);
    let (a0, af) = (f.start.a, f.target.a);
    let x = Expr::x();
    let y = Expr::y();
    let zero = Expr::ZERO;
    let a_top = Expr::constant(a_max);
    let a_sum = a0 + af;

    let shape = |a1: Expr, am: Expr, a2: Expr, t1: Expr, t5: Expr, lo: f64, hi: f64| {
        Shape::new(
            [(a1 - a0) / j, t1, (a1 - am) / j, zero, (a2 - am) / j, t5, (a2 - af) / j],
            [a1, a1, am, am, a2, a2, Expr::constant(af)],
            lo,
            hi,
        )
    };

    match class {
        Limits::None => {
            // a1 + a2 = sigma and a1² + a2² = rho, with a1 - a2 = y.
            let sigma0 = (j * t + a_sum) / 2.0;
            let radicand = Poly::quadratic(
                2.0 * j * f.dv + f.a0_a0 + f.af_af - sigma0 * sigma0,
                -2.0 * sigma0,
                1.0,
            );
            let sigma = x + sigma0;
            Some(
                shape((sigma + y) / 2.0, x, (sigma - y) / 2.0, zero, zero, -a_max, a_max)
                    .with_radical(radicand, RootSign::Both),
            )
        }
        Limits::Acc0 | Limits::Acc1 => {
            // The free peak is a_max + y, y <= 0.
            let e0 = j * f.dv + 2.0 * a_max * a_max + (f.a0_a0 + f.af_af) / 2.0
                - a_max * j * t
                - a_max * a_sum;
            let radicand = Poly::quadratic(e0, -2.0 * a_max, 1.0);
            let plateau = t - (y * 2.0 - x * 2.0 + (4.0 * a_max - a_sum)) / j;
            let free = y + a_max;
            let shape = if class == Limits::Acc0 {
                shape(a_top, x, free, plateau, zero, -a_max, a_max)
            } else {
                shape(free, x, a_top, zero, plateau, -a_max, a_max)
            };
            Some(shape.with_radical(radicand, RootSign::Negative))
        }
        Limits::Acc0Acc1 => {
            let e = 2.0 * a_max * j * t - 4.0 * a_max * a_max - f.a0_a0 - f.af_af
                + 2.0 * a_max * a_sum
                - 2.0 * j * f.dv;
            let r = a_max * a_max + e / 2.0;
            if r < 0.0 {
                return None;
            }
            let am = a_max - libm::sqrt(r);
            let s = t - (4.0 * a_max - 2.0 * am - a_sum) / j;
            if s < -f64::EPSILON * t.max(1.0) {
                return None;
            }
            let s = s.max(0.0);
            Some(shape(a_top, Expr::constant(am), a_top, x, s - x, 0.0, s))
        }
        _ => None,
    }
}
