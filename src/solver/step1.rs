//! Minimum-time profile and blocked duration intervals.

use core::ops::ControlFlow;

use heapless::Vec;

use super::algebra::{Expr, Poly};
use super::frame::{Boundary, Frame};
use super::shape::{Candidate, RootSign, Shape};
use crate::config::{KinematicLimits, SolverConfig};
use crate::error::{MotionError, Result};
use crate::motion::{Block, Direction, Profile, State, Teeth, MAX_CANDIDATES};

/// Minimum-time solver for one degree of freedom.
///
/// Evaluates the eight limit classes in both directions and keeps every
/// valid profile. The shortest one becomes the block's `p_min`; the others
/// bound the durations that no profile can reach.
///
/// # Example
///
/// ```rust
/// use jerk_sync::{KinematicLimits, State, Step1};
///
/// let limits = KinematicLimits::symmetric(1.0, 1.0, 1.0);
/// let mut step1 = Step1::new(State::at_rest(0.0), State::at_rest(10.0), &limits);
/// assert!(step1.get_profile());
/// assert!((step1.block.t_min - 12.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct Step1 {
    start: State,
    target: State,
    limits: KinematicLimits,
    config: SolverConfig,
    /// Result of the last successful [`Step1::get_profile`].
    pub block: Block,
}

impl Step1 {
    /// Create a solver with the default tolerances.
    pub fn new(start: State, target: State, limits: &KinematicLimits) -> Self {
        Step1 {
            start,
            target,
            limits: limits.resolved(),
            config: SolverConfig::default(),
            block: Block::default(),
        }
    }

    /// Use explicit solver tolerances.
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Compute the minimum-time profile and the blocked intervals.
    ///
    /// Returns `false` when no branch yields a valid profile; `block` is left
    /// untouched in that case.
    pub fn get_profile(&mut self) -> bool {
        let boundary = Boundary::new(self.start, self.target, &self.limits, &self.config);
        let mut candidates = Candidates::new(self.config.duplicate_tolerance);

        if boundary.at_target() {
            let profile = Profile::from_phases(boundary.start, [0.0; 7], Teeth::Uddu.pattern())
                .with_brake(boundary.origin, boundary.brake);
            candidates.push(profile);
        } else {
            for direction in Direction::ALL {
                let frame = boundary.frame(direction);
                vel_branches(&boundary, &frame, &mut candidates);
                acc_branches(&boundary, &frame, &mut candidates);
            }
        }

        match Block::from_candidates(&candidates.profiles) {
            Some(block) => {
                #[cfg(feature = "defmt")]
                defmt::debug!(
                    "step1: t_min = {}, {} candidates",
                    block.t_min,
                    candidates.profiles.len()
                );
                self.block = block;
                true
            }
            None => {
                #[cfg(feature = "defmt")]
                defmt::debug!("step1: no valid profile");
                false
            }
        }
    }

    /// Compute the block, reporting failures as errors.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::NonFiniteState`] for NaN or infinite boundary
    /// states and [`MotionError::Unreachable`] when no profile exists.
    pub fn solve(mut self) -> Result<Block> {
        if !self.start.is_finite() || !self.target.is_finite() {
            return Err(MotionError::NonFiniteState.into());
        }
        if self.get_profile() {
            Ok(self.block)
        } else {
            Err(MotionError::Unreachable.into())
        }
    }
}

// Valid profiles, deduplicated by duration.
struct Candidates {
    profiles: Vec<Profile, MAX_CANDIDATES>,
    tolerance: f64,
}

impl Candidates {
    fn new(tolerance: f64) -> Self {
        Candidates {
            profiles: Vec::new(),
            tolerance,
        }
    }

    fn push(&mut self, profile: Profile) {
        let d = profile.duration();
        let duplicate = self
            .profiles
            .iter()
            .any(|p| libm::fabs(p.duration() - d) <= self.tolerance * d.max(1.0));
        if duplicate {
            return;
        }
        if self.profiles.push(profile).is_err() {
            // Only numerically distinct copies of one topology can get here.
            #[cfg(feature = "defmt")]
            defmt::warn!("step1: candidate with duration {} dropped, buffer full", d);
        }
    }
}

// Cruise at the velocity bound, reached and left in closed form.
fn vel_branches(boundary: &Boundary, f: &Frame, out: &mut Candidates) {
    if f.v_top <= 0.0 {
        return;
    }
    let (a_max, j) = (f.a_max, f.j_max);
    let (v0, a0) = (f.start.v, f.start.a);
    let (vf, af) = (f.target.v, f.target.a);
    let v = f.v_top;

    // First lobe: from (v0, a0) to (v_top, 0).
    let r = j * (v - v0) + f.a0_a0 / 2.0;
    let lobe1_none = (r >= 0.0).then(|| {
        let ap = libm::sqrt(r);
        [(ap - a0) / j, 0.0, ap / j]
    });
    let lobe1_acc0 = Some([
        (a_max - a0) / j,
        (v - v0 + f.a0_a0 / (2.0 * j) - a_max * a_max / j) / a_max,
        a_max / j,
    ]);

    // Second lobe: from (v_top, 0) to (vf, af).
    let r = j * (v - vf) + f.af_af / 2.0;
    let lobe2_none = (r >= 0.0).then(|| {
        let aq = -libm::sqrt(r);
        [-aq / j, 0.0, (af - aq) / j]
    });
    let lobe2_acc1 = Some([
        a_max / j,
        (v - vf + f.af_af / (2.0 * j) - a_max * a_max / j) / a_max,
        (af + a_max) / j,
    ]);

    for l1 in [lobe1_none, lobe1_acc0].into_iter().flatten() {
        for l2 in [lobe2_none, lobe2_acc1].into_iter().flatten() {
            let mut t = [l1[0], l1[1], l1[2], 0.0, l2[0], l2[1], l2[2]];
            t[3] = (f.target.p - f.end_position(&t, Teeth::Uddu)) / v;
            if let Some(profile) = boundary.accept(f, t, Teeth::Uddu) {
                out.push(profile);
            }
        }
    }
}

// No cruise. The descent from the first to the second acceleration extremum
// is one phase while solving and is split at zero acceleration afterwards.
fn acc_branches(boundary: &Boundary, f: &Frame, out: &mut Candidates) {
    let (a_max, j) = (f.a_max, f.j_max);
    let (a0, af) = (f.start.a, f.target.a);
    let x = Expr::x();
    let zero = Expr::ZERO;

    let shape = |ap: Expr, aq: Expr, t1: Expr, t5: Expr, lo: f64, hi: f64| {
        Shape::new(
            [(ap - a0) / j, t1, (ap - aq) / j, zero, zero, t5, (af - aq) / j],
            [ap, ap, aq, aq, aq, aq, Expr::constant(af)],
            lo,
            hi,
        )
    };
    let a_top = Expr::constant(a_max);
    let a_bottom = Expr::constant(-a_max);
    let ap_lo = a0.max(-a_max);

    // Velocity equation: dv = (2ap² - 2aq² - a0² + af²)/2j + ap·t1 + aq·t5
    let k = 2.0 * j * f.dv + f.a0_a0 - f.af_af;
    let none = shape(x, Expr::y(), zero, zero, ap_lo, a_max)
        .with_radical(Poly::quadratic(-k / 2.0, 0.0, 1.0), RootSign::Both);

    let t1 = Expr::poly(Poly::quadratic(
        (f.dv - (2.0 * a_max * a_max - f.a0_a0 + f.af_af) / (2.0 * j)) / a_max,
        0.0,
        1.0 / (j * a_max),
    ));
    let acc0 = shape(a_top, x, t1, zero, -a_max, af.min(a_max));

    let t5 = Expr::poly(Poly::quadratic(
        ((-2.0 * a_max * a_max - f.a0_a0 + f.af_af) / (2.0 * j) - f.dv) / a_max,
        0.0,
        1.0 / (j * a_max),
    ));
    let acc1 = shape(x, a_bottom, zero, t5, ap_lo, a_max);

    let c = (f.dv + (f.a0_a0 - f.af_af) / (2.0 * j)) / a_max;
    let acc0_acc1 = shape(a_top, a_bottom, x, x - c, c.max(0.0), f64::INFINITY);

    for shape in [none, acc0, acc1, acc0_acc1] {
        let _: ControlFlow<()> = shape.solve(f.start, f.target.p, |candidate| {
            if let Some(profile) = boundary.accept(f, split_descent(candidate, j), Teeth::Uddu) {
                out.push(profile);
            }
            ControlFlow::Continue(())
        });
    }
}

fn split_descent(candidate: Candidate, j: f64) -> [f64; 7] {
    let mut t = candidate.t;
    let (ap, aq) = (candidate.a[1], candidate.a[2]);
    if ap > 0.0 && aq < 0.0 {
        t[2] = ap / j;
        t[4] = -aq / j;
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::Limits;

    fn unit_limits() -> KinematicLimits {
        KinematicLimits::symmetric(1.0, 1.0, 1.0)
    }

    #[test]
    fn test_triangle_profile() {
        let mut step1 = Step1::new(State::at_rest(0.0), State::at_rest(1.0), &unit_limits());
        assert!(step1.get_profile());

        let block = &step1.block;
        assert!((block.t_min - 4.0 * libm::cbrt(0.5)).abs() < 1e-9);
        assert_eq!(block.p_min.limits, Limits::None);
        assert_eq!(block.p_min.direction, Direction::Up);
        assert!(block.a().is_none());
    }

    #[test]
    fn test_cruise_profile() {
        let mut step1 = Step1::new(State::at_rest(0.0), State::at_rest(10.0), &unit_limits());
        assert!(step1.get_profile());
        assert!((step1.block.t_min - 12.0).abs() < 1e-9);
        assert_eq!(step1.block.p_min.limits, Limits::Vel);
    }

    #[test]
    fn test_negative_move_leads_down() {
        let mut step1 = Step1::new(State::at_rest(0.0), State::at_rest(-1.0), &unit_limits());
        assert!(step1.get_profile());
        assert_eq!(step1.block.p_min.direction, Direction::Down);
        assert!((step1.block.t_min - 4.0 * libm::cbrt(0.5)).abs() < 1e-9);
    }

    #[test]
    fn test_acceleration_plateaus() {
        // a_max² / j_max = 0.25 s of ramp, 20 units of travel: ACC0_ACC1_VEL
        let limits = KinematicLimits::symmetric(2.0, 1.0, 4.0);
        let mut step1 = Step1::new(State::at_rest(0.0), State::at_rest(20.0), &limits);
        assert!(step1.get_profile());
        assert_eq!(step1.block.p_min.limits, Limits::Acc0Acc1Vel);

        // 2.25 s per lobe covering 2.25 units each, cruise 15.5 / 2 s.
        assert!((step1.block.t_min - (4.5 + 7.75)).abs() < 1e-9);
    }

    #[test]
    fn test_zero_motion() {
        let mut step1 = Step1::new(State::at_rest(3.0), State::at_rest(3.0), &unit_limits());
        assert!(step1.get_profile());
        assert_eq!(step1.block.t_min, 0.0);
        assert_eq!(step1.block.p_min.t, [0.0; 7]);
    }

    #[test]
    fn test_solve_rejects_nan() {
        let step1 = Step1::new(State::at_rest(f64::NAN), State::at_rest(1.0), &unit_limits());
        assert!(matches!(
            step1.solve(),
            Err(crate::Error::Motion(MotionError::NonFiniteState))
        ));
    }

    #[test]
    fn test_candidates_dedupe_and_capacity() {
        let cruise = |d: f64| {
            Profile::from_phases(
                State::default(),
                [0.0, 0.0, 0.0, d, 0.0, 0.0, 0.0],
                Teeth::Uddu.pattern(),
            )
        };
        let mut candidates = Candidates::new(1e-9);
        candidates.push(cruise(1.0));
        candidates.push(cruise(1.0 + 1e-12));
        assert_eq!(candidates.profiles.len(), 1);

        for i in 2..=MAX_CANDIDATES + 1 {
            candidates.push(cruise(i as f64));
        }
        assert_eq!(candidates.profiles.len(), MAX_CANDIDATES);
        assert_eq!(candidates.profiles[MAX_CANDIDATES - 1].duration(), MAX_CANDIDATES as f64);
    }
}
