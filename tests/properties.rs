//! Property-based tests for the jerk-sync solvers.
//!
//! Tests target attainment, bound compliance, mirror symmetry, braked
//! starts and the agreement between Step1's blocked intervals and Step2,
//! using proptest for randomized moves.

use jerk_sync::{KinematicLimits, Profile, State, Step1, Step2};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

const TOL: f64 = 1e-8;

/// Largest bound violation over a dense sampling of the profile.
fn worst_violation(profile: &Profile, limits: &KinematicLimits) -> f64 {
    let n = 500;
    let t0 = profile.t_brake();
    let span = profile.duration() - t0;
    (0..=n)
        .map(|i| profile.state_at(t0 + span * i as f64 / n as f64))
        .map(|s| {
            let dv = (s.v - limits.v_max).max(limits.v_min - s.v);
            let da = s.a.abs() - limits.a_max;
            dv.max(da)
        })
        .fold(f64::NEG_INFINITY, f64::max)
}

fn limits_strategy() -> impl Strategy<Value = KinematicLimits> {
    (0.2f64..5.0, 0.2f64..5.0, 0.5f64..20.0)
        .prop_map(|(v, a, j)| KinematicLimits::symmetric(v, a, j))
}

/// Velocity once the acceleration has been ramped to zero at full jerk.
fn v_at_a_zero(v: f64, a: f64, j_max: f64) -> f64 {
    v + a * a.abs() / (2.0 * j_max)
}

/// Limits, including low jerk bounds where ramping the acceleration away
/// costs more velocity than the whole band.
fn wide_limits_strategy() -> impl Strategy<Value = KinematicLimits> {
    (0.5f64..3.0, 0.25f64..1.0, 0.5f64..3.0, 0.2f64..10.0)
        .prop_map(|(v_max, v_min, a, j)| KinematicLimits::new(v_max, -v_max * v_min, a, j))
}

/// A state inside the bounds that can come to zero acceleration without
/// leaving the velocity band.
fn in_bound_state(
    limits: KinematicLimits,
    p: f64,
    v: f64,
    a: f64,
    backward: bool,
) -> Option<State> {
    let v = limits.v_min + (limits.v_max - limits.v_min) * v;
    let a = limits.a_max * (2.0 * a - 1.0);
    // Arriving with `a` means the velocity came from the other side.
    let settled = if backward {
        v_at_a_zero(v, -a, limits.j_max)
    } else {
        v_at_a_zero(v, a, limits.j_max)
    };
    limits
        .contains_velocity(settled, 0.0)
        .then_some(State::new(p, v, a))
}

/// A start with velocity or acceleration outside the bounds.
fn out_of_bound_start(limits: KinematicLimits, p: f64, excess: f64, side: usize, a: f64) -> State {
    match side % 4 {
        0 => State::new(p, limits.v_max * (1.0 + excess), limits.a_max * a),
        1 => State::new(p, limits.v_min * (1.0 + excess), limits.a_max * a),
        2 => State::new(p, 0.0, limits.a_max * (1.0 + excess)),
        _ => State::new(p, 0.0, -limits.a_max * (1.0 + excess)),
    }
}

/// Step2 succeeds exactly at the durations the block leaves open.
fn check_gap_law(
    start: State,
    target: State,
    limits: &KinematicLimits,
) -> Result<(), TestCaseError> {
    let block = Step1::new(start, target, limits)
        .solve()
        .map_err(|e| TestCaseError::fail(format!("Step1 failed: {}", e)))?;
    prop_assume!(block.t_min > 1e-6);

    let edges: Vec<f64> = block
        .intervals()
        .flat_map(|i| [i.left, i.right])
        .collect();
    let n = 24;
    for k in 0..n {
        let tf = block.t_min * (1.0 + 2.0 * (k as f64 + 0.5) / n as f64);
        if edges.iter().any(|e| (tf - e).abs() <= 1e-7 * tf) {
            continue;
        }

        let mut profile = Profile::default();
        let found = Step2::new(tf, start, target, limits).get_profile(&mut profile);
        prop_assert_eq!(
            found,
            !block.is_blocked(tf),
            "tf = {}, t_min = {}, intervals = {:?}",
            tf,
            block.t_min,
            edges
        );
        if found {
            prop_assert!((profile.duration() - tf).abs() < TOL);
            prop_assert!((profile.end_state().p - target.p).abs() < TOL);
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// For any limits and rest-to-rest distance, the minimum-time profile
    /// reaches the target and stays inside the bounds.
    #[test]
    fn min_time_reaches_target(
        limits in limits_strategy(),
        p0 in -10.0f64..10.0,
        distance in -20.0f64..20.0,
    ) {
        let target = State::at_rest(p0 + distance);
        let block = Step1::new(State::at_rest(p0), target, &limits)
            .solve()
            .expect("rest-to-rest moves are always reachable");

        let end = block.p_min.end_state();
        prop_assert!((end.p - target.p).abs() < TOL, "position {} vs {}", end.p, target.p);
        prop_assert!(end.v.abs() < TOL, "velocity {}", end.v);
        prop_assert!(end.a.abs() < TOL, "acceleration {}", end.a);
        prop_assert!((block.p_min.duration() - block.t_min).abs() < TOL);
        prop_assert!(worst_violation(&block.p_min, &limits) < TOL);
    }

    /// Mirroring a move through the origin keeps its minimum duration.
    #[test]
    fn min_time_is_mirror_symmetric(
        limits in limits_strategy(),
        distance in 0.01f64..20.0,
    ) {
        let up = Step1::new(State::at_rest(0.0), State::at_rest(distance), &limits)
            .solve()
            .expect("reachable");
        let down = Step1::new(State::at_rest(0.0), State::at_rest(-distance), &limits)
            .solve()
            .expect("reachable");

        prop_assert!((up.t_min - down.t_min).abs() < 1e-9 * up.t_min.max(1.0));
    }

    /// Every duration between the minimum and three times the minimum can be
    /// imposed on a rest-to-rest move.
    #[test]
    fn fixed_duration_above_minimum(
        limits in limits_strategy(),
        distance in 0.01f64..20.0,
        stretch in 1.001f64..3.0,
    ) {
        let (start, target) = (State::at_rest(0.0), State::at_rest(distance));
        let block = Step1::new(start, target, &limits).solve().expect("reachable");
        prop_assert!(!block.is_blocked(block.t_min * stretch));

        let tf = block.t_min * stretch;
        let profile = Step2::new(tf, start, target, &limits)
            .solve()
            .expect("durations above the minimum are feasible");

        prop_assert!((profile.duration() - tf).abs() < TOL);
        prop_assert!((profile.end_state().p - distance).abs() < TOL);
        prop_assert!(worst_violation(&profile, &limits) < TOL);
    }

    /// Durations clearly below the minimum are rejected.
    #[test]
    fn fixed_duration_below_minimum_fails(
        limits in limits_strategy(),
        distance in 0.01f64..20.0,
        shrink in 0.1f64..0.95,
    ) {
        let (start, target) = (State::at_rest(0.0), State::at_rest(distance));
        let block = Step1::new(start, target, &limits).solve().expect("reachable");

        let mut profile = Profile::default();
        let found = Step2::new(block.t_min * shrink, start, target, &limits)
            .get_profile(&mut profile);
        prop_assert!(!found);
    }

    /// Solving the same move twice gives bit-identical results.
    #[test]
    fn solvers_are_deterministic(
        limits in limits_strategy(),
        distance in -20.0f64..20.0,
    ) {
        let (start, target) = (State::at_rest(1.0), State::at_rest(1.0 + distance));
        let a = Step1::new(start, target, &limits).solve().expect("reachable");
        let b = Step1::new(start, target, &limits).solve().expect("reachable");
        prop_assert_eq!(&a, &b);

        let tf = a.t_min * 1.5;
        let first = Step2::new(tf, start, target, &limits).solve().ok();
        let second = Step2::new(tf, start, target, &limits).solve().ok();
        prop_assert_eq!(first, second);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Between moving in-bound states, Step2 succeeds at a duration in
    /// `[t_min, 3·t_min]` if and only if the block does not forbid it.
    #[test]
    fn gap_law_for_moving_states(
        limits in wide_limits_strategy(),
        p0 in -5.0f64..5.0,
        pf in -5.0f64..5.0,
        (v0, a0) in (0.0f64..=1.0, 0.0f64..=1.0),
        (vf, af) in (0.0f64..=1.0, 0.0f64..=1.0),
    ) {
        let start = in_bound_state(limits, p0, v0, a0, false);
        let target = in_bound_state(limits, pf, vf, af, true);
        prop_assume!(start.is_some() && target.is_some());
        check_gap_law(start.unwrap(), target.unwrap(), &limits)?;
    }

    /// The same holds when the start has to be braked into the bounds first.
    #[test]
    fn gap_law_for_braked_starts(
        limits in wide_limits_strategy(),
        p0 in -5.0f64..5.0,
        pf in -5.0f64..5.0,
        excess in 0.05f64..1.0,
        side in 0usize..4,
        a0 in -0.5f64..0.5,
    ) {
        let start = out_of_bound_start(limits, p0, excess, side, a0);
        check_gap_law(start, State::at_rest(pf), &limits)?;
    }

    /// From any out-of-bound start the minimum-time profile reaches the
    /// target and, once the velocity is back inside the band, stays there.
    #[test]
    fn braked_start_returns_into_bounds(
        limits in wide_limits_strategy(),
        p0 in -5.0f64..5.0,
        pf in -5.0f64..5.0,
        excess in 0.05f64..1.0,
        side in 0usize..4,
        a0 in -0.5f64..0.5,
    ) {
        let start = out_of_bound_start(limits, p0, excess, side, a0);
        let target = State::at_rest(pf);
        let block = Step1::new(start, target, &limits).solve();
        prop_assert!(block.is_ok(), "Step1 failed from {:?}", start);
        let profile = block.unwrap().p_min;

        let end = profile.end_state();
        prop_assert!((end.p - pf).abs() < TOL, "position {} vs {}", end.p, pf);
        prop_assert!(end.v.abs() < TOL && end.a.abs() < TOL);

        let n = 500;
        let t0 = profile.t_brake();
        let span = profile.duration() - t0;
        let mut inside = false;
        for i in 0..=n {
            let s = profile.state_at(t0 + span * i as f64 / n as f64);
            prop_assert!(s.a.abs() <= limits.a_max + TOL, "acceleration {}", s.a);
            inside |= limits.contains_velocity(s.v, TOL);
            prop_assert!(!inside || limits.contains_velocity(s.v, TOL), "velocity {}", s.v);
        }
    }
}
