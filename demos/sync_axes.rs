//! Example: Synchronizing several axes to one duration.
//!
//! This example demonstrates how to:
//! - Load per-axis limits from TOML
//! - Compute each axis' minimum duration and blocked intervals
//! - Pick the earliest duration every axis can reach
//! - Fit every axis to that duration
//!
//! Run with: `cargo run --example sync_axes --features std`

use jerk_sync::{parse_config, Block, Result, State, Step1, Step2};

/// Earliest duration that is not blocked for any axis.
fn common_duration(blocks: &[Block]) -> f64 {
    let mut tf = blocks.iter().map(|b| b.t_min).fold(0.0, f64::max);
    // Moving past one axis' interval can land inside another's.
    while let Some(t) = blocks.iter().map(|b| b.earliest_from(tf)).find(|t| *t > tf) {
        tf = t;
    }
    tf
}

fn main() -> Result<()> {
    println!("=== Axis Synchronization Example ===\n");

    let toml_content = r#"
[solver]
time_tolerance = 1e-11

# Fast linear axis
[axes.x]
max_velocity = 1.0
max_acceleration = 1.0
max_jerk = 1.0

# Stiff axis with a higher jerk bound
[axes.y]
max_velocity = 2.0
max_acceleration = 1.5
max_jerk = 4.0

# Slow vertical axis, slower when lowering
[axes.z]
max_velocity = 0.5
min_velocity = -0.25
max_acceleration = 0.5
max_jerk = 2.0
"#;

    let config = parse_config(toml_content)?;

    let moves = [
        ("x", State::at_rest(0.0), State::at_rest(5.0)),
        ("y", State::at_rest(1.0), State::at_rest(-3.0)),
        ("z", State::at_rest(0.0), State::at_rest(0.5)),
    ];

    println!("Minimum durations:");
    println!("{}", "=".repeat(60));

    let mut blocks = Vec::new();
    for (name, start, target) in moves {
        let limits = config.require_axis(name)?;
        let block = Step1::new(start, target, &limits)
            .with_config(config.solver)
            .solve()?;

        println!("  {}: t_min = {:.4} s ({:?})", name, block.t_min, block.p_min.limits);
        for interval in block.intervals() {
            println!("     blocked: ({:.4}, {:.4})", interval.left, interval.right);
        }
        blocks.push(block);
    }

    let tf = common_duration(&blocks);
    println!("\nCommon duration: {:.4} s\n", tf);

    println!("Synchronized profiles:");
    println!("{}", "=".repeat(60));

    for (name, start, target) in moves {
        let limits = config.require_axis(name)?;
        let profile = Step2::new(tf, start, target, &limits)
            .with_config(config.solver)
            .solve()?;

        println!(
            "  {}: {:?} {:?} {:?}, brake {:.4} s",
            name,
            profile.direction,
            profile.teeth,
            profile.limits,
            profile.t_brake()
        );
        for (i, (t, j)) in profile.t.iter().zip(profile.j.iter()).enumerate() {
            if *t > 0.0 {
                println!("     phase {}: {:.4} s at jerk {:+.3}", i + 1, t, j);
            }
        }

        let end = profile.end_state();
        println!("     end: p = {:.6}, v = {:.2e}, a = {:.2e}", end.p, end.v, end.a);
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
