//! Configuration validation.

use crate::error::Result;

use super::SystemConfig;

/// Validate a system configuration.
///
/// Checks:
/// - Solver tolerances are positive and finite
/// - Every axis has a velocity range containing zero
/// - Every axis has positive acceleration and jerk bounds
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    config.solver.validate()?;

    for (_, limits) in config.axes.iter() {
        limits.validate()?;
    }

    Ok(())
}
