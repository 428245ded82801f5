//! Unit tests for configuration validation.

use jerk_sync::config::{validate_config, KinematicLimits, SolverConfig, SystemConfig};
use jerk_sync::error::{ConfigError, Error};

fn config_with(limits: KinematicLimits) -> SystemConfig {
    let mut config = SystemConfig::default();
    config.insert_axis("x", limits).expect("Failed to insert axis");
    config
}

/// Test validation of a valid configuration.
#[test]
fn test_valid_config_passes_validation() {
    let config = config_with(KinematicLimits::new(1.0, -0.5, 2.0, 10.0));
    assert!(validate_config(&config).is_ok());
}

/// Test validation fails when the velocity range excludes zero.
#[test]
fn test_velocity_range_must_contain_zero() {
    let config = config_with(KinematicLimits::new(2.0, 0.5, 1.0, 1.0));
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidVelocityRange { .. }))
    ));
}

/// Test validation fails for a non-positive acceleration bound.
#[test]
fn test_zero_acceleration_rejected() {
    let config = config_with(KinematicLimits::symmetric(1.0, 0.0, 1.0));
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidMaxAcceleration(_)))
    ));
}

/// Test validation fails for a NaN bound.
#[test]
fn test_nan_limit_rejected() {
    let config = config_with(KinematicLimits::symmetric(1.0, 1.0, f64::NAN));
    assert_eq!(
        validate_config(&config),
        Err(Error::Config(ConfigError::NonFiniteLimit))
    );
}

/// Test validation fails for a non-positive solver tolerance.
#[test]
fn test_invalid_solver_tolerance() {
    let mut config = config_with(KinematicLimits::symmetric(1.0, 1.0, 1.0));
    config.solver = SolverConfig {
        time_tolerance: 0.0,
        ..SolverConfig::default()
    };
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidTolerance(_)))
    ));
}

/// Test that error messages carry the library tag.
#[test]
fn test_error_message_is_tagged() {
    let config = config_with(KinematicLimits::symmetric(1.0, -1.0, 1.0));
    let err = validate_config(&config).unwrap_err();
    assert!(err.to_string().starts_with("[jerk-sync]"));
}
