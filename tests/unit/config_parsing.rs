//! Unit tests for TOML configuration parsing.

use jerk_sync::config::{load_config, SystemConfig};

/// Test parsing a valid axis configuration from TOML.
#[test]
fn test_parse_axis_config() {
    let toml_str = r#"
[axes.x]
max_velocity = 1.5
min_velocity = -0.5
max_acceleration = 3.0
max_jerk = 30.0
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let x = config.axis("x").expect("Axis not found");

    assert_eq!(x.v_max, 1.5);
    assert_eq!(x.v_min, -0.5);
    assert_eq!(x.a_max, 3.0);
    assert_eq!(x.j_max, 30.0);
}

/// Test that an omitted minimum velocity mirrors the maximum.
#[test]
fn test_parse_symmetric_velocity_default() {
    let toml_str = r#"
[axes.theta]
max_velocity = 2.0
max_acceleration = 1.0
max_jerk = 1.0
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    assert_eq!(config.axis("theta").unwrap().v_min, -2.0);
}

/// Test parsing solver tolerances, with defaults for omitted keys.
#[test]
fn test_parse_solver_section() {
    let toml_str = r#"
[solver]
eps = 1e-13
duplicate_tolerance = 1e-8

[axes.x]
max_velocity = 1.0
max_acceleration = 1.0
max_jerk = 1.0
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    assert_eq!(config.solver.eps, 1e-13);
    assert_eq!(config.solver.duplicate_tolerance, 1e-8);
    assert_eq!(config.solver.position_tolerance, 1e-9);
}

/// Test parsing several axes keeps their declaration order.
#[test]
fn test_parse_multiple_axes() {
    let toml_str = r#"
[axes.x]
max_velocity = 1.0
max_acceleration = 1.0
max_jerk = 1.0

[axes.y]
max_velocity = 2.0
max_acceleration = 2.0
max_jerk = 2.0

[axes.z]
max_velocity = 3.0
max_acceleration = 3.0
max_jerk = 3.0
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let names: Vec<&str> = config.axis_names().collect();
    assert_eq!(names, ["x", "y", "z"]);
}

/// Test that a missing key is a parse error.
#[test]
fn test_missing_jerk_fails() {
    let toml_str = r#"
[axes.x]
max_velocity = 1.0
max_acceleration = 1.0
"#;

    let result: Result<SystemConfig, _> = toml::from_str(toml_str);
    assert!(result.is_err());
}

/// Test loading a configuration file from disk.
#[test]
fn test_load_config_from_file() {
    let path = std::env::temp_dir().join(format!("jerk_sync_axes_{}.toml", std::process::id()));
    std::fs::write(
        &path,
        "[axes.x]\nmax_velocity = 1.0\nmax_acceleration = 2.0\nmax_jerk = 3.0\n",
    )
    .expect("Failed to write config");

    let config = load_config(&path).expect("Failed to load config");
    std::fs::remove_file(&path).ok();

    assert_eq!(config.axis("x").unwrap().j_max, 3.0);
}

/// Test that a missing file is reported as an I/O error.
#[test]
fn test_load_missing_file() {
    let result = load_config("/nonexistent/jerk_sync_axes.toml");
    assert!(matches!(
        result,
        Err(jerk_sync::Error::Config(jerk_sync::ConfigError::IoError(_)))
    ));
}
