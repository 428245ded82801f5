//! Configuration loading from files (std only).
//!
//! The TOML schema has an optional `[solver]` table overriding any of the
//! [`SolverConfig`](super::SolverConfig) tolerances, and one `[axes.<name>]`
//! table per axis:
//!
//! ```toml
//! [solver]
//! time_tolerance = 1e-11
//!
//! [axes.x]
//! max_velocity = 1.0
//! min_velocity = -0.5     # optional, defaults to -max_velocity
//! max_acceleration = 2.0
//! max_jerk = 10.0
//! ```
//!
//! Both entry points validate the result, so a returned configuration
//! always has usable limits and positive tolerances.

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};

use super::SystemConfig;

/// Read an axis configuration file and parse it with [`parse_config`].
///
/// # Errors
///
/// Returns [`ConfigError::IoError`] if the file cannot be read, otherwise
/// the errors of [`parse_config`].
///
/// # Example
///
/// ```rust,ignore
/// use jerk_sync::load_config;
///
/// let config = load_config("axes.toml")?;
/// let x = config.require_axis("x")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SystemConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        let msg = bounded(&format!("{}: {}", path.display(), e));
        Error::Config(ConfigError::IoError(msg))
    })?;

    parse_config(&content)
}

/// Parse an axis configuration from TOML text and validate every axis.
///
/// # Errors
///
/// Returns [`ConfigError::ParseError`] for malformed TOML or missing keys,
/// and the [`validate_config`](super::validate_config) errors for unusable
/// limits or tolerances.
pub fn parse_config(content: &str) -> Result<SystemConfig> {
    let config: SystemConfig = toml::from_str(content)
        .map_err(|e| Error::Config(ConfigError::ParseError(bounded(e.message()))))?;

    super::validation::validate_config(&config)?;

    Ok(config)
}

// Keep as much of the message as fits, cut at a character boundary.
fn bounded(msg: &str) -> heapless::String<128> {
    let mut out = heapless::String::new();
    for c in msg.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
