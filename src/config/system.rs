//! System configuration - root configuration structure.

use heapless::{FnvIndexMap, String};
use serde::Deserialize;

use super::limits::KinematicLimits;
use super::solver::SolverConfig;
use crate::error::{ConfigError, Error, Result};

/// Maximum number of axes in one configuration.
pub const MAX_AXES: usize = 16;

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    /// Solver tolerances shared by every axis.
    #[serde(default)]
    pub solver: SolverConfig,

    /// Named axis limits.
    #[serde(default)]
    pub axes: FnvIndexMap<String<32>, KinematicLimits, MAX_AXES>,
}

impl SystemConfig {
    /// Get the limits of an axis by name, with an omitted minimum velocity resolved.
    pub fn axis(&self, name: &str) -> Option<KinematicLimits> {
        self.axes
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v.resolved())
    }

    /// Get the limits of an axis by name or fail.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::AxisNotFound`] if no axis has that name.
    pub fn require_axis(&self, name: &str) -> Result<KinematicLimits> {
        self.axis(name).ok_or_else(|| {
            Error::Config(ConfigError::AxisNotFound(
                String::try_from(name).unwrap_or_default(),
            ))
        })
    }

    /// Add a new axis.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken, too long, or the table is full.
    pub fn insert_axis(&mut self, name: &str, limits: KinematicLimits) -> Result<()> {
        let key = String::try_from(name).map_err(|_| {
            Error::Config(ConfigError::ParseError(
                String::try_from("axis name too long").unwrap_or_default(),
            ))
        })?;

        if self.axes.contains_key(&key) {
            return Err(Error::Config(ConfigError::DuplicateAxis(key)));
        }

        self.axes
            .insert(key, limits)
            .map_err(|_| Error::Config(ConfigError::TooManyAxes { max: MAX_AXES }))?;

        Ok(())
    }

    /// List all axis names.
    pub fn axis_names(&self) -> impl Iterator<Item = &str> {
        self.axes.keys().map(|s| s.as_str())
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            solver: SolverConfig::default(),
            axes: FnvIndexMap::new(),
        }
    }
}
