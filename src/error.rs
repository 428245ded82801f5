//! Error types for jerk-sync.
//!
//! The solvers themselves report infeasibility through `bool` results; these
//! errors belong to configuration handling and to the `Result`-returning
//! convenience wrappers around the solvers.

use core::fmt;

/// Tag prefixed to every rendered error message.
pub const TAG: &str = "[jerk-sync]";

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all jerk-sync operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Profile computation error
    Motion(MotionError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Velocity range is inverted or does not contain zero
    InvalidVelocityRange {
        /// Minimum velocity
        min: f64,
        /// Maximum velocity
        max: f64,
    },
    /// Invalid max acceleration (must be > 0)
    InvalidMaxAcceleration(f64),
    /// Invalid max jerk (must be > 0)
    InvalidMaxJerk(f64),
    /// A limit is NaN or infinite
    NonFiniteLimit,
    /// A solver tolerance is not a positive finite number
    InvalidTolerance(f64),
    /// Axis name not found in configuration
    AxisNotFound(heapless::String<32>),
    /// Duplicate axis name in configuration
    DuplicateAxis(heapless::String<32>),
    /// The axis table is full
    TooManyAxes {
        /// Table capacity
        max: usize,
    },
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Profile computation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionError {
    /// Start or target state contains NaN or infinite values
    NonFiniteState,
    /// No minimum-time profile exists for the given boundary states
    Unreachable,
    /// No profile exists at the requested duration
    DurationBlocked {
        /// Requested duration in seconds
        duration: f64,
    },
    /// Requested duration is shorter than the brake pre-phase
    DurationTooShort {
        /// Requested duration in seconds
        duration: f64,
        /// Brake duration in seconds
        minimum: f64,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "{} Configuration error: {}", TAG, e),
            Error::Motion(e) => write!(f, "{} Motion error: {}", TAG, e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidVelocityRange { min, max } => {
                write!(f, "Invalid velocity range [{}, {}]: need min <= 0 <= max", min, max)
            }
            ConfigError::InvalidMaxAcceleration(v) => {
                write!(f, "Invalid max acceleration: {}. Must be > 0", v)
            }
            ConfigError::InvalidMaxJerk(v) => write!(f, "Invalid max jerk: {}. Must be > 0", v),
            ConfigError::NonFiniteLimit => write!(f, "Kinematic limits must be finite"),
            ConfigError::InvalidTolerance(v) => {
                write!(f, "Invalid solver tolerance: {}. Must be finite and > 0", v)
            }
            ConfigError::AxisNotFound(name) => write!(f, "Axis '{}' not found", name),
            ConfigError::DuplicateAxis(name) => write!(f, "Duplicate axis name: '{}'", name),
            ConfigError::TooManyAxes { max } => write!(f, "Too many axes (max {})", max),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::NonFiniteState => write!(f, "Boundary state must be finite"),
            MotionError::Unreachable => write!(f, "Target state is unreachable within the limits"),
            MotionError::DurationBlocked { duration } => {
                write!(f, "No profile exists with duration {} s", duration)
            }
            MotionError::DurationTooShort { duration, minimum } => {
                write!(f, "Duration {} s is shorter than the {} s brake", duration, minimum)
            }
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotionError> for Error {
    fn from(e: MotionError) -> Self {
        Error::Motion(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotionError {}
