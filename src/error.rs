//! Error types for the Fiberamp steady-state simulator.
//!
//! This module provides a unified error type [`FiberampError`] that covers
//! all error conditions that can occur during fiber/spectroscopy
//! construction, channel registration, and the steady-state solve.
//!
//! Configuration problems are reported at construction/registration time,
//! before any solve begins; the only error a running solve can produce is
//! [`FiberampError::ConvergenceFailure`].

use thiserror::Error;

/// Result type alias using [`FiberampError`].
pub type Result<T> = std::result::Result<T, FiberampError>;

/// Unified error type for all Fiberamp operations.
#[derive(Error, Debug)]
pub enum FiberampError {
    // ============ Spectroscopy Errors ============
    /// Cross-section table is empty or malformed
    #[error("Invalid cross-section table: {message}")]
    InvalidSpectrum { message: String },

    /// Invalid spectroscopy parameter (lifetime, interpolation data)
    #[error("Invalid spectroscopy: {message}")]
    InvalidSpectroscopy { message: String },

    // ============ Fiber Configuration Errors ============
    /// Invalid fiber geometry (length, radius/area, loss, NA)
    #[error("Invalid fiber geometry: {message}")]
    InvalidFiber { message: String },

    /// Invalid doping profile (radii ordering, negative densities)
    #[error("Invalid doping profile: {message}")]
    InvalidDopingProfile { message: String },

    // ============ Channel Registration Errors ============
    /// Overlap sequence length does not match the fiber's ion populations
    #[error(
        "Channel '{channel}' has {actual} overlap factor(s) but the fiber has \
         {expected} ion population(s)"
    )]
    OverlapLengthMismatch {
        channel: String,
        expected: usize,
        actual: usize,
    },

    /// Overlap factor outside [0, 1]
    #[error("Channel '{channel}' overlap factor {value} is outside [0, 1]")]
    OverlapOutOfRange { channel: String, value: f64 },

    /// Non-positive wavelength
    #[error("Channel '{channel}' wavelength must be positive (got {wl} m)")]
    InvalidWavelength { channel: String, wl: f64 },

    /// Negative input power
    #[error("Channel '{channel}' input power must be non-negative (got {power} W)")]
    NegativeInputPower { channel: String, power: f64 },

    /// Invalid channel parameter not covered by a more specific variant
    #[error("Invalid channel '{channel}': {message}")]
    InvalidChannel { channel: String, message: String },

    /// A channel was registered without overlaps and no mode solver is available
    #[error(
        "Channel '{channel}' has no overlap factors and no mode solver was \
         injected to derive them"
    )]
    MissingModeSolver { channel: String },

    // ============ Simulation Errors ============
    /// No channels were registered before running the solve
    #[error("Simulation has no channels; add at least one pump or signal before running")]
    NoChannels,

    /// Invalid simulation parameter (tolerance, iteration cap, grid size)
    #[error("Invalid simulation parameter: {message}")]
    InvalidSimulationParam { message: String },

    /// The relaxation iteration did not converge
    #[error(
        "Steady-state solve did not converge after {iterations} iterations \
         (residual: {residual:.2e})"
    )]
    ConvergenceFailure { iterations: usize, residual: f64 },

    /// Channel power grew beyond floating-point range during integration
    #[error("Numerical overflow in channel '{channel}' (power: {power:.2e} W)")]
    NumericalOverflow { channel: String, power: f64 },

    // ============ I/O Errors (CLI only) ============
    /// Error reading a cross-section table file
    #[error("Failed to read table file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing a cross-section table file
    #[error("Failed to parse table file '{path}' at line {line}: {message}")]
    TableParseError {
        path: String,
        line: usize,
        message: String,
    },
}

impl FiberampError {
    /// Create an invalid-spectrum error
    pub fn invalid_spectrum(message: impl Into<String>) -> Self {
        Self::InvalidSpectrum {
            message: message.into(),
        }
    }

    /// Create an invalid-fiber error
    pub fn invalid_fiber(message: impl Into<String>) -> Self {
        Self::InvalidFiber {
            message: message.into(),
        }
    }

    /// Create an invalid-doping-profile error
    pub fn invalid_doping_profile(message: impl Into<String>) -> Self {
        Self::InvalidDopingProfile {
            message: message.into(),
        }
    }

    /// Create an invalid-channel error
    pub fn invalid_channel(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidChannel {
            channel: channel.into(),
            message: message.into(),
        }
    }

    /// Create a convergence failure error
    pub fn convergence_failure(iterations: usize, residual: f64) -> Self {
        Self::ConvergenceFailure {
            iterations,
            residual,
        }
    }
}
