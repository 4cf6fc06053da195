//! Solver configuration.

use crate::error::{FiberampError, Result};

use super::{CONVERGENCE_TOLERANCE, DEFAULT_GRID_POINTS, MAX_ITERATIONS};

/// Configuration for the steady-state solver.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Maximum relaxation iterations before the solve is declared failed.
    pub max_iterations: usize,
    /// Relative convergence tolerance on channel output powers.
    pub tolerance: f64,
    /// Number of grid nodes along the fiber (at least 2).
    pub grid_points: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_iterations: MAX_ITERATIONS,
            tolerance: CONVERGENCE_TOLERANCE,
            grid_points: DEFAULT_GRID_POINTS,
        }
    }
}

impl SimulationConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum relaxation iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the relative convergence tolerance.
    ///
    /// Looser tolerance = fewer iterations but less accuracy.
    /// - 1e-6 (default): precise, suitable for gain/efficiency studies
    /// - 1e-4: fast, adequate for coarse parameter sweeps
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the number of grid nodes along the fiber.
    pub fn with_grid_points(mut self, grid_points: usize) -> Self {
        self.grid_points = grid_points;
        self
    }

    /// Check the configuration before a solve.
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(FiberampError::InvalidSimulationParam {
                message: "max_iterations must be at least 1".to_string(),
            });
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(FiberampError::InvalidSimulationParam {
                message: format!("tolerance must be positive (got {})", self.tolerance),
            });
        }
        if self.grid_points < 2 {
            return Err(FiberampError::InvalidSimulationParam {
                message: format!("grid_points must be at least 2 (got {})", self.grid_points),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = SimulationConfig::new()
            .with_max_iterations(10)
            .with_tolerance(1e-4)
            .with_grid_points(33);
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.tolerance, 1e-4);
        assert_eq!(config.grid_points, 33);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(SimulationConfig::new()
            .with_max_iterations(0)
            .validate()
            .is_err());
        assert!(SimulationConfig::new()
            .with_tolerance(0.0)
            .validate()
            .is_err());
        assert!(SimulationConfig::new()
            .with_grid_points(1)
            .validate()
            .is_err());
    }
}
