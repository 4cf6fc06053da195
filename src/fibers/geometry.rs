//! Shared fiber geometry.

use std::f64::consts::PI;

use crate::error::{FiberampError, Result};

/// Records how the effective mode area of a fiber is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectiveAreaType {
    /// The mode area was supplied directly by the user.
    Core,
    /// The mode area is to be derived from a mode solver.
    Mode,
}

/// Geometric and loss properties shared by passive and active fibers.
#[derive(Debug, Clone)]
pub struct FiberGeometry {
    length: f64,
    core_radius: f64,
    mode_area: Option<f64>,
    background_loss: f64,
    core_na: f64,
    effective_area_type: EffectiveAreaType,
}

impl FiberGeometry {
    /// Create a geometry from a core radius; the mode area follows as π·r².
    pub fn from_core_radius(
        length: f64,
        core_radius: f64,
        background_loss: f64,
        core_na: f64,
    ) -> Result<Self> {
        if !core_radius.is_finite() || core_radius <= 0.0 {
            return Err(FiberampError::invalid_fiber(format!(
                "core radius must be positive (got {core_radius} m)"
            )));
        }
        Self::validate_common(length, background_loss, core_na)?;
        Ok(Self {
            length,
            core_radius,
            mode_area: None,
            background_loss,
            core_na,
            effective_area_type: EffectiveAreaType::Mode,
        })
    }

    /// Create a geometry from a directly supplied effective mode area.
    ///
    /// The equivalent core radius is derived as sqrt(area/π). This path is
    /// used for waveguides and other structures where no mode solver runs.
    pub fn from_mode_area(
        length: f64,
        mode_area: f64,
        background_loss: f64,
        core_na: f64,
    ) -> Result<Self> {
        if !mode_area.is_finite() || mode_area <= 0.0 {
            return Err(FiberampError::invalid_fiber(format!(
                "mode area must be positive (got {mode_area} m²)"
            )));
        }
        Self::validate_common(length, background_loss, core_na)?;
        Ok(Self {
            length,
            core_radius: (mode_area / PI).sqrt(),
            mode_area: Some(mode_area),
            background_loss,
            core_na,
            effective_area_type: EffectiveAreaType::Core,
        })
    }

    fn validate_common(length: f64, background_loss: f64, core_na: f64) -> Result<()> {
        if !length.is_finite() || length <= 0.0 {
            return Err(FiberampError::invalid_fiber(format!(
                "length must be positive (got {length} m)"
            )));
        }
        if !background_loss.is_finite() || background_loss < 0.0 {
            return Err(FiberampError::invalid_fiber(format!(
                "background loss must be non-negative (got {background_loss} 1/m)"
            )));
        }
        if !core_na.is_finite() || core_na < 0.0 {
            return Err(FiberampError::invalid_fiber(format!(
                "numerical aperture must be non-negative (got {core_na})"
            )));
        }
        Ok(())
    }

    /// Fiber length (m).
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Core radius (m), derived from the mode area when that was supplied.
    pub fn core_radius(&self) -> f64 {
        self.core_radius
    }

    /// Linear background loss (1/m).
    pub fn background_loss(&self) -> f64 {
        self.background_loss
    }

    /// Numerical aperture of the core.
    pub fn core_na(&self) -> f64 {
        self.core_na
    }

    /// How the effective area of this fiber is determined.
    pub fn effective_area_type(&self) -> EffectiveAreaType {
        self.effective_area_type
    }

    /// Effective mode area (m²): the user-supplied value if present,
    /// otherwise π·r².
    pub fn core_area(&self) -> f64 {
        match self.mode_area {
            Some(area) => area,
            None => PI * self.core_radius * self.core_radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_core_area_from_radius() {
        let geom = FiberGeometry::from_core_radius(1.0, 3e-6, 0.0, 0.12).unwrap();
        assert_relative_eq!(geom.core_area(), PI * 9e-12, max_relative = 1e-12);
        assert_eq!(geom.effective_area_type(), EffectiveAreaType::Mode);
    }

    #[test]
    fn test_core_area_override() {
        let mode_area = 50e-12;
        let geom = FiberGeometry::from_mode_area(1.0, mode_area, 0.0, 0.0).unwrap();
        assert_relative_eq!(geom.core_area(), mode_area);
        assert_eq!(geom.effective_area_type(), EffectiveAreaType::Core);
        // Derived radius is consistent with the supplied area
        assert_relative_eq!(
            PI * geom.core_radius() * geom.core_radius(),
            mode_area,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_rejects_non_positive_length() {
        assert!(matches!(
            FiberGeometry::from_core_radius(0.0, 3e-6, 0.0, 0.12),
            Err(FiberampError::InvalidFiber { .. })
        ));
    }

    #[test]
    fn test_rejects_negative_loss() {
        assert!(matches!(
            FiberGeometry::from_core_radius(1.0, 3e-6, -0.1, 0.12),
            Err(FiberampError::InvalidFiber { .. })
        ));
    }
}
