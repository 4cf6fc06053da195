//! Passive (undoped) fiber.

use crate::error::Result;

use super::{DopingProfile, Fiber, FiberGeometry};

/// A fiber with no active dopant: channels see only the background loss.
///
/// The doping profile is a single zero-density population so that channel
/// bookkeeping works the same way as for active fibers.
#[derive(Debug, Clone)]
pub struct PassiveFiber {
    geometry: FiberGeometry,
    doping_profile: DopingProfile,
}

impl PassiveFiber {
    /// Create a passive fiber from a core radius.
    pub fn from_core_radius(
        length: f64,
        core_radius: f64,
        background_loss: f64,
        core_na: f64,
    ) -> Result<Self> {
        let geometry =
            FiberGeometry::from_core_radius(length, core_radius, background_loss, core_na)?;
        Self::from_geometry(geometry)
    }

    /// Create a passive fiber from a directly supplied mode area.
    pub fn from_mode_area(
        length: f64,
        mode_area: f64,
        background_loss: f64,
        core_na: f64,
    ) -> Result<Self> {
        let geometry =
            FiberGeometry::from_mode_area(length, mode_area, background_loss, core_na)?;
        Self::from_geometry(geometry)
    }

    fn from_geometry(geometry: FiberGeometry) -> Result<Self> {
        let doping_profile = DopingProfile::uniform(0.0, geometry.core_radius())?;
        Ok(Self {
            geometry,
            doping_profile,
        })
    }
}

impl Fiber for PassiveFiber {
    fn geometry(&self) -> &FiberGeometry {
        &self.geometry
    }

    fn doping_profile(&self) -> &DopingProfile {
        &self.doping_profile
    }

    fn get_channel_emission_cross_section(&self, _freq: f64, _bandwidth: f64) -> f64 {
        0.0
    }

    fn get_channel_absorption_cross_section(&self, _freq: f64, _bandwidth: f64) -> f64 {
        0.0
    }

    fn saturation_parameter(&self, _population: usize) -> Option<f64> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mode_area_override() {
        let mode_area = 50e-12;
        let fiber = PassiveFiber::from_mode_area(1.0, mode_area, 0.0, 0.0).unwrap();
        assert_relative_eq!(fiber.core_area(), mode_area);
    }

    #[test]
    fn test_zero_cross_sections() {
        let fiber = PassiveFiber::from_core_radius(1.0, 3e-6, 0.0, 0.12).unwrap();
        assert_eq!(fiber.get_channel_absorption_cross_section(3e14, 0.0), 0.0);
        assert_eq!(fiber.get_channel_emission_cross_section(3e14, 0.0), 0.0);
        assert!(fiber.saturation_parameter(0).is_none());
        assert_eq!(fiber.num_ion_populations(), 1);
    }
}
