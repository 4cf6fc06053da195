//! Active (doped) fiber.

use crate::error::{FiberampError, Result};
use crate::spectroscopy::Spectroscopy;

use super::{DopingProfile, Fiber, FiberGeometry};

/// A doped fiber or waveguide with gain governed by its [`Spectroscopy`].
#[derive(Debug, Clone)]
pub struct ActiveFiber {
    geometry: FiberGeometry,
    spectroscopy: Spectroscopy,
    doping_profile: DopingProfile,
}

impl ActiveFiber {
    /// Create a uniformly doped active fiber from a core radius.
    pub fn from_core_radius(
        length: f64,
        core_radius: f64,
        background_loss: f64,
        core_na: f64,
        spectroscopy: Spectroscopy,
        ion_number_density: f64,
    ) -> Result<Self> {
        let geometry =
            FiberGeometry::from_core_radius(length, core_radius, background_loss, core_na)?;
        let doping_profile = DopingProfile::uniform(ion_number_density, core_radius)?;
        Self::new(geometry, spectroscopy, doping_profile)
    }

    /// Create a uniformly doped active fiber from a directly supplied mode
    /// area, as for integrated waveguides.
    pub fn from_mode_area(
        length: f64,
        mode_area: f64,
        background_loss: f64,
        core_na: f64,
        spectroscopy: Spectroscopy,
        ion_number_density: f64,
    ) -> Result<Self> {
        let geometry =
            FiberGeometry::from_mode_area(length, mode_area, background_loss, core_na)?;
        let doping_profile = DopingProfile::uniform(ion_number_density, geometry.core_radius())?;
        Self::new(geometry, spectroscopy, doping_profile)
    }

    /// Create an active fiber with an explicit radial doping profile.
    ///
    /// The outermost profile radius must not exceed the core radius.
    pub fn new(
        geometry: FiberGeometry,
        spectroscopy: Spectroscopy,
        doping_profile: DopingProfile,
    ) -> Result<Self> {
        let outermost = *doping_profile.radii().last().unwrap_or(&0.0);
        // Allow a small tolerance for radii derived from a mode area
        if outermost > geometry.core_radius() * (1.0 + 1e-9) {
            return Err(FiberampError::invalid_doping_profile(format!(
                "outermost profile radius {outermost} m exceeds core radius {} m",
                geometry.core_radius()
            )));
        }
        Ok(Self {
            geometry,
            spectroscopy,
            doping_profile,
        })
    }

    /// The dopant spectroscopy.
    pub fn spectroscopy(&self) -> &Spectroscopy {
        &self.spectroscopy
    }
}

impl Fiber for ActiveFiber {
    fn geometry(&self) -> &FiberGeometry {
        &self.geometry
    }

    fn doping_profile(&self) -> &DopingProfile {
        &self.doping_profile
    }

    fn get_channel_emission_cross_section(&self, freq: f64, bandwidth: f64) -> f64 {
        self.spectroscopy.channel_emission_cs(freq, bandwidth)
    }

    fn get_channel_absorption_cross_section(&self, freq: f64, bandwidth: f64) -> f64 {
        self.spectroscopy.channel_absorption_cs(freq, bandwidth)
    }

    fn saturation_parameter(&self, population: usize) -> Option<f64> {
        let density = *self.doping_profile.ion_number_densities().get(population)?;
        if density == 0.0 {
            return None;
        }
        Some(self.geometry.core_area() * density / self.spectroscopy.upper_state_lifetime())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectroscopy::{CrossSectionTable, InterpolationMode};
    use approx::assert_relative_eq;

    fn spectroscopy() -> Spectroscopy {
        let absorption =
            CrossSectionTable::new(vec![(1.0e-6, 1e-24), (1.1e-6, 1e-24)]).unwrap();
        let emission = CrossSectionTable::new(vec![(1.0e-6, 2e-24), (1.1e-6, 2e-24)]).unwrap();
        Spectroscopy::new(absorption, emission, 1e-3, InterpolationMode::Linear).unwrap()
    }

    #[test]
    fn test_saturation_parameter() {
        let fiber =
            ActiveFiber::from_mode_area(1.0, 20e-12, 0.0, 0.0, spectroscopy(), 1e25).unwrap();
        let expected = 20e-12 * 1e25 / 1e-3;
        assert_relative_eq!(
            fiber.saturation_parameter(0).unwrap(),
            expected,
            max_relative = 1e-12
        );
        assert!(fiber.saturation_parameter(1).is_none());
    }

    #[test]
    fn test_channel_cross_sections_from_spectroscopy() {
        let fiber =
            ActiveFiber::from_mode_area(1.0, 20e-12, 0.0, 0.0, spectroscopy(), 1e25).unwrap();
        let freq = crate::wl_to_freq(1.05e-6);
        assert_relative_eq!(
            fiber.get_channel_absorption_cross_section(freq, 0.0),
            1e-24,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            fiber.get_channel_emission_cross_section(freq, 0.0),
            2e-24,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_rejects_profile_outside_core() {
        let geometry = FiberGeometry::from_core_radius(1.0, 2e-6, 0.0, 0.12).unwrap();
        let profile = DopingProfile::uniform(1e25, 3e-6).unwrap();
        let result = ActiveFiber::new(geometry, spectroscopy(), profile);
        assert!(matches!(
            result,
            Err(FiberampError::InvalidDopingProfile { .. })
        ));
    }
}
