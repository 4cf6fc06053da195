//! Radial doping profiles.

use crate::error::{FiberampError, Result};

/// Radial distribution of dopant ions in a fiber core.
///
/// The core is divided into concentric rings, each with an ion number
/// density (1/m³), an outer radius (m), and a count of angular sections for
/// the transverse discretization. One ring spanning the whole core with one
/// angular section represents a uniformly doped core.
#[derive(Debug, Clone)]
pub struct DopingProfile {
    ion_number_densities: Vec<f64>,
    radii: Vec<f64>,
    num_angular_sections: usize,
}

impl DopingProfile {
    /// Create a doping profile from per-ring densities and outer radii.
    ///
    /// Radii must be strictly increasing and positive; densities must be
    /// non-negative; the two sequences must have equal length.
    pub fn new(
        ion_number_densities: Vec<f64>,
        radii: Vec<f64>,
        num_angular_sections: usize,
    ) -> Result<Self> {
        if ion_number_densities.is_empty() {
            return Err(FiberampError::invalid_doping_profile(
                "profile has no ion populations",
            ));
        }
        if ion_number_densities.len() != radii.len() {
            return Err(FiberampError::invalid_doping_profile(format!(
                "{} densities but {} radii",
                ion_number_densities.len(),
                radii.len()
            )));
        }
        if num_angular_sections == 0 {
            return Err(FiberampError::invalid_doping_profile(
                "number of angular sections must be at least 1",
            ));
        }

        for &n in &ion_number_densities {
            if !n.is_finite() || n < 0.0 {
                return Err(FiberampError::invalid_doping_profile(format!(
                    "ion number density {n} must be finite and non-negative"
                )));
            }
        }

        let mut prev = 0.0;
        for &r in &radii {
            if !r.is_finite() || r <= prev {
                return Err(FiberampError::invalid_doping_profile(format!(
                    "radii must be positive and strictly increasing (got {r} m after {prev} m)"
                )));
            }
            prev = r;
        }

        Ok(Self {
            ion_number_densities,
            radii,
            num_angular_sections,
        })
    }

    /// A uniformly doped core: one ring at the core radius, one angular
    /// section.
    pub fn uniform(ion_number_density: f64, core_radius: f64) -> Result<Self> {
        Self::new(vec![ion_number_density], vec![core_radius], 1)
    }

    /// Ion number densities per ring (1/m³).
    pub fn ion_number_densities(&self) -> &[f64] {
        &self.ion_number_densities
    }

    /// Outer radius of each ring (m).
    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    /// Number of angular sections in the transverse discretization.
    pub fn num_angular_sections(&self) -> usize {
        self.num_angular_sections
    }

    /// Number of independent ion populations.
    pub fn num_ion_populations(&self) -> usize {
        self.ion_number_densities.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_profile() {
        let profile = DopingProfile::uniform(1e25, 3e-6).unwrap();
        assert_eq!(profile.num_ion_populations(), 1);
        assert_eq!(profile.num_angular_sections(), 1);
        assert_eq!(profile.ion_number_densities(), &[1e25]);
        assert_eq!(profile.radii(), &[3e-6]);
    }

    #[test]
    fn test_rejects_non_increasing_radii() {
        let result = DopingProfile::new(vec![1e25, 1e25], vec![3e-6, 2e-6], 1);
        assert!(matches!(
            result,
            Err(FiberampError::InvalidDopingProfile { .. })
        ));
    }

    #[test]
    fn test_rejects_negative_density() {
        let result = DopingProfile::new(vec![-1e25], vec![3e-6], 1);
        assert!(matches!(
            result,
            Err(FiberampError::InvalidDopingProfile { .. })
        ));
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let result = DopingProfile::new(vec![1e25], vec![2e-6, 3e-6], 1);
        assert!(matches!(
            result,
            Err(FiberampError::InvalidDopingProfile { .. })
        ));
    }
}
