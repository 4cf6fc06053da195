//! Dopant spectroscopy: absorption and emission cross-section spectra.
//!
//! A [`Spectroscopy`] bundles one absorption table and one emission table
//! (their wavelength grids need not match), the upper-state lifetime of the
//! laser transition, and the interpolation strategy used for lookups.
//!
//! Queries are made by optical frequency. Frequencies outside a table's
//! support clamp to the nearest tabulated value; extrapolation is a
//! documented approximation, never an error.

mod table;

pub use table::CrossSectionTable;

use crate::error::{FiberampError, Result};

/// Number of Simpson nodes used when averaging a cross-section over a
/// channel's finite bandwidth (e.g. an ASE bin). Must be odd.
pub const BAND_AVERAGE_NODES: usize = 9;

/// Interpolation strategy for cross-section lookups.
///
/// Linear interpolates cross-section values directly. LogDomain interpolates
/// the logarithm of the cross-section, which preserves the smooth exponential
/// decay of absorption/emission wings in sparsely sampled spectra; it
/// requires every tabulated value to be strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    /// Linear interpolation on cross-section values.
    #[default]
    Linear,
    /// Linear interpolation on ln(cross-section).
    LogDomain,
}

/// Absorption and emission cross-section spectra of a dopant.
#[derive(Debug, Clone)]
pub struct Spectroscopy {
    absorption: CrossSectionTable,
    emission: CrossSectionTable,
    upper_state_lifetime: f64,
    mode: InterpolationMode,
}

impl Spectroscopy {
    /// Create a spectroscopy from absorption and emission tables.
    ///
    /// `upper_state_lifetime` is the spontaneous lifetime of the upper laser
    /// level in seconds and must be positive.
    pub fn new(
        absorption: CrossSectionTable,
        emission: CrossSectionTable,
        upper_state_lifetime: f64,
        mode: InterpolationMode,
    ) -> Result<Self> {
        if !upper_state_lifetime.is_finite() || upper_state_lifetime <= 0.0 {
            return Err(FiberampError::InvalidSpectroscopy {
                message: format!(
                    "upper-state lifetime must be positive (got {upper_state_lifetime} s)"
                ),
            });
        }

        if mode == InterpolationMode::LogDomain {
            if !absorption.is_strictly_positive() {
                return Err(FiberampError::InvalidSpectroscopy {
                    message: "log-domain interpolation requires strictly positive \
                              absorption cross-sections"
                        .to_string(),
                });
            }
            if !emission.is_strictly_positive() {
                return Err(FiberampError::InvalidSpectroscopy {
                    message: "log-domain interpolation requires strictly positive \
                              emission cross-sections"
                        .to_string(),
                });
            }
        }

        Ok(Self {
            absorption,
            emission,
            upper_state_lifetime,
            mode,
        })
    }

    /// Upper-state lifetime of the laser transition (s).
    pub fn upper_state_lifetime(&self) -> f64 {
        self.upper_state_lifetime
    }

    /// Absorption cross-section (m²) at an optical frequency (Hz).
    pub fn absorption_cs(&self, freq: f64) -> f64 {
        self.absorption.value_at_freq(freq, self.mode)
    }

    /// Emission cross-section (m²) at an optical frequency (Hz).
    pub fn emission_cs(&self, freq: f64) -> f64 {
        self.emission.value_at_freq(freq, self.mode)
    }

    /// Gain cross-section (m²) at an optical frequency (Hz).
    ///
    /// For the two-level Giles model this is the emission cross-section; the
    /// population inversion is applied separately by the solver.
    pub fn gain_cs(&self, freq: f64) -> f64 {
        self.emission_cs(freq)
    }

    /// Absorption cross-section averaged over a frequency band (m²).
    ///
    /// `bandwidth` is the full width of the band in Hz; zero degenerates to
    /// point evaluation at `freq`.
    pub fn channel_absorption_cs(&self, freq: f64, bandwidth: f64) -> f64 {
        self.band_average(&self.absorption, freq, bandwidth)
    }

    /// Emission cross-section averaged over a frequency band (m²).
    pub fn channel_emission_cs(&self, freq: f64, bandwidth: f64) -> f64 {
        self.band_average(&self.emission, freq, bandwidth)
    }

    /// Average a table over [freq - bw/2, freq + bw/2] with Simpson's rule.
    fn band_average(&self, table: &CrossSectionTable, freq: f64, bandwidth: f64) -> f64 {
        debug_assert!(bandwidth >= 0.0);
        if bandwidth == 0.0 {
            return table.value_at_freq(freq, self.mode);
        }

        let n = BAND_AVERAGE_NODES;
        let f_lo = freq - 0.5 * bandwidth;
        let h = bandwidth / (n - 1) as f64;

        let mut sum = 0.0;
        for i in 0..n {
            let weight = if i == 0 || i == n - 1 {
                1.0
            } else if i % 2 == 1 {
                4.0
            } else {
                2.0
            };
            sum += weight * table.value_at_freq(f_lo + i as f64 * h, self.mode);
        }

        // Simpson integral divided by the band width
        sum * h / 3.0 / bandwidth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wl_to_freq;
    use approx::assert_relative_eq;

    fn flat_spectroscopy() -> Spectroscopy {
        let absorption =
            CrossSectionTable::new(vec![(1.0e-6, 1e-24), (1.1e-6, 1e-24)]).unwrap();
        let emission = CrossSectionTable::new(vec![(1.0e-6, 2e-24), (1.1e-6, 2e-24)]).unwrap();
        Spectroscopy::new(absorption, emission, 1e-3, InterpolationMode::Linear).unwrap()
    }

    #[test]
    fn test_point_lookups() {
        let spec = flat_spectroscopy();
        let freq = wl_to_freq(1.05e-6);
        assert_relative_eq!(spec.absorption_cs(freq), 1e-24, max_relative = 1e-12);
        assert_relative_eq!(spec.emission_cs(freq), 2e-24, max_relative = 1e-12);
        assert_relative_eq!(spec.gain_cs(freq), spec.emission_cs(freq));
    }

    #[test]
    fn test_band_average_of_flat_table_is_flat_value() {
        let spec = flat_spectroscopy();
        let freq = wl_to_freq(1.05e-6);
        assert_relative_eq!(
            spec.channel_absorption_cs(freq, 1e12),
            1e-24,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_zero_bandwidth_is_point_evaluation() {
        let spec = flat_spectroscopy();
        let freq = wl_to_freq(1.02e-6);
        assert_relative_eq!(
            spec.channel_emission_cs(freq, 0.0),
            spec.emission_cs(freq)
        );
    }

    #[test]
    fn test_rejects_non_positive_lifetime() {
        let absorption = CrossSectionTable::new(vec![(1.0e-6, 1e-24)]).unwrap();
        let emission = CrossSectionTable::new(vec![(1.0e-6, 1e-24)]).unwrap();
        let result = Spectroscopy::new(absorption, emission, 0.0, InterpolationMode::Linear);
        assert!(matches!(
            result,
            Err(FiberampError::InvalidSpectroscopy { .. })
        ));
    }

    #[test]
    fn test_log_domain_rejects_zero_cross_section() {
        let absorption = CrossSectionTable::new(vec![(1.0e-6, 0.0), (1.1e-6, 1e-24)]).unwrap();
        let emission = CrossSectionTable::new(vec![(1.0e-6, 1e-24)]).unwrap();
        let result =
            Spectroscopy::new(absorption, emission, 1e-3, InterpolationMode::LogDomain);
        assert!(matches!(
            result,
            Err(FiberampError::InvalidSpectroscopy { .. })
        ));
    }
}
