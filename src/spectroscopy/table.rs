//! Tabulated cross-section data.

use crate::error::{FiberampError, Result};
use crate::freq_to_wl;

use super::InterpolationMode;

/// An immutable table of (wavelength, cross-section) samples.
///
/// Wavelengths are in metres and must be strictly increasing; cross-sections
/// are in m² and must be non-negative. Queries outside the tabulated range
/// clamp to the nearest edge value: physical cross-sections degrade
/// gracefully for slightly out-of-band channels instead of failing the
/// simulation.
#[derive(Debug, Clone)]
pub struct CrossSectionTable {
    wavelengths: Vec<f64>,
    cross_sections: Vec<f64>,
}

impl CrossSectionTable {
    /// Create a table from (wavelength, cross-section) pairs.
    pub fn new(points: Vec<(f64, f64)>) -> Result<Self> {
        if points.is_empty() {
            return Err(FiberampError::invalid_spectrum("table has no points"));
        }

        for &(wl, cs) in &points {
            if !wl.is_finite() || wl <= 0.0 {
                return Err(FiberampError::invalid_spectrum(format!(
                    "wavelength {wl} must be finite and positive"
                )));
            }
            if !cs.is_finite() || cs < 0.0 {
                return Err(FiberampError::invalid_spectrum(format!(
                    "cross-section {cs} at {wl} m must be finite and non-negative"
                )));
            }
        }

        for pair in points.windows(2) {
            if pair[1].0 <= pair[0].0 {
                return Err(FiberampError::invalid_spectrum(format!(
                    "wavelengths must be strictly increasing ({} m followed by {} m)",
                    pair[0].0, pair[1].0
                )));
            }
        }

        let (wavelengths, cross_sections) = points.into_iter().unzip();
        Ok(Self {
            wavelengths,
            cross_sections,
        })
    }

    /// Number of tabulated points.
    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    /// Whether the table is empty (never true for a constructed table).
    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }

    /// Whether every tabulated cross-section is strictly positive.
    ///
    /// Log-domain interpolation requires this.
    pub fn is_strictly_positive(&self) -> bool {
        self.cross_sections.iter().all(|&cs| cs > 0.0)
    }

    /// Interpolated cross-section (m²) at an optical frequency (Hz).
    ///
    /// Out-of-range frequencies clamp to the nearest tabulated value.
    pub fn value_at_freq(&self, freq: f64, mode: InterpolationMode) -> f64 {
        debug_assert!(freq.is_finite() && freq > 0.0);
        self.value_at_wl(freq_to_wl(freq), mode)
    }

    /// Interpolated cross-section (m²) at a vacuum wavelength (m).
    pub fn value_at_wl(&self, wl: f64, mode: InterpolationMode) -> f64 {
        let first = *self.wavelengths.first().unwrap();
        let last = *self.wavelengths.last().unwrap();

        // Edge clamping by design, never an error
        if wl <= first {
            return self.cross_sections[0];
        }
        if wl >= last {
            return *self.cross_sections.last().unwrap();
        }

        // partition_point returns the first index with wavelength > wl,
        // which is >= 1 here because wl > first.
        let hi = self.wavelengths.partition_point(|&w| w <= wl);
        let lo = hi - 1;

        let w0 = self.wavelengths[lo];
        let w1 = self.wavelengths[hi];
        let t = (wl - w0) / (w1 - w0);

        let c0 = self.cross_sections[lo];
        let c1 = self.cross_sections[hi];

        match mode {
            InterpolationMode::Linear => c0 + t * (c1 - c0),
            InterpolationMode::LogDomain => (c0.ln() + t * (c1.ln() - c0.ln())).exp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wl_to_freq;
    use approx::assert_relative_eq;

    fn table() -> CrossSectionTable {
        CrossSectionTable::new(vec![(1.0e-6, 1e-24), (1.1e-6, 3e-24), (1.2e-6, 2e-24)]).unwrap()
    }

    #[test]
    fn test_interpolation_at_nodes() {
        let t = table();
        assert_relative_eq!(t.value_at_wl(1.0e-6, InterpolationMode::Linear), 1e-24);
        assert_relative_eq!(t.value_at_wl(1.1e-6, InterpolationMode::Linear), 3e-24);
        assert_relative_eq!(t.value_at_wl(1.2e-6, InterpolationMode::Linear), 2e-24);
    }

    #[test]
    fn test_linear_midpoint() {
        let t = table();
        assert_relative_eq!(
            t.value_at_wl(1.05e-6, InterpolationMode::Linear),
            2e-24,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_log_domain_midpoint_is_geometric_mean() {
        let t = table();
        let expected = (1e-24f64 * 3e-24f64).sqrt();
        assert_relative_eq!(
            t.value_at_wl(1.05e-6, InterpolationMode::LogDomain),
            expected,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_edge_clamping() {
        let t = table();
        assert_relative_eq!(t.value_at_wl(0.5e-6, InterpolationMode::Linear), 1e-24);
        assert_relative_eq!(t.value_at_wl(2.0e-6, InterpolationMode::Linear), 2e-24);
    }

    #[test]
    fn test_frequency_query_matches_wavelength_query() {
        let t = table();
        let wl = 1.07e-6;
        assert_relative_eq!(
            t.value_at_freq(wl_to_freq(wl), InterpolationMode::Linear),
            t.value_at_wl(wl, InterpolationMode::Linear),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_rejects_unsorted_wavelengths() {
        let result = CrossSectionTable::new(vec![(1.1e-6, 1e-24), (1.0e-6, 1e-24)]);
        assert!(matches!(result, Err(FiberampError::InvalidSpectrum { .. })));
    }

    #[test]
    fn test_rejects_negative_cross_section() {
        let result = CrossSectionTable::new(vec![(1.0e-6, -1e-24)]);
        assert!(matches!(result, Err(FiberampError::InvalidSpectrum { .. })));
    }

    #[test]
    fn test_rejects_empty_table() {
        assert!(matches!(
            CrossSectionTable::new(vec![]),
            Err(FiberampError::InvalidSpectrum { .. })
        ));
    }

    #[test]
    fn test_single_point_table_is_constant() {
        let t = CrossSectionTable::new(vec![(1.0e-6, 5e-25)]).unwrap();
        assert_relative_eq!(t.value_at_wl(0.9e-6, InterpolationMode::Linear), 5e-25);
        assert_relative_eq!(t.value_at_wl(1.5e-6, InterpolationMode::LogDomain), 5e-25);
    }
}
