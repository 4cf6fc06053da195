//! Mode solver injection seam.
//!
//! Geometric mode-field solving is outside the scope of this crate. When
//! overlap factors are not supplied directly the simulation can fall back on
//! an injected [`ModeSolver`]; the crate treats the returned description as
//! opaque data and never depends on its internals. There is deliberately no
//! process-wide default solver instance.

/// Description of a guided mode, as returned by an external mode solver.
#[derive(Debug, Clone)]
pub struct ModeDescription {
    /// Effective area of the mode (m²).
    pub effective_area: f64,
    /// Fraction of the modal power inside the doped core, in [0, 1].
    pub core_overlap: f64,
}

/// An external collaborator that solves for guided fiber modes.
pub trait ModeSolver {
    /// Find the LP(l, m) mode of a step-index fiber at wavelength `wl`.
    fn find_mode(
        &self,
        l: u32,
        m: u32,
        core_radius: f64,
        na: f64,
        wl: f64,
    ) -> ModeDescription;

    /// The mode used for signal channels when none is specified: LP01.
    fn fundamental_mode(&self, core_radius: f64, na: f64, wl: f64) -> ModeDescription {
        self.find_mode(0, 1, core_radius, na, wl)
    }
}
