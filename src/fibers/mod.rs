//! Fiber models: geometry, doping profiles, and the [`Fiber`] capability
//! trait with passive and active variants.
//!
//! Fibers are constructed once during simulation setup and are immutable
//! afterwards; the channel registry and the solver borrow them and never
//! mutate them.

mod active;
mod doping;
mod geometry;
mod mode_solver;
mod passive;

pub use active::ActiveFiber;
pub use doping::DopingProfile;
pub use geometry::{EffectiveAreaType, FiberGeometry};
pub use mode_solver::{ModeDescription, ModeSolver};
pub use passive::PassiveFiber;

/// Capability interface shared by passive and active fibers.
///
/// The solver and channel registry only ever talk to fibers through this
/// trait: geometry, doping layout, band-averaged cross-section lookups, and
/// the gain-saturation parameter per ion population.
pub trait Fiber {
    /// The geometric and loss properties of the fiber.
    fn geometry(&self) -> &FiberGeometry;

    /// The radial doping layout.
    fn doping_profile(&self) -> &DopingProfile;

    /// Emission cross-section (m²) seen by a channel at frequency `freq`,
    /// averaged over its `bandwidth` (Hz; zero means point evaluation).
    /// Returns zero for undoped fibers.
    fn get_channel_emission_cross_section(&self, freq: f64, bandwidth: f64) -> f64;

    /// Absorption cross-section (m²) seen by a channel, band-averaged like
    /// [`Fiber::get_channel_emission_cross_section`].
    fn get_channel_absorption_cross_section(&self, freq: f64, bandwidth: f64) -> f64;

    /// Giles saturation parameter ζ = A·n/τ (1/(m·s)) for one ion
    /// population, or `None` when the population cannot saturate (undoped
    /// fiber or zero density).
    fn saturation_parameter(&self, population: usize) -> Option<f64>;

    /// Fiber length (m).
    fn length(&self) -> f64 {
        self.geometry().length()
    }

    /// Effective mode area (m²).
    fn core_area(&self) -> f64 {
        self.geometry().core_area()
    }

    /// Linear background loss (1/m).
    fn background_loss(&self) -> f64 {
        self.geometry().background_loss()
    }

    /// Number of independent ion populations.
    fn num_ion_populations(&self) -> usize {
        self.doping_profile().num_ion_populations()
    }
}
