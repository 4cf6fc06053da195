//! Steady-state boundary-value solver.
//!
//! This module provides the numerical engine for the amplifier simulation.
//!
//! ## Power propagation equations
//!
//! Every channel k obeys, in the forward z coordinate,
//!
//! ```text
//! dP_k/dz = u_k * [sum_i ((g_ki + a_ki) * n2_i - a_ki) - l] * P_k
//!         + u_k * sum_i g_ki * n2_i * NUM_ASE_MODES * h * f_k * df_k
//! ```
//!
//! with u_k = +1 (forward) or -1 (backward), g/a the per-ion-population
//! gain/absorption coefficients, l the background loss, and df_k the channel
//! bandwidth (zero for pumps and signals, which therefore carry no
//! spontaneous source term). The fractional upper-state population of ion
//! population i follows the Giles model:
//!
//! ```text
//! n2_i = [sum_k P_k * a_ki / (h f_k ζ_i)]
//!      / [1 + sum_k P_k * (a_ki + g_ki) / (h f_k ζ_i)]
//! ```
//!
//! where ζ_i is the fiber's saturation parameter for that population.
//!
//! Forward channels have their power pinned at z = 0 and backward channels
//! at z = L, which makes the coupled system a two-point boundary-value
//! problem. It is solved by Gauss-Seidel relaxation: alternating RK4 sweeps
//! that integrate all forward channels left-to-right against frozen backward
//! profiles, then all backward channels right-to-left against the updated
//! forward profiles, until every channel's output power is stationary.

mod config;
mod relaxation;
mod result;
mod steady_state;

pub use config::SimulationConfig;
pub use result::{ChannelResult, SimulationResult};
pub use steady_state::{SimulationState, SteadyStateSimulation};

/// Relative convergence tolerance on channel output powers.
pub const CONVERGENCE_TOLERANCE: f64 = 1e-6;

/// Maximum relaxation iterations (one forward plus one backward sweep each).
pub const MAX_ITERATIONS: usize = 100;

/// Default number of grid nodes along the fiber.
pub const DEFAULT_GRID_POINTS: usize = 129;

/// Number of guided polarization modes feeding spontaneous emission into an
/// ASE bin.
pub const NUM_ASE_MODES: f64 = 2.0;

/// Power floor (W) used to keep relative convergence ratios well-defined for
/// channels whose output is essentially zero.
pub const POWER_EPSILON: f64 = 1e-30;
