//! Steady-state simulation orchestration.

use crate::channels::{ChannelKind, Channels, Direction};
use crate::error::{FiberampError, Result};
use crate::fibers::{Fiber, ModeSolver};

use super::relaxation::RelaxationSolver;
use super::result::{ChannelResult, SimulationResult};
use super::SimulationConfig;

/// Lifecycle of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationState {
    /// No channels registered yet.
    Unconfigured,
    /// At least one channel registered; ready to solve.
    Configured,
    /// A solve is in progress.
    Solving,
    /// The last solve converged.
    Converged,
    /// The last solve failed (non-convergence or overflow).
    Failed,
}

/// Steady-state amplifier simulation over one fiber.
///
/// Owns the channel registry and the solver configuration; borrows the
/// fiber. `run()` is synchronous and CPU-bound, performs no I/O, and is
/// idempotent for an unchanged channel configuration.
pub struct SteadyStateSimulation<'a> {
    channels: Channels<'a>,
    config: SimulationConfig,
    mode_solver: Option<Box<dyn ModeSolver>>,
    state: SimulationState,
}

impl<'a> SteadyStateSimulation<'a> {
    /// Create a simulation for a fiber with the default configuration.
    pub fn new(fiber: &'a dyn Fiber) -> Self {
        Self::with_config(fiber, SimulationConfig::default())
    }

    /// Create a simulation with a custom solver configuration.
    pub fn with_config(fiber: &'a dyn Fiber, config: SimulationConfig) -> Self {
        Self {
            channels: Channels::new(fiber),
            config,
            mode_solver: None,
            state: SimulationState::Unconfigured,
        }
    }

    /// Inject an external mode solver, used to derive overlap factors for
    /// channels registered without explicit overlaps.
    pub fn with_mode_solver(mut self, solver: Box<dyn ModeSolver>) -> Self {
        self.mode_solver = Some(solver);
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SimulationState {
        self.state
    }

    /// The channel registry.
    pub fn channels(&self) -> &Channels<'a> {
        &self.channels
    }

    /// Register a channel, broadcasting a scalar overlap across all ion
    /// populations or deriving it from the injected mode solver when `None`.
    pub fn add_channel(
        &mut self,
        kind: ChannelKind,
        direction: Direction,
        wl: f64,
        input_power: f64,
        overlap: Option<f64>,
    ) -> Result<()> {
        let overlaps = self.resolve_overlaps(kind, direction, wl, overlap)?;
        self.channels
            .create_channel(kind, direction, input_power, wl, 0.0, &overlaps)?;
        self.state = SimulationState::Configured;
        Ok(())
    }

    /// Register a forward pump with a uniform overlap factor.
    pub fn add_forward_pump(&mut self, wl: f64, input_power: f64, overlap: f64) -> Result<()> {
        self.add_channel(
            ChannelKind::Pump,
            Direction::Forward,
            wl,
            input_power,
            Some(overlap),
        )
    }

    /// Register a backward pump with a uniform overlap factor.
    pub fn add_backward_pump(&mut self, wl: f64, input_power: f64, overlap: f64) -> Result<()> {
        self.add_channel(
            ChannelKind::Pump,
            Direction::Backward,
            wl,
            input_power,
            Some(overlap),
        )
    }

    /// Register a forward signal with a uniform overlap factor.
    pub fn add_forward_signal(&mut self, wl: f64, input_power: f64, overlap: f64) -> Result<()> {
        self.add_channel(
            ChannelKind::Signal,
            Direction::Forward,
            wl,
            input_power,
            Some(overlap),
        )
    }

    /// Register a backward signal with a uniform overlap factor.
    pub fn add_backward_signal(&mut self, wl: f64, input_power: f64, overlap: f64) -> Result<()> {
        self.add_channel(
            ChannelKind::Signal,
            Direction::Backward,
            wl,
            input_power,
            Some(overlap),
        )
    }

    /// Register paired forward/backward ASE bins over a wavelength band with
    /// a uniform overlap factor.
    pub fn add_ase(
        &mut self,
        wl_start: f64,
        wl_end: f64,
        num_bins: usize,
        overlap: f64,
    ) -> Result<()> {
        let overlaps = vec![overlap; self.channels.fiber().num_ion_populations()];
        self.channels.add_ase(wl_start, wl_end, num_bins, &overlaps)?;
        self.state = SimulationState::Configured;
        Ok(())
    }

    fn resolve_overlaps(
        &self,
        kind: ChannelKind,
        direction: Direction,
        wl: f64,
        overlap: Option<f64>,
    ) -> Result<Vec<f64>> {
        let num_populations = self.channels.fiber().num_ion_populations();
        match overlap {
            Some(value) => Ok(vec![value; num_populations]),
            None => {
                let solver = self.mode_solver.as_ref().ok_or_else(|| {
                    FiberampError::MissingModeSolver {
                        channel: format!("{direction}_{kind}"),
                    }
                })?;
                let geometry = self.channels.fiber().geometry();
                let mode =
                    solver.fundamental_mode(geometry.core_radius(), geometry.core_na(), wl);
                Ok(vec![mode.core_overlap; num_populations])
            }
        }
    }

    /// Solve the boundary-value problem and report per-channel results.
    ///
    /// Transitions to `Converged` on success and `Failed` on
    /// non-convergence; a failed solve returns the diagnostic error rather
    /// than an approximate result.
    pub fn run(&mut self) -> Result<SimulationResult> {
        if self.channels.is_empty() {
            return Err(FiberampError::NoChannels);
        }
        self.config.validate()?;

        self.state = SimulationState::Solving;
        let solver = RelaxationSolver::new(
            self.config.max_iterations,
            self.config.tolerance,
            self.config.grid_points,
        );

        match solver.solve(&self.channels) {
            Ok(output) => {
                self.state = SimulationState::Converged;
                let channels = self
                    .channels
                    .iter()
                    .zip(output.profiles)
                    .map(|(channel, powers)| ChannelResult::new(channel, powers))
                    .collect();
                Ok(SimulationResult::new(output.z, channels, output.iterations))
            }
            Err(err) => {
                self.state = SimulationState::Failed;
                Err(err)
            }
        }
    }
}
