//! Optical channels and the per-fiber channel registry.
//!
//! A [`Channel`] is one propagating optical field: a pump, a signal, or an
//! ASE band, travelling forward or backward with a modal overlap per ion
//! population. The [`Channels`] registry owns every channel attached to one
//! fiber, validates them at registration time (fail fast, never
//! mid-integration), and precomputes the per-population gain and absorption
//! coefficients the solver consumes.

use std::fmt;

use crate::error::{FiberampError, Result};
use crate::fibers::Fiber;
use crate::{wl_to_freq, SPEED_OF_LIGHT};

/// Propagation direction along the fiber axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Propagates from z = 0 towards z = L; boundary condition at z = 0.
    Forward,
    /// Propagates from z = L towards z = 0; boundary condition at z = L.
    Backward,
}

impl Direction {
    /// Sign of dP/dz in the forward z coordinate: +1 forward, -1 backward.
    pub fn propagation_sign(&self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Backward => write!(f, "backward"),
        }
    }
}

/// What kind of optical field a channel carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Pump,
    Signal,
    /// Amplified spontaneous emission bin; carries a finite bandwidth and a
    /// spontaneous source term.
    Ase,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKind::Pump => write!(f, "pump"),
            ChannelKind::Signal => write!(f, "signal"),
            ChannelKind::Ase => write!(f, "ase"),
        }
    }
}

/// One propagating optical field.
#[derive(Debug, Clone)]
pub struct Channel {
    /// Stable identifier, e.g. `forward_signal_0`.
    pub id: String,
    pub kind: ChannelKind,
    pub direction: Direction,
    /// Center vacuum wavelength (m).
    pub wavelength: f64,
    /// Center optical frequency (Hz).
    pub frequency: f64,
    /// Full frequency bandwidth (Hz); zero for pumps and signals.
    pub bandwidth: f64,
    /// Power entering the fiber at the channel's input end (W).
    pub input_power: f64,
    /// Modal overlap with each ion population, each in [0, 1].
    pub overlaps: Vec<f64>,
    /// Per-population gain coefficient overlap·σe·n (1/m).
    pub gain: Vec<f64>,
    /// Per-population absorption coefficient overlap·σa·n (1/m).
    pub absorption: Vec<f64>,
    /// Background loss of the owning fiber (1/m).
    pub loss: f64,
}

impl Channel {
    /// Photon energy h·f at the channel's center frequency (J).
    pub fn photon_energy(&self) -> f64 {
        crate::PLANCK_CONSTANT * self.frequency
    }
}

/// Registry of every channel propagating through one fiber.
///
/// Holds a non-owning reference to the fiber for cross-section and overlap
/// validation lookups; never mutates it.
pub struct Channels<'a> {
    fiber: &'a dyn Fiber,
    pub forward_pumps: Vec<Channel>,
    pub forward_signals: Vec<Channel>,
    pub backward_pumps: Vec<Channel>,
    pub backward_signals: Vec<Channel>,
    pub ase: Vec<Channel>,
}

impl<'a> Channels<'a> {
    /// Create an empty registry for a fiber.
    pub fn new(fiber: &'a dyn Fiber) -> Self {
        Self {
            fiber,
            forward_pumps: Vec::new(),
            forward_signals: Vec::new(),
            backward_pumps: Vec::new(),
            backward_signals: Vec::new(),
            ase: Vec::new(),
        }
    }

    /// The fiber the channels propagate through.
    pub fn fiber(&self) -> &'a dyn Fiber {
        self.fiber
    }

    /// Total number of registered channels.
    pub fn len(&self) -> usize {
        self.forward_pumps.len()
            + self.forward_signals.len()
            + self.backward_pumps.len()
            + self.backward_signals.len()
            + self.ase.len()
    }

    /// Whether no channels have been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over all channels in a stable order: forward pumps, forward
    /// signals, backward pumps, backward signals, ASE bins.
    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.forward_pumps
            .iter()
            .chain(self.forward_signals.iter())
            .chain(self.backward_pumps.iter())
            .chain(self.backward_signals.iter())
            .chain(self.ase.iter())
    }

    /// Validate and register one channel.
    ///
    /// `bandwidth` is the full frequency width of the channel in Hz (zero
    /// for monochromatic pumps and signals). The per-population gain and
    /// absorption coefficients are computed here from the fiber's
    /// band-averaged cross-sections and the doping densities.
    pub fn create_channel(
        &mut self,
        kind: ChannelKind,
        direction: Direction,
        input_power: f64,
        wl: f64,
        bandwidth: f64,
        overlaps: &[f64],
    ) -> Result<()> {
        let id = self.next_id(kind, direction);

        if !wl.is_finite() || wl <= 0.0 {
            return Err(FiberampError::InvalidWavelength { channel: id, wl });
        }
        if !input_power.is_finite() || input_power < 0.0 {
            return Err(FiberampError::NegativeInputPower {
                channel: id,
                power: input_power,
            });
        }
        if !bandwidth.is_finite() || bandwidth < 0.0 {
            return Err(FiberampError::invalid_channel(
                id,
                format!("bandwidth must be non-negative (got {bandwidth} Hz)"),
            ));
        }

        let num_populations = self.fiber.num_ion_populations();
        if overlaps.len() != num_populations {
            return Err(FiberampError::OverlapLengthMismatch {
                channel: id,
                expected: num_populations,
                actual: overlaps.len(),
            });
        }
        for &overlap in overlaps {
            if !overlap.is_finite() || !(0.0..=1.0).contains(&overlap) {
                return Err(FiberampError::OverlapOutOfRange {
                    channel: id,
                    value: overlap,
                });
            }
        }

        let freq = wl_to_freq(wl);
        let sigma_e = self.fiber.get_channel_emission_cross_section(freq, bandwidth);
        let sigma_a = self.fiber.get_channel_absorption_cross_section(freq, bandwidth);
        let densities = self.fiber.doping_profile().ion_number_densities();

        let gain = overlaps
            .iter()
            .zip(densities)
            .map(|(&overlap, &n)| overlap * sigma_e * n)
            .collect();
        let absorption = overlaps
            .iter()
            .zip(densities)
            .map(|(&overlap, &n)| overlap * sigma_a * n)
            .collect();

        let channel = Channel {
            id,
            kind,
            direction,
            wavelength: wl,
            frequency: freq,
            bandwidth,
            input_power,
            overlaps: overlaps.to_vec(),
            gain,
            absorption,
            loss: self.fiber.background_loss(),
        };

        match (kind, direction) {
            (ChannelKind::Pump, Direction::Forward) => self.forward_pumps.push(channel),
            (ChannelKind::Pump, Direction::Backward) => self.backward_pumps.push(channel),
            (ChannelKind::Signal, Direction::Forward) => self.forward_signals.push(channel),
            (ChannelKind::Signal, Direction::Backward) => self.backward_signals.push(channel),
            (ChannelKind::Ase, _) => self.ase.push(channel),
        }
        Ok(())
    }

    /// Register a forward-propagating pump.
    pub fn add_forward_pump(&mut self, wl: f64, input_power: f64, overlaps: &[f64]) -> Result<()> {
        self.create_channel(
            ChannelKind::Pump,
            Direction::Forward,
            input_power,
            wl,
            0.0,
            overlaps,
        )
    }

    /// Register a backward-propagating pump.
    pub fn add_backward_pump(&mut self, wl: f64, input_power: f64, overlaps: &[f64]) -> Result<()> {
        self.create_channel(
            ChannelKind::Pump,
            Direction::Backward,
            input_power,
            wl,
            0.0,
            overlaps,
        )
    }

    /// Register a forward-propagating signal.
    pub fn add_forward_signal(
        &mut self,
        wl: f64,
        input_power: f64,
        overlaps: &[f64],
    ) -> Result<()> {
        self.create_channel(
            ChannelKind::Signal,
            Direction::Forward,
            input_power,
            wl,
            0.0,
            overlaps,
        )
    }

    /// Register a backward-propagating signal.
    pub fn add_backward_signal(
        &mut self,
        wl: f64,
        input_power: f64,
        overlaps: &[f64],
    ) -> Result<()> {
        self.create_channel(
            ChannelKind::Signal,
            Direction::Backward,
            input_power,
            wl,
            0.0,
            overlaps,
        )
    }

    /// Register paired forward/backward ASE bins covering
    /// [`wl_start`, `wl_end`] in `num_bins` equal wavelength slices.
    ///
    /// Each bin starts with zero input power and builds up from the
    /// spontaneous emission source term during the solve.
    pub fn add_ase(
        &mut self,
        wl_start: f64,
        wl_end: f64,
        num_bins: usize,
        overlaps: &[f64],
    ) -> Result<()> {
        if num_bins == 0 || !wl_start.is_finite() || !wl_end.is_finite() || wl_end <= wl_start {
            return Err(FiberampError::invalid_channel(
                "ase",
                format!(
                    "ASE band must have wl_end > wl_start and at least one bin \
                     (got [{wl_start}, {wl_end}] m, {num_bins} bins)"
                ),
            ));
        }
        if wl_start <= 0.0 {
            return Err(FiberampError::InvalidWavelength {
                channel: "ase".to_string(),
                wl: wl_start,
            });
        }

        let dwl = (wl_end - wl_start) / num_bins as f64;
        for bin in 0..num_bins {
            let center = wl_start + (bin as f64 + 0.5) * dwl;
            // Exact frequency width of the wavelength slice
            let bandwidth =
                SPEED_OF_LIGHT / (center - 0.5 * dwl) - SPEED_OF_LIGHT / (center + 0.5 * dwl);
            self.create_channel(
                ChannelKind::Ase,
                Direction::Forward,
                0.0,
                center,
                bandwidth,
                overlaps,
            )?;
            self.create_channel(
                ChannelKind::Ase,
                Direction::Backward,
                0.0,
                center,
                bandwidth,
                overlaps,
            )?;
        }
        Ok(())
    }

    fn next_id(&self, kind: ChannelKind, direction: Direction) -> String {
        let index = match (kind, direction) {
            (ChannelKind::Pump, Direction::Forward) => self.forward_pumps.len(),
            (ChannelKind::Pump, Direction::Backward) => self.backward_pumps.len(),
            (ChannelKind::Signal, Direction::Forward) => self.forward_signals.len(),
            (ChannelKind::Signal, Direction::Backward) => self.backward_signals.len(),
            (ChannelKind::Ase, _) => self
                .ase
                .iter()
                .filter(|c| c.direction == direction)
                .count(),
        };
        format!("{direction}_{kind}_{index}")
    }
}
