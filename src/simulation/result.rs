//! Results of a converged solve.

use crate::channels::{Channel, ChannelKind, Direction};

/// Solved state of one channel.
#[derive(Debug, Clone)]
pub struct ChannelResult {
    /// Channel identifier, e.g. `forward_signal_0`.
    pub id: String,
    pub kind: ChannelKind,
    pub direction: Direction,
    /// Center vacuum wavelength (m).
    pub wavelength: f64,
    /// Power entering at the channel's input end (W).
    pub input_power: f64,
    /// Power leaving at the channel's exit end (W).
    pub output_power: f64,
    /// 10·log10(output/input), or `None` for channels with zero input power
    /// (ASE bins have no meaningful gain ratio).
    pub gain_db: Option<f64>,
    /// Power along the fiber (W), one value per grid node in forward z order.
    pub powers: Vec<f64>,
}

impl ChannelResult {
    pub(crate) fn new(channel: &Channel, powers: Vec<f64>) -> Self {
        let output_power = match channel.direction {
            Direction::Forward => *powers.last().expect("profile has at least two nodes"),
            Direction::Backward => powers[0],
        };
        let gain_db = if channel.input_power > 0.0 {
            Some(10.0 * (output_power / channel.input_power).log10())
        } else {
            None
        };
        Self {
            id: channel.id.clone(),
            kind: channel.kind,
            direction: channel.direction,
            wavelength: channel.wavelength,
            input_power: channel.input_power,
            output_power,
            gain_db,
            powers,
        }
    }
}

/// Read-only result of a converged steady-state solve.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    z: Vec<f64>,
    channels: Vec<ChannelResult>,
    iterations: usize,
}

impl SimulationResult {
    pub(crate) fn new(z: Vec<f64>, channels: Vec<ChannelResult>, iterations: usize) -> Self {
        Self {
            z,
            channels,
            iterations,
        }
    }

    /// Grid positions along the fiber (m), shared by all power profiles.
    pub fn z(&self) -> &[f64] {
        &self.z
    }

    /// All channel results in registration order.
    pub fn channels(&self) -> &[ChannelResult] {
        &self.channels
    }

    /// Look up one channel by identifier.
    pub fn channel(&self, id: &str) -> Option<&ChannelResult> {
        self.channels.iter().find(|c| c.id == id)
    }

    /// Number of relaxation iterations the solve used.
    pub fn iterations(&self) -> usize {
        self.iterations
    }
}
