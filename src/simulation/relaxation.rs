//! Gauss-Seidel relaxation solver for the two-point boundary-value problem.
//!
//! Forward channels have their power pinned at z = 0 and backward channels
//! at z = L; no channel is pinned at both ends. Single shooting on the
//! unknown boundary values is ill-conditioned here because integration
//! errors are amplified exponentially along a pumped fiber, so the solver
//! instead iterates alternating sweeps: integrate all forward channels from
//! z = 0 with the backward profiles frozen, then all backward channels from
//! z = L with the updated forward profiles frozen, until every channel's
//! output power is stationary within the configured relative tolerance.
//! Each sweep uses classical RK4 with frozen profiles interpolated linearly
//! at half steps.

use crate::channels::{Channel, Channels};
use crate::error::{FiberampError, Result};
use crate::fibers::Fiber;

use super::{NUM_ASE_MODES, POWER_EPSILON};

/// Output of a converged relaxation solve.
pub(crate) struct SolveOutput {
    /// Grid positions (m), uniform over [0, L].
    pub z: Vec<f64>,
    /// Power profiles (W), indexed `[channel][node]` in registry iteration
    /// order, node 0 at z = 0.
    pub profiles: Vec<Vec<f64>>,
    /// Iterations used.
    pub iterations: usize,
}

/// Relaxation solver over a fixed uniform grid.
pub struct RelaxationSolver {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Relative convergence tolerance on output powers
    pub tolerance: f64,
    /// Number of grid nodes
    pub grid_points: usize,
}

impl RelaxationSolver {
    /// Create a solver from explicit settings.
    pub fn new(max_iterations: usize, tolerance: f64, grid_points: usize) -> Self {
        Self {
            max_iterations,
            tolerance,
            grid_points,
        }
    }

    pub(crate) fn solve(&self, channels: &Channels<'_>) -> Result<SolveOutput> {
        let system = RateSystem::build(channels);
        let n = self.grid_points;
        let length = channels.fiber().length();
        let dz = length / (n - 1) as f64;
        let z: Vec<f64> = (0..n).map(|j| j as f64 * dz).collect();

        // Initial guess: every channel flat at its input power. ASE bins
        // start at zero and build up from the spontaneous source term.
        let mut profiles: Vec<Vec<f64>> = system
            .channels
            .iter()
            .map(|c| vec![c.input_power; n])
            .collect();

        let forward: Vec<usize> = system.indices_with_sign(1.0);
        let backward: Vec<usize> = system.indices_with_sign(-1.0);

        let mut prev_out = self.output_powers(&system, &profiles);

        for iteration in 1..=self.max_iterations {
            self.sweep(&system, &mut profiles, &forward, &backward, dz, true)?;
            if !backward.is_empty() {
                self.sweep(&system, &mut profiles, &backward, &forward, dz, false)?;
            }

            let out = self.output_powers(&system, &profiles);
            let residual = out
                .iter()
                .zip(&prev_out)
                .map(|(&now, &before)| (now - before).abs() / now.abs().max(POWER_EPSILON))
                .fold(0.0f64, f64::max);

            if residual <= self.tolerance {
                return Ok(SolveOutput {
                    z,
                    profiles,
                    iterations: iteration,
                });
            }
            prev_out = out;

            if iteration == self.max_iterations {
                return Err(FiberampError::convergence_failure(iteration, residual));
            }
        }

        // Only reachable with a zero iteration cap
        Err(FiberampError::convergence_failure(0, f64::INFINITY))
    }

    /// Integrate the `moving` channels across the grid with the `frozen`
    /// channels' stored profiles held fixed. `forward_sweep` selects the
    /// left-to-right direction (used for forward channels); the other sweep
    /// runs right-to-left from the z = L boundary values.
    fn sweep(
        &self,
        system: &RateSystem,
        profiles: &mut [Vec<f64>],
        moving: &[usize],
        frozen: &[usize],
        dz: f64,
        forward_sweep: bool,
    ) -> Result<()> {
        let n = self.grid_points;
        let num_channels = system.channels.len();
        let num_pops = system.saturation.len();

        // Pin the boundary condition exactly at the input end.
        let (start, h) = if forward_sweep {
            (0usize, dz)
        } else {
            (n - 1, -dz)
        };
        let mut state: Vec<f64> = moving.iter().map(|&k| system.channels[k].input_power).collect();
        for (&k, &p) in moving.iter().zip(&state) {
            profiles[k][start] = p;
        }

        let mut full = vec![0.0; num_channels];
        let mut n2 = vec![0.0; num_pops];
        let mut stage = vec![0.0; moving.len()];
        let mut k1 = vec![0.0; moving.len()];
        let mut k2 = vec![0.0; moving.len()];
        let mut k3 = vec![0.0; moving.len()];
        let mut k4 = vec![0.0; moving.len()];

        let steps: Vec<(usize, usize)> = if forward_sweep {
            (0..n - 1).map(|j| (j, j + 1)).collect()
        } else {
            (1..n).rev().map(|j| (j, j - 1)).collect()
        };

        for (src, dst) in steps {
            // Frozen-channel powers at the stage positions
            let frozen_src: Vec<f64> = frozen.iter().map(|&k| profiles[k][src]).collect();
            let frozen_mid: Vec<f64> = frozen
                .iter()
                .map(|&k| 0.5 * (profiles[k][src] + profiles[k][dst]))
                .collect();
            let frozen_dst: Vec<f64> = frozen.iter().map(|&k| profiles[k][dst]).collect();

            let mut eval = |moving_powers: &[f64], frozen_powers: &[f64], out: &mut [f64]| {
                for (&k, &p) in moving.iter().zip(moving_powers) {
                    full[k] = p.max(0.0);
                }
                for (&k, &p) in frozen.iter().zip(frozen_powers) {
                    full[k] = p;
                }
                system.inversion(&full, &mut n2);
                for (slot, &k) in out.iter_mut().zip(moving) {
                    *slot = system.derivative(k, full[k], &n2);
                }
            };

            eval(&state, &frozen_src, &mut k1);

            for i in 0..moving.len() {
                stage[i] = state[i] + 0.5 * h * k1[i];
            }
            eval(&stage, &frozen_mid, &mut k2);

            for i in 0..moving.len() {
                stage[i] = state[i] + 0.5 * h * k2[i];
            }
            eval(&stage, &frozen_mid, &mut k3);

            for i in 0..moving.len() {
                stage[i] = state[i] + h * k3[i];
            }
            eval(&stage, &frozen_dst, &mut k4);

            for i in 0..moving.len() {
                let next =
                    state[i] + h / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
                if !next.is_finite() {
                    let k = moving[i];
                    return Err(FiberampError::NumericalOverflow {
                        channel: system.channels[k].id.clone(),
                        power: next,
                    });
                }
                // Power stays non-negative everywhere along the fiber
                let next = next.max(0.0);
                state[i] = next;
                profiles[moving[i]][dst] = next;
            }
        }

        Ok(())
    }

    fn output_powers(&self, system: &RateSystem, profiles: &[Vec<f64>]) -> Vec<f64> {
        system
            .channels
            .iter()
            .zip(profiles)
            .map(|(c, profile)| {
                if c.sign > 0.0 {
                    *profile.last().unwrap()
                } else {
                    profile[0]
                }
            })
            .collect()
    }
}

/// Per-channel coefficients flattened for the inner integration loop.
struct ChannelCoeffs {
    id: String,
    sign: f64,
    input_power: f64,
    loss: f64,
    /// h·f (J)
    photon_energy: f64,
    /// NUM_ASE_MODES·h·f·df (W per unit gain coefficient); zero for
    /// monochromatic channels
    spont_source: f64,
    gain: Vec<f64>,
    absorption: Vec<f64>,
}

/// The coupled rate-equation system for one fiber and its channels.
struct RateSystem {
    channels: Vec<ChannelCoeffs>,
    /// Giles saturation parameter ζ per ion population; `None` disables the
    /// population (undoped or zero density).
    saturation: Vec<Option<f64>>,
}

impl RateSystem {
    fn build(channels: &Channels<'_>) -> Self {
        let fiber = channels.fiber();
        let saturation = (0..fiber.num_ion_populations())
            .map(|i| fiber.saturation_parameter(i))
            .collect();

        let channels = channels
            .iter()
            .map(|c: &Channel| {
                let photon_energy = c.photon_energy();
                ChannelCoeffs {
                    id: c.id.clone(),
                    sign: c.direction.propagation_sign(),
                    input_power: c.input_power,
                    loss: c.loss,
                    photon_energy,
                    spont_source: NUM_ASE_MODES * photon_energy * c.bandwidth,
                    gain: c.gain.clone(),
                    absorption: c.absorption.clone(),
                }
            })
            .collect();

        Self {
            channels,
            saturation,
        }
    }

    fn indices_with_sign(&self, sign: f64) -> Vec<usize> {
        self.channels
            .iter()
            .enumerate()
            .filter(|(_, c)| c.sign == sign)
            .map(|(k, _)| k)
            .collect()
    }

    /// Fractional upper-state population per ion population at one axial
    /// position, given every channel's local power.
    fn inversion(&self, powers: &[f64], n2: &mut [f64]) {
        for (i, slot) in n2.iter_mut().enumerate() {
            *slot = match self.saturation[i] {
                Some(zeta) => {
                    let mut numerator = 0.0;
                    let mut denominator = 1.0;
                    for (c, &p) in self.channels.iter().zip(powers) {
                        let flux = p / (c.photon_energy * zeta);
                        numerator += flux * c.absorption[i];
                        denominator += flux * (c.absorption[i] + c.gain[i]);
                    }
                    numerator / denominator
                }
                None => 0.0,
            };
        }
    }

    /// dP/dz for channel `k` in the forward z coordinate.
    fn derivative(&self, k: usize, power: f64, n2: &[f64]) -> f64 {
        let c = &self.channels[k];
        let mut net_gain = -c.loss;
        let mut spont_gain = 0.0;
        for (i, &inv) in n2.iter().enumerate() {
            net_gain += (c.gain[i] + c.absorption[i]) * inv - c.absorption[i];
            spont_gain += c.gain[i] * inv;
        }
        c.sign * (net_gain * power + spont_gain * c.spont_source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::Channels;
    use crate::fibers::{ActiveFiber, PassiveFiber};
    use crate::spectroscopy::{CrossSectionTable, InterpolationMode, Spectroscopy};
    use approx::assert_relative_eq;

    fn solver() -> RelaxationSolver {
        RelaxationSolver::new(100, 1e-8, 101)
    }

    fn spectroscopy() -> Spectroscopy {
        let absorption =
            CrossSectionTable::new(vec![(0.95e-6, 2e-24), (1.1e-6, 1e-25)]).unwrap();
        let emission =
            CrossSectionTable::new(vec![(0.95e-6, 1e-25), (1.1e-6, 3e-25)]).unwrap();
        Spectroscopy::new(absorption, emission, 1e-3, InterpolationMode::Linear).unwrap()
    }

    #[test]
    fn test_passive_lossless_fiber_conserves_power() {
        let fiber = PassiveFiber::from_core_radius(2.0, 3e-6, 0.0, 0.12).unwrap();
        let mut channels = Channels::new(&fiber);
        channels.add_forward_signal(1.03e-6, 0.5, &[1.0]).unwrap();
        channels.add_backward_signal(1.06e-6, 0.25, &[1.0]).unwrap();

        let out = solver().solve(&channels).unwrap();
        for profile in &out.profiles {
            let first = profile[0];
            for &p in profile {
                assert_relative_eq!(p, first, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_passive_lossy_fiber_attenuates_exponentially() {
        let loss = 0.5;
        let length = 2.0;
        let fiber = PassiveFiber::from_core_radius(length, 3e-6, loss, 0.12).unwrap();
        let mut channels = Channels::new(&fiber);
        channels.add_forward_signal(1.03e-6, 1.0, &[1.0]).unwrap();

        let out = solver().solve(&channels).unwrap();
        let expected = (-loss * length).exp();
        assert_relative_eq!(
            *out.profiles[0].last().unwrap(),
            expected,
            max_relative = 1e-8
        );
    }

    #[test]
    fn test_boundary_conditions_pinned_exactly() {
        let fiber =
            ActiveFiber::from_mode_area(0.1, 20e-12, 0.0, 0.0, spectroscopy(), 1e25).unwrap();
        let mut channels = Channels::new(&fiber);
        channels.add_forward_pump(0.97e-6, 1.0, &[0.9]).unwrap();
        channels.add_backward_signal(1.05e-6, 1e-3, &[0.85]).unwrap();

        let out = solver().solve(&channels).unwrap();
        // forward pump pinned at z = 0, backward signal pinned at z = L
        assert_eq!(out.profiles[0][0], 1.0);
        assert_eq!(*out.profiles[1].last().unwrap(), 1e-3);
    }

    #[test]
    fn test_unpumped_weak_signal_sees_small_signal_absorption() {
        let length = 0.05;
        let overlap = 0.8;
        let density = 1e25;
        let fiber =
            ActiveFiber::from_mode_area(length, 20e-12, 0.0, 0.0, spectroscopy(), density)
                .unwrap();
        let mut channels = Channels::new(&fiber);
        let wl = 1.0e-6;
        // Weak enough that the signal does not bleach the absorption
        channels.add_forward_signal(wl, 1e-9, &[overlap]).unwrap();

        let out = solver().solve(&channels).unwrap();
        let sigma_a = fiber
            .spectroscopy()
            .channel_absorption_cs(crate::wl_to_freq(wl), 0.0);
        let expected = 1e-9 * (-overlap * sigma_a * density * length).exp();
        assert_relative_eq!(
            *out.profiles[0].last().unwrap(),
            expected,
            max_relative = 1e-4
        );
    }

    #[test]
    fn test_pumped_amplifier_has_gain() {
        let fiber =
            ActiveFiber::from_mode_area(0.02, 20e-12, 0.0, 0.0, spectroscopy(), 1e25).unwrap();
        let mut channels = Channels::new(&fiber);
        channels.add_forward_pump(0.97e-6, 5.0, &[0.9]).unwrap();
        channels.add_forward_signal(1.05e-6, 1e-3, &[0.85]).unwrap();

        let out = solver().solve(&channels).unwrap();
        let signal_out = *out.profiles[1].last().unwrap();
        assert!(signal_out > 1e-3, "expected gain, got {signal_out} W out");
        // Pump is depleted, never amplified
        assert!(*out.profiles[0].last().unwrap() < 5.0);
    }

    #[test]
    fn test_forward_backward_symmetry() {
        // A backward-only configuration mirrors the forward-only one
        let fiber =
            ActiveFiber::from_mode_area(0.02, 20e-12, 0.0, 0.0, spectroscopy(), 1e25).unwrap();

        let mut forward = Channels::new(&fiber);
        forward.add_forward_pump(0.97e-6, 2.0, &[0.9]).unwrap();
        forward.add_forward_signal(1.05e-6, 1e-3, &[0.85]).unwrap();
        let forward_out = solver().solve(&forward).unwrap();

        let mut backward = Channels::new(&fiber);
        backward.add_backward_pump(0.97e-6, 2.0, &[0.9]).unwrap();
        backward.add_backward_signal(1.05e-6, 1e-3, &[0.85]).unwrap();
        let backward_out = solver().solve(&backward).unwrap();

        let fwd_signal = *forward_out.profiles[1].last().unwrap();
        let bwd_signal = backward_out.profiles[1][0];
        assert_relative_eq!(fwd_signal, bwd_signal, max_relative = 1e-6);
    }

    #[test]
    fn test_ase_builds_up_from_zero() {
        let fiber =
            ActiveFiber::from_mode_area(0.02, 20e-12, 0.0, 0.0, spectroscopy(), 1e25).unwrap();
        let mut channels = Channels::new(&fiber);
        channels.add_forward_pump(0.97e-6, 5.0, &[0.9]).unwrap();
        channels.add_ase(1.0e-6, 1.08e-6, 4, &[0.85]).unwrap();

        let out = solver().solve(&channels).unwrap();
        // Channel 0 is the pump; ASE bins follow in forward/backward pairs
        let forward_ase_out: f64 = out.profiles[1..]
            .iter()
            .step_by(2)
            .map(|p| *p.last().unwrap())
            .sum();
        assert!(forward_ase_out > 0.0, "ASE should build up from zero");
    }

    #[test]
    fn test_iteration_cap_yields_convergence_failure() {
        let fiber =
            ActiveFiber::from_mode_area(0.02, 20e-12, 0.0, 0.0, spectroscopy(), 1e25).unwrap();
        let mut channels = Channels::new(&fiber);
        channels.add_forward_pump(0.97e-6, 5.0, &[0.9]).unwrap();
        channels.add_backward_signal(1.05e-6, 1e-3, &[0.85]).unwrap();

        let strict = RelaxationSolver::new(1, 1e-300, 51);
        let result = strict.solve(&channels);
        assert!(matches!(
            result,
            Err(FiberampError::ConvergenceFailure { iterations: 1, .. })
        ));
    }
}
