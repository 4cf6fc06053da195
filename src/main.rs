//! Fiberamp - Doped fiber amplifier simulator
//!
//! A thin CLI over the steady-state solver: reads absorption and emission
//! cross-section tables from two-column text files (wavelength in metres,
//! cross-section in m²; `#` starts a comment), builds one amplifier
//! configuration from the flags, and prints the per-channel results.
//!
//! # Usage
//!
//! ```bash
//! fiberamp yb_absorption.txt yb_emission.txt \
//!     --length 0.02 --mode-area 20e-12 --ion-density 1e25 \
//!     --pump-wl 976e-9 --pump-power 5.0 \
//!     --signal-wl 1030e-9 --signal-power 1e-3
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use fiberamp_core::error::{FiberampError, Result};
use fiberamp_core::fibers::ActiveFiber;
use fiberamp_core::simulation::{SimulationConfig, SteadyStateSimulation};
use fiberamp_core::spectroscopy::{CrossSectionTable, InterpolationMode, Spectroscopy};

/// Doped fiber amplifier steady-state simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Absorption cross-section table (wavelength m, cross-section m²)
    #[arg(value_name = "ABSORPTION_FILE")]
    absorption_file: PathBuf,

    /// Emission cross-section table (wavelength m, cross-section m²)
    #[arg(value_name = "EMISSION_FILE")]
    emission_file: PathBuf,

    /// Fiber length in metres
    #[arg(long, default_value_t = 1.0)]
    length: f64,

    /// Effective mode area in m² (alternative to --core-radius)
    #[arg(long, conflicts_with = "core_radius")]
    mode_area: Option<f64>,

    /// Core radius in metres
    #[arg(long)]
    core_radius: Option<f64>,

    /// Linear background loss in 1/m
    #[arg(long, default_value_t = 0.0)]
    background_loss: f64,

    /// Numerical aperture of the core
    #[arg(long, default_value_t = 0.0)]
    na: f64,

    /// Dopant ion number density in 1/m³
    #[arg(long)]
    ion_density: f64,

    /// Upper-state lifetime in seconds
    #[arg(long, default_value_t = 1e-3)]
    lifetime: f64,

    /// Interpolate cross-sections in the log domain
    #[arg(long)]
    log_interpolation: bool,

    /// Pump wavelength in metres
    #[arg(long)]
    pump_wl: f64,

    /// Pump input power in watts
    #[arg(long)]
    pump_power: f64,

    /// Pump modal overlap with the doped region
    #[arg(long, default_value_t = 0.9)]
    pump_overlap: f64,

    /// Launch the pump backward (from the signal output end)
    #[arg(long)]
    backward_pump: bool,

    /// Signal wavelength in metres
    #[arg(long)]
    signal_wl: f64,

    /// Signal input power in watts
    #[arg(long)]
    signal_power: f64,

    /// Signal modal overlap with the doped region
    #[arg(long, default_value_t = 0.85)]
    signal_overlap: f64,

    /// Add ASE bins over [ASE_START, ASE_END] metres
    #[arg(long, value_name = "ASE_START", requires = "ase_end")]
    ase_start: Option<f64>,

    /// Upper edge of the ASE band in metres
    #[arg(long, value_name = "ASE_END", requires = "ase_start")]
    ase_end: Option<f64>,

    /// Number of ASE bins
    #[arg(long, default_value_t = 20)]
    ase_bins: usize,

    /// Relative convergence tolerance on output powers
    #[arg(long, default_value_t = fiberamp_core::simulation::CONVERGENCE_TOLERANCE)]
    tolerance: f64,

    /// Maximum relaxation iterations
    #[arg(long, default_value_t = fiberamp_core::simulation::MAX_ITERATIONS)]
    max_iterations: usize,

    /// Number of grid nodes along the fiber
    #[arg(long, default_value_t = fiberamp_core::simulation::DEFAULT_GRID_POINTS)]
    grid_points: usize,
}

/// Parse a two-column cross-section table file.
fn read_table(path: &Path) -> Result<CrossSectionTable> {
    let text = fs::read_to_string(path).map_err(|source| FiberampError::FileReadError {
        path: path.display().to_string(),
        source,
    })?;

    let mut points = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let line = line.replace(',', " ");
        let mut fields = line.split_whitespace();
        let parse = |field: Option<&str>| -> Result<f64> {
            field
                .ok_or(())
                .and_then(|f| f.parse::<f64>().map_err(|_| ()))
                .map_err(|_| FiberampError::TableParseError {
                    path: path.display().to_string(),
                    line: index + 1,
                    message: format!("expected 'wavelength cross-section', got '{raw}'"),
                })
        };
        let wl = parse(fields.next())?;
        let cs = parse(fields.next())?;
        points.push((wl, cs));
    }

    CrossSectionTable::new(points)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let absorption = read_table(&args.absorption_file)?;
    let emission = read_table(&args.emission_file)?;
    let mode = if args.log_interpolation {
        InterpolationMode::LogDomain
    } else {
        InterpolationMode::Linear
    };
    let spectroscopy = Spectroscopy::new(absorption, emission, args.lifetime, mode)?;

    let fiber = match (args.mode_area, args.core_radius) {
        (Some(area), None) => ActiveFiber::from_mode_area(
            args.length,
            area,
            args.background_loss,
            args.na,
            spectroscopy,
            args.ion_density,
        )?,
        (None, Some(radius)) => ActiveFiber::from_core_radius(
            args.length,
            radius,
            args.background_loss,
            args.na,
            spectroscopy,
            args.ion_density,
        )?,
        _ => {
            return Err(FiberampError::invalid_fiber(
                "exactly one of --mode-area and --core-radius is required",
            ))
        }
    };

    let config = SimulationConfig::new()
        .with_tolerance(args.tolerance)
        .with_max_iterations(args.max_iterations)
        .with_grid_points(args.grid_points);
    let mut sim = SteadyStateSimulation::with_config(&fiber, config);

    if args.backward_pump {
        sim.add_backward_pump(args.pump_wl, args.pump_power, args.pump_overlap)?;
    } else {
        sim.add_forward_pump(args.pump_wl, args.pump_power, args.pump_overlap)?;
    }
    sim.add_forward_signal(args.signal_wl, args.signal_power, args.signal_overlap)?;
    if let (Some(start), Some(end)) = (args.ase_start, args.ase_end) {
        sim.add_ase(start, end, args.ase_bins, args.signal_overlap)?;
    }

    let result = sim.run()?;

    println!(
        "{:<22} {:>10} {:>12} {:>12} {:>9}",
        "channel", "wl (nm)", "in (W)", "out (W)", "gain (dB)"
    );
    for channel in result.channels() {
        let gain = channel
            .gain_db
            .map(|g| format!("{g:9.2}"))
            .unwrap_or_else(|| "        -".to_string());
        println!(
            "{:<22} {:>10.1} {:>12.4e} {:>12.4e} {}",
            channel.id,
            channel.wavelength * 1e9,
            channel.input_power,
            channel.output_power,
            gain
        );
    }
    eprintln!("converged in {} iteration(s)", result.iterations());

    Ok(())
}
