//! Gatesim - Digital logic circuit simulator
//!
//! Evaluates a circuit stored in the JSON exchange format.
//!
//! # Usage
//!
//! ```bash
//! gatesim adder.json --set g0:out=1 --set g1:out=0 --probe g5:in
//! gatesim blinker.json --steps 6 --probe g0:q
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use gatesim_core::{
    error::{GateSimError, Result},
    logging, report, Assignment, PinRef, Simulator,
};

/// Digital logic circuit simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the circuit file (.json)
    #[arg(value_name = "CIRCUIT_FILE")]
    circuit_file: PathBuf,

    /// Drive a pin, e.g. `g0:out=1` (repeatable)
    #[arg(long = "set", value_name = "PIN=LEVEL", value_parser = parse_set)]
    inputs: Vec<(PinRef, bool)>,

    /// Only print these pins, e.g. `g4:in` (repeatable)
    #[arg(long = "probe", value_name = "PIN", value_parser = parse_probe)]
    probes: Vec<PinRef>,

    /// Run this many sequential steps instead of one combinational pass
    #[arg(short, long)]
    steps: Option<usize>,

    /// Print debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_set(arg: &str) -> std::result::Result<(PinRef, bool), String> {
    report::parse_assignment(arg).map_err(|e| e.to_string())
}

fn parse_probe(arg: &str) -> std::result::Result<PinRef, String> {
    arg.parse::<PinRef>().map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    // Load and validate the circuit
    let mut circuit = report::load_circuit(&args.circuit_file)?;

    let inputs: Assignment = args.inputs.into_iter().collect();
    let simulator = Simulator::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.steps {
        None => {
            let snapshot = simulator.simulate(&mut circuit, &inputs)?;
            report::write_snapshot(&mut out, &snapshot, &args.probes, None)?;
        }
        Some(steps) => {
            simulator.reset_state(&mut circuit);
            for step in 0..steps {
                let snapshot = simulator.simulate_step(&mut circuit, &inputs)?;
                report::write_snapshot(&mut out, &snapshot, &args.probes, Some(step))?;
                simulator.tick(&mut circuit);
            }
        }
    }

    out.flush().map_err(|e| GateSimError::OutputError {
        message: e.to_string(),
    })?;
    Ok(())
}
