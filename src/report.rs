//! Circuit loading and text output for the CLI frontend.

use std::io::Write;
use std::path::Path;

use crate::circuit::{Circuit, PinRef};
use crate::error::{GateSimError, Result};
use crate::sim::Snapshot;

/// Read and validate a circuit JSON file.
pub fn load_circuit(path: &Path) -> Result<Circuit> {
    let content = std::fs::read_to_string(path).map_err(|e| GateSimError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    let circuit = Circuit::from_json(&content)?;
    circuit.validate()?;
    log::info!(
        "Loaded {} gate(s) and {} wire(s) from {}",
        circuit.gate_count(),
        circuit.wire_count(),
        path.display()
    );
    Ok(circuit)
}

/// Parse a `<gate>:<pin>=<level>` assignment, where level is `0`/`1` or
/// `false`/`true`.
pub fn parse_assignment(arg: &str) -> Result<(PinRef, bool)> {
    let invalid = || GateSimError::invalid_id(arg, "assignment of the form <gate>:<pin>=<0|1>");
    let (pin, level) = arg.split_once('=').ok_or_else(invalid)?;
    let level = match level.trim() {
        "1" | "true" => true,
        "0" | "false" => false,
        _ => return Err(invalid()),
    };
    Ok((pin.trim().parse()?, level))
}

/// Write one `gate:pin = level` line per pin.
///
/// When `probes` is non-empty only those pins are written, in the given
/// order. A step number, when given, prefixes every line.
pub fn write_snapshot<W: Write>(
    out: &mut W,
    snapshot: &Snapshot,
    probes: &[PinRef],
    step: Option<usize>,
) -> Result<()> {
    let prefix = step.map(|s| format!("[{s}] ")).unwrap_or_default();
    let lines: Vec<(String, bool)> = if probes.is_empty() {
        snapshot
            .iter()
            .map(|(pin, level)| (pin.to_string(), level))
            .collect()
    } else {
        probes
            .iter()
            .map(|pin| (pin.to_string(), snapshot.level(pin)))
            .collect()
    };

    for (pin, level) in lines {
        writeln!(out, "{prefix}{pin} = {}", u8::from(level)).map_err(|e| GateSimError::OutputError {
            message: e.to_string(),
        })?;
    }
    Ok(())
}
