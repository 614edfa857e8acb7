//! Circuit validation.

use std::collections::HashMap;

use crate::error::{GateSimError, Result};
use crate::gates::Direction;

use super::Circuit;

/// Validate a circuit for simulation.
///
/// Checks:
/// - Every wire endpoint resolves to a pin of a gate in the circuit
/// - Wire sources are output pins and targets are input pins
/// - No input pin is driven by more than one wire
///
/// Circuits built through [`Circuit::add_wire`] always pass; this exists for
/// circuits loaded through [`Circuit::deserialize`], which skips the fan-in
/// check.
pub fn validate_circuit(circuit: &Circuit) -> Result<()> {
    let mut drivers = HashMap::new();

    for wire in circuit.wires() {
        let from = circuit
            .pin(wire.from())
            .ok_or_else(|| GateSimError::dangling(wire.id().to_string(), wire.from().to_string()))?;
        let to = circuit
            .pin(wire.to())
            .ok_or_else(|| GateSimError::dangling(wire.id().to_string(), wire.to().to_string()))?;

        if from.direction() != Direction::Output {
            return Err(GateSimError::invalid_endpoint(
                wire.from(),
                "wire source must be an output pin",
            ));
        }
        if to.direction() != Direction::Input {
            return Err(GateSimError::invalid_endpoint(
                wire.to(),
                "wire target must be an input pin",
            ));
        }

        if let Some(existing) = drivers.insert(wire.to(), wire.id()) {
            return Err(GateSimError::FanInViolation {
                pin: wire.to().to_string(),
                existing,
            });
        }
    }

    Ok(())
}

impl Circuit {
    /// Check the wiring invariants. See [`validate_circuit`].
    pub fn validate(&self) -> Result<()> {
        validate_circuit(self)
    }
}
