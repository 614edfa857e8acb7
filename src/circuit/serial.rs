//! Serialized circuit shape and conversions.
//!
//! ```text
//! {
//!   "gates": [ { "type": "NAND", "id": "g0", "position": {"x": 0, "y": 0}, "label": "..." } ],
//!   "wires": [ { "id": "w0", "from": "g0:out", "to": "g1:in", "color": "..." } ]
//! }
//! ```
//!
//! `label` is omitted when absent, `color` when it is the default, and
//! `waypoints` when empty. Serializing a deserialized circuit reproduces an
//! equal [`SerializedCircuit`]; see [`Position`] for how coordinates are
//! written back.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::graph::Circuit;
use super::types::{GateId, PinRef, Position, WireId};
use super::wire::Wire;
use crate::error::{GateSimError, Result};
use crate::gates::{Gate, GateKind, Pin};
use crate::DEFAULT_WIRE_COLOR;

/// Exchange form of a whole circuit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SerializedCircuit {
    pub gates: Vec<SerializedGate>,
    pub wires: Vec<SerializedWire>,
}

/// Exchange form of one gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedGate {
    #[serde(rename = "type")]
    pub kind: GateKind,
    pub id: String,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Exchange form of one wire. Endpoints are `<gateId>:<pinName>` strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedWire {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub waypoints: Vec<Position>,
}

impl Circuit {
    /// Produce the exchange form of this circuit.
    pub fn serialize(&self) -> SerializedCircuit {
        let gates = self
            .gates()
            .iter()
            .map(|gate| SerializedGate {
                kind: gate.kind(),
                id: gate.id().to_string(),
                position: self.gate_position(gate.id()).unwrap_or_default(),
                label: gate.label().map(str::to_string),
            })
            .collect();

        let wires = self
            .wires()
            .iter()
            .map(|wire| SerializedWire {
                id: wire.id().to_string(),
                from: wire.from().to_string(),
                to: wire.to().to_string(),
                color: (wire.color() != DEFAULT_WIRE_COLOR).then(|| wire.color().to_string()),
                waypoints: wire.waypoints().to_vec(),
            })
            .collect();

        SerializedCircuit { gates, wires }
    }

    /// Build a circuit from its exchange form.
    ///
    /// Every wire endpoint must resolve to a pin of a listed gate, otherwise
    /// this fails with [`GateSimError::DanglingReference`]. Fan-in is not
    /// re-checked on this path; use [`Circuit::validate`] for untrusted data.
    /// Stateful gates start in their initial state.
    pub fn deserialize(data: &SerializedCircuit) -> Result<Circuit> {
        let mut circuit = Circuit::new();

        for entry in &data.gates {
            let id: GateId = entry.id.parse()?;
            if circuit.gate(id).is_some() {
                return Err(GateSimError::DuplicateId { id: entry.id.clone() });
            }
            circuit.ids.reserve_gate(id);
            circuit.insert_gate(Gate::new(id, entry.kind, entry.label.clone()), entry.position);
        }

        let mut seen = HashSet::new();
        for entry in &data.wires {
            let id: WireId = entry.id.parse()?;
            if !seen.insert(id) {
                return Err(GateSimError::DuplicateId { id: entry.id.clone() });
            }
            let from = resolve(&circuit, entry, &entry.from)?;
            let to = resolve(&circuit, entry, &entry.to)?;
            let mut wire = Wire::new(id, from, to, entry.color.clone())?;
            wire.set_waypoints(entry.waypoints.clone());
            circuit.ids.reserve_wire(id);
            circuit.push_wire(wire);
        }

        log::debug!(
            "Deserialized circuit with {} gate(s) and {} wire(s)",
            circuit.gate_count(),
            circuit.wire_count()
        );
        Ok(circuit)
    }

    /// Replace this circuit wholesale with the deserialized `data`.
    ///
    /// On error the circuit is left untouched.
    pub fn load_from(&mut self, data: &SerializedCircuit) -> Result<()> {
        *self = Circuit::deserialize(data)?;
        Ok(())
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.serialize())?)
    }

    /// Deserialize from JSON text.
    pub fn from_json(json: &str) -> Result<Circuit> {
        let data: SerializedCircuit = serde_json::from_str(json)?;
        Circuit::deserialize(&data)
    }
}

fn resolve<'a>(circuit: &'a Circuit, wire: &SerializedWire, reference: &str) -> Result<&'a Pin> {
    reference
        .parse::<PinRef>()
        .ok()
        .and_then(|pin| circuit.pin(&pin))
        .ok_or_else(|| GateSimError::dangling(wire.id.clone(), reference))
}
