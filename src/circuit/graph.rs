//! Circuit graph structure.

use std::collections::HashMap;

use super::types::{GateId, IdAllocator, PinRef, Position, WireId};
use super::wire::Wire;
use crate::error::{GateSimError, Result};
use crate::gates::{Gate, GateKind, Pin};

/// A circuit: gates, the wires between their pins, and gate positions.
///
/// Gates and wires are kept in insertion order, which is the order every
/// iteration (and therefore evaluation tie-breaking) follows. The slot maps
/// translate ids into positions within those lists.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    gates: Vec<Gate>,
    gate_slots: HashMap<GateId, usize>,
    wires: Vec<Wire>,
    wire_slots: HashMap<WireId, usize>,
    positions: HashMap<GateId, Position>,
    pub(crate) ids: IdAllocator,
}

impl Circuit {
    /// Create an empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a gate of the given kind. Always succeeds.
    pub fn add_gate(&mut self, kind: GateKind, position: Position, label: Option<String>) -> &Gate {
        let id = self.ids.gate();
        log::debug!("Adding {kind} gate {id}");
        let slot = self.insert_gate(Gate::new(id, kind, label), position);
        &self.gates[slot]
    }

    /// Remove a gate together with every wire attached to it.
    pub fn remove_gate(&mut self, id: GateId) -> Result<Gate> {
        let slot = self.gate_slot(id)?;

        let before = self.wires.len();
        self.wires.retain(|wire| !wire.touches(id));
        let cascaded = before - self.wires.len();

        let gate = self.gates.remove(slot);
        self.positions.remove(&id);
        self.reindex();

        log::debug!("Removed gate {id} and {cascaded} attached wire(s)");
        Ok(gate)
    }

    /// Connect an output pin to an input pin.
    ///
    /// Fails with [`GateSimError::InvalidEndpoint`] if either pin is not on a
    /// gate of this circuit or the directions are wrong, and with
    /// [`GateSimError::FanInViolation`] if the target is already driven.
    pub fn add_wire(&mut self, from: &PinRef, to: &PinRef, color: Option<String>) -> Result<&Wire> {
        let source = self.endpoint(from)?;
        let target = self.endpoint(to)?;
        let wire = Wire::new(self.ids.peek_wire(), source, target, color)?;

        if let Some(existing) = self.driver_of(to) {
            return Err(GateSimError::FanInViolation {
                pin: to.to_string(),
                existing: existing.id(),
            });
        }

        let id = self.ids.wire();
        debug_assert_eq!(id, wire.id());
        log::debug!("Adding wire {id}: {from} -> {to}");
        let slot = self.push_wire(wire);
        Ok(&self.wires[slot])
    }

    /// Remove a wire.
    pub fn remove_wire(&mut self, id: WireId) -> Result<Wire> {
        let slot = self
            .wire_slots
            .get(&id)
            .copied()
            .ok_or(GateSimError::WireNotFound { id })?;
        let wire = self.wires.remove(slot);
        self.reindex();
        log::debug!("Removed wire {id}");
        Ok(wire)
    }

    /// Move a gate. The position is copied in.
    pub fn set_gate_position(&mut self, id: GateId, position: Position) -> Result<()> {
        self.gate_slot(id)?;
        self.positions.insert(id, position);
        Ok(())
    }

    /// Replace a gate's display label.
    pub fn set_gate_label(&mut self, id: GateId, label: Option<String>) -> Result<()> {
        let slot = self.gate_slot(id)?;
        self.gates[slot].set_label(label);
        Ok(())
    }

    /// Replace a wire's routing waypoints.
    pub fn set_wire_waypoints(&mut self, id: WireId, waypoints: Vec<Position>) -> Result<()> {
        let slot = self
            .wire_slots
            .get(&id)
            .copied()
            .ok_or(GateSimError::WireNotFound { id })?;
        self.wires[slot].set_waypoints(waypoints);
        Ok(())
    }

    /// Find a gate by id.
    pub fn gate(&self, id: GateId) -> Option<&Gate> {
        self.gate_slots.get(&id).map(|&slot| &self.gates[slot])
    }

    /// All gates, in insertion order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Find a wire by id.
    pub fn wire(&self, id: WireId) -> Option<&Wire> {
        self.wire_slots.get(&id).map(|&slot| &self.wires[slot])
    }

    /// All wires, in insertion order.
    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    /// Position of a gate, returned by value.
    pub fn gate_position(&self, id: GateId) -> Option<Position> {
        self.positions.get(&id).copied()
    }

    /// Resolve a pin reference to a pin of this circuit.
    pub fn pin(&self, pin: &PinRef) -> Option<&Pin> {
        self.gate(pin.gate)?.pin(&pin.pin)
    }

    /// The wire driving an input pin, if any.
    pub fn driver_of(&self, pin: &PinRef) -> Option<&Wire> {
        self.wires.iter().find(|wire| wire.to() == pin)
    }

    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Index of a gate within [`Circuit::gates`].
    pub(crate) fn gate_index(&self, id: GateId) -> Option<usize> {
        self.gate_slots.get(&id).copied()
    }

    pub(crate) fn gates_mut(&mut self) -> &mut [Gate] {
        &mut self.gates
    }

    pub(crate) fn insert_gate(&mut self, gate: Gate, position: Position) -> usize {
        let slot = self.gates.len();
        self.gate_slots.insert(gate.id(), slot);
        self.positions.insert(gate.id(), position);
        self.gates.push(gate);
        slot
    }

    pub(crate) fn push_wire(&mut self, wire: Wire) -> usize {
        let slot = self.wires.len();
        self.wire_slots.insert(wire.id(), slot);
        self.wires.push(wire);
        slot
    }

    fn gate_slot(&self, id: GateId) -> Result<usize> {
        self.gate_index(id).ok_or(GateSimError::GateNotFound { id })
    }

    fn endpoint(&self, pin: &PinRef) -> Result<&Pin> {
        let gate = self
            .gate(pin.gate)
            .ok_or_else(|| GateSimError::invalid_endpoint(pin, "gate is not in this circuit"))?;
        gate.pin(&pin.pin)
            .ok_or_else(|| GateSimError::invalid_endpoint(pin, format!("{} gate has no such pin", gate.kind())))
    }

    fn reindex(&mut self) {
        self.gate_slots = self
            .gates
            .iter()
            .enumerate()
            .map(|(slot, gate)| (gate.id(), slot))
            .collect();
        self.wire_slots = self
            .wires
            .iter()
            .enumerate()
            .map(|(slot, wire)| (wire.id(), slot))
            .collect();
    }
}
