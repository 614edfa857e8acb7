//! Circuit graph representation and validation.
//!
//! This module provides the owning graph of a logic circuit. The [`Circuit`]
//! struct holds all gates, the wires between their pins, and each gate's
//! canvas position, and enforces the wiring invariants: every wire runs from
//! an output pin to an input pin of gates in the same circuit, and no input
//! pin has more than one driver.

mod graph;
mod serial;
mod types;
mod validate;
mod wire;

pub use graph::Circuit;
pub use serial::{SerializedCircuit, SerializedGate, SerializedWire};
pub use types::{GateId, PinRef, Position, WireId, MAX_ID};
pub use validate::validate_circuit;
pub use wire::Wire;
