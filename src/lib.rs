//! # Gatesim Core
//!
//! Digital logic circuit model and simulation engine.
//!
//! This library provides:
//! - A circuit graph of gates, pins, and wires with enforced wiring invariants
//! - A closed set of logic gates, including a clocked D flip-flop
//! - Deterministic combinational and sequential (tick-based) evaluation
//! - A JSON exchange format that round-trips exactly
//! - Truth-table and tick-sequence grading
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`circuit`] - Circuit graph representation, serialization and validation
//! - [`gates`] - Gate kinds, pins, and evaluation rules
//! - [`sim`] - Dependency ordering and the simulator
//! - [`grading`] - Pass/fail runners over test vectors
//! - [`report`] - Text output for the CLI (CLI only)
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! gatesim circuit.json --set g0:out=1 --probe g2:in
//! gatesim counter.json --steps 8
//! ```
//!
//! ### Library
//!
//! ```
//! use gatesim_core::{Assignment, Circuit, GateKind, PinRef, Position, Simulator};
//!
//! let mut circuit = Circuit::new();
//! let input = circuit.add_gate(GateKind::Input, Position::default(), None).id();
//! let not = circuit.add_gate(GateKind::Not, Position::default(), None).id();
//! circuit.add_wire(&PinRef::new(input, "out"), &PinRef::new(not, "in"), None)?;
//!
//! let inputs = Assignment::from([(PinRef::new(input, "out"), true)]);
//! let snapshot = Simulator::new().simulate(&mut circuit, &inputs)?;
//! assert!(!snapshot.level(&PinRef::new(not, "out")));
//! # Ok::<(), gatesim_core::GateSimError>(())
//! ```
//!
//! ## Evaluation Model
//!
//! Each call starts from all-floating pins, so successive calls are
//! independent. The only state carried between calls is the held bit of each
//! flip-flop, advanced explicitly by [`Simulator::tick`] and cleared by
//! [`Simulator::reset_state`].

pub mod circuit;
pub mod error;
pub mod gates;
pub mod grading;
pub mod sim;

#[cfg(feature = "cli")]
pub mod logging;
#[cfg(feature = "cli")]
pub mod report;

// Re-export main types for convenience
pub use circuit::{Circuit, GateId, PinRef, Position, SerializedCircuit, WireId};
pub use error::{GateSimError, Result};
pub use gates::{Gate, GateKind};
pub use sim::{Assignment, Simulator, Snapshot};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmCircuit;

/// Wire color used when none is given. Omitted from serialized wires.
pub const DEFAULT_WIRE_COLOR: &str = "#000000";
