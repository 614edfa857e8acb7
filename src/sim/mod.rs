//! Simulation engine.
//!
//! This module evaluates a [`crate::Circuit`] in one of two modes:
//!
//! - **Combinational** ([`Simulator::simulate`]): every wire is a dependency,
//!   so any feedback is an error. Used for truth tables and live previews.
//! - **Sequential** ([`Simulator::simulate_step`] + [`Simulator::tick`]):
//!   wires leaving stateful gates are not dependencies, which allows feedback
//!   through flip-flops. One step plus one tick is one discrete time unit.
//!
//! Both modes follow the same pipeline:
//!
//! 1. Order the gates by their dependencies (Kahn's algorithm)
//! 2. Reset every pin to floating
//! 3. Drive stateful outputs from held state (sequential mode only)
//! 4. Apply the external input assignment
//! 5. For each gate in order, copy driven inputs along their wires, then evaluate
//! 6. Snapshot every pin

mod order;
mod simulator;

pub use order::{evaluation_order, EdgePolicy};
pub use simulator::{Assignment, Simulator, Snapshot};
