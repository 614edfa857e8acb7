//! Error types for the gate simulator.
//!
//! This module provides a unified error type [`GateSimError`] that covers
//! all error conditions that can occur while editing a circuit, loading it
//! from its serialized form, and simulating it.

use thiserror::Error;

use crate::circuit::{GateId, WireId};

/// Result type alias using [`GateSimError`].
pub type Result<T> = std::result::Result<T, GateSimError>;

/// Unified error type for all circuit and simulation operations.
#[derive(Error, Debug)]
pub enum GateSimError {
    // ============ Graph Editing Errors ============
    /// Gate id not present in the circuit
    #[error("Gate '{id}' not found in circuit")]
    GateNotFound { id: GateId },

    /// Wire id not present in the circuit
    #[error("Wire '{id}' not found in circuit")]
    WireNotFound { id: WireId },

    /// Wire endpoint on a foreign gate, an unknown pin, or a pin of the wrong direction
    #[error("Invalid wire endpoint '{pin}': {message}")]
    InvalidEndpoint { pin: String, message: String },

    /// Second driver for an already driven input pin
    #[error("Input pin '{pin}' is already driven by wire '{existing}'")]
    FanInViolation { pin: String, existing: WireId },

    // ============ Serialization Errors ============
    /// Wire references a pin that cannot be resolved
    #[error("Dangling reference '{reference}' in wire '{wire}'")]
    DanglingReference { wire: String, reference: String },

    /// Malformed gate or wire id
    #[error("Invalid id '{id}': expected {expected}")]
    InvalidId { id: String, expected: &'static str },

    /// Two gates or two wires share an id
    #[error("Duplicate id '{id}'")]
    DuplicateId { id: String },

    /// JSON encoding or decoding failed
    #[error("Circuit JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ============ Simulation Errors ============
    /// Dependency graph is not acyclic
    #[error("Combinational loop detected through {} gate(s): {}", .gates.len(), format_ids(.gates))]
    CombinationalLoop { gates: Vec<GateId> },

    // ============ I/O Errors ============
    /// Error reading circuit file
    #[error("Failed to read circuit file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error writing results
    #[error("Output error: {message}")]
    OutputError { message: String },
}

impl GateSimError {
    /// Create an invalid endpoint error
    pub fn invalid_endpoint(pin: impl ToString, message: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            pin: pin.to_string(),
            message: message.into(),
        }
    }

    /// Create a dangling reference error
    pub fn dangling(wire: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::DanglingReference {
            wire: wire.into(),
            reference: reference.into(),
        }
    }

    /// Create an invalid id error
    pub fn invalid_id(id: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidId {
            id: id.into(),
            expected,
        }
    }
}

fn format_ids(ids: &[GateId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
