//! Core types for circuit representation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GateSimError, Result};

/// Largest numeric id accepted from serialized data.
///
/// `u32::MAX` is kept back so that a loaded circuit always leaves room for
/// one more allocation.
pub const MAX_ID: u32 = u32::MAX - 1;

/// A unique identifier for a gate in the circuit.
///
/// Rendered as `g<n>` in the serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GateId(pub u32);

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

impl FromStr for GateId {
    type Err = GateSimError;

    fn from_str(s: &str) -> Result<Self> {
        parse_prefixed(s, 'g')
            .map(GateId)
            .ok_or_else(|| {
                GateSimError::invalid_id(s, "gate id of the form g<n> with n below 4294967295")
            })
    }
}

/// A unique identifier for a wire in the circuit.
///
/// Rendered as `w<n>` in the serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WireId(pub u32);

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

impl FromStr for WireId {
    type Err = GateSimError;

    fn from_str(s: &str) -> Result<Self> {
        parse_prefixed(s, 'w')
            .map(WireId)
            .ok_or_else(|| {
                GateSimError::invalid_id(s, "wire id of the form w<n> with n below 4294967295")
            })
    }
}

fn parse_prefixed(s: &str, prefix: char) -> Option<u32> {
    let digits = s.strip_prefix(prefix)?;
    // Reject signs and leading zeros so that the textual form stays canonical
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    digits.parse().ok().filter(|&n| n <= MAX_ID)
}

/// A reference to a pin: owning gate plus the pin's local name.
///
/// Displayed and parsed as `<gateId>:<pinName>`, e.g. `g4:out`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PinRef {
    pub gate: GateId,
    pub pin: String,
}

impl PinRef {
    /// Create a pin reference.
    pub fn new(gate: GateId, pin: impl Into<String>) -> Self {
        Self {
            gate,
            pin: pin.into(),
        }
    }
}

impl fmt::Display for PinRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.gate, self.pin)
    }
}

impl FromStr for PinRef {
    type Err = GateSimError;

    fn from_str(s: &str) -> Result<Self> {
        let (gate, pin) = s
            .split_once(':')
            .ok_or_else(|| GateSimError::invalid_id(s, "pin reference of the form <gate>:<pin>"))?;
        if pin.is_empty() {
            return Err(GateSimError::invalid_id(s, "non-empty pin name"));
        }
        Ok(PinRef::new(gate.parse()?, pin))
    }
}

/// A 2D canvas coordinate. Purely presentational.
///
/// Coordinates are `f64`, so integer input such as `{"x": 0, "y": 0}` is
/// written back as `0.0`: the re-serialized value compares equal but the JSON
/// text differs. Non-finite coordinates are stored as given, serialize as
/// `null` and are then rejected on load.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Hands out gate and wire ids for one circuit.
///
/// Ids are never reused within a circuit, so a removed gate's id cannot
/// alias a later one. Counters stop at `u32::MAX`: loaded ids are capped at
/// [`MAX_ID`], so the top id is always free for the next allocation, and only
/// `u32::MAX` allocations in one circuit would repeat it.
#[derive(Debug, Clone, Default)]
pub(crate) struct IdAllocator {
    next_gate: u32,
    next_wire: u32,
}

impl IdAllocator {
    pub(crate) fn gate(&mut self) -> GateId {
        let id = GateId(self.next_gate);
        self.next_gate = self.next_gate.checked_add(1).unwrap_or(u32::MAX);
        id
    }

    pub(crate) fn wire(&mut self) -> WireId {
        let id = WireId(self.next_wire);
        self.next_wire = self.next_wire.checked_add(1).unwrap_or(u32::MAX);
        id
    }

    /// The id the next call to [`IdAllocator::wire`] will return.
    pub(crate) fn peek_wire(&self) -> WireId {
        WireId(self.next_wire)
    }

    /// Make sure future ids are allocated past `id`.
    pub(crate) fn reserve_gate(&mut self, id: GateId) {
        self.next_gate = self.next_gate.max(id.0.saturating_add(1));
    }

    /// Make sure future ids are allocated past `id`.
    pub(crate) fn reserve_wire(&mut self, id: WireId) {
        self.next_wire = self.next_wire.max(id.0.saturating_add(1));
    }
}
