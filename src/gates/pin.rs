//! Pins and the signals they carry.

use crate::circuit::{GateId, PinRef};

/// Direction of a pin relative to its owning gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// Tri-valued logical signal held by a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Signal {
    Low,
    High,
    /// Never written since the last reset. Reads as low.
    #[default]
    Floating,
}

impl Signal {
    /// Resolve to a boolean level, floating reads as `false`.
    pub fn is_high(self) -> bool {
        self == Signal::High
    }
}

impl From<bool> for Signal {
    fn from(level: bool) -> Self {
        if level {
            Signal::High
        } else {
            Signal::Low
        }
    }
}

/// A named, directional signal terminal owned by a gate.
#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    gate: GateId,
    name: &'static str,
    direction: Direction,
    pub(crate) signal: Signal,
}

impl Pin {
    pub(crate) fn new(gate: GateId, name: &'static str, direction: Direction) -> Self {
        Self {
            gate,
            name,
            direction,
            signal: Signal::Floating,
        }
    }

    /// Id of the owning gate.
    pub fn gate(&self) -> GateId {
        self.gate
    }

    /// Local name, unique within the owning gate.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn signal(&self) -> Signal {
        self.signal
    }

    /// Composite `gate:pin` reference to this pin.
    pub fn id(&self) -> PinRef {
        PinRef::new(self.gate, self.name)
    }
}
