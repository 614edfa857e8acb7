//! Directed connections between pins.

use super::types::{PinRef, Position, WireId};
use crate::error::{GateSimError, Result};
use crate::gates::{Direction, Pin};
use crate::DEFAULT_WIRE_COLOR;

/// A directed edge from an output pin to an input pin.
///
/// Color and waypoints are cosmetic and have no effect on simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct Wire {
    id: WireId,
    from: PinRef,
    to: PinRef,
    color: String,
    waypoints: Vec<Position>,
}

impl Wire {
    /// Create a wire between two pins.
    ///
    /// Fails if `from` is not an output pin or `to` is not an input pin.
    /// Fan-in is not checked here; that is the owning circuit's job.
    pub fn new(id: WireId, from: &Pin, to: &Pin, color: Option<String>) -> Result<Self> {
        if from.direction() != Direction::Output {
            return Err(GateSimError::invalid_endpoint(
                from.id(),
                "wire source must be an output pin",
            ));
        }
        if to.direction() != Direction::Input {
            return Err(GateSimError::invalid_endpoint(
                to.id(),
                "wire target must be an input pin",
            ));
        }
        Ok(Self {
            id,
            from: from.id(),
            to: to.id(),
            color: color.unwrap_or_else(|| DEFAULT_WIRE_COLOR.to_string()),
            waypoints: Vec::new(),
        })
    }

    pub fn id(&self) -> WireId {
        self.id
    }

    /// Source (output) pin.
    pub fn from(&self) -> &PinRef {
        &self.from
    }

    /// Target (input) pin.
    pub fn to(&self) -> &PinRef {
        &self.to
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    /// Routing waypoints, in order.
    pub fn waypoints(&self) -> &[Position] {
        &self.waypoints
    }

    /// Check if either endpoint is on the given gate.
    pub fn touches(&self, gate: super::GateId) -> bool {
        self.from.gate == gate || self.to.gate == gate
    }

    pub(crate) fn set_waypoints(&mut self, waypoints: Vec<Position>) {
        self.waypoints = waypoints;
    }
}
