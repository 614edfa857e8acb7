//! D flip-flop, the only stateful element.
//!
//! The flip-flop is evaluated in two phases. Evaluation drives `q` and `qn`
//! from the held bit without looking at `d`; a separate tick latches `d`
//! into the held bit. Because the output of a step never depends on that
//! step's own input, feedback through a flip-flop is not a combinational
//! cycle.

/// Hidden state of a D flip-flop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DFlipFlop {
    held: bool,
}

impl DFlipFlop {
    /// Create a flip-flop in its initial (cleared) state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently held bit.
    pub fn held(&self) -> bool {
        self.held
    }

    /// Output levels `(q, qn)` for the held bit.
    pub fn outputs(&self) -> (bool, bool) {
        (self.held, !self.held)
    }

    /// Latch the given `d` level as the new held bit.
    pub fn latch(&mut self, d: bool) {
        self.held = d;
    }

    /// Return to the initial state.
    pub fn reset(&mut self) {
        self.held = false;
    }
}
