//! Logic elements for circuit simulation.
//!
//! This module provides the closed set of supported gates:
//! - Two-input: NAND, AND, OR, NOR, XOR, XNOR
//! - Single-input: NOT
//! - Terminals: INPUT (driven externally), OUTPUT (read externally)
//! - Composite: half adder, full adder
//! - Stateful: D flip-flop
//!
//! Every gate has a fixed pin layout determined by its [`GateKind`], and a
//! pure evaluation rule that reads its input pins and drives its output pins.
//! Unwritten inputs read as low.

mod arith;
mod flip_flop;
mod pin;

pub use arith::{full_adder, half_adder};
pub use flip_flop::DFlipFlop;
pub use pin::{Direction, Pin, Signal};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::circuit::GateId;

/// Largest number of input pins on any gate kind.
pub const MAX_INPUTS: usize = 3;

/// Variant tag of a gate, as used by the factory and the serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateKind {
    Nand,
    And,
    Or,
    Nor,
    Xor,
    Xnor,
    Not,
    Input,
    Output,
    DFlipFlop,
    HalfAdder,
    FullAdder,
}

impl GateKind {
    /// Every gate kind, in declaration order.
    pub const ALL: [GateKind; 12] = [
        GateKind::Nand,
        GateKind::And,
        GateKind::Or,
        GateKind::Nor,
        GateKind::Xor,
        GateKind::Xnor,
        GateKind::Not,
        GateKind::Input,
        GateKind::Output,
        GateKind::DFlipFlop,
        GateKind::HalfAdder,
        GateKind::FullAdder,
    ];

    /// Names of the input pins, in order.
    pub fn input_names(self) -> &'static [&'static str] {
        match self {
            GateKind::Nand
            | GateKind::And
            | GateKind::Or
            | GateKind::Nor
            | GateKind::Xor
            | GateKind::Xnor
            | GateKind::HalfAdder => &["a", "b"],
            GateKind::Not | GateKind::Output => &["in"],
            GateKind::Input => &[],
            GateKind::DFlipFlop => &["d"],
            GateKind::FullAdder => &["a", "b", "cin"],
        }
    }

    /// Names of the output pins, in order.
    pub fn output_names(self) -> &'static [&'static str] {
        match self {
            GateKind::Nand
            | GateKind::And
            | GateKind::Or
            | GateKind::Nor
            | GateKind::Xor
            | GateKind::Xnor
            | GateKind::Not
            | GateKind::Input => &["out"],
            GateKind::Output => &[],
            GateKind::DFlipFlop => &["q", "qn"],
            GateKind::HalfAdder => &["sum", "carry"],
            GateKind::FullAdder => &["sum", "cout"],
        }
    }

    /// Check if gates of this kind carry state across ticks.
    pub fn is_stateful(self) -> bool {
        matches!(self, GateKind::DFlipFlop)
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GateKind::Nand => "NAND",
            GateKind::And => "AND",
            GateKind::Or => "OR",
            GateKind::Nor => "NOR",
            GateKind::Xor => "XOR",
            GateKind::Xnor => "XNOR",
            GateKind::Not => "NOT",
            GateKind::Input => "INPUT",
            GateKind::Output => "OUTPUT",
            GateKind::DFlipFlop => "D_FLIP_FLOP",
            GateKind::HalfAdder => "HALF_ADDER",
            GateKind::FullAdder => "FULL_ADDER",
        };
        f.write_str(name)
    }
}

/// Evaluation rule of a gate. Stateful kinds carry their hidden state here.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Nand,
    And,
    Or,
    Nor,
    Xor,
    Xnor,
    Not,
    Input,
    Output,
    DFlipFlop(DFlipFlop),
    HalfAdder,
    FullAdder,
}

impl Element {
    /// Create the element for a gate kind in its initial state.
    pub fn new(kind: GateKind) -> Self {
        match kind {
            GateKind::Nand => Element::Nand,
            GateKind::And => Element::And,
            GateKind::Or => Element::Or,
            GateKind::Nor => Element::Nor,
            GateKind::Xor => Element::Xor,
            GateKind::Xnor => Element::Xnor,
            GateKind::Not => Element::Not,
            GateKind::Input => Element::Input,
            GateKind::Output => Element::Output,
            GateKind::DFlipFlop => Element::DFlipFlop(DFlipFlop::new()),
            GateKind::HalfAdder => Element::HalfAdder,
            GateKind::FullAdder => Element::FullAdder,
        }
    }

    /// Get the variant tag.
    pub fn kind(&self) -> GateKind {
        match self {
            Element::Nand => GateKind::Nand,
            Element::And => GateKind::And,
            Element::Or => GateKind::Or,
            Element::Nor => GateKind::Nor,
            Element::Xor => GateKind::Xor,
            Element::Xnor => GateKind::Xnor,
            Element::Not => GateKind::Not,
            Element::Input => GateKind::Input,
            Element::Output => GateKind::Output,
            Element::DFlipFlop(_) => GateKind::DFlipFlop,
            Element::HalfAdder => GateKind::HalfAdder,
            Element::FullAdder => GateKind::FullAdder,
        }
    }

    /// Compute output levels from input levels and write them to `outputs`.
    ///
    /// `inputs` is indexed like the kind's input pins; missing entries are low.
    /// INPUT and OUTPUT leave their pins untouched.
    fn evaluate(&self, inputs: &[bool; MAX_INPUTS], outputs: &mut [Pin]) {
        let [a, b, c] = *inputs;
        match self {
            Element::Nand => drive(outputs, &[!(a && b)]),
            Element::And => drive(outputs, &[a && b]),
            Element::Or => drive(outputs, &[a || b]),
            Element::Nor => drive(outputs, &[!(a || b)]),
            Element::Xor => drive(outputs, &[a ^ b]),
            Element::Xnor => drive(outputs, &[!(a ^ b)]),
            Element::Not => drive(outputs, &[!a]),
            Element::Input | Element::Output => {}
            Element::DFlipFlop(ff) => {
                let (q, qn) = ff.outputs();
                drive(outputs, &[q, qn]);
            }
            Element::HalfAdder => {
                let (sum, carry) = half_adder(a, b);
                drive(outputs, &[sum, carry]);
            }
            Element::FullAdder => {
                let (sum, cout) = full_adder(a, b, c);
                drive(outputs, &[sum, cout]);
            }
        }
    }
}

fn drive(outputs: &mut [Pin], levels: &[bool]) {
    for (pin, &level) in outputs.iter_mut().zip(levels) {
        pin.signal = Signal::from(level);
    }
}

/// A logic element with its pins.
#[derive(Debug, Clone, PartialEq)]
pub struct Gate {
    id: GateId,
    element: Element,
    label: Option<String>,
    inputs: Vec<Pin>,
    outputs: Vec<Pin>,
}

impl Gate {
    /// Create a gate of the given kind with its fixed pin layout.
    pub fn new(id: GateId, kind: GateKind, label: Option<String>) -> Self {
        let inputs = kind
            .input_names()
            .iter()
            .map(|&name| Pin::new(id, name, Direction::Input))
            .collect();
        let outputs = kind
            .output_names()
            .iter()
            .map(|&name| Pin::new(id, name, Direction::Output))
            .collect();
        Self {
            id,
            element: Element::new(kind),
            label,
            inputs,
            outputs,
        }
    }

    pub fn id(&self) -> GateId {
        self.id
    }

    pub fn kind(&self) -> GateKind {
        self.element.kind()
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn inputs(&self) -> &[Pin] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Pin] {
        &self.outputs
    }

    /// Iterate over all pins, inputs first.
    pub fn pins(&self) -> impl Iterator<Item = &Pin> {
        self.inputs.iter().chain(self.outputs.iter())
    }

    /// Find a pin by local name.
    pub fn pin(&self, name: &str) -> Option<&Pin> {
        self.pins().find(|pin| pin.name() == name)
    }

    pub(crate) fn input_index(&self, name: &str) -> Option<usize> {
        self.inputs.iter().position(|pin| pin.name() == name)
    }

    pub(crate) fn output_index(&self, name: &str) -> Option<usize> {
        self.outputs.iter().position(|pin| pin.name() == name)
    }

    /// Check if this gate carries state across ticks.
    pub fn is_stateful(&self) -> bool {
        matches!(self.element, Element::DFlipFlop(_))
    }

    /// Held bit of a stateful gate, `None` for combinational gates.
    pub fn held_state(&self) -> Option<bool> {
        match &self.element {
            Element::DFlipFlop(ff) => Some(ff.held()),
            _ => None,
        }
    }

    pub(crate) fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    /// Apply the evaluation rule: read input pins, drive output pins.
    pub(crate) fn evaluate(&mut self) {
        let mut levels = [false; MAX_INPUTS];
        for (level, pin) in levels.iter_mut().zip(&self.inputs) {
            *level = pin.signal.is_high();
        }
        self.element.evaluate(&levels, &mut self.outputs);
    }

    /// Latch the current input into the held state. No-op for combinational gates.
    pub(crate) fn tick(&mut self) {
        if let Element::DFlipFlop(ff) = &mut self.element {
            let d = self.inputs[0].signal.is_high();
            ff.latch(d);
        }
    }

    /// Force the held state back to its initial value. No-op for combinational gates.
    pub(crate) fn reset_state(&mut self) {
        if let Element::DFlipFlop(ff) = &mut self.element {
            ff.reset();
        }
    }

    /// Set every pin back to floating.
    pub(crate) fn clear_signals(&mut self) {
        for pin in self.inputs.iter_mut().chain(self.outputs.iter_mut()) {
            pin.signal = Signal::Floating;
        }
    }

    pub(crate) fn set_input_signal(&mut self, index: usize, signal: Signal) {
        self.inputs[index].signal = signal;
    }

    pub(crate) fn output_signal(&self, index: usize) -> Signal {
        self.outputs[index].signal
    }

    /// Drive a pin by name from outside the gate. Returns `false` if no such pin exists.
    pub(crate) fn force_pin(&mut self, name: &str, level: bool) -> bool {
        match self
            .inputs
            .iter_mut()
            .chain(self.outputs.iter_mut())
            .find(|pin| pin.name() == name)
        {
            Some(pin) => {
                pin.signal = Signal::from(level);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_two_input(kind: GateKind, a: bool, b: bool) -> bool {
        let mut gate = Gate::new(GateId(0), kind, None);
        gate.force_pin("a", a);
        gate.force_pin("b", b);
        gate.evaluate();
        gate.outputs()[0].signal().is_high()
    }

    #[test]
    fn test_two_input_truth_tables() {
        let rows = [(false, false), (false, true), (true, false), (true, true)];
        let tables = [
            (GateKind::Nand, [true, true, true, false]),
            (GateKind::And, [false, false, false, true]),
            (GateKind::Or, [false, true, true, true]),
            (GateKind::Nor, [true, false, false, false]),
            (GateKind::Xor, [false, true, true, false]),
            (GateKind::Xnor, [true, false, false, true]),
        ];
        for (kind, expected) in tables {
            for ((a, b), want) in rows.iter().zip(expected) {
                assert_eq!(eval_two_input(kind, *a, *b), want, "{kind} {a} {b}");
            }
        }
    }

    #[test]
    fn test_not_truth_table() {
        for level in [false, true] {
            let mut gate = Gate::new(GateId(0), GateKind::Not, None);
            gate.force_pin("in", level);
            gate.evaluate();
            assert_eq!(gate.outputs()[0].signal().is_high(), !level);
        }
    }

    #[test]
    fn test_floating_inputs_read_low() {
        let mut nand = Gate::new(GateId(0), GateKind::Nand, None);
        nand.evaluate();
        assert_eq!(nand.outputs()[0].signal(), Signal::High);

        let mut and = Gate::new(GateId(1), GateKind::And, None);
        and.force_pin("a", true);
        and.evaluate();
        assert_eq!(and.outputs()[0].signal(), Signal::Low);
    }

    #[test]
    fn test_pin_layouts() {
        for kind in GateKind::ALL {
            let gate = Gate::new(GateId(9), kind, None);
            assert_eq!(gate.inputs().len(), kind.input_names().len());
            assert_eq!(gate.outputs().len(), kind.output_names().len());
            assert!(gate.inputs().len() <= MAX_INPUTS);
            assert!(gate.inputs().iter().all(|p| p.direction() == Direction::Input));
            assert!(gate.outputs().iter().all(|p| p.direction() == Direction::Output));
            assert!(gate.pins().all(|p| p.gate() == GateId(9)));
            assert_eq!(gate.kind(), kind);
            assert_eq!(gate.is_stateful(), kind.is_stateful());
        }
    }

    #[test]
    fn test_input_and_output_evaluation_is_noop() {
        let mut input = Gate::new(GateId(0), GateKind::Input, None);
        input.force_pin("out", true);
        input.evaluate();
        assert_eq!(input.outputs()[0].signal(), Signal::High);

        let mut output = Gate::new(GateId(1), GateKind::Output, None);
        output.evaluate();
        assert_eq!(output.inputs()[0].signal(), Signal::Floating);
    }

    #[test]
    fn test_adders_drive_both_outputs() {
        let mut half = Gate::new(GateId(0), GateKind::HalfAdder, None);
        half.force_pin("a", true);
        half.force_pin("b", true);
        half.evaluate();
        assert_eq!(half.pin("sum").unwrap().signal(), Signal::Low);
        assert_eq!(half.pin("carry").unwrap().signal(), Signal::High);

        let mut full = Gate::new(GateId(1), GateKind::FullAdder, None);
        full.force_pin("a", true);
        full.force_pin("cin", true);
        full.evaluate();
        assert_eq!(full.pin("sum").unwrap().signal(), Signal::Low);
        assert_eq!(full.pin("cout").unwrap().signal(), Signal::High);
    }

    #[test]
    fn test_flip_flop_evaluates_from_state_not_input() {
        let mut ff = Gate::new(GateId(0), GateKind::DFlipFlop, None);
        ff.force_pin("d", true);
        ff.evaluate();
        assert_eq!(ff.pin("q").unwrap().signal(), Signal::Low);
        assert_eq!(ff.pin("qn").unwrap().signal(), Signal::High);

        ff.tick();
        assert_eq!(ff.held_state(), Some(true));
        ff.evaluate();
        assert_eq!(ff.pin("q").unwrap().signal(), Signal::High);

        ff.reset_state();
        assert_eq!(ff.held_state(), Some(false));
    }

    #[test]
    fn test_tick_ignores_combinational_gates() {
        let mut gate = Gate::new(GateId(0), GateKind::Xor, None);
        gate.tick();
        gate.reset_state();
        assert_eq!(gate.held_state(), None);
        assert!(!gate.is_stateful());
    }

    #[test]
    fn test_kind_serializes_as_tag() {
        let json = serde_json::to_string(&GateKind::DFlipFlop).unwrap();
        assert_eq!(json, "\"D_FLIP_FLOP\"");
        for kind in GateKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }
}
