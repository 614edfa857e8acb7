//! Main simulator interface.

use std::collections::BTreeMap;

use crate::circuit::{Circuit, PinRef};
use crate::error::Result;

use super::order::{evaluation_order, EdgePolicy};

/// Assignment of boolean levels to pins, used for external inputs and
/// expected outputs.
pub type Assignment = BTreeMap<PinRef, bool>;

/// Resolved level of every pin after an evaluation. Floating pins read `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    levels: BTreeMap<PinRef, bool>,
}

impl Snapshot {
    /// Level of a pin, `None` if the pin did not exist at evaluation time.
    pub fn get(&self, pin: &PinRef) -> Option<bool> {
        self.levels.get(pin).copied()
    }

    /// Level of a pin, unknown pins read `false`.
    pub fn level(&self, pin: &PinRef) -> bool {
        self.get(pin).unwrap_or(false)
    }

    /// Restrict the snapshot to the given pins.
    pub fn select<'a>(&self, pins: impl IntoIterator<Item = &'a PinRef>) -> Assignment {
        pins.into_iter()
            .map(|pin| (pin.clone(), self.level(pin)))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PinRef, bool)> {
        self.levels.iter().map(|(pin, &level)| (pin, level))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Source of an input pin's value: `(gate index, output pin index)`.
type Driver = Option<(usize, usize)>;

/// Stateless evaluation engine.
///
/// The simulator never changes the shape of a circuit. It only writes pin
/// signals and, through [`Simulator::tick`] and [`Simulator::reset_state`],
/// the held state of stateful gates.
#[derive(Debug, Clone, Copy, Default)]
pub struct Simulator;

impl Simulator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate a circuit combinationally.
    ///
    /// Every wire is a dependency edge, so any feedback loop, including one
    /// through a flip-flop, fails with [`crate::GateSimError::CombinationalLoop`].
    pub fn simulate(&self, circuit: &mut Circuit, inputs: &Assignment) -> Result<Snapshot> {
        let order = evaluation_order(circuit, EdgePolicy::AllWires)?;
        Ok(self.evaluate(circuit, &order, inputs, false))
    }

    /// Evaluate one discrete time step of a sequential circuit.
    ///
    /// Wires leaving stateful gates impose no order, and stateful gates drive
    /// their held state before anything else is evaluated. Call
    /// [`Simulator::tick`] afterwards to advance to the next step.
    pub fn simulate_step(&self, circuit: &mut Circuit, inputs: &Assignment) -> Result<Snapshot> {
        let order = evaluation_order(circuit, EdgePolicy::SkipStatefulSources)?;
        Ok(self.evaluate(circuit, &order, inputs, true))
    }

    /// Latch every stateful gate's current input into its held state.
    pub fn tick(&self, circuit: &mut Circuit) {
        for gate in circuit.gates_mut().iter_mut().filter(|g| g.is_stateful()) {
            gate.tick();
        }
    }

    /// Return every stateful gate to its initial state.
    pub fn reset_state(&self, circuit: &mut Circuit) {
        for gate in circuit.gates_mut().iter_mut().filter(|g| g.is_stateful()) {
            gate.reset_state();
        }
    }

    fn evaluate(
        &self,
        circuit: &mut Circuit,
        order: &[usize],
        inputs: &Assignment,
        prime_stateful: bool,
    ) -> Snapshot {
        let drivers = driver_table(circuit);
        log::debug!(
            "Evaluating {} gate(s) in order {:?}",
            order.len(),
            order.iter().map(|&i| circuit.gates()[i].id().0).collect::<Vec<_>>()
        );

        // Every evaluation starts from all-floating pins
        for gate in circuit.gates_mut() {
            gate.clear_signals();
        }

        if prime_stateful {
            for gate in circuit.gates_mut().iter_mut().filter(|g| g.is_stateful()) {
                gate.evaluate();
            }
        }

        for (pin, &level) in inputs {
            let applied = match circuit.gate_index(pin.gate) {
                Some(index) => circuit.gates_mut()[index].force_pin(&pin.pin, level),
                None => false,
            };
            if !applied {
                log::warn!("Ignoring input for unknown pin {pin}");
            }
        }

        let gates = circuit.gates_mut();
        for &index in order {
            for (pin, driver) in drivers[index].iter().enumerate() {
                if let Some((source, output)) = *driver {
                    let signal = gates[source].output_signal(output);
                    gates[index].set_input_signal(pin, signal);
                }
            }
            gates[index].evaluate();
            log::trace!("Evaluated {} {}", gates[index].kind(), gates[index].id());
        }

        snapshot(circuit)
    }
}

fn driver_table(circuit: &Circuit) -> Vec<Vec<Driver>> {
    let mut table: Vec<Vec<Driver>> = circuit
        .gates()
        .iter()
        .map(|gate| vec![None; gate.inputs().len()])
        .collect();

    for wire in circuit.wires() {
        let source = circuit.gate_index(wire.from().gate).and_then(|gate| {
            circuit.gates()[gate]
                .output_index(&wire.from().pin)
                .map(|pin| (gate, pin))
        });
        let target = circuit.gate_index(wire.to().gate).and_then(|gate| {
            circuit.gates()[gate]
                .input_index(&wire.to().pin)
                .map(|pin| (gate, pin))
        });
        // On unvalidated data with two drivers, the earlier wire wins
        if let (Some(source), Some((gate, pin))) = (source, target) {
            table[gate][pin].get_or_insert(source);
        }
    }

    table
}

fn snapshot(circuit: &Circuit) -> Snapshot {
    let levels = circuit
        .gates()
        .iter()
        .flat_map(|gate| gate.pins())
        .map(|pin| (pin.id(), pin.signal().is_high()))
        .collect();
    Snapshot { levels }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{GateId, Position};
    use crate::error::GateSimError;
    use crate::gates::{GateKind, Signal};

    fn add(circuit: &mut Circuit, kind: GateKind) -> GateId {
        circuit.add_gate(kind, Position::default(), None).id()
    }

    fn connect(circuit: &mut Circuit, from: (GateId, &str), to: (GateId, &str)) {
        circuit
            .add_wire(&PinRef::new(from.0, from.1), &PinRef::new(to.0, to.1), None)
            .unwrap();
    }

    fn set(pin: &PinRef, level: bool) -> Assignment {
        Assignment::from([(pin.clone(), level)])
    }

    #[test]
    fn test_unwired_nand_outputs_high() {
        let mut circuit = Circuit::new();
        let nand = add(&mut circuit, GateKind::Nand);
        let snap = Simulator::new().simulate(&mut circuit, &Assignment::new()).unwrap();
        assert!(snap.level(&PinRef::new(nand, "out")));
        assert!(!snap.level(&PinRef::new(nand, "a")));
        assert_eq!(snap.len(), 3);
    }

    #[test]
    fn test_signals_propagate_through_chain() {
        let mut circuit = Circuit::new();
        let a = add(&mut circuit, GateKind::Input);
        let b = add(&mut circuit, GateKind::Input);
        let xor = add(&mut circuit, GateKind::Xor);
        let not = add(&mut circuit, GateKind::Not);
        let out = add(&mut circuit, GateKind::Output);
        connect(&mut circuit, (a, "out"), (xor, "a"));
        connect(&mut circuit, (b, "out"), (xor, "b"));
        connect(&mut circuit, (xor, "out"), (not, "in"));
        connect(&mut circuit, (not, "out"), (out, "in"));

        let sim = Simulator::new();
        let probe = PinRef::new(out, "in");
        for (la, lb) in [(false, false), (false, true), (true, false), (true, true)] {
            let inputs = Assignment::from([
                (PinRef::new(a, "out"), la),
                (PinRef::new(b, "out"), lb),
            ]);
            let snap = sim.simulate(&mut circuit, &inputs).unwrap();
            assert_eq!(snap.level(&probe), la == lb);
        }
    }

    #[test]
    fn test_first_wire_drives_doubly_wired_input() {
        let json = r#"{
            "gates": [
                {"type": "NOT", "id": "g0", "position": {"x": 0, "y": 0}},
                {"type": "AND", "id": "g1", "position": {"x": 0, "y": 0}},
                {"type": "NOT", "id": "g2", "position": {"x": 0, "y": 0}}
            ],
            "wires": [
                {"id": "w0", "from": "g0:out", "to": "g2:in"},
                {"id": "w1", "from": "g1:out", "to": "g2:in"}
            ]
        }"#;
        let mut circuit = Circuit::from_json(json).unwrap();
        assert_eq!(
            circuit.driver_of(&PinRef::new(GateId(2), "in")).map(|w| w.id()),
            Some(crate::circuit::WireId(0))
        );

        let snap = Simulator::new().simulate(&mut circuit, &Assignment::new()).unwrap();
        assert!(snap.level(&PinRef::new(GateId(0), "out")));
        assert!(!snap.level(&PinRef::new(GateId(1), "out")));
        assert!(snap.level(&PinRef::new(GateId(2), "in")));
        assert!(!snap.level(&PinRef::new(GateId(2), "out")));
    }

    #[test]
    fn test_runs_are_independent() {
        let mut circuit = Circuit::new();
        let input = add(&mut circuit, GateKind::Input);
        let out = add(&mut circuit, GateKind::Output);
        connect(&mut circuit, (input, "out"), (out, "in"));

        let sim = Simulator::new();
        let driven = sim
            .simulate(&mut circuit, &set(&PinRef::new(input, "out"), true))
            .unwrap();
        assert!(driven.level(&PinRef::new(out, "in")));

        let idle = sim.simulate(&mut circuit, &Assignment::new()).unwrap();
        assert!(!idle.level(&PinRef::new(out, "in")));
        assert_eq!(circuit.gate(out).unwrap().inputs()[0].signal(), Signal::Floating);
    }

    #[test]
    fn test_unknown_input_pins_are_ignored() {
        let mut circuit = Circuit::new();
        let nand = add(&mut circuit, GateKind::Nand);
        let inputs = Assignment::from([
            (PinRef::new(GateId(77), "out"), true),
            (PinRef::new(nand, "nope"), true),
        ]);
        let snap = Simulator::new().simulate(&mut circuit, &inputs).unwrap();
        assert!(snap.level(&PinRef::new(nand, "out")));
        assert_eq!(snap.get(&PinRef::new(GateId(77), "out")), None);
    }

    #[test]
    fn test_not_loop_fails_combinationally() {
        let mut circuit = Circuit::new();
        let n1 = add(&mut circuit, GateKind::Not);
        let n2 = add(&mut circuit, GateKind::Not);
        connect(&mut circuit, (n1, "out"), (n2, "in"));
        connect(&mut circuit, (n2, "out"), (n1, "in"));

        let before = circuit.serialize();
        let result = Simulator::new().simulate(&mut circuit, &Assignment::new());
        assert!(matches!(result, Err(GateSimError::CombinationalLoop { .. })));
        assert_eq!(circuit.serialize(), before);

        // Stateful-source edges are the only ones sequential mode drops
        let result = Simulator::new().simulate_step(&mut circuit, &Assignment::new());
        assert!(matches!(result, Err(GateSimError::CombinationalLoop { .. })));
    }

    #[test]
    fn test_loop_through_flip_flop_steps() {
        let mut circuit = Circuit::new();
        let ff = add(&mut circuit, GateKind::DFlipFlop);
        let not = add(&mut circuit, GateKind::Not);
        connect(&mut circuit, (ff, "q"), (not, "in"));
        connect(&mut circuit, (not, "out"), (ff, "d"));

        let sim = Simulator::new();
        assert!(sim.simulate(&mut circuit, &Assignment::new()).is_err());

        sim.reset_state(&mut circuit);
        let q = PinRef::new(ff, "q");
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(sim.simulate_step(&mut circuit, &Assignment::new()).unwrap().level(&q));
            sim.tick(&mut circuit);
        }
        assert_eq!(seen, vec![false, true, false, true]);
    }

    #[test]
    fn test_flip_flop_delays_one_tick() {
        let mut circuit = Circuit::new();
        let input = add(&mut circuit, GateKind::Input);
        let ff = add(&mut circuit, GateKind::DFlipFlop);
        let out = add(&mut circuit, GateKind::Output);
        connect(&mut circuit, (input, "out"), (ff, "d"));
        connect(&mut circuit, (ff, "q"), (out, "in"));

        let sim = Simulator::new();
        sim.reset_state(&mut circuit);
        let drive = PinRef::new(input, "out");
        let probe = PinRef::new(out, "in");
        let mut seen = Vec::new();
        for level in [true, false, true] {
            let snap = sim.simulate_step(&mut circuit, &set(&drive, level)).unwrap();
            seen.push(snap.level(&probe));
            sim.tick(&mut circuit);
        }
        assert_eq!(seen, vec![false, true, false]);
    }

    #[test]
    fn test_toggle_oscillates() {
        let mut circuit = Circuit::new();
        let ff = add(&mut circuit, GateKind::DFlipFlop);
        connect(&mut circuit, (ff, "qn"), (ff, "d"));

        let sim = Simulator::new();
        sim.reset_state(&mut circuit);
        let q = PinRef::new(ff, "q");
        let seen: Vec<bool> = (0..6)
            .map(|_| {
                let level = sim
                    .simulate_step(&mut circuit, &Assignment::new())
                    .unwrap()
                    .level(&q);
                sim.tick(&mut circuit);
                level
            })
            .collect();
        assert_eq!(seen, vec![false, true, false, true, false, true]);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut circuit = Circuit::new();
        let ff = add(&mut circuit, GateKind::DFlipFlop);
        connect(&mut circuit, (ff, "qn"), (ff, "d"));

        let sim = Simulator::new();
        sim.simulate_step(&mut circuit, &Assignment::new()).unwrap();
        sim.tick(&mut circuit);
        assert_eq!(circuit.gate(ff).unwrap().held_state(), Some(true));

        sim.reset_state(&mut circuit);
        assert_eq!(circuit.gate(ff).unwrap().held_state(), Some(false));
        let snap = sim.simulate_step(&mut circuit, &Assignment::new()).unwrap();
        assert!(!snap.level(&PinRef::new(ff, "q")));
        assert!(snap.level(&PinRef::new(ff, "qn")));
    }

    #[test]
    fn test_shift_register_reads_held_state() {
        // Two flip-flops in series, with the second one's q also fanning out
        // to an AND gate added before both flip-flops.
        let mut circuit = Circuit::new();
        let and = add(&mut circuit, GateKind::And);
        let input = add(&mut circuit, GateKind::Input);
        let ff1 = add(&mut circuit, GateKind::DFlipFlop);
        let ff2 = add(&mut circuit, GateKind::DFlipFlop);
        let out = add(&mut circuit, GateKind::Output);
        let both = add(&mut circuit, GateKind::Output);
        connect(&mut circuit, (input, "out"), (ff1, "d"));
        connect(&mut circuit, (ff1, "q"), (ff2, "d"));
        connect(&mut circuit, (ff2, "q"), (out, "in"));
        connect(&mut circuit, (ff1, "q"), (and, "a"));
        connect(&mut circuit, (ff2, "q"), (and, "b"));
        connect(&mut circuit, (and, "out"), (both, "in"));

        let sim = Simulator::new();
        sim.reset_state(&mut circuit);
        let drive = PinRef::new(input, "out");
        let mut delayed = Vec::new();
        let mut anded = Vec::new();
        for level in [true, true, false, false] {
            let snap = sim.simulate_step(&mut circuit, &set(&drive, level)).unwrap();
            delayed.push(snap.level(&PinRef::new(out, "in")));
            anded.push(snap.level(&PinRef::new(both, "in")));
            sim.tick(&mut circuit);
        }
        assert_eq!(delayed, vec![false, false, true, true]);
        assert_eq!(anded, vec![false, false, true, false]);
    }

    #[test]
    fn test_full_adder_gate_in_circuit() {
        let mut circuit = Circuit::new();
        let a = add(&mut circuit, GateKind::Input);
        let b = add(&mut circuit, GateKind::Input);
        let cin = add(&mut circuit, GateKind::Input);
        let fa = add(&mut circuit, GateKind::FullAdder);
        connect(&mut circuit, (a, "out"), (fa, "a"));
        connect(&mut circuit, (b, "out"), (fa, "b"));
        connect(&mut circuit, (cin, "out"), (fa, "cin"));

        let inputs = Assignment::from([
            (PinRef::new(a, "out"), true),
            (PinRef::new(b, "out"), false),
            (PinRef::new(cin, "out"), true),
        ]);
        let snap = Simulator::new().simulate(&mut circuit, &inputs).unwrap();
        assert!(!snap.level(&PinRef::new(fa, "sum")));
        assert!(snap.level(&PinRef::new(fa, "cout")));
    }

    #[test]
    fn test_select_restricts_snapshot() {
        let mut circuit = Circuit::new();
        let not = add(&mut circuit, GateKind::Not);
        let snap = Simulator::new().simulate(&mut circuit, &Assignment::new()).unwrap();
        let out = PinRef::new(not, "out");
        let picked = snap.select([&out]);
        assert_eq!(picked, Assignment::from([(out, true)]));
    }
}
