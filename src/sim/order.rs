//! Dependency ordering of gates.

use std::collections::{HashSet, VecDeque};

use crate::circuit::Circuit;
use crate::error::{GateSimError, Result};

/// Which wires count as dependency edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgePolicy {
    /// Every wire orders its source gate before its target gate.
    AllWires,
    /// Wires leaving a stateful gate impose no order. Stateful outputs only
    /// depend on held state, so these edges never carry same-step data.
    SkipStatefulSources,
}

/// Compute an evaluation order over all gates, as indices into [`Circuit::gates`].
///
/// Kahn's algorithm over gate-pair edges (parallel wires between the same two
/// gates count once). Ready gates are taken first-in first-out, seeded in
/// gate insertion order, so the result is reproducible for a given circuit.
/// Fails with [`GateSimError::CombinationalLoop`] naming every gate that could
/// not be ordered.
pub fn evaluation_order(circuit: &Circuit, policy: EdgePolicy) -> Result<Vec<usize>> {
    let gates = circuit.gates();
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); gates.len()];
    let mut in_degree = vec![0usize; gates.len()];
    let mut edges = HashSet::new();

    for wire in circuit.wires() {
        let (Some(src), Some(dst)) = (
            circuit.gate_index(wire.from().gate),
            circuit.gate_index(wire.to().gate),
        ) else {
            continue;
        };
        if policy == EdgePolicy::SkipStatefulSources && gates[src].is_stateful() {
            continue;
        }
        if edges.insert((src, dst)) {
            successors[src].push(dst);
            in_degree[dst] += 1;
        }
    }

    let mut ready: VecDeque<usize> = (0..gates.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(gates.len());

    while let Some(gate) = ready.pop_front() {
        order.push(gate);
        for &next in &successors[gate] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                ready.push_back(next);
            }
        }
    }

    if order.len() < gates.len() {
        let stuck = in_degree
            .iter()
            .enumerate()
            .filter(|(_, degree)| **degree > 0)
            .map(|(i, _)| gates[i].id())
            .collect();
        return Err(GateSimError::CombinationalLoop { gates: stuck });
    }

    Ok(order)
}
