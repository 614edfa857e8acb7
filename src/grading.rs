//! Pass/fail grading of circuits against test vectors.
//!
//! Two kinds of vectors are supported:
//!
//! - [`TruthTable`]: rows are evaluated independently with
//!   [`Simulator::simulate`].
//! - [`TickSequence`]: the circuit's state is reset once, then each entry is
//!   one [`Simulator::simulate_step`] followed by one [`Simulator::tick`].
//!
//! Engine errors never abort a grading pass; they show up as failed rows.

use crate::circuit::Circuit;
use crate::sim::{Assignment, Simulator, Snapshot};

/// One input assignment and the outputs expected for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestVector {
    pub inputs: Assignment,
    pub expected: Assignment,
}

impl TestVector {
    pub fn new(inputs: Assignment, expected: Assignment) -> Self {
        Self { inputs, expected }
    }
}

/// Result of grading one vector.
#[derive(Debug, Clone, PartialEq)]
pub struct RowOutcome {
    /// Position of the vector in its table or sequence
    pub index: usize,
    /// Observed levels of the expected pins
    pub actual: Assignment,
    /// Engine error text, if evaluation failed
    pub error: Option<String>,
}

impl RowOutcome {
    fn from_snapshot(index: usize, vector: &TestVector, snapshot: &Snapshot) -> Self {
        Self {
            index,
            actual: snapshot.select(vector.expected.keys()),
            error: None,
        }
    }

    fn from_error(index: usize, error: impl ToString) -> Self {
        Self {
            index,
            actual: Assignment::new(),
            error: Some(error.to_string()),
        }
    }

    fn passed_for(&self, vector: &TestVector) -> bool {
        self.error.is_none() && self.actual == vector.expected
    }
}

/// Outcome of a grading pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradeReport {
    pub rows: Vec<RowOutcome>,
    failed: Vec<usize>,
}

impl GradeReport {
    fn push(&mut self, outcome: RowOutcome, vector: &TestVector) {
        if !outcome.passed_for(vector) {
            self.failed.push(outcome.index);
        }
        self.rows.push(outcome);
    }

    /// Check if every row passed.
    pub fn passed(&self) -> bool {
        self.failed.is_empty()
    }

    /// Indices of the failed rows.
    pub fn failures(&self) -> &[usize] {
        &self.failed
    }
}

/// Independent input/output rows for a combinational circuit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TruthTable {
    pub rows: Vec<TestVector>,
}

impl TruthTable {
    pub fn new(rows: Vec<TestVector>) -> Self {
        Self { rows }
    }

    /// Evaluate every row on `circuit`.
    pub fn grade(&self, simulator: &Simulator, circuit: &mut Circuit) -> GradeReport {
        let mut report = GradeReport::default();
        for (index, vector) in self.rows.iter().enumerate() {
            let outcome = match simulator.simulate(circuit, &vector.inputs) {
                Ok(snapshot) => RowOutcome::from_snapshot(index, vector, &snapshot),
                Err(err) => RowOutcome::from_error(index, err),
            };
            report.push(outcome, vector);
        }
        log::info!(
            "Truth table: {}/{} row(s) passed",
            self.rows.len() - report.failures().len(),
            self.rows.len()
        );
        report
    }
}

/// Ordered per-tick input/output entries for a sequential circuit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickSequence {
    pub steps: Vec<TestVector>,
}

impl TickSequence {
    pub fn new(steps: Vec<TestVector>) -> Self {
        Self { steps }
    }

    /// Reset `circuit`, then run one step and one tick per entry.
    pub fn grade(&self, simulator: &Simulator, circuit: &mut Circuit) -> GradeReport {
        let mut report = GradeReport::default();
        simulator.reset_state(circuit);
        for (index, vector) in self.steps.iter().enumerate() {
            let outcome = match simulator.simulate_step(circuit, &vector.inputs) {
                Ok(snapshot) => RowOutcome::from_snapshot(index, vector, &snapshot),
                Err(err) => RowOutcome::from_error(index, err),
            };
            report.push(outcome, vector);
            simulator.tick(circuit);
        }
        log::info!(
            "Tick sequence: {}/{} step(s) passed",
            self.steps.len() - report.failures().len(),
            self.steps.len()
        );
        report
    }
}
