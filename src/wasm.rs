//! WASM bindings for Gatesim Core.
//!
//! This module provides JavaScript-friendly bindings so the puzzle front end
//! can run the engine in the browser. Circuits and pin assignments cross the
//! boundary as JSON.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmCircuit } from 'gatesim_core';
//!
//! await init();
//!
//! const circuit = new WasmCircuit(JSON.stringify(levelCircuit));
//!
//! // Live preview after an edit
//! const levels = JSON.parse(circuit.simulate('{"g0:out": true}'));
//!
//! // Clocked run
//! circuit.reset_state();
//! for (const inputs of sequence) {
//!   const step = JSON.parse(circuit.step(JSON.stringify(inputs)));
//!   circuit.tick();
//! }
//! ```

use std::collections::BTreeMap;

use wasm_bindgen::prelude::*;

use crate::circuit::{Circuit, PinRef};
use crate::error::{GateSimError, Result};
use crate::sim::{Assignment, Simulator, Snapshot};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// WASM-compatible circuit plus simulator.
#[wasm_bindgen]
pub struct WasmCircuit {
    circuit: Circuit,
    simulator: Simulator,
}

#[wasm_bindgen]
impl WasmCircuit {
    /// Load a circuit from its JSON exchange form.
    ///
    /// # Returns
    /// A new `WasmCircuit` or an error if the JSON is malformed or the
    /// circuit breaks a wiring invariant.
    #[wasm_bindgen(constructor)]
    pub fn new(circuit_json: &str) -> std::result::Result<WasmCircuit, JsValue> {
        let circuit = Circuit::from_json(circuit_json).map_err(to_js)?;
        circuit.validate().map_err(to_js)?;
        Ok(WasmCircuit {
            circuit,
            simulator: Simulator::new(),
        })
    }

    /// Evaluate combinationally.
    ///
    /// # Arguments
    /// * `inputs_json` - Object mapping `"gate:pin"` to a boolean
    ///
    /// # Returns
    /// JSON object mapping every `"gate:pin"` to its level.
    #[wasm_bindgen]
    pub fn simulate(&mut self, inputs_json: &str) -> std::result::Result<String, JsValue> {
        let inputs = parse_inputs(inputs_json).map_err(to_js)?;
        let snapshot = self
            .simulator
            .simulate(&mut self.circuit, &inputs)
            .map_err(to_js)?;
        snapshot_json(&snapshot).map_err(to_js)
    }

    /// Evaluate one sequential step. Call [`WasmCircuit::tick`] afterwards.
    #[wasm_bindgen]
    pub fn step(&mut self, inputs_json: &str) -> std::result::Result<String, JsValue> {
        let inputs = parse_inputs(inputs_json).map_err(to_js)?;
        let snapshot = self
            .simulator
            .simulate_step(&mut self.circuit, &inputs)
            .map_err(to_js)?;
        snapshot_json(&snapshot).map_err(to_js)
    }

    /// Advance every flip-flop to the next time step.
    #[wasm_bindgen]
    pub fn tick(&mut self) {
        self.simulator.tick(&mut self.circuit);
    }

    /// Return every flip-flop to its initial state.
    #[wasm_bindgen]
    pub fn reset_state(&mut self) {
        self.simulator.reset_state(&mut self.circuit);
    }

    /// Serialize the circuit back to JSON.
    #[wasm_bindgen]
    pub fn to_json(&self) -> std::result::Result<String, JsValue> {
        self.circuit.to_json().map_err(to_js)
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js(err: GateSimError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_inputs(json: &str) -> Result<Assignment> {
    let raw: BTreeMap<String, bool> = serde_json::from_str(json)?;
    raw.into_iter()
        .map(|(pin, level)| -> Result<(PinRef, bool)> { Ok((pin.parse()?, level)) })
        .collect()
}

fn snapshot_json(snapshot: &Snapshot) -> Result<String> {
    let levels: BTreeMap<String, bool> = snapshot
        .iter()
        .map(|(pin, level)| (pin.to_string(), level))
        .collect();
    Ok(serde_json::to_string(&levels)?)
}
