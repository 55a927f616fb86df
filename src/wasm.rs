//! JavaScript bindings.
//!
//! Points and configuration cross the boundary as plain JS objects:
//! `{ id, x, y }` per point, and the fields of
//! [`SolverConfig`](crate::tsp::SolverConfig) in snake case, any of which
//! may be omitted.

use crate::tsp::{Point, SolverConfig, TspSolver};
use wasm_bindgen::prelude::*;

/// Solves the TSP over `points` (the first one is the anchor).
///
/// Returns `{ best_cost, tour, elapsed_secs, generations, cancelled,
/// cost_history }`, with `tour` starting and ending at the anchor.
#[wasm_bindgen(js_name = solveTsp)]
pub fn solve_tsp(points: JsValue, config: JsValue) -> Result<JsValue, JsValue> {
    let points: Vec<Point> = serde_wasm_bindgen::from_value(points)
        .map_err(|e| JsValue::from_str(&format!("Invalid points: {e}")))?;

    let config: SolverConfig = if config.is_undefined() || config.is_null() {
        SolverConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {e}")))?
    };

    let result =
        TspSolver::solve(&points, &config).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&result).map_err(|e| JsValue::from_str(&e.to_string()))
}
