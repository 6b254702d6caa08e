#![allow(dead_code)]

use serde_json::{json, Value};
use statefold::{ReducerResult, StoreError};

pub fn counter(state: Option<Value>, action: &Value) -> ReducerResult {
    let count = state.as_ref().and_then(Value::as_i64).unwrap_or(0);
    Ok(Some(match action["type"].as_str() {
        Some("increment") => json!(count + 1),
        Some("decrement") => json!(count - 1),
        _ => json!(count),
    }))
}

pub fn stack(state: Option<Value>, action: &Value) -> ReducerResult {
    let mut items = match state {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };
    if action["type"] == "push" {
        items.push(action["value"].clone());
    }
    Ok(Some(Value::Array(items)))
}

/// Keeps whatever state it is given and supplies no default of its own.
pub fn passthrough(state: Option<Value>, _action: &Value) -> ReducerResult {
    Ok(state)
}

/// Fails on `boom` actions, behaves like `counter` otherwise.
pub fn fallible(state: Option<Value>, action: &Value) -> ReducerResult {
    if action["type"] == "boom" {
        return Err(StoreError::ReducerFailure("boom".to_string()));
    }
    counter(state, action)
}
