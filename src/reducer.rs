use crate::error::StoreError;
use serde_json::Value;
use std::rc::Rc;

/// The outcome of a reducer call.
///
/// `Ok(Some(state))` is the next state. `Ok(None)` means the reducer
/// produced no state at all — legal for a raw reducer driving a
/// [`Store`](crate::Store) directly, but a contract violation for the
/// per-key reducers under [`combine`](crate::combine). `Err` propagates to
/// whoever dispatched, with the store state left untouched.
pub type ReducerResult = Result<Option<Value>, StoreError>;

/// A pure transition function from previous state and action to next state.
///
/// Reducers receive owned state and return owned state. The previous state
/// is `None` the very first time a reducer runs (and, under `combine`, for
/// any key the previous mapping does not contain) — reducers supply their
/// own default at that point, the usual `Option` way:
///
/// ```
/// use serde_json::{json, Value};
/// use statefold::ReducerResult;
///
/// fn counter(state: Option<Value>, action: &Value) -> ReducerResult {
///     let count = state.as_ref().and_then(Value::as_i64).unwrap_or(0);
///     Ok(Some(match action["type"].as_str() {
///         Some("increment") => json!(count + 1),
///         _ => json!(count),
///     }))
/// }
/// ```
///
/// Reducers should be pure — no I/O, no side effects — and should fall
/// through to the previous state on unknown action types.
pub type Reducer = Rc<dyn Fn(Option<Value>, &Value) -> ReducerResult>;

/// A value supplied where a reducer is expected.
///
/// Reducer maps are often assembled dynamically, and not every entry is
/// guaranteed to be callable. A slot makes the three possibilities explicit
/// so that [`combine`](crate::combine) can filter them and
/// [`Store::new`](crate::Store::new) can reject them.
pub enum ReducerSlot {
    /// A callable reducer.
    Reducer(Reducer),
    /// A defined but non-callable value. `combine` drops the key silently;
    /// `Store::new` fails with [`StoreError::ReducerNotCallable`].
    NotCallable(Value),
    /// Nothing was provided. `combine` warns and drops the key;
    /// `Store::new` fails with [`StoreError::ReducerNotCallable`].
    Missing,
}

impl From<Reducer> for ReducerSlot {
    fn from(reduce: Reducer) -> Self {
        ReducerSlot::Reducer(reduce)
    }
}

/// Wrap a closure or function into a callable [`ReducerSlot`].
///
/// This is the usual way to hand reducers to [`combine`](crate::combine)
/// and [`Store::new`](crate::Store::new).
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use statefold::{reducer, Store};
///
/// let store = Store::new(
///     reducer(|state, _action| Ok(Some(state.unwrap_or(json!(0))))),
///     None,
/// )?;
/// assert_eq!(store.state(), Some(json!(0)));
/// # Ok::<(), statefold::StoreError>(())
/// ```
pub fn reducer<F>(reduce: F) -> ReducerSlot
where
    F: Fn(Option<Value>, &Value) -> ReducerResult + 'static,
{
    ReducerSlot::Reducer(Rc::new(reduce))
}
