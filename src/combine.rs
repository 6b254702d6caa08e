use crate::action;
use crate::error::StoreError;
use crate::reducer::{Reducer, ReducerSlot};
use serde_json::{Map, Value};
use std::rc::Rc;

/// Combine per-key reducers into one reducer over a mapping-shaped state.
///
/// The entry set is validated once, here: a [`ReducerSlot::Missing`] entry
/// is excluded with a warning naming its key (through the [`log`] facade),
/// a [`ReducerSlot::NotCallable`] entry is excluded silently, and a key
/// supplied twice keeps its first position with the later slot winning.
/// The surviving keys form a fixed active set; every invocation of the
/// produced reducer iterates exactly that set, in order.
///
/// On each invocation the produced reducer validates the action the same
/// way [`Store::dispatch`](crate::Store::dispatch) does, then feeds each
/// active key's slice of the previous state (`None` when the slice — or the
/// whole previous state — is absent or not a mapping) through its
/// sub-reducer, and assembles a freshly allocated mapping holding exactly
/// the active keys' results. Entries of the previous state without an
/// active reducer are dropped.
///
/// A sub-reducer must produce a state for every action it is shown;
/// `Ok(None)` fails the whole invocation with
/// [`StoreError::ReducerNoState`], naming the key and the action's type.
///
/// # Examples
///
/// ```
/// use serde_json::{json, Value};
/// use statefold::{combine, reducer, Store};
///
/// let reduce = combine([
///     ("counter", reducer(|state, action| {
///         let count = state.as_ref().and_then(Value::as_i64).unwrap_or(0);
///         Ok(Some(match action["type"].as_str() {
///             Some("increment") => json!(count + 1),
///             _ => json!(count),
///         }))
///     })),
///     ("stack", reducer(|state, action| {
///         let mut items = match state {
///             Some(Value::Array(items)) => items,
///             _ => Vec::new(),
///         };
///         if action["type"] == "push" {
///             items.push(action["value"].clone());
///         }
///         Ok(Some(Value::Array(items)))
///     })),
/// ]);
///
/// // The combined reducer is itself a reducer: callable directly...
/// let state = reduce(None, &json!({ "type": "increment" }))?;
/// assert_eq!(state, Some(json!({ "counter": 1, "stack": [] })));
///
/// // ...or driving a store.
/// let store = Store::new(reduce, None)?;
/// store.dispatch(&json!({ "type": "push", "value": "a" }))?;
/// assert_eq!(store.state(), Some(json!({ "counter": 0, "stack": ["a"] })));
/// # Ok::<(), statefold::StoreError>(())
/// ```
pub fn combine<I, K, S>(entries: I) -> Reducer
where
    I: IntoIterator<Item = (K, S)>,
    K: Into<String>,
    S: Into<ReducerSlot>,
{
    let mut slices: Vec<(String, Reducer)> = Vec::new();
    for (key, slot) in entries {
        let key = key.into();
        let reduce = match slot.into() {
            ReducerSlot::Reducer(reduce) => reduce,
            ReducerSlot::NotCallable(_) => continue,
            ReducerSlot::Missing => {
                log::warn!("no reducer provided for key \"{key}\"");
                continue;
            }
        };
        match slices.iter().position(|(existing, _)| *existing == key) {
            Some(index) => slices[index].1 = reduce,
            None => slices.push((key, reduce)),
        }
    }

    Rc::new(move |state, action| {
        let action_type = action::action_type(action)?.clone();

        // Dismantle the previous mapping so slices move out owned. A
        // previous state that is absent or not a mapping contributes no
        // slices — sub-reducers see `None` and default themselves.
        let mut previous = match state {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };

        let mut next = Map::new();
        for (key, reduce) in &slices {
            match reduce(previous.remove(key), action)? {
                Some(slice) => {
                    next.insert(key.clone(), slice);
                }
                None => {
                    return Err(StoreError::ReducerNoState {
                        key: key.clone(),
                        action_type: action_type.clone(),
                    });
                }
            }
        }
        Ok(Some(Value::Object(next)))
    })
}
