use crate::error::StoreError;
use serde_json::{json, Value};

/// The `type` of the private action dispatched once at store construction
/// to establish initial state. Reserved — consumer reducers should treat it
/// like any other unknown type and fall through to their default arm.
pub(crate) const INIT_TYPE: &str = "@@statefold/INIT";

pub(crate) fn init() -> Value {
    json!({ "type": INIT_TYPE })
}

/// Build a plain action with the given `type` and no other fields.
///
/// Actions are ordinary JSON objects; anything beyond the `type` key is
/// opaque to the store and meaningful only to reducers. For actions that
/// carry a payload, use [`json!`](serde_json::json) directly.
///
/// # Examples
///
/// ```
/// use statefold::action;
/// use serde_json::json;
///
/// assert_eq!(action("increment"), json!({ "type": "increment" }));
/// assert_eq!(action(false), json!({ "type": false }));
/// ```
pub fn action(action_type: impl Into<Value>) -> Value {
    json!({ "type": action_type.into() })
}

/// Validate an action and return its `type` value.
///
/// An action must be a plain JSON object carrying a `type` key. The value
/// under `type` is unconstrained; only its absence is an error.
pub(crate) fn action_type(action: &Value) -> Result<&Value, StoreError> {
    let Value::Object(record) = action else {
        return Err(StoreError::ActionNotObject);
    };
    record.get("type").ok_or(StoreError::ActionMissingType)
}
