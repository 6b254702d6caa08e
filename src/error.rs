use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by store construction, [`dispatch`](crate::Store::dispatch),
/// and reducers produced by [`combine`](crate::combine).
///
/// Every failure is synchronous and leaves the store exactly as it was —
/// there is no internal recovery or retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// The value supplied where a reducer was expected is not callable.
    #[error("reducer must be a function")]
    ReducerNotCallable,

    /// A dispatched action was not a plain JSON object.
    #[error("action must be a plain object")]
    ActionNotObject,

    /// A dispatched action had no `type` key. Any present value counts,
    /// `false`, `0`, `""` and `null` included — only the absent key fails.
    #[error("action must have a \"type\" key")]
    ActionMissingType,

    /// A sub-reducer under [`combine`](crate::combine) produced no state
    /// for its key.
    #[error("reducer for key \"{key}\" returned no state for action type {action_type}")]
    ReducerNoState {
        /// The key whose sub-reducer violated the contract.
        key: String,
        /// The offending action's `type` value, rendered as compact JSON.
        action_type: Value,
    },

    /// A reducer reported its own failure while computing the next state.
    ///
    /// The store does not interpret the message; it propagates to the
    /// `dispatch` caller with the state unchanged.
    #[error("reducer failed: {0}")]
    ReducerFailure(String),
}
