use crate::action;
use crate::error::StoreError;
use crate::reducer::{Reducer, ReducerSlot};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

type Callback = Rc<dyn Fn()>;

/// One entry in the live subscriber sequence. The id identifies this
/// registration instance, not the callback — the same callback may be
/// registered more than once and each registration unsubscribes on its own.
struct Registration {
    id: u64,
    notify: Callback,
}

/// A unidirectional state container.
///
/// A store owns one state value, one reducer, and an ordered sequence of
/// subscribers. State is only ever replaced by the result of running the
/// reducer over the previous state and a dispatched action; subscribers are
/// notified after each successful [`dispatch`](Store::dispatch).
///
/// `Store` is a cheap handle over shared interior: cloning it clones the
/// handle, not the container, so a subscriber can capture a clone and call
/// back into the same store mid-notification. Everything is single-threaded
/// and synchronous — re-entrant calls nest on the call stack, and each
/// dispatch notifies a snapshot of the subscribers registered when it began.
///
/// # Examples
///
/// ```
/// use serde_json::{json, Value};
/// use statefold::{reducer, Store};
///
/// let store = Store::new(
///     reducer(|state, action| {
///         let count = state.as_ref().and_then(Value::as_i64).unwrap_or(0);
///         Ok(Some(match action["type"].as_str() {
///             Some("increment") => json!(count + 1),
///             _ => json!(count),
///         }))
///     }),
///     None,
/// )?;
///
/// store.dispatch(&json!({ "type": "increment" }))?;
/// assert_eq!(store.state(), Some(json!(1)));
/// # Ok::<(), statefold::StoreError>(())
/// ```
#[derive(Clone)]
pub struct Store {
    state: Rc<RefCell<Option<Value>>>,
    reducer: Reducer,
    subscribers: Rc<RefCell<Vec<Registration>>>,
    next_id: Rc<Cell<u64>>,
}

impl Store {
    /// Create a store from a reducer and an optional initial state.
    ///
    /// The initial state is established immediately by invoking the reducer
    /// with `initial` and a private init action whose `type` no consumer
    /// action uses — a reducer that defaults its `None` state therefore
    /// seeds the store before the first `dispatch`. An `initial` of `None`
    /// reaches the reducer as `None`.
    ///
    /// # Errors
    ///
    /// [`StoreError::ReducerNotCallable`] when the slot holds anything but a
    /// callable reducer. A reducer error during the init call propagates.
    pub fn new(reducer: impl Into<ReducerSlot>, initial: Option<Value>) -> Result<Self, StoreError> {
        let ReducerSlot::Reducer(reducer) = reducer.into() else {
            return Err(StoreError::ReducerNotCallable);
        };
        let state = reducer(initial, &action::init())?;
        Ok(Store {
            state: Rc::new(RefCell::new(state)),
            reducer,
            subscribers: Rc::new(RefCell::new(Vec::new())),
            next_id: Rc::new(Cell::new(0)),
        })
    }

    /// Return a clone of the current state.
    ///
    /// No side effects; safe to call at any time, including from within a
    /// reducer or a subscriber. `None` means the reducer has produced no
    /// state — distinct from a state of `Value::Null`.
    pub fn state(&self) -> Option<Value> {
        self.state.borrow().clone()
    }

    /// Deserialize the current state into `T`.
    ///
    /// Returns `Ok(None)` when the store holds no state.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde::Deserialize;
    /// use serde_json::json;
    /// use statefold::{reducer, Store};
    ///
    /// #[derive(Deserialize)]
    /// struct Counts {
    ///     counter: i64,
    /// }
    ///
    /// let store = Store::new(
    ///     reducer(|state, _| Ok(Some(state.unwrap_or(json!({ "counter": 3 }))))),
    ///     None,
    /// ).unwrap();
    /// let counts: Counts = store.state_as().unwrap().unwrap();
    /// assert_eq!(counts.counter, 3);
    /// ```
    pub fn state_as<T: DeserializeOwned>(&self) -> serde_json::Result<Option<T>> {
        self.state
            .borrow()
            .as_ref()
            .map(|state| serde_json::from_value(state.clone()))
            .transpose()
    }

    /// Read the current state through a closure, without cloning it.
    ///
    /// The state cell stays borrowed for the duration of the closure, so
    /// the closure must not call back into the store.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(Option<&Value>) -> R,
    {
        f(self.state.borrow().as_ref())
    }

    /// Dispatch an action: run the reducer, commit the new state, notify
    /// subscribers.
    ///
    /// The subscriber sequence is snapshotted before notification begins.
    /// Subscribe and unsubscribe calls made by a subscriber change only the
    /// live sequence and take effect from the *next* dispatch; a nested
    /// `dispatch` made by a subscriber runs to completion on its own
    /// snapshot before the outer notification pass resumes.
    ///
    /// # Errors
    ///
    /// [`StoreError::ActionNotObject`] unless the action is a plain JSON
    /// object, [`StoreError::ActionMissingType`] when its `type` key is
    /// absent (any present value is accepted, falsy ones included), and any
    /// error the reducer returns. On error the state is left unchanged and
    /// no subscriber is notified.
    pub fn dispatch(&self, action: &Value) -> Result<(), StoreError> {
        action::action_type(action)?;

        let previous = self.state.borrow().clone();
        let next = (self.reducer)(previous, action)?;
        *self.state.borrow_mut() = next;

        // Snapshot, then iterate: structural changes to the live sequence
        // made during notification cannot perturb this pass.
        let snapshot: Vec<Callback> = self
            .subscribers
            .borrow()
            .iter()
            .map(|registration| Rc::clone(&registration.notify))
            .collect();
        for notify in &snapshot {
            notify();
        }
        Ok(())
    }

    /// Register a subscriber, called with no arguments after every
    /// successful dispatch.
    ///
    /// Each call appends one entry to the live sequence — subscribing the
    /// same callback twice registers two independent entries. A subscriber
    /// registered while a dispatch is notifying is first called on the next
    /// dispatch.
    ///
    /// The returned [`Subscription`] removes exactly this registration.
    /// Dropping it does not unsubscribe.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use statefold::{action, reducer, Store};
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    ///
    /// let store = Store::new(reducer(|s, _| Ok(Some(s.unwrap_or(json!(0))))), None)?;
    /// let calls = Rc::new(Cell::new(0));
    ///
    /// let subscription = store.subscribe({
    ///     let calls = Rc::clone(&calls);
    ///     move || calls.set(calls.get() + 1)
    /// });
    ///
    /// store.dispatch(&action("tick"))?;
    /// subscription.unsubscribe();
    /// store.dispatch(&action("tick"))?;
    /// assert_eq!(calls.get(), 1);
    /// # Ok::<(), statefold::StoreError>(())
    /// ```
    pub fn subscribe<F>(&self, subscriber: F) -> Subscription
    where
        F: Fn() + 'static,
    {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.subscribers.borrow_mut().push(Registration {
            id,
            notify: Rc::new(subscriber),
        });
        Subscription {
            subscribers: Rc::clone(&self.subscribers),
            id,
            active: Cell::new(true),
        }
    }

    /// Number of live registrations. Entries removed mid-notification are
    /// gone from this count even while the current snapshot still runs.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state.borrow())
            .field("subscribers", &self.subscribers.borrow().len())
            .finish()
    }
}

/// A one-shot handle removing a single subscriber registration.
///
/// Returned by [`Store::subscribe`]. The handle addresses the registration
/// instance, not the callback value: when one callback is subscribed twice,
/// each handle revokes only its own entry. Calling
/// [`unsubscribe`](Subscription::unsubscribe) again is a no-op, and the
/// handle stays valid even after the store's other handles are dropped.
pub struct Subscription {
    subscribers: Rc<RefCell<Vec<Registration>>>,
    id: u64,
    active: Cell<bool>,
}

impl Subscription {
    /// Remove the registration this handle was issued for.
    ///
    /// Idempotent: only the first call removes the entry. Safe to call from
    /// within a subscriber during notification — the removal affects the
    /// live sequence, not the snapshot being iterated.
    pub fn unsubscribe(&self) {
        if !self.active.replace(false) {
            return;
        }
        self.subscribers
            .borrow_mut()
            .retain(|registration| registration.id != self.id);
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.active.get())
            .finish()
    }
}
