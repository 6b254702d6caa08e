mod common;

use common::{counter, fallible};
use serde_json::{json, Value};
use statefold::{action, reducer, ReducerSlot, Store, StoreError};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn test_rejects_non_callable_reducer() {
    let missing = Store::new(ReducerSlot::Missing, None);
    assert_eq!(missing.unwrap_err(), StoreError::ReducerNotCallable);

    for value in [json!("test"), json!({}), json!(null), json!(42)] {
        let store = Store::new(ReducerSlot::NotCallable(value), None);
        assert_eq!(store.unwrap_err(), StoreError::ReducerNotCallable);
    }
}

#[test]
fn test_init_seeds_reducer_default() {
    let store = Store::new(reducer(counter), None).unwrap();
    assert_eq!(store.state(), Some(json!(0)));
}

#[test]
fn test_init_keeps_provided_initial_state() {
    let store = Store::new(reducer(counter), Some(json!(41))).unwrap();
    assert_eq!(store.state(), Some(json!(41)));

    store.dispatch(&action("increment")).unwrap();
    assert_eq!(store.state(), Some(json!(42)));
}

#[test]
fn test_store_without_state_is_valid() {
    // A reducer that produces nothing still makes a working store; the
    // store simply holds no state.
    let store = Store::new(reducer(|_, _| Ok(None)), None).unwrap();
    assert_eq!(store.state(), None);

    store.dispatch(&action("anything")).unwrap();
    assert_eq!(store.state(), None);
}

#[test]
fn test_init_error_propagates() {
    let failed = Store::new(
        reducer(|_, _| Err(StoreError::ReducerFailure("nope".to_string()))),
        None,
    );
    assert_eq!(
        failed.unwrap_err(),
        StoreError::ReducerFailure("nope".to_string())
    );
}

#[test]
fn test_dispatch_applies_reducer() {
    let store = Store::new(reducer(counter), None).unwrap();
    store.dispatch(&action("increment")).unwrap();
    store.dispatch(&action("increment")).unwrap();
    store.dispatch(&action("decrement")).unwrap();
    assert_eq!(store.state(), Some(json!(1)));
}

#[test]
fn test_unknown_action_type_keeps_state() {
    let store = Store::new(reducer(counter), Some(json!(5))).unwrap();
    store.dispatch(&action("unrelated")).unwrap();
    assert_eq!(store.state(), Some(json!(5)));
}

#[test]
fn test_rejects_non_record_actions() {
    let store = Store::new(reducer(counter), None).unwrap();
    for bad in [
        json!(null),
        json!([1, 2]),
        json!("increment"),
        json!(7),
        json!(true),
    ] {
        assert_eq!(
            store.dispatch(&bad).unwrap_err(),
            StoreError::ActionNotObject
        );
    }
    assert_eq!(store.state(), Some(json!(0)));
}

#[test]
fn test_rejects_missing_action_type() {
    let store = Store::new(reducer(counter), None).unwrap();
    assert_eq!(
        store.dispatch(&json!({})).unwrap_err(),
        StoreError::ActionMissingType
    );
    assert_eq!(
        store.dispatch(&json!({ "kind": "increment" })).unwrap_err(),
        StoreError::ActionMissingType
    );
    assert_eq!(store.state(), Some(json!(0)));
}

#[test]
fn test_falsy_action_types_are_valid() {
    let store = Store::new(reducer(counter), None).unwrap();
    for ty in [json!(false), json!(0), json!(""), json!(null)] {
        store.dispatch(&json!({ "type": ty })).unwrap();
    }
    assert_eq!(store.state(), Some(json!(0)));
}

#[test]
fn test_reducer_error_leaves_state_unchanged() {
    let store = Store::new(reducer(fallible), Some(json!(5))).unwrap();
    store.dispatch(&action("increment")).unwrap();

    let err = store.dispatch(&action("boom")).unwrap_err();
    assert_eq!(err, StoreError::ReducerFailure("boom".to_string()));
    assert_eq!(store.state(), Some(json!(6)));
}

#[test]
fn test_failed_dispatch_skips_notification() {
    let store = Store::new(reducer(fallible), None).unwrap();
    let calls = Rc::new(RefCell::new(0));
    store.subscribe({
        let calls = Rc::clone(&calls);
        move || *calls.borrow_mut() += 1
    });

    let _ = store.dispatch(&action("boom"));
    let _ = store.dispatch(&json!({}));
    assert_eq!(*calls.borrow(), 0);

    store.dispatch(&action("increment")).unwrap();
    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn test_state_as_typed_read() {
    #[derive(serde::Deserialize)]
    struct Counts {
        counter: i64,
    }

    let store = Store::new(
        reducer(|state, _| Ok(Some(state.unwrap_or(json!({ "counter": 1 }))))),
        None,
    )
    .unwrap();

    let counts: Counts = store.state_as().unwrap().unwrap();
    assert_eq!(counts.counter, 1);
}

#[test]
fn test_read_borrows_state() {
    let store = Store::new(reducer(counter), None).unwrap();
    store.dispatch(&action("increment")).unwrap();

    let doubled = store.read(|state| state.and_then(Value::as_i64).unwrap_or(0) * 2);
    assert_eq!(doubled, 2);
    assert_eq!(store.read(|state| state.cloned()), Some(json!(1)));
}

#[test]
fn test_cloned_handles_share_one_container() {
    let store = Store::new(reducer(counter), None).unwrap();
    let handle = store.clone();

    handle.dispatch(&action("increment")).unwrap();
    assert_eq!(store.state(), Some(json!(1)));
}

#[test]
fn test_independent_stores_are_isolated() {
    let left = Store::new(reducer(counter), None).unwrap();
    let right = Store::new(reducer(counter), None).unwrap();
    let right_calls = Rc::new(RefCell::new(0));
    right.subscribe({
        let calls = Rc::clone(&right_calls);
        move || *calls.borrow_mut() += 1
    });

    left.dispatch(&action("increment")).unwrap();
    assert_eq!(left.state(), Some(json!(1)));
    assert_eq!(right.state(), Some(json!(0)));
    assert_eq!(*right_calls.borrow(), 0);
}

#[test]
fn test_state_readable_inside_reducer() {
    let slot: Rc<RefCell<Option<Store>>> = Rc::new(RefCell::new(None));
    let store = Store::new(
        reducer({
            let slot = Rc::clone(&slot);
            move |state, action| {
                if action["type"] == "peek" {
                    let observed = slot.borrow().as_ref().unwrap().state();
                    return Ok(Some(json!({ "observed": observed })));
                }
                Ok(Some(state.unwrap_or(json!(1))))
            }
        }),
        None,
    )
    .unwrap();
    *slot.borrow_mut() = Some(store.clone());

    store.dispatch(&action("peek")).unwrap();
    assert_eq!(store.state(), Some(json!({ "observed": 1 })));
}
