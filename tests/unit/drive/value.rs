use std::cell::{Cell, RefCell};

use super::*;

#[test]
fn set_notifies_in_subscription_order() {
    let drive = DriveValue::new(0.0).unwrap();
    let log = Rc::new(RefCell::new(Vec::new()));

    for tag in ["a", "b", "c"] {
        let log = Rc::clone(&log);
        drive.subscribe(move |v| log.borrow_mut().push((tag, v)));
    }

    drive.set(2.5).unwrap();
    assert_eq!(drive.get(), 2.5);
    assert_eq!(*log.borrow(), vec![("a", 2.5), ("b", 2.5), ("c", 2.5)]);
}

#[test]
fn non_finite_values_are_rejected() {
    assert!(DriveValue::new(f64::NAN).is_err());

    let drive = DriveValue::new(1.0).unwrap();
    let calls = Rc::new(Cell::new(0));
    let c = Rc::clone(&calls);
    drive.subscribe(move |_| c.set(c.get() + 1));

    assert!(matches!(
        drive.set(f64::NAN),
        Err(MotionError::InvalidValue(_))
    ));
    assert!(drive.set(f64::INFINITY).is_err());
    assert!(drive.set(f64::NEG_INFINITY).is_err());
    assert_eq!(drive.get(), 1.0);
    assert_eq!(calls.get(), 0);
}

#[test]
fn unsubscribe_during_dispatch_only_affects_later_passes() {
    let drive = DriveValue::new(0.0).unwrap();
    let second_calls = Rc::new(Cell::new(0));
    let second_id: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));

    {
        let drive_in_cb = drive.clone();
        let second_id = Rc::clone(&second_id);
        drive.subscribe(move |_| {
            if let Some(id) = second_id.get() {
                drive_in_cb.unsubscribe(id);
            }
        });
    }
    {
        let calls = Rc::clone(&second_calls);
        second_id.set(Some(drive.subscribe(move |_| calls.set(calls.get() + 1))));
    }

    drive.set(1.0).unwrap();
    assert_eq!(second_calls.get(), 1, "snapshot still dispatches to the removed subscriber");
    assert_eq!(drive.subscriber_count(), 1);

    drive.set(2.0).unwrap();
    assert_eq!(second_calls.get(), 1);
}

#[test]
fn subscribers_may_read_and_set_reentrantly() {
    let drive = DriveValue::new(0.0).unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    {
        let d = drive.clone();
        let seen = Rc::clone(&seen);
        drive.subscribe(move |v| {
            seen.borrow_mut().push(d.get());
            if v < 2.0 {
                d.set(v + 1.0).unwrap();
            }
        });
    }
    drive.set(0.0).unwrap();
    assert_eq!(*seen.borrow(), vec![0.0, 1.0, 2.0]);
    assert_eq!(drive.get(), 2.0);
}

#[test]
fn clones_share_cell_and_identity() {
    let a = DriveValue::new(3.0).unwrap();
    let b = a.clone();
    let other = DriveValue::new(3.0).unwrap();

    b.set(4.0).unwrap();
    assert_eq!(a.get(), 4.0);
    assert_eq!(a.id(), b.id());
    assert!(a.same_cell(&b));
    assert!(!a.same_cell(&other));
    assert_ne!(a.id(), other.id());
}

#[test]
fn dispose_clears_subscribers() {
    let drive = DriveValue::new(0.0).unwrap();
    let calls = Rc::new(Cell::new(0));
    let c = Rc::clone(&calls);
    let id = drive.subscribe(move |_| c.set(c.get() + 1));

    drive.dispose();
    assert_eq!(drive.subscriber_count(), 0);
    drive.set(1.0).unwrap();
    assert_eq!(calls.get(), 0);
    assert!(!drive.unsubscribe(id));
}
