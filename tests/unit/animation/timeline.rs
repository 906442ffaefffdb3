use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::*;
use crate::animation::runner::Tween;
use crate::drive::value::DriveValue;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn tween(d: &DriveValue, to: f64, dur_ms: u64) -> Tween {
    Tween::new(d.clone(), to, ms(dur_ms)).unwrap()
}

fn recorder() -> (Rc<RefCell<Vec<bool>>>, impl FnOnce(Finished) + 'static) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    (log, move |f: Finished| sink.borrow_mut().push(f.finished))
}

#[test]
fn tick_drives_animation_to_completion() {
    let tl = Timeline::new();
    let d = DriveValue::new(0.0).unwrap();
    let anim = Animation::new(&tl, tween(&d, 10.0, 100));
    let (log, cb) = recorder();

    anim.start_with(cb);
    assert!(anim.is_running());
    assert_eq!(tl.running_count(), 1);

    tl.tick(ms(50));
    assert!((d.get() - 5.0).abs() < 1e-9);
    assert!(log.borrow().is_empty());

    tl.tick(ms(120));
    assert_eq!(d.get(), 10.0);
    assert_eq!(anim.state(), RunState::Completed);
    assert_eq!(anim.completed_at(), Some(ms(100)));
    assert_eq!(tl.running_count(), 0);
    assert_eq!(*log.borrow(), vec![true]);
}

#[test]
fn animation_starts_at_timeline_now() {
    let tl = Timeline::new();
    tl.tick(ms(1000));
    let d = DriveValue::new(0.0).unwrap();
    let anim = Animation::new(&tl, tween(&d, 1.0, 100));
    anim.start();
    tl.tick(ms(1050));
    assert!((d.get() - 0.5).abs() < 1e-9);
}

#[test]
fn stop_reports_unfinished_and_holds_value() {
    let tl = Timeline::new();
    let d = DriveValue::new(0.0).unwrap();
    let anim = Animation::new(&tl, tween(&d, 10.0, 100));
    let (log, cb) = recorder();
    anim.start_with(cb);
    tl.tick(ms(30));
    anim.stop();

    assert_eq!(anim.state(), RunState::Canceled);
    assert_eq!(tl.running_count(), 0);
    assert_eq!(*log.borrow(), vec![false]);
    let held = d.get();
    tl.tick(ms(200));
    assert_eq!(d.get(), held);

    anim.stop();
    assert_eq!(log.borrow().len(), 1, "second stop is a no-op");
}

#[test]
fn restart_cancels_previous_callback() {
    let tl = Timeline::new();
    let d = DriveValue::new(0.0).unwrap();
    let anim = Animation::new(&tl, tween(&d, 10.0, 100));
    let (first, cb1) = recorder();
    let (second, cb2) = recorder();

    anim.start_with(cb1);
    tl.tick(ms(40));
    anim.start_with(cb2);
    assert_eq!(*first.borrow(), vec![false]);
    assert_eq!(tl.running_count(), 1);

    tl.tick(ms(140));
    assert_eq!(d.get(), 10.0);
    assert_eq!(*second.borrow(), vec![true]);
}

#[test]
fn backwards_ticks_are_ignored() {
    let tl = Timeline::new();
    let d = DriveValue::new(0.0).unwrap();
    let anim = Animation::new(&tl, tween(&d, 10.0, 100));
    anim.start();
    tl.tick(ms(60));
    let v = d.get();
    tl.tick(ms(20));
    assert_eq!(tl.now(), ms(60));
    assert_eq!(d.get(), v);
}

#[test]
fn zero_duration_finishes_without_registering() {
    let tl = Timeline::new();
    let d = DriveValue::new(0.0).unwrap();
    let anim = Animation::new(&tl, tween(&d, 3.0, 0));
    let (log, cb) = recorder();
    anim.start_with(cb);
    assert_eq!(d.get(), 3.0);
    assert_eq!(tl.running_count(), 0);
    assert_eq!(*log.borrow(), vec![true]);
}

#[test]
fn subscribers_may_start_other_animations_mid_tick() {
    let tl = Timeline::new();
    let a = DriveValue::new(0.0).unwrap();
    let b = DriveValue::new(0.0).unwrap();
    let first = Animation::new(&tl, tween(&a, 1.0, 100));
    let second = Animation::new(&tl, tween(&b, 1.0, 100));

    let fired = Rc::new(Cell::new(false));
    {
        let second = second.clone();
        let fired = Rc::clone(&fired);
        a.subscribe(move |v| {
            if v >= 0.5 && !fired.replace(true) {
                second.start();
            }
        });
    }

    first.start();
    tl.tick(ms(50));
    assert!(second.is_running());
    assert_eq!(tl.running_count(), 2);
    tl.tick(ms(100));
    assert!((b.get() - 0.5).abs() < 1e-9);
}

#[test]
fn restarting_self_from_own_write_takes_effect_after_it() {
    let tl = Timeline::new();
    let d = DriveValue::new(0.0).unwrap();
    let anim = Animation::new(&tl, tween(&d, 1.0, 100));
    let restarted = Rc::new(Cell::new(false));
    {
        let anim = anim.clone();
        let restarted = Rc::clone(&restarted);
        d.subscribe(move |v| {
            if v >= 0.5 && !restarted.replace(true) {
                anim.start();
                assert_eq!(anim.state(), RunState::Running);
            }
        });
    }
    let (log, cb) = recorder();
    anim.start_with(cb);

    tl.tick(ms(50));
    assert!((d.get() - 0.5).abs() < 1e-9);
    assert_eq!(*log.borrow(), vec![false], "first run was superseded");
    assert_eq!(tl.running_count(), 1);

    tl.tick(ms(100));
    assert!((d.get() - 0.75).abs() < 1e-9, "second run started at 50ms from 0.5");
    tl.tick(ms(150));
    assert_eq!(d.get(), 1.0);
    assert_eq!(anim.state(), RunState::Completed);
    assert_eq!(anim.completed_at(), Some(ms(150)));
}

#[test]
fn stopping_self_from_own_write_halts_the_run() {
    let tl = Timeline::new();
    let d = DriveValue::new(0.0).unwrap();
    let anim = Animation::new(&tl, tween(&d, 1.0, 100));
    {
        let anim = anim.clone();
        d.subscribe(move |v| {
            if v >= 0.3 {
                anim.stop();
                assert_eq!(anim.state(), RunState::Canceled);
            }
        });
    }
    let (log, cb) = recorder();
    anim.start_with(cb);

    tl.tick(ms(20));
    assert!(anim.is_running());
    tl.tick(ms(40));
    assert!((d.get() - 0.4).abs() < 1e-9);
    assert_eq!(anim.state(), RunState::Canceled);
    assert_eq!(*log.borrow(), vec![false]);
    assert_eq!(tl.running_count(), 0);

    tl.tick(ms(100));
    assert!((d.get() - 0.4).abs() < 1e-9, "no writes after the stop");
    assert_eq!(anim.state(), RunState::Canceled);
    assert_eq!(anim.completed_at(), None);
}

#[test]
fn stop_all_from_a_subscriber_cancels_the_writer_too() {
    let tl = Timeline::new();
    let a = DriveValue::new(0.0).unwrap();
    let b = DriveValue::new(0.0).unwrap();
    let writer = Animation::new(&tl, tween(&a, 1.0, 100));
    let other = Animation::new(&tl, tween(&b, 1.0, 100));
    {
        let tl = tl.clone();
        a.subscribe(move |v| {
            if v >= 0.5 {
                tl.stop_all();
            }
        });
    }
    let (log, cb) = recorder();
    writer.start_with(cb);
    other.start();

    tl.tick(ms(50));
    assert_eq!(writer.state(), RunState::Canceled);
    assert_eq!(other.state(), RunState::Canceled);
    assert_eq!(*log.borrow(), vec![false]);
    assert_eq!(tl.running_count(), 0);

    tl.tick(ms(100));
    assert!((a.get() - 0.5).abs() < 1e-9);
    assert_eq!(b.get(), 0.0);
}

#[test]
fn callbacks_may_restart_their_animation() {
    let tl = Timeline::new();
    let d = DriveValue::new(0.0).unwrap();
    let anim = Animation::new(&tl, tween(&d, 1.0, 100));
    let runs = Rc::new(Cell::new(0));
    {
        let again = anim.clone();
        let runs = Rc::clone(&runs);
        anim.start_with(move |f| {
            runs.set(runs.get() + 1);
            if f.finished {
                again.start();
            }
        });
    }
    tl.tick(ms(100));
    assert_eq!(runs.get(), 1);
    assert!(anim.is_running(), "restarted from its completion callback");
    assert_eq!(tl.running_count(), 1);
}

#[test]
fn stop_all_cancels_everything() {
    let tl = Timeline::new();
    let d = DriveValue::new(0.0).unwrap();
    let a = Animation::new(&tl, tween(&d, 1.0, 100));
    let b = Animation::new(&tl, tween(&d, 2.0, 100));
    let (log_a, cb_a) = recorder();
    let (log_b, cb_b) = recorder();
    a.start_with(cb_a);
    b.start_with(cb_b);

    tl.stop_all();
    assert_eq!(tl.running_count(), 0);
    assert_eq!(*log_a.borrow(), vec![false]);
    assert_eq!(*log_b.borrow(), vec![false]);
    assert_eq!(a.state(), RunState::Canceled);
}
